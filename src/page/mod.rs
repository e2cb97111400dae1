//! HTML inspection for the target site's FAQ pages.
//!
//! Two concerns live here:
//! - [`collect_faq_links`] - pull the FAQ detail links out of an index page
//! - [`classify`] - decide what kind of resource a detail page points at,
//!   and where that resource lives
//!
//! The site publishes no structured metadata, so both lean on observed
//! markup conventions ("table-list" blocks, the `faqtxt` container, format
//! markers in the page text). That coupling is deliberate and documented
//! per heuristic in [`classify`].

mod classify;
mod error;
mod links;

pub use classify::{ClassifiedResource, ResourceKind, classify};
pub use error::PageError;
pub use links::{FaqLink, collect_faq_links};

use scraper::Selector;

/// Parses a selector at a known-good literal; panics on invalid input.
pub(crate) fn parse_static_selector(selector: &str) -> Selector {
    Selector::parse(selector)
        .unwrap_or_else(|e| panic!("invalid static selector '{selector}': {e}"))
}
