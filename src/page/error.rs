//! Error type for page inspection.

use thiserror::Error;

/// Errors raised when a page's markup does not match the convention a
/// matched heuristic implies.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PageError {
    /// A format marker was present but the element it implies was absent.
    #[error("expected {what} not found in {context}")]
    MissingElement {
        /// What the heuristic expected to find.
        what: &'static str,
        /// Where it looked.
        context: &'static str,
    },
}

impl PageError {
    /// Creates a missing-element error.
    #[must_use]
    pub fn missing(what: &'static str, context: &'static str) -> Self {
        Self::MissingElement { what, context }
    }
}
