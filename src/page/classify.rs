//! Resource classification for FAQ detail pages.
//!
//! A detail page never is the FAQ itself; it either embeds the content
//! inline (HTML guides) or links out to the real artifact (a plain-text
//! mirror, a scanned image, a PDF). The site marks each format with a
//! distinguishable but undocumented markup convention, so classification is
//! an ordered list of substring heuristics: first match wins, image markers
//! outrank the generic HTML markers.

use std::fmt;

use scraper::Html;

use super::error::PageError;
use super::parse_static_selector;

/// Container holding the embedded resource on image and PDF detail pages.
const FAQ_CONTAINER_SELECTOR: &str = "div#faqtxt";

/// The kind of resource a detail page points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    /// Plain-text mirror reached through a "view source" link.
    Text,
    /// The detail page itself carries the content inline.
    Html,
    /// Scanned image, GIF.
    Gif,
    /// Scanned image, PNG.
    Png,
    /// Scanned image, JPG.
    Jpg,
    /// Embedded PDF document.
    Pdf,
    /// No heuristic matched.
    Unknown,
}

impl ResourceKind {
    /// Whether the resource content is binary.
    ///
    /// `Unknown` counts as binary so that nothing downstream ever tries to
    /// decode content the classifier could not identify.
    #[must_use]
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            Self::Gif | Self::Png | Self::Jpg | Self::Pdf | Self::Unknown
        )
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Text => "text",
            Self::Html => "html",
            Self::Gif => "gif",
            Self::Png => "png",
            Self::Jpg => "jpg",
            Self::Pdf => "pdf",
            Self::Unknown => "unknown",
        };
        f.write_str(label)
    }
}

/// A classified detail page: the resource kind plus, where one exists, the
/// URL of the resource to download.
///
/// `resource_url` is `None` for [`ResourceKind::Html`] (the detail page
/// itself is the content) and [`ResourceKind::Unknown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedResource {
    /// The resource kind.
    pub kind: ResourceKind,
    /// Where the resource lives, when distinct from the detail page.
    pub resource_url: Option<String>,
}

impl ClassifiedResource {
    /// Whether the resource content is binary.
    #[must_use]
    pub fn is_binary(&self) -> bool {
        self.kind.is_binary()
    }
}

/// How the resource URL is pulled out of the page once a marker matched.
#[derive(Debug, Clone, Copy)]
enum Extraction {
    /// `src` of the first `<img>` inside the faqtxt container.
    FaqImage,
    /// `src` of the first `<embed>` inside the faqtxt container.
    FaqEmbed,
    /// `href` of the anchor whose visible text carries the marker phrase.
    ViewSourceAnchor,
    /// The detail page itself is the content; no URL to extract.
    DetailPage,
}

struct Heuristic {
    marker: &'static str,
    kind: ResourceKind,
    extraction: Extraction,
}

/// Ordered classification table; evaluated top to bottom, first matching
/// marker wins. Image and PDF markers come before the text and generic HTML
/// markers so that a page mentioning both classifies as the image it embeds.
const HEURISTICS: &[Heuristic] = &[
    Heuristic {
        marker: "(GIF)",
        kind: ResourceKind::Gif,
        extraction: Extraction::FaqImage,
    },
    Heuristic {
        marker: "(PNG)",
        kind: ResourceKind::Png,
        extraction: Extraction::FaqImage,
    },
    Heuristic {
        marker: "(JPG)",
        kind: ResourceKind::Jpg,
        extraction: Extraction::FaqImage,
    },
    Heuristic {
        marker: "(PDF)",
        kind: ResourceKind::Pdf,
        extraction: Extraction::FaqEmbed,
    },
    Heuristic {
        marker: "view source",
        kind: ResourceKind::Text,
        extraction: Extraction::ViewSourceAnchor,
    },
    Heuristic {
        marker: "faqtable",
        kind: ResourceKind::Html,
        extraction: Extraction::DetailPage,
    },
    Heuristic {
        marker: "author_area",
        kind: ResourceKind::Html,
        extraction: Extraction::DetailPage,
    },
];

/// Classifies a detail page against the ordered heuristic table.
///
/// No marker matching at all yields [`ResourceKind::Unknown`] (the caller
/// skips the page); a marker whose implied element is absent is a
/// [`PageError`].
///
/// # Errors
///
/// Returns [`PageError::MissingElement`] when a matched heuristic cannot
/// find the element it expects (e.g. `(PNG)` present but no `<img>` inside
/// the faqtxt container).
pub fn classify(detail_html: &str) -> Result<ClassifiedResource, PageError> {
    for heuristic in HEURISTICS {
        if !detail_html.contains(heuristic.marker) {
            continue;
        }
        let resource_url = match heuristic.extraction {
            Extraction::DetailPage => None,
            Extraction::FaqImage => Some(faq_container_src(detail_html, "img")?),
            Extraction::FaqEmbed => Some(faq_container_src(detail_html, "embed")?),
            Extraction::ViewSourceAnchor => Some(view_source_href(detail_html)?),
        };
        return Ok(ClassifiedResource {
            kind: heuristic.kind,
            resource_url,
        });
    }

    Ok(ClassifiedResource {
        kind: ResourceKind::Unknown,
        resource_url: None,
    })
}

/// Returns the `src` of the first `tag` element inside the faqtxt container.
fn faq_container_src(detail_html: &str, tag: &'static str) -> Result<String, PageError> {
    let document = Html::parse_document(detail_html);
    let container_selector = parse_static_selector(FAQ_CONTAINER_SELECTOR);
    let tag_selector = parse_static_selector(tag);

    let container = document
        .select(&container_selector)
        .next()
        .ok_or_else(|| PageError::missing("div#faqtxt container", "detail page"))?;
    let element = container
        .select(&tag_selector)
        .next()
        .ok_or_else(|| PageError::missing(tag, "div#faqtxt container"))?;
    element
        .value()
        .attr("src")
        .map(std::string::ToString::to_string)
        .ok_or_else(|| PageError::missing("src attribute", tag))
}

/// Returns the `href` of the first anchor whose visible text contains
/// "view source".
fn view_source_href(detail_html: &str) -> Result<String, PageError> {
    let document = Html::parse_document(detail_html);
    let anchor_selector = parse_static_selector("a");

    document
        .select(&anchor_selector)
        .find(|anchor| anchor.text().collect::<String>().contains("view source"))
        .ok_or_else(|| PageError::missing("\"view source\" anchor", "detail page"))?
        .value()
        .attr("href")
        .map(std::string::ToString::to_string)
        .ok_or_else(|| PageError::missing("href attribute", "\"view source\" anchor"))
}
