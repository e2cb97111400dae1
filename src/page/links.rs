//! FAQ link collection from an index page.

use scraper::Html;
use tracing::debug;

use super::parse_static_selector;

/// Class marker the site puts on each FAQ listing block. There can be more
/// than one block (e.g. separate language sections); all are scanned.
const TABLE_LIST_SELECTOR: &str = ".table-list";

const ANCHOR_SELECTOR: &str = "a[href]";

/// Substring that qualifies an anchor as a FAQ detail link. An href
/// *ending* with it is the section's own link, not an entry.
const FAQ_PATH_MARKER: &str = "/faqs/";

/// One FAQ entry from a listing block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaqLink {
    /// URL of the FAQ detail page.
    pub href: String,
    /// The anchor's visible text; used for log output only.
    pub title: String,
}

/// Collects FAQ detail links from an index page.
///
/// Scans every "table-list" block, keeps anchors whose `href` contains
/// `/faqs/` without ending in it, and concatenates the results across
/// blocks in document order. No qualifying anchors is an empty vec, not an
/// error.
#[must_use]
pub fn collect_faq_links(index_html: &str) -> Vec<FaqLink> {
    let document = Html::parse_document(index_html);
    let tables = parse_static_selector(TABLE_LIST_SELECTOR);
    let anchors = parse_static_selector(ANCHOR_SELECTOR);

    let mut links = Vec::new();
    for table in document.select(&tables) {
        for anchor in table.select(&anchors) {
            let Some(href) = anchor.value().attr("href") else {
                continue;
            };
            if !qualifies(href) {
                continue;
            }
            let title = anchor.text().collect::<String>().trim().to_string();
            links.push(FaqLink {
                href: href.to_string(),
                title,
            });
        }
    }

    debug!(count = links.len(), "collected FAQ links");
    links
}

fn qualifies(href: &str) -> bool {
    href.contains(FAQ_PATH_MARKER) && !href.ends_with(FAQ_PATH_MARKER)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_faq_links_returns_qualifying_anchors_in_order() {
        let html = r#"
            <html><body>
            <table class="table-list">
              <tr><td><a href="http://site/game/faqs/">All FAQs</a></td></tr>
              <tr><td><a href="http://site/game/faqs/100-walkthrough">Walkthrough</a></td></tr>
              <tr><td><a href="http://site/game/faqs/200-maps">Maps</a></td></tr>
            </table>
            </body></html>
        "#;

        let links = collect_faq_links(html);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].href, "http://site/game/faqs/100-walkthrough");
        assert_eq!(links[0].title, "Walkthrough");
        assert_eq!(links[1].href, "http://site/game/faqs/200-maps");
        assert_eq!(links[1].title, "Maps");
    }

    #[test]
    fn test_collect_faq_links_scans_multiple_tables() {
        let html = r#"
            <html><body>
            <table class="table-list">
              <tr><td><a href="/game/faqs/1-english">English guide</a></td></tr>
            </table>
            <h2>Other languages</h2>
            <table class="table-list">
              <tr><td><a href="/game/faqs/2-german">German guide</a></td></tr>
            </table>
            </body></html>
        "#;

        let links = collect_faq_links(html);
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].href, "/game/faqs/1-english");
        assert_eq!(links[1].href, "/game/faqs/2-german");
    }

    #[test]
    fn test_collect_faq_links_ignores_anchors_outside_table_list() {
        let html = r#"
            <html><body>
            <a href="/game/faqs/99-unlisted">Unlisted</a>
            <div class="table-list">
              <a href="/game/faqs/1-listed">Listed</a>
            </div>
            </body></html>
        "#;

        let links = collect_faq_links(html);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].href, "/game/faqs/1-listed");
    }

    #[test]
    fn test_collect_faq_links_ignores_non_faq_hrefs() {
        let html = r#"
            <div class="table-list">
              <a href="/game/cheats/1">Cheats</a>
              <a href="/game/faqs/1-guide">Guide</a>
            </div>
        "#;

        let links = collect_faq_links(html);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].href, "/game/faqs/1-guide");
    }

    #[test]
    fn test_collect_faq_links_empty_when_none_qualify() {
        let html = r#"
            <div class="table-list">
              <a href="/game/faqs/">Section link only</a>
            </div>
        "#;

        assert!(collect_faq_links(html).is_empty());
    }

    #[test]
    fn test_collect_faq_links_no_table_list_yields_empty() {
        assert!(collect_faq_links("<html><body>nothing here</body></html>").is_empty());
    }

    #[test]
    fn test_qualifies_excludes_section_href() {
        assert!(qualifies("/game/faqs/100-walkthrough"));
        assert!(!qualifies("/game/faqs/"));
        assert!(!qualifies("/game/cheats/100"));
    }
}
