//! Filename derivation and target-directory inference.
//!
//! Saved files are named by the last path segment of the URL they came from;
//! the target directory, when not given on the command line, is inferred
//! from the index URL's path.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Directory name used when nothing can be inferred from the index URL.
pub const FALLBACK_DIR_NAME: &str = "unknown";

/// Filename used when a URL has no usable path segment.
const FALLBACK_FILENAME: &str = "download.bin";

/// Compiles a regex at static init; panics on invalid pattern.
fn compile_static_regex(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid static regex '{pattern}': {e}"))
}

/// Captures the path segment immediately preceding `/faqs`.
static DIR_NAME_RE: LazyLock<Regex> = LazyLock::new(|| compile_static_regex(r"/(.*?)/faqs"));

/// Derives an output filename from a URL: the last path segment, with query
/// and fragment ignored, sanitized for filesystem safety.
///
/// Falls back to `download.bin` when the URL has no usable path segment.
#[must_use]
pub fn filename_from_url(url: &str) -> String {
    if let Ok(parsed) = Url::parse(url)
        && let Some(mut segments) = parsed.path_segments()
        && let Some(last) = segments.next_back()
        && !last.is_empty()
    {
        let sanitized = sanitize_filename(last);
        if !sanitized.trim_matches('_').is_empty() {
            return sanitized;
        }
    }
    FALLBACK_FILENAME.to_string()
}

/// Infers a target-directory name from the index URL: the path segment
/// immediately preceding `/faqs`, or `"unknown"` when the path has no such
/// segment.
#[must_use]
pub fn infer_dir_name(url: &str) -> String {
    let path = Url::parse(url).map_or_else(|_| url.to_string(), |u| u.path().to_string());
    DIR_NAME_RE
        .captures(&path)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK_DIR_NAME.to_string())
}

/// Resolves a possibly relative URL string against a base URL.
///
/// Returns the value as-is if it already starts with `http://` or `https://`;
/// normalizes `//...` to `https:...`; otherwise joins with `base_url`.
#[must_use]
pub fn absolutize_url(value: &str, base_url: &Url) -> Option<String> {
    if value.starts_with("http://") || value.starts_with("https://") {
        return Some(value.to_string());
    }
    if value.starts_with("//") {
        return Some(format!("https:{value}"));
    }
    base_url.join(value).ok().map(|url| url.to_string())
}

/// Sanitizes filename for filesystem safety.
///
/// Replaces characters that are invalid on common filesystems:
/// / \ : * ? " < > |
fn sanitize_filename(name: &str) -> String {
    let sanitized: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if sanitized.is_empty() {
        return "_".to_string();
    }

    // Dot-only segments would escape the target directory when joined
    if sanitized.chars().all(|c| c == '.') {
        return sanitized.chars().map(|_| '_').collect();
    }

    sanitized
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    // --- filename_from_url ---

    #[test]
    fn test_filename_from_url_last_segment() {
        assert_eq!(
            filename_from_url("http://host/path/to/file.txt"),
            "file.txt"
        );
    }

    #[test]
    fn test_filename_from_url_ignores_query() {
        assert_eq!(
            filename_from_url("http://host/path/to/file.txt?x=1"),
            "file.txt"
        );
    }

    #[test]
    fn test_filename_from_url_ignores_fragment() {
        assert_eq!(
            filename_from_url("http://host/dir/map.png#section"),
            "map.png"
        );
    }

    #[test]
    fn test_filename_from_url_extensionless_segment() {
        assert_eq!(
            filename_from_url("http://host/game/faqs/100-walkthrough"),
            "100-walkthrough"
        );
    }

    #[test]
    fn test_filename_from_url_empty_path_falls_back() {
        assert_eq!(filename_from_url("http://host/"), "download.bin");
    }

    #[test]
    fn test_filename_from_url_unparsable_falls_back() {
        assert_eq!(filename_from_url("not a url"), "download.bin");
    }

    #[test]
    fn test_filename_from_url_sanitizes_invalid_chars() {
        let name = filename_from_url("http://host/dir/file%3Aname.txt");
        // Percent-encoding is kept verbatim; raw colons never reach the name
        assert!(!name.contains(':'));
    }

    // --- infer_dir_name ---

    #[test]
    fn test_infer_dir_name_segment_before_faqs() {
        assert_eq!(
            infer_dir_name("http://site/pokemon-white/faqs/"),
            "pokemon-white"
        );
    }

    #[test]
    fn test_infer_dir_name_no_capture_yields_unknown() {
        assert_eq!(infer_dir_name("http://site/faqs-index/"), "unknown");
    }

    #[test]
    fn test_infer_dir_name_nested_path_takes_first_capture() {
        // Lazy capture: the first "/<segment>/faqs" window in the path wins
        assert_eq!(
            infer_dir_name("http://site/games/pokemon-white/faqs/"),
            "games/pokemon-white"
        );
    }

    #[test]
    fn test_infer_dir_name_query_not_considered() {
        assert_eq!(infer_dir_name("http://site/thing/?q=/x/faqs"), "unknown");
    }

    // --- absolutize_url ---

    #[test]
    fn test_absolutize_url_absolute_unchanged() {
        let base = Url::parse("http://site/game/faqs/100").unwrap();
        assert_eq!(
            absolutize_url("http://cdn/img/map.png", &base),
            Some("http://cdn/img/map.png".to_string())
        );
    }

    #[test]
    fn test_absolutize_url_protocol_relative() {
        let base = Url::parse("http://site/game/faqs/100").unwrap();
        assert_eq!(
            absolutize_url("//cdn/img/map.png", &base),
            Some("https://cdn/img/map.png".to_string())
        );
    }

    #[test]
    fn test_absolutize_url_relative_joined_with_base() {
        let base = Url::parse("http://site/game/faqs/100").unwrap();
        assert_eq!(
            absolutize_url("/img/map.png", &base),
            Some("http://site/img/map.png".to_string())
        );
    }

    // --- sanitize_filename ---

    #[test]
    fn test_sanitize_filename_removes_invalid_chars() {
        assert_eq!(sanitize_filename("file:name.pdf"), "file_name.pdf");
        assert_eq!(sanitize_filename("file*name.pdf"), "file_name.pdf");
        assert_eq!(sanitize_filename("file<name>.pdf"), "file_name_.pdf");
    }

    #[test]
    fn test_sanitize_filename_rewrites_dot_segments() {
        assert_eq!(sanitize_filename("."), "_");
        assert_eq!(sanitize_filename(".."), "__");
    }

    #[test]
    fn test_sanitize_filename_preserves_valid_chars() {
        assert_eq!(
            sanitize_filename("valid-file_name.pdf"),
            "valid-file_name.pdf"
        );
    }
}
