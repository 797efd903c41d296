//! Attachment marker handling.
//!
//! Note bodies reference vault attachments as `:storage/<path>`, normally
//! inside a Markdown link such as `![x](:storage/abc/img.png)`. The path ends
//! at the first `)`, so paths containing `)` are not supported.

use regex::Regex;
use std::sync::LazyLock;

/// The literal prefix identifying an attachment reference.
pub const MARKER_PREFIX: &str = ":storage/";

// Everything up to (not including) the first `)`, across line breaks.
static MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":storage/([^)]*)").unwrap());

/// Extract every attachment path referenced by markers in raw content.
///
/// Paths are returned in order of first appearance, without duplicates.
/// Must run against content that still contains its markers.
pub fn extract_attachment_refs(content: &str) -> Vec<String> {
    let mut refs: Vec<String> = Vec::new();

    for cap in MARKER.captures_iter(content) {
        let path = cap.get(1).map(|m| m.as_str()).unwrap_or("");
        if !refs.iter().any(|r| r == path) {
            refs.push(path.to_string());
        }
    }

    refs
}

/// Remove every marker prefix, leaving bare relative paths in place.
pub fn strip_markers(content: &str) -> String {
    content.replace(MARKER_PREFIX, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_single() {
        let refs = extract_attachment_refs("Body text ![x](:storage/img.png))");
        assert_eq!(refs, vec!["img.png"]);
    }

    #[test]
    fn test_extract_nested_paths_in_order() {
        let content = "![a](:storage/note1/b.png)\ntext [doc](:storage/note1/sub/a.pdf)";
        assert_eq!(
            extract_attachment_refs(content),
            vec!["note1/b.png", "note1/sub/a.pdf"]
        );
    }

    #[test]
    fn test_extract_dedupes() {
        let content = "![a](:storage/x.png) ![b](:storage/x.png)";
        assert_eq!(extract_attachment_refs(content), vec!["x.png"]);
    }

    #[test]
    fn test_extract_none() {
        assert!(extract_attachment_refs("no attachments here").is_empty());
    }

    #[test]
    fn test_terminator_is_first_paren() {
        // a path containing ')' is cut short; this is the accepted behavior
        let refs = extract_attachment_refs("![x](:storage/a(1).png)");
        assert_eq!(refs, vec!["a(1"]);
    }

    #[test]
    fn test_unterminated_marker_runs_to_end() {
        let refs = extract_attachment_refs("see :storage/file.txt");
        assert_eq!(refs, vec!["file.txt"]);
    }

    #[test]
    fn test_strip_markers() {
        let stripped = strip_markers("![x](:storage/img.png) and [y](:storage/d/f.pdf)");
        assert_eq!(stripped, "![x](img.png) and [y](d/f.pdf)");
        assert!(!stripped.contains(MARKER_PREFIX));
    }

    #[test]
    fn test_strip_is_idempotent() {
        let once = strip_markers("![x](:storage/img.png)");
        assert_eq!(strip_markers(&once), once);
    }

    #[test]
    fn test_extract_after_strip_finds_nothing() {
        let content = "![x](:storage/img.png)";
        assert_eq!(extract_attachment_refs(content), vec!["img.png"]);
        assert!(extract_attachment_refs(&strip_markers(content)).is_empty());
    }
}
