//! Body rewriting for export.

use crate::parser::marker::strip_markers;
use regex::Regex;
use std::sync::LazyLock;

/// Table-of-contents marker used by the source editor.
pub const TOC_MARKER: &str = "[TOC]";

// A leading TOC marker plus whatever whitespace follows it.
static LEADING_TOC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\[TOC\]\s*").unwrap());

/// Rewrite raw note content into its exported form.
///
/// Markers are stripped first. Content starting with `[TOC]` loses the
/// marker and any whitespace after it; content starting with a level-1
/// heading is kept as is; anything else gets `# {name}` and a blank line
/// prepended.
pub fn adjust_content(raw: &str, name: &str) -> String {
    let content = strip_markers(raw);

    if content.starts_with(TOC_MARKER) {
        return LEADING_TOC.replace(&content, "").into_owned();
    }

    if starts_with_h1(&content) {
        return content;
    }

    format!("# {}\n\n{}", name, content)
}

fn starts_with_h1(content: &str) -> bool {
    let mut chars = content.chars();
    chars.next() == Some('#') && chars.next().is_some_and(char::is_whitespace)
}
