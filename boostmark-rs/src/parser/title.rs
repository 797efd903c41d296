//! Note title to file name normalization.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

static HYPHEN_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-{2,}").unwrap());
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Derive a filesystem-safe name from a note title.
///
/// Keeps letters and digits of any script (diacritics included), `_`,
/// whitespace, `.` and `-`. Hyphen runs collapse to one hyphen, whitespace
/// runs to one space, and the result is trimmed. May return an empty string.
///
/// Normalizing an already normalized name returns it unchanged. The result
/// is NFC-composed again after filtering.
pub fn normalize_name(title: &str) -> String {
    let kept: String = title
        .nfc()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace() || matches!(c, '_' | '.' | '-'))
        .collect();

    let collapsed = HYPHEN_RUN.replace_all(&kept, "-");
    let collapsed = WHITESPACE_RUN.replace_all(&collapsed, " ");

    collapsed.trim().nfc().collect()
}
