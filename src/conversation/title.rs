//! Title derivation rules.

/// Number of leading words kept from the first user message.
pub const TITLE_WORDS: usize = 5;

/// Marker appended when the title is a truncated prefix.
pub const ELLIPSIS: &str = "…";

/// Prefix of counter-based placeholder titles.
pub const DEFAULT_TITLE_PREFIX: &str = "New Conversation";

/// Placeholder title for the `number`-th conversation of the session.
#[must_use]
pub fn default_title(number: u64) -> String {
    format!("{DEFAULT_TITLE_PREFIX} {number}")
}

/// Title from the first user message.
///
/// Keeps the first [`TITLE_WORDS`] whitespace-separated words joined by a
/// single space. The ellipsis is added whenever the joined prefix has fewer
/// characters than the original text, so collapsed runs of whitespace also
/// count as truncation. Returns `None` for whitespace-only text.
#[must_use]
pub fn title_from_message(text: &str) -> Option<String> {
    let prefix = text
        .split_whitespace()
        .take(TITLE_WORDS)
        .collect::<Vec<_>>()
        .join(" ");
    if prefix.is_empty() {
        return None;
    }
    if prefix.chars().count() < text.chars().count() {
        Some(format!("{prefix}{ELLIPSIS}"))
    } else {
        Some(prefix)
    }
}

/// Title from an uploaded file name.
///
/// Strips a trailing `.csv` only on an exact, case-sensitive match, so
/// `data.CSV` keeps its extension. A name that is nothing but the suffix is
/// kept whole.
#[must_use]
pub fn title_from_file_name(file_name: &str) -> String {
    match file_name.strip_suffix(".csv") {
        Some(stem) if !stem.is_empty() => stem.to_string(),
        _ => file_name.to_string(),
    }
}
