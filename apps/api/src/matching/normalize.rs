//! Text normalization applied to both documents before any scoring, plus
//! the prefix truncation used to bound language-model prompts.

/// Collapses every run of whitespace (spaces, tabs, newlines, Unicode
/// whitespace) to a single space and trims both ends.
pub fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// First `max_chars` characters of `text`, cut on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
