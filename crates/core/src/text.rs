//! Text helpers for product copy.

/// Default character limit for product card descriptions.
pub const DEFAULT_TRUNCATE_LIMIT: usize = 90;

/// Truncate `text` to at most `limit` characters, appending `...` when cut.
///
/// Limits count characters, not bytes, so multi-byte text is never split
/// inside a code point.
///
/// ```
/// use bazaar_core::text::truncate_text;
///
/// assert_eq!(truncate_text("short", 90), "short");
/// assert_eq!(truncate_text("abcdef", 3), "abc...");
/// ```
#[must_use]
pub fn truncate_text(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Truncate with the [`DEFAULT_TRUNCATE_LIMIT`].
#[must_use]
pub fn truncate_description(text: &str) -> String {
    truncate_text(text, DEFAULT_TRUNCATE_LIMIT)
}
