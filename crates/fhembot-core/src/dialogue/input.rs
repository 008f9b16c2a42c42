//! Raw text to menu choice parsing.

/// Parse a menu choice from raw message text.
///
/// Surrounding whitespace is trimmed and plain ASCII digit strings are
/// accepted ("007" parses to 7). Anything else, including signs, decimals,
/// and digits embedded in text, is not a choice.
pub fn parse_choice(text: &str) -> Option<usize> {
    let trimmed = text.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}
