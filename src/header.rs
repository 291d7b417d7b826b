//! Header normalization
//!
//! Turns the human-readable column labels of the status page
//! ("Channel ID", "Power", "Symbol Rate") into stable snake_case
//! identifiers ("channel_id", "power", "symbol_rate").

/// Normalize a raw column label into a stable identifier.
///
/// Trims surrounding whitespace, lower-cases the text and replaces every
/// character outside `[a-z0-9]` with one underscore. Normalizing an
/// already-normalized identifier returns it unchanged.
pub fn normalize(text: &str) -> String {
    text.trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Check whether `text` is already a normalized identifier.
pub fn is_normalized(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}
