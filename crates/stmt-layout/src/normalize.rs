//! Text and font-name canonicalization
//!
//! Keywords, line text, and span text must all pass through the same
//! normalization at both synthesis and validation time; any asymmetry
//! silently breaks matching.

/// Strip every character that is not an ASCII letter or digit, then
/// lowercase. Total on all inputs (empty string stays empty) and
/// idempotent.
pub fn normalize_text(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

/// Normalize a font name for comparison: lowercase, drop hyphens, drop
/// the literal substring "mt". Folds family variants like "Arial" and
/// "ArialMT" together.
pub fn normalize_font(font: &str) -> String {
    font.to_lowercase()
        .replace('-', "")
        .replace("mt", "")
        .trim()
        .to_string()
}
