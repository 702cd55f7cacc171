//! Field-list loading
//!
//! A bank's field list is a plain text file, one keyword per line. Order
//! is preserved because the matcher is first-keyword-wins per line.

use crate::LayoutError;
use std::path::Path;

/// Load the ordered field-keyword list for a bank. Lines are trimmed
/// and blank lines dropped.
pub fn load_field_list(path: &Path) -> Result<Vec<String>, LayoutError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}
