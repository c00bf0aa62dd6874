//! Cell-level normalization of spreadsheet values.
//!
//! Every cell arrives as a string. Empty cells become `None`, cells holding
//! the delimiter become lists, everything else passes through unchanged.

pub mod title;

use crate::types::CellValue;

pub use title::{apply_override, canonicalize, sort_key};

/// Normalize a raw cell using `delimiter` to detect compound values.
///
/// Segments are kept as-is: no trimming, and empty segments survive, so
/// `"a,,b"` yields three entries.
pub fn normalize(cell: &str, delimiter: &str) -> Option<CellValue> {
    if cell.is_empty() {
        None
    } else if !delimiter.is_empty() && cell.contains(delimiter) {
        Some(CellValue::Many(
            cell.split(delimiter).map(str::to_string).collect(),
        ))
    } else {
        Some(CellValue::One(cell.to_string()))
    }
}

/// Boolean spreadsheet flag: `"true"` in any casing.
pub fn is_true(cell: &str) -> bool {
    cell.eq_ignore_ascii_case("true")
}

/// Boolean spreadsheet flag: `"false"` in any casing.
pub fn is_false(cell: &str) -> bool {
    cell.eq_ignore_ascii_case("false")
}
