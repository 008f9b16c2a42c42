//! Unit selection.

use fhembot_types::catalog::{LookupTable, UnitEntry};

use crate::dialogue::input;

/// Resolve raw text into a unit entry.
///
/// Returns `None` when the text is not a number or is out of range.
pub fn select<'a>(units: &'a LookupTable<UnitEntry>, text: &str) -> Option<&'a UnitEntry> {
    input::parse_choice(text).and_then(|choice| units.get(choice))
}
