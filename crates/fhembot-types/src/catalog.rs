//! Lookup catalogs: units, indicators and report listings.
//!
//! Catalog data arrives as JSON objects keyed by 1-based numeric strings:
//!
//! ```json
//! { "1": { "name": "Hospital Júlia Kubitschek", "system": "SIGH" }, "2": { ... } }
//! ```
//!
//! [`LookupTable`] validates that the keys form the contiguous range `1..=N`
//! and preserves that order for menu rendering. Tables are immutable after
//! load; a malformed source degrades to an empty table at the loader, never
//! to a partial one.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;
use crate::session::InfoSystem;

/// One hospital unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitEntry {
    /// Display name, as rendered in the unit menu.
    pub name: String,
    /// Information system the unit runs on.
    pub system: InfoSystem,
}

/// One indicator or report label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorEntry {
    /// Display label, as rendered in the indicator menu.
    pub label: String,
}

/// Ordered lookup table keyed by 1-based contiguous numeric choice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupTable<T> {
    entries: Vec<T>,
}

impl<T> LookupTable<T> {
    /// Table with no entries.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from entries already in key order (key = position + 1).
    pub fn from_entries(entries: Vec<T>) -> Self {
        Self { entries }
    }

    /// Entry for a 1-based choice, `None` when out of range.
    pub fn get(&self, choice: usize) -> Option<&T> {
        choice.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate `(choice, entry)` pairs in menu order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.entries.iter().enumerate().map(|(i, e)| (i + 1, e))
    }
}

impl<T: DeserializeOwned> LookupTable<T> {
    /// Parse a JSON object keyed by `"1".."N"` into an ordered table.
    ///
    /// Keys must be positive integers forming a contiguous range starting
    /// at 1; anything else is a [`CatalogError`] so the loader can degrade
    /// the whole table instead of serving a partial menu.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, CatalogError> {
        let map = match value {
            serde_json::Value::Object(map) => map,
            _ => return Err(CatalogError::NotAnObject),
        };

        let mut keyed: Vec<(usize, serde_json::Value)> = Vec::with_capacity(map.len());
        for (key, entry) in map {
            let choice: usize = key
                .parse()
                .map_err(|_| CatalogError::InvalidKey(key.clone()))?;
            if choice == 0 {
                return Err(CatalogError::InvalidKey(key));
            }
            keyed.push((choice, entry));
        }
        keyed.sort_by_key(|(choice, _)| *choice);

        let mut entries = Vec::with_capacity(keyed.len());
        for (position, (choice, entry)) in keyed.into_iter().enumerate() {
            let expected = position + 1;
            if choice != expected {
                return Err(CatalogError::KeyGap { expected });
            }
            let parsed: T = serde_json::from_value(entry).map_err(|e| {
                CatalogError::InvalidEntry {
                    key: choice,
                    message: e.to_string(),
                }
            })?;
            entries.push(parsed);
        }

        Ok(Self { entries })
    }
}

/// The full catalog set the dialogue engine consumes.
#[derive(Debug, Clone)]
pub struct Catalog {
    /// Hospital units, in unit-menu order.
    pub units: LookupTable<UnitEntry>,
    /// Painel Fhemig do Futuro indicators (the direct-dispatch range).
    pub panel_indicators: LookupTable<IndicatorEntry>,
    /// Fhemig em Números indicators (the system-dependent range).
    pub numbers_indicators: LookupTable<IndicatorEntry>,
    /// Validated SIGH/Pentaho report listing, appended to the catch-all body.
    pub sigh_reports: LookupTable<IndicatorEntry>,
    /// Validated Tasy report listing, appended to the Tasy body.
    pub tasy_reports: LookupTable<IndicatorEntry>,
}

impl Catalog {
    /// Catalog with every table empty (the degraded startup state).
    pub fn empty() -> Self {
        Self {
            units: LookupTable::empty(),
            panel_indicators: LookupTable::empty(),
            numbers_indicators: LookupTable::empty(),
            sigh_reports: LookupTable::empty(),
            tasy_reports: LookupTable::empty(),
        }
    }
}
