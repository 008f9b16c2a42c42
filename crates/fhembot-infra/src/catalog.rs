//! Catalog loader.
//!
//! Reads the five lookup tables from JSON files in the data directory.
//! Each file is a JSON object keyed by `"1".."N"`; a missing or malformed
//! file degrades that whole table to empty with a warning, never to a
//! partial menu. An empty units table leaves the assistant answering with
//! a fixed notice instead of the unit menu.

use std::path::Path;

use fhembot_types::catalog::{Catalog, IndicatorEntry, LookupTable, UnitEntry};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// File names expected under the data directory.
const UNITS_FILE: &str = "units.json";
const PANEL_FILE: &str = "panel_indicators.json";
const NUMBERS_FILE: &str = "numbers_indicators.json";
const SIGH_REPORTS_FILE: &str = "sigh_reports.json";
const TASY_REPORTS_FILE: &str = "tasy_reports.json";

/// Load every catalog table from `data_dir`.
pub async fn load_catalog(data_dir: &Path) -> Catalog {
    let catalog = Catalog {
        units: load_table::<UnitEntry>(data_dir, UNITS_FILE).await,
        panel_indicators: load_table::<IndicatorEntry>(data_dir, PANEL_FILE).await,
        numbers_indicators: load_table::<IndicatorEntry>(data_dir, NUMBERS_FILE).await,
        sigh_reports: load_table::<IndicatorEntry>(data_dir, SIGH_REPORTS_FILE).await,
        tasy_reports: load_table::<IndicatorEntry>(data_dir, TASY_REPORTS_FILE).await,
    };

    if catalog.units.is_empty() {
        warn!("units catalog is empty, unit selection is disabled");
    }
    info!(
        units = catalog.units.len(),
        panel_indicators = catalog.panel_indicators.len(),
        numbers_indicators = catalog.numbers_indicators.len(),
        sigh_reports = catalog.sigh_reports.len(),
        tasy_reports = catalog.tasy_reports.len(),
        "catalog loaded"
    );
    catalog
}

async fn load_table<T: DeserializeOwned>(data_dir: &Path, file_name: &str) -> LookupTable<T> {
    let path = data_dir.join(file_name);

    let content = match tokio::fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            debug!("no {} at {}, table is empty", file_name, path.display());
            return LookupTable::empty();
        }
        Err(err) => {
            warn!("failed to read {}: {err}, table is empty", path.display());
            return LookupTable::empty();
        }
    };

    let value: serde_json::Value = match serde_json::from_str(&content) {
        Ok(value) => value,
        Err(err) => {
            warn!("failed to parse {}: {err}, table is empty", path.display());
            return LookupTable::empty();
        }
    };

    match LookupTable::from_json_value(value) {
        Ok(table) => table,
        Err(err) => {
            warn!("rejected {}: {err}, table is empty", path.display());
            LookupTable::empty()
        }
    }
}
