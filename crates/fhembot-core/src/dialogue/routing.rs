//! Catalog-driven routing of indicator-menu choices.
//!
//! Menu positions are derived from the catalog table sizes, never
//! hard-coded per index: panel indicators come first, then the dashboard
//! indicators, then the catch-all entry, then the virtual-assistant entry.
//! Adding an indicator to a catalog file shifts every later position
//! without touching this module.

use fhembot_types::catalog::Catalog;
use fhembot_types::session::InfoSystem;

/// Where a numeric indicator-menu choice leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuRoute {
    /// Power BI panel instructions for panel indicator `n` (1-based).
    PanelIndicator(usize),
    /// Fhemig em Números query instructions for dashboard indicator `n`
    /// (1-based). SIGH units only.
    NumbersIndicator(usize),
    /// Pentaho access instructions. The catch-all for SIGH units.
    ReportingTool,
    /// Tasy report-module instructions. Serves both the dashboard range
    /// and the catch-all for Tasy units.
    HospitalReport,
    /// Hand the conversation to the virtual assistant.
    Assistant,
    /// Out of range.
    Invalid,
}

/// Route a numeric choice for a unit running on the given system.
pub fn route(catalog: &Catalog, system: InfoSystem, choice: usize) -> MenuRoute {
    let panel = catalog.panel_indicators.len();
    let numbers = catalog.numbers_indicators.len();

    if choice == 0 {
        MenuRoute::Invalid
    } else if choice <= panel {
        MenuRoute::PanelIndicator(choice)
    } else if choice <= panel + numbers {
        match system {
            InfoSystem::Sigh => MenuRoute::NumbersIndicator(choice - panel),
            InfoSystem::Tasy => MenuRoute::HospitalReport,
        }
    } else if choice == panel + numbers + 1 {
        match system {
            InfoSystem::Sigh => MenuRoute::ReportingTool,
            InfoSystem::Tasy => MenuRoute::HospitalReport,
        }
    } else if choice == panel + numbers + 2 {
        MenuRoute::Assistant
    } else {
        MenuRoute::Invalid
    }
}
