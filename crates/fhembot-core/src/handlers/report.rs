//! Report instruction handlers for information outside the indicator
//! catalogs.

use fhembot_types::catalog::{IndicatorEntry, LookupTable};
use fhembot_types::session::{DialogueState, InfoSystem};

use crate::dialogue::messages;

use super::HandlerReply;

/// Pentaho access instructions, the catch-all for SIGH units.
pub fn reporting_tool(unit: &str, reports: &LookupTable<IndicatorEntry>) -> HandlerReply {
    HandlerReply {
        body: format!(
            "{}\n\n{}",
            messages::reporting_tool_instructions(unit, reports),
            messages::feedback_menu()
        ),
        next_state: DialogueState::Feedback,
    }
}

/// Tasy report-module instructions, serving both the dashboard range and
/// the catch-all for Tasy units.
pub fn hospital_system(
    unit: &str,
    system: InfoSystem,
    reports: &LookupTable<IndicatorEntry>,
) -> HandlerReply {
    HandlerReply {
        body: format!(
            "{}\n\n{}",
            messages::hospital_system_instructions(unit, system, reports),
            messages::feedback_menu()
        ),
        next_state: DialogueState::Feedback,
    }
}
