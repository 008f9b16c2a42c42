//! Indicator instruction handlers.
//!
//! Both produce a source-of-truth walkthrough for one indicator and move
//! the conversation to the feedback menu.

use fhembot_types::catalog::IndicatorEntry;
use fhembot_types::session::DialogueState;

use crate::dialogue::messages;

use super::HandlerReply;

/// Power BI panel instructions for a panel indicator.
pub fn future_panel(indicator: &IndicatorEntry, unit: &str) -> HandlerReply {
    HandlerReply {
        body: format!(
            "{}\n\n{}",
            messages::future_panel_instructions(&indicator.label, unit),
            messages::feedback_menu()
        ),
        next_state: DialogueState::Feedback,
    }
}

/// "Fhemig em Números" query instructions for a dashboard indicator.
pub fn numbers_dashboard(indicator: &IndicatorEntry, unit: &str) -> HandlerReply {
    HandlerReply {
        body: format!(
            "{}\n\n{}",
            messages::numbers_instructions(&indicator.label, unit),
            messages::feedback_menu()
        ),
        next_state: DialogueState::Feedback,
    }
}
