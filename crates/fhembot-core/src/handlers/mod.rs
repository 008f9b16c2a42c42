//! Content handlers behind the indicator menu.
//!
//! Pure functions from typed input to a reply body plus next state; they
//! never touch the store or the transport. The assistant handler is the
//! one async member, since it calls the answer provider.

pub mod assistant;
pub mod escalation;
pub mod indicator;
pub mod report;
pub mod unit;

use fhembot_types::session::DialogueState;

/// Output of a content handler: the reply body and the state the session
/// moves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerReply {
    pub body: String,
    pub next_state: DialogueState,
}
