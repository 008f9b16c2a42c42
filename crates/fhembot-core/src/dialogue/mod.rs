//! The menu-driven dialogue state machine.
//!
//! `engine` holds the total transition function over sessions and inbound
//! events; `routing` derives where a numeric menu choice leads from the
//! catalog table sizes; `messages` is the single home of all user-visible
//! copy; `input` parses raw text into menu choices.

pub mod engine;
pub mod input;
pub mod messages;
pub mod routing;

pub use engine::{DialogueEngine, Turn};
pub use routing::MenuRoute;
