//! Answer-provider request/response types.
//!
//! The virtual-assistant handler builds an [`AnswerRequest`] from the
//! user's question plus session context and hands it to whichever
//! `AnswerProvider` implementation is wired in. The provider returns an
//! [`AnswerResponse`] or an [`crate::error::AnswerError`].

use serde::{Deserialize, Serialize};

use crate::session::{HistoryTurn, InfoSystem};

/// One question for the virtual assistant, with conversation context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRequest {
    /// The user's question, verbatim.
    pub question: String,
    /// Sender display name, used conversationally in the persona prompt.
    pub display_name: String,
    /// Selected unit, when one has been picked this conversation.
    pub unit: Option<String>,
    /// Information system of the selected unit.
    pub system: Option<InfoSystem>,
    /// Prior assistant exchanges, oldest first, already bounded.
    pub history: Vec<HistoryTurn>,
}

/// Answer produced by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResponse {
    /// Answer text in platform markdown.
    pub text: String,
    /// Model that produced the answer.
    pub model: String,
}
