//! Per-user conversation session types.
//!
//! A [`Session`] is the unit of state the dialogue engine reads and writes.
//! One session exists per chat user; it records where in the menu flow the
//! user is, which hospital unit they picked, and the bounded history of
//! their exchanges with the virtual assistant.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Maximum retained assistant exchanges (user + assistant entries combined).
/// Oldest entries are dropped first once the cap is reached.
pub const MAX_HISTORY_ENTRIES: usize = 20;

/// Dialogue state of a single user's conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueState {
    /// Waiting for the user to pick a hospital unit.
    Initial,
    /// Unit picked; waiting for an indicator-menu choice.
    UnitSelected,
    /// Back from the feedback menu; same dispatch as [`DialogueState::UnitSelected`].
    Reselect,
    /// Waiting for a feedback-menu choice (1 = new indicator, 2 = message
    /// the information office, 3 = end).
    Feedback,
    /// Waiting for the free-text message to forward to the information office.
    FeedbackEscalation,
    /// Waiting for the question to send to the virtual assistant.
    AwaitingQuestion,
}

impl fmt::Display for DialogueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DialogueState::Initial => "initial",
            DialogueState::UnitSelected => "unit_selected",
            DialogueState::Reselect => "reselect",
            DialogueState::Feedback => "feedback",
            DialogueState::FeedbackEscalation => "feedback_escalation",
            DialogueState::AwaitingQuestion => "awaiting_question",
        };
        write!(f, "{s}")
    }
}

impl FromStr for DialogueState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "initial" => Ok(DialogueState::Initial),
            "unit_selected" => Ok(DialogueState::UnitSelected),
            "reselect" => Ok(DialogueState::Reselect),
            "feedback" => Ok(DialogueState::Feedback),
            "feedback_escalation" => Ok(DialogueState::FeedbackEscalation),
            "awaiting_question" => Ok(DialogueState::AwaitingQuestion),
            _ => Err(format!("unknown dialogue state: {s}")),
        }
    }
}

/// Hospital information system a unit runs on.
///
/// Determines which handler serves the system-dependent indicator range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InfoSystem {
    /// SIGH units: indicators via Fhemig em Números, catch-all via Pentaho.
    #[serde(rename = "SIGH")]
    Sigh,
    /// Tasy units: indicators and catch-all via the Tasy report module.
    #[serde(rename = "TASY")]
    Tasy,
}

impl fmt::Display for InfoSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InfoSystem::Sigh => "SIGH",
            InfoSystem::Tasy => "TASY",
        };
        write!(f, "{s}")
    }
}

impl FromStr for InfoSystem {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SIGH" | "sigh" => Ok(InfoSystem::Sigh),
            "TASY" | "tasy" => Ok(InfoSystem::Tasy),
            _ => Err(format!("unknown information system: {s}")),
        }
    }
}

/// Author of one history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryRole {
    User,
    Assistant,
}

/// One entry in the assistant conversation history.
///
/// Only question/answer exchanges with the virtual assistant are recorded;
/// menu navigation is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryTurn {
    pub role: HistoryRole,
    pub text: String,
}

impl HistoryTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: HistoryRole::User,
            text: text.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: HistoryRole::Assistant,
            text: text.into(),
        }
    }
}

/// Per-user conversation record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Current dialogue state.
    pub state: DialogueState,
    /// Selected unit name; `Some` once a unit has been picked.
    pub unit: Option<String>,
    /// Information system of the selected unit.
    pub system: Option<InfoSystem>,
    /// Free text awaiting (or retrying) forwarding to the escalation sink.
    /// Cleared once the forward is delivered.
    pub pending_escalation: Option<String>,
    /// Bounded assistant exchange history, oldest first.
    #[serde(default)]
    pub history: Vec<HistoryTurn>,
    /// Instant of the last committed turn; drives idle eviction.
    pub last_updated: DateTime<Utc>,
}

impl Session {
    /// Fresh session in the Initial state.
    pub fn new() -> Self {
        Self {
            state: DialogueState::Initial,
            unit: None,
            system: None,
            pending_escalation: None,
            history: Vec::new(),
            last_updated: Utc::now(),
        }
    }

    /// Refresh `last_updated` to now.
    pub fn touch(&mut self) {
        self.last_updated = Utc::now();
    }

    /// Append one history entry, dropping the oldest past the cap.
    pub fn push_history(&mut self, turn: HistoryTurn) {
        self.history.push(turn);
        if self.history.len() > MAX_HISTORY_ENTRIES {
            let excess = self.history.len() - MAX_HISTORY_ENTRIES;
            self.history.drain(..excess);
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
