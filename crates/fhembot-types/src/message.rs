//! Inbound event and outbound reply types.
//!
//! The transport adapter maps platform payloads into [`InboundEvent`]s and
//! sends [`Reply`]s back out. Everything between those two edges works on
//! these types only, so the dialogue core stays platform-agnostic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Conversation surface an event arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationKind {
    /// One-on-one conversation with the bot. The only kind that is processed.
    Direct,
    /// Group/stream conversation. Dropped at ingestion.
    Group,
}

impl fmt::Display for ConversationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConversationKind::Direct => "direct",
            ConversationKind::Group => "group",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ConversationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "direct" => Ok(ConversationKind::Direct),
            "group" => Ok(ConversationKind::Group),
            _ => Err(format!("unknown conversation kind: {s}")),
        }
    }
}

/// One inbound chat message, normalized from the platform payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundEvent {
    /// Stable per-user key; also the reply destination address.
    pub user_id: String,
    /// Human-readable sender name, used in the escalation forward prefix.
    pub display_name: String,
    /// Raw message text.
    pub text: String,
    /// Conversation surface.
    pub kind: ConversationKind,
    /// True when the bot authored this message itself.
    pub sender_is_self: bool,
}

impl InboundEvent {
    /// Direct message from a user, the common case.
    pub fn direct(
        user_id: impl Into<String>,
        display_name: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            text: text.into(),
            kind: ConversationKind::Direct,
            sender_is_self: false,
        }
    }
}

/// One outbound chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    /// Platform address: the user for normal replies, the configured
    /// escalation recipient for forwards.
    pub destination: String,
    /// Message body (platform markdown).
    pub body: String,
    /// Conversation surface to send on.
    pub kind: ConversationKind,
}

impl Reply {
    /// Direct reply to a single address.
    pub fn direct(destination: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            destination: destination.into(),
            body: body.into(),
            kind: ConversationKind::Direct,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_kind_roundtrip() {
        for kind in [ConversationKind::Direct, ConversationKind::Group] {
            let s = kind.to_string();
            let parsed: ConversationKind = s.parse().unwrap();
            assert_eq!(parsed, kind);
        }
    }

    #[test]
    fn test_direct_event_constructor() {
        let event = InboundEvent::direct("ana@example.org", "Ana Souza", "2");
        assert_eq!(event.kind, ConversationKind::Direct);
        assert!(!event.sender_is_self);
        assert_eq!(event.user_id, "ana@example.org");
    }

    #[test]
    fn test_direct_reply_constructor() {
        let reply = Reply::direct("ana@example.org", "Olá!");
        assert_eq!(reply.kind, ConversationKind::Direct);
        assert_eq!(reply.destination, "ana@example.org");
        assert_eq!(reply.body, "Olá!");
    }
}
