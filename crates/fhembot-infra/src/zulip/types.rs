//! Zulip REST API types.
//!
//! These are Zulip-specific request/response structures used for HTTP
//! communication with the Zulip server. They are NOT the transport-neutral
//! message types from fhembot-types -- those are platform-agnostic.

use fhembot_types::message::{ConversationKind, InboundEvent};
use serde::Deserialize;

/// Error body returned alongside non-success HTTP statuses.
///
/// Zulip error responses carry `result: "error"`, a human-readable `msg`
/// and, for machine-matchable failures, a `code` string.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ErrorEnvelope {
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub code: Option<String>,
}

/// Response to `POST /api/v1/register`.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterResponse {
    pub queue_id: String,
    pub last_event_id: i64,
}

/// Response to `GET /api/v1/events`.
#[derive(Debug, Clone, Deserialize)]
pub struct EventsResponse {
    pub events: Vec<Event>,
}

/// One entry in the event queue.
///
/// Only `message` events carry a payload we read; heartbeats and every
/// other event type arrive with `message: None` and are skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct Event {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub message: Option<WireMessage>,
}

/// The message object inside a `message` event.
#[derive(Debug, Clone, Deserialize)]
pub struct WireMessage {
    pub sender_email: String,
    pub sender_full_name: String,
    pub content: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl WireMessage {
    /// Map this wire message onto the transport-neutral inbound event.
    ///
    /// Zulip calls one-on-one conversations `private`; anything else is a
    /// stream message and lands in the group bucket the dispatcher drops.
    pub fn into_inbound(self, bot_email: &str) -> InboundEvent {
        let kind = if self.kind == "private" {
            ConversationKind::Direct
        } else {
            ConversationKind::Group
        };
        let sender_is_self = self.sender_email.eq_ignore_ascii_case(bot_email);

        InboundEvent {
            user_id: self.sender_email,
            display_name: self.sender_full_name,
            text: self.content,
            kind,
            sender_is_self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOT_EMAIL: &str = "informacoes-bot@fhchat.expressomg.mg.gov.br";

    #[test]
    fn test_events_response_deserializes_mixed_batch() {
        let json = r#"{
            "result": "success",
            "msg": "",
            "events": [
                {
                    "id": 0,
                    "type": "message",
                    "message": {
                        "id": 12345,
                        "sender_email": "ana@example.org",
                        "sender_full_name": "Ana Souza",
                        "content": "2",
                        "type": "private",
                        "display_recipient": []
                    },
                    "flags": []
                },
                { "id": 1, "type": "heartbeat" }
            ]
        }"#;

        let batch: EventsResponse = serde_json::from_str(json).unwrap();
        assert_eq!(batch.events.len(), 2);
        assert_eq!(batch.events[0].kind, "message");
        assert!(batch.events[0].message.is_some());
        assert!(batch.events[1].message.is_none());
    }

    #[test]
    fn test_private_message_maps_to_direct_event() {
        let wire = WireMessage {
            sender_email: "ana@example.org".to_string(),
            sender_full_name: "Ana Souza".to_string(),
            content: "Bom dia".to_string(),
            kind: "private".to_string(),
        };

        let event = wire.into_inbound(BOT_EMAIL);
        assert_eq!(event.user_id, "ana@example.org");
        assert_eq!(event.display_name, "Ana Souza");
        assert_eq!(event.kind, ConversationKind::Direct);
        assert!(!event.sender_is_self);
    }

    #[test]
    fn test_stream_message_maps_to_group_event() {
        let wire = WireMessage {
            sender_email: "ana@example.org".to_string(),
            sender_full_name: "Ana Souza".to_string(),
            content: "oi pessoal".to_string(),
            kind: "stream".to_string(),
        };

        let event = wire.into_inbound(BOT_EMAIL);
        assert_eq!(event.kind, ConversationKind::Group);
    }

    #[test]
    fn test_own_message_is_flagged() {
        let wire = WireMessage {
            sender_email: BOT_EMAIL.to_uppercase(),
            sender_full_name: "Zé".to_string(),
            content: "Olá!".to_string(),
            kind: "private".to_string(),
        };

        let event = wire.into_inbound(BOT_EMAIL);
        assert!(event.sender_is_self);
    }

    #[test]
    fn test_error_envelope_tolerates_missing_code() {
        let envelope: ErrorEnvelope =
            serde_json::from_str(r#"{"result": "error", "msg": "Invalid API key"}"#).unwrap();
        assert_eq!(envelope.msg, "Invalid API key");
        assert!(envelope.code.is_none());
    }
}
