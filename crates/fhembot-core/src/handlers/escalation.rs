//! Freeform escalation to the information office.

use fhembot_types::session::DialogueState;

use crate::dialogue::messages;

use super::HandlerReply;

/// Forward body delivered to the escalation recipient, prefixed with the
/// author's display name so the office knows who wrote it.
pub fn forward_body(display_name: &str, text: &str) -> String {
    format!("Mensagem de {display_name}: {text}")
}

/// Confirmation shown to the user once the forward is delivered.
pub fn confirmation(display_name: &str) -> HandlerReply {
    HandlerReply {
        body: messages::escalation_confirmation(display_name),
        next_state: DialogueState::Feedback,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_body_carries_display_name_prefix() {
        let body = forward_body("Maria Clara", "Preciso do censo diário de junho.");
        assert_eq!(
            body,
            "Mensagem de Maria Clara: Preciso do censo diário de junho."
        );
    }

    #[test]
    fn test_confirmation_returns_to_feedback() {
        let reply = confirmation("Maria Clara");
        assert_eq!(reply.next_state, DialogueState::Feedback);
        assert!(reply.body.contains("Ótimo, Maria Clara!"));
    }
}
