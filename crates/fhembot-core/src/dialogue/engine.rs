//! The dialogue state machine.
//!
//! `DialogueEngine::process` is a total function over `(Session, event)`:
//! every state and input pair produces a [`Turn`]. The only async path is
//! the virtual-assistant call, which degrades to a fixed fallback on
//! failure, so no input can leave a user without a reply.

use std::sync::Arc;

use fhembot_types::answer::AnswerRequest;
use fhembot_types::catalog::Catalog;
use fhembot_types::message::{InboundEvent, Reply};
use fhembot_types::session::{DialogueState, HistoryTurn, Session};
use tracing::debug;

use crate::answer::AnswerProvider;
use crate::handlers::assistant::AssistantHandler;
use crate::handlers::{self, HandlerReply};

use super::input;
use super::messages;
use super::routing::{self, MenuRoute};

/// Result of processing one inbound event.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    /// Session to commit, or `None` when the conversation ended and the
    /// record must be removed.
    pub next: Option<Session>,
    /// Reply for the user.
    pub reply: Reply,
    /// Forward for the escalation recipient, present on escalation turns.
    pub escalation: Option<Reply>,
}

/// The per-user dialogue state machine.
pub struct DialogueEngine<A> {
    catalog: Arc<Catalog>,
    escalation_recipient: String,
    assistant: AssistantHandler<A>,
}

impl<A: AnswerProvider> DialogueEngine<A> {
    pub fn new(
        catalog: Arc<Catalog>,
        escalation_recipient: impl Into<String>,
        assistant: AssistantHandler<A>,
    ) -> Self {
        Self {
            catalog,
            escalation_recipient: escalation_recipient.into(),
            assistant,
        }
    }

    /// Process one inbound event against the user's current session.
    pub async fn process(&self, event: &InboundEvent, session: Session) -> Turn {
        let mut turn = match session.state {
            DialogueState::Initial => self.on_initial(event, session),
            DialogueState::UnitSelected | DialogueState::Reselect => {
                self.on_menu_choice(event, session)
            }
            DialogueState::Feedback => self.on_feedback(event, session),
            DialogueState::FeedbackEscalation => self.on_escalation_text(event, session),
            DialogueState::AwaitingQuestion => self.on_question(event, session).await,
        };
        if let Some(next) = turn.next.as_mut() {
            next.touch();
        }
        turn
    }

    /// Initial state: the text is a unit choice.
    fn on_initial(&self, event: &InboundEvent, mut session: Session) -> Turn {
        if self.catalog.units.is_empty() {
            return Turn {
                next: Some(session),
                reply: Reply::direct(&event.user_id, messages::NO_UNITS),
                escalation: None,
            };
        }

        match handlers::unit::select(&self.catalog.units, &event.text) {
            Some(entry) => {
                debug!(
                    user = %event.user_id,
                    unit = %entry.name,
                    system = %entry.system,
                    "unit selected"
                );
                session.state = DialogueState::UnitSelected;
                session.unit = Some(entry.name.clone());
                session.system = Some(entry.system);
                let body = messages::indicator_menu(&entry.name, entry.system, &self.catalog);
                Turn {
                    next: Some(session),
                    reply: Reply::direct(&event.user_id, body),
                    escalation: None,
                }
            }
            None => {
                let body = format!(
                    "{}\n\n{}",
                    messages::UNIT_CHOICE_ERROR,
                    messages::unit_menu(&event.display_name, &self.catalog.units)
                );
                Turn {
                    next: Some(session),
                    reply: Reply::direct(&event.user_id, body),
                    escalation: None,
                }
            }
        }
    }

    /// UnitSelected and Reselect: the text is an indicator-menu choice,
    /// routed by the catalog sizes and the unit's system.
    fn on_menu_choice(&self, event: &InboundEvent, mut session: Session) -> Turn {
        let (unit, system) = match (session.unit.clone(), session.system) {
            (Some(unit), Some(system)) => (unit, system),
            // A record without a unit in this state means the stored data
            // drifted; restart from the unit menu.
            _ => return self.restart(event, session),
        };

        let route = match input::parse_choice(&event.text) {
            Some(choice) => routing::route(&self.catalog, system, choice),
            None => MenuRoute::Invalid,
        };

        let handled = match route {
            MenuRoute::PanelIndicator(i) => self
                .catalog
                .panel_indicators
                .get(i)
                .map(|indicator| handlers::indicator::future_panel(indicator, &unit)),
            MenuRoute::NumbersIndicator(i) => self
                .catalog
                .numbers_indicators
                .get(i)
                .map(|indicator| handlers::indicator::numbers_dashboard(indicator, &unit)),
            MenuRoute::ReportingTool => Some(handlers::report::reporting_tool(
                &unit,
                &self.catalog.sigh_reports,
            )),
            MenuRoute::HospitalReport => Some(handlers::report::hospital_system(
                &unit,
                system,
                &self.catalog.tasy_reports,
            )),
            MenuRoute::Assistant => Some(HandlerReply {
                body: messages::question_prompt().to_string(),
                next_state: DialogueState::AwaitingQuestion,
            }),
            MenuRoute::Invalid => None,
        };

        match handled {
            Some(HandlerReply { body, next_state }) => {
                session.state = next_state;
                Turn {
                    next: Some(session),
                    reply: Reply::direct(&event.user_id, body),
                    escalation: None,
                }
            }
            None => Turn {
                next: Some(session),
                reply: Reply::direct(&event.user_id, messages::INVALID_OPTION),
                escalation: None,
            },
        }
    }

    /// Feedback: 1 reselects an indicator, 2 opens an escalation, 3 closes
    /// the conversation and removes this user's record.
    fn on_feedback(&self, event: &InboundEvent, mut session: Session) -> Turn {
        match input::parse_choice(&event.text) {
            Some(1) => {
                let (unit, system) = match (session.unit.clone(), session.system) {
                    (Some(unit), Some(system)) => (unit, system),
                    _ => return self.restart(event, session),
                };
                session.state = DialogueState::Reselect;
                let body = messages::indicator_menu(&unit, system, &self.catalog);
                Turn {
                    next: Some(session),
                    reply: Reply::direct(&event.user_id, body),
                    escalation: None,
                }
            }
            Some(2) => {
                session.state = DialogueState::FeedbackEscalation;
                Turn {
                    next: Some(session),
                    reply: Reply::direct(&event.user_id, messages::escalation_prompt()),
                    escalation: None,
                }
            }
            Some(3) => {
                debug!(user = %event.user_id, "conversation closed");
                Turn {
                    next: None,
                    reply: Reply::direct(&event.user_id, messages::closing_message()),
                    escalation: None,
                }
            }
            _ => Turn {
                next: Some(session),
                reply: Reply::direct(&event.user_id, messages::INVALID_OPTION),
                escalation: None,
            },
        }
    }

    /// FeedbackEscalation: any text is the message to forward. The text is
    /// buffered on the session until the dispatcher confirms delivery.
    fn on_escalation_text(&self, event: &InboundEvent, mut session: Session) -> Turn {
        session.pending_escalation = Some(event.text.clone());
        let HandlerReply { body, next_state } =
            handlers::escalation::confirmation(&event.display_name);
        session.state = next_state;

        let forward = Reply::direct(
            &self.escalation_recipient,
            handlers::escalation::forward_body(&event.display_name, &event.text),
        );
        Turn {
            next: Some(session),
            reply: Reply::direct(&event.user_id, body),
            escalation: Some(forward),
        }
    }

    /// AwaitingQuestion: any text is a question for the virtual assistant.
    async fn on_question(&self, event: &InboundEvent, mut session: Session) -> Turn {
        let question = event.text.trim().to_string();
        let request = AnswerRequest {
            question: question.clone(),
            display_name: event.display_name.clone(),
            unit: session.unit.clone(),
            system: session.system,
            history: session.history.clone(),
        };

        let outcome = self.assistant.answer(&request).await;
        if outcome.answered {
            session.push_history(HistoryTurn::user(question));
            session.push_history(HistoryTurn::assistant(outcome.body.clone()));
        }
        session.state = DialogueState::Feedback;

        let body = format!("{}\n\n{}", outcome.body, messages::feedback_menu());
        Turn {
            next: Some(session),
            reply: Reply::direct(&event.user_id, body),
            escalation: None,
        }
    }

    /// Drop back to unit selection, clearing the stored unit.
    fn restart(&self, event: &InboundEvent, mut session: Session) -> Turn {
        session.state = DialogueState::Initial;
        session.unit = None;
        session.system = None;
        Turn {
            next: Some(session),
            reply: Reply::direct(
                &event.user_id,
                messages::unit_menu(&event.display_name, &self.catalog.units),
            ),
            escalation: None,
        }
    }
}
