//! Zulip REST client.
//!
//! Sends outgoing messages and long-polls the event queue, authenticated
//! with HTTP basic auth (bot email + API key).
//!
//! The API key is wrapped in [`secrecy::SecretString`] and is never logged
//! or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::debug;

use fhembot_core::transport::TransportSink;
use fhembot_types::error::TransportError;
use fhembot_types::message::{ConversationKind, Reply};

use super::types::{ErrorEnvelope, Event, EventsResponse, RegisterResponse};

/// How long one `GET /events` call may block. The server holds the
/// connection open for up to 90 seconds before answering with heartbeats,
/// so this must stay comfortably above that.
const POLL_TIMEOUT: Duration = Duration::from_secs(110);

/// Timeout for plain request/response calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Topic used when a reply targets a stream. The bot converses in direct
/// messages; this only labels the rare announcement sent to a stream.
const STREAM_TOPIC: &str = "Zé";

/// Identifier of a registered event queue plus the poll cursor.
#[derive(Debug, Clone)]
pub struct EventQueue {
    pub queue_id: String,
    pub last_event_id: i64,
}

/// Errors from one poll cycle.
#[derive(Debug, Error)]
pub enum PollError {
    /// The server dropped our queue; callers must register a new one.
    #[error("event queue expired")]
    QueueExpired,

    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Zulip REST API client.
///
/// Implements [`TransportSink`] for outbound sends; inbound events come
/// from [`register_queue`](ZulipClient::register_queue) followed by
/// repeated [`poll_events`](ZulipClient::poll_events) calls.
pub struct ZulipClient {
    http: reqwest::Client,
    site: String,
    bot_email: String,
    api_key: SecretString,
}

impl ZulipClient {
    /// Create a new client for the given Zulip site.
    pub fn new(
        site: impl Into<String>,
        bot_email: impl Into<String>,
        api_key: SecretString,
    ) -> Self {
        let site = site.into();
        Self {
            http: reqwest::Client::new(),
            site: site.trim_end_matches('/').to_string(),
            bot_email: bot_email.into(),
            api_key,
        }
    }

    /// The bot's own address, used to recognize self-authored events.
    pub fn bot_email(&self) -> &str {
        &self.bot_email
    }

    /// Build the full API URL for a given path.
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.site, path)
    }

    /// Register an event queue limited to `message` events.
    pub async fn register_queue(&self) -> Result<EventQueue, TransportError> {
        let response = self
            .http
            .post(self.url("/api/v1/register"))
            .basic_auth(&self.bot_email, Some(self.api_key.expose_secret()))
            .form(&[("event_types", r#"["message"]"#)])
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if !response.status().is_success() {
            let (status, retry_after_ms, envelope) = read_failure(response).await;
            return Err(map_failure(status, retry_after_ms, &envelope));
        }

        let registered: RegisterResponse = response
            .json()
            .await
            .map_err(|e| TransportError::Deserialization(e.to_string()))?;

        debug!(queue = %registered.queue_id, "registered event queue");
        Ok(EventQueue {
            queue_id: registered.queue_id,
            last_event_id: registered.last_event_id,
        })
    }

    /// Long-poll for new events, advancing the cursor past everything
    /// returned.
    pub async fn poll_events(&self, queue: &mut EventQueue) -> Result<Vec<Event>, PollError> {
        let last_event_id = queue.last_event_id.to_string();
        let response = self
            .http
            .get(self.url("/api/v1/events"))
            .basic_auth(&self.bot_email, Some(self.api_key.expose_secret()))
            .query(&[
                ("queue_id", queue.queue_id.as_str()),
                ("last_event_id", last_event_id.as_str()),
            ])
            .timeout(POLL_TIMEOUT)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if !response.status().is_success() {
            let (status, retry_after_ms, envelope) = read_failure(response).await;
            if envelope.code.as_deref() == Some("BAD_EVENT_QUEUE_ID") {
                return Err(PollError::QueueExpired);
            }
            return Err(PollError::Transport(map_failure(
                status,
                retry_after_ms,
                &envelope,
            )));
        }

        let batch: EventsResponse = response
            .json()
            .await
            .map_err(|e| PollError::Transport(TransportError::Deserialization(e.to_string())))?;

        if let Some(max_id) = batch.events.iter().map(|event| event.id).max() {
            queue.last_event_id = queue.last_event_id.max(max_id);
        }

        Ok(batch.events)
    }
}

// ZulipClient intentionally does NOT derive Debug to prevent accidental
// exposure of internal state including the API key. Same defense-in-depth
// pattern as OpenAiCompatibleProvider in the answer module.

impl TransportSink for ZulipClient {
    async fn send(&self, reply: &Reply) -> Result<(), TransportError> {
        let mut form = vec![
            ("type", wire_type(reply.kind)),
            ("to", reply.destination.as_str()),
            ("content", reply.body.as_str()),
        ];
        if reply.kind == ConversationKind::Group {
            form.push(("topic", STREAM_TOPIC));
        }

        let response = self
            .http
            .post(self.url("/api/v1/messages"))
            .basic_auth(&self.bot_email, Some(self.api_key.expose_secret()))
            .form(&form)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        if !response.status().is_success() {
            let (status, retry_after_ms, envelope) = read_failure(response).await;
            return Err(map_failure(status, retry_after_ms, &envelope));
        }

        debug!(to = %reply.destination, "message sent");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn wire_type(kind: ConversationKind) -> &'static str {
    match kind {
        ConversationKind::Direct => "private",
        ConversationKind::Group => "stream",
    }
}

fn map_reqwest_error(e: reqwest::Error) -> TransportError {
    TransportError::Network(e.to_string())
}

/// Drain a failed response into its parts: status, Retry-After in
/// milliseconds (when present), and the Zulip error envelope.
async fn read_failure(
    response: reqwest::Response,
) -> (reqwest::StatusCode, Option<u64>, ErrorEnvelope) {
    let status = response.status();
    let retry_after_ms = retry_after_ms(response.headers());
    let envelope = response.json::<ErrorEnvelope>().await.unwrap_or_default();
    (status, retry_after_ms, envelope)
}

fn retry_after_ms(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<f64>().ok())
        .map(|secs| (secs * 1000.0) as u64)
}

fn map_failure(
    status: reqwest::StatusCode,
    retry_after_ms: Option<u64>,
    envelope: &ErrorEnvelope,
) -> TransportError {
    match status.as_u16() {
        401 | 403 => TransportError::AuthenticationFailed,
        429 => TransportError::RateLimited { retry_after_ms },
        code => TransportError::Http {
            status: code,
            message: envelope.msg.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_client() -> ZulipClient {
        ZulipClient::new(
            "https://fhchat.expressomg.mg.gov.br/",
            "informacoes-bot@fhchat.expressomg.mg.gov.br",
            SecretString::from("test-key-not-real"),
        )
    }

    #[test]
    fn test_url_trims_trailing_slash() {
        let client = make_client();
        assert_eq!(
            client.url("/api/v1/messages"),
            "https://fhchat.expressomg.mg.gov.br/api/v1/messages"
        );
    }

    #[test]
    fn test_wire_type_mapping() {
        assert_eq!(wire_type(ConversationKind::Direct), "private");
        assert_eq!(wire_type(ConversationKind::Group), "stream");
    }

    #[test]
    fn test_map_failure_authentication() {
        let envelope = ErrorEnvelope {
            msg: "Invalid API key".to_string(),
            code: Some("UNAUTHORIZED".to_string()),
        };
        let status = reqwest::StatusCode::from_u16(401).unwrap();
        assert!(matches!(
            map_failure(status, None, &envelope),
            TransportError::AuthenticationFailed
        ));
    }

    #[test]
    fn test_map_failure_rate_limit_keeps_retry_after() {
        let status = reqwest::StatusCode::from_u16(429).unwrap();
        let err = map_failure(status, Some(2500), &ErrorEnvelope::default());
        assert!(matches!(
            err,
            TransportError::RateLimited {
                retry_after_ms: Some(2500)
            }
        ));
    }

    #[test]
    fn test_map_failure_other_status() {
        let envelope = ErrorEnvelope {
            msg: "bad gateway".to_string(),
            code: None,
        };
        let status = reqwest::StatusCode::from_u16(502).unwrap();
        match map_failure(status, None, &envelope) {
            TransportError::Http { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "bad gateway");
            }
            other => panic!("expected Http, got: {other}"),
        }
    }

    #[test]
    fn test_retry_after_header_parsed_as_seconds() {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::RETRY_AFTER, "1.5".parse().unwrap());
        assert_eq!(retry_after_ms(&headers), Some(1500));

        let empty = reqwest::header::HeaderMap::new();
        assert_eq!(retry_after_ms(&empty), None);
    }

    #[test]
    fn test_bot_email_accessor() {
        let client = make_client();
        assert_eq!(
            client.bot_email(),
            "informacoes-bot@fhchat.expressomg.mg.gov.br"
        );
    }
}
