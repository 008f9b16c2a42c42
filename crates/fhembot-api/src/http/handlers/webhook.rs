//! Webhook ingestion handler.
//!
//! Accepts the chat platform's outgoing-webhook payload and feeds it to
//! the dispatcher without waiting for processing; the reply is delivered
//! through the transport sink once the user's lane picks the event up.

use axum::Json;
use axum::extract::State;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::debug;

use fhembot_infra::zulip::types::WireMessage;

use crate::http::error::AppError;
use crate::http::router::HttpState;

/// The subset of the outgoing-webhook payload the assistant consumes.
/// Everything else in the platform's envelope is ignored.
#[derive(Debug, Deserialize)]
pub struct WebhookPayload {
    #[serde(default)]
    pub token: Option<String>,
    pub message: WireMessage,
}

/// POST /api/v1/webhook - Receive one inbound message.
///
/// When a webhook token is configured, the payload's `token` field must
/// match it. Enqueueing never waits: a full lane surfaces as 503 so the
/// platform retries later instead of piling up requests here.
pub async fn receive_webhook(
    State(state): State<HttpState>,
    Json(payload): Json<WebhookPayload>,
) -> Result<Json<Value>, AppError> {
    if !token_matches(state.webhook_token.as_deref(), payload.token.as_deref()) {
        return Err(AppError::Unauthorized("webhook token mismatch".to_string()));
    }

    let event = payload.message.into_inbound(&state.bot_email);
    debug!(user = %event.user_id, "webhook event received");
    state.dispatcher.try_ingest(event)?;

    Ok(Json(json!({ "status": "ok" })))
}

/// No configured token means open ingestion; a configured one must match.
fn token_matches(expected: Option<&str>, provided: Option<&str>) -> bool {
    match expected {
        Some(expected) => provided == Some(expected),
        None => true,
    }
}
