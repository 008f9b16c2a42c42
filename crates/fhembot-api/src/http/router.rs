//! Axum router configuration with middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use fhembot_core::dispatch::Dispatcher;

use crate::http::handlers;

/// State shared with the HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub dispatcher: Arc<Dispatcher>,
    /// Used to recognize self-authored messages in webhook payloads.
    pub bot_email: String,
    /// Shared token required on webhook calls when set.
    pub webhook_token: Option<String>,
}

/// Build the router with all routes and middleware.
pub fn build_router(state: HttpState) -> Router {
    Router::new()
        .route("/api/v1/webhook", post(handlers::webhook::receive_webhook))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
