//! Application error type mapping to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use fhembot_core::dispatch::IngestError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Authentication failure.
    Unauthorized(String),
    /// A dispatch lane is at capacity; the sender should retry later.
    Busy(String),
    /// The dispatcher no longer accepts events.
    ShuttingDown,
}

impl From<IngestError> for AppError {
    fn from(e: IngestError) -> Self {
        match e {
            IngestError::QueueFull(user) => AppError::Busy(format!("queue full for {user}")),
            IngestError::Closed => AppError::ShuttingDown,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::Busy(msg) => (StatusCode::SERVICE_UNAVAILABLE, "QUEUE_FULL", msg.clone()),
            AppError::ShuttingDown => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SHUTTING_DOWN",
                "the assistant is shutting down".to_string(),
            ),
        };

        let body = json!({
            "status": "error",
            "errors": [{
                "code": code,
                "message": message,
            }]
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_full_maps_to_service_unavailable() {
        let err: AppError = IngestError::QueueFull("ana@example.org".to_string()).into();
        assert!(matches!(&err, AppError::Busy(msg) if msg.contains("ana@example.org")));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn closed_maps_to_service_unavailable() {
        let err: AppError = IngestError::Closed.into();
        assert!(matches!(err, AppError::ShuttingDown));
        assert_eq!(
            err.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn unauthorized_maps_to_401() {
        let response = AppError::Unauthorized("bad token".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
