//! Error types for fhembot domains.
//!
//! Each domain gets its own error enum so callers can match on exactly the
//! failures they can handle. Input-validation problems (bad menu choices,
//! lookup misses) are not errors at all: the dialogue engine answers them
//! with a re-prompt and never returns `Err` for them.

use thiserror::Error;

/// Session store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached or the query failed.
    #[error("session store unavailable: {0}")]
    Unavailable(String),

    /// A stored session could not be encoded or decoded.
    #[error("session serialization failed: {0}")]
    Serialization(String),
}

/// Chat platform (outbound send / event polling) failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Credentials rejected by the platform.
    #[error("transport authentication failed")]
    AuthenticationFailed,

    /// Platform asked us to slow down.
    #[error("transport rate limited (retry after {retry_after_ms:?} ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    /// Non-success HTTP response.
    #[error("transport HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Connection-level failure.
    #[error("transport network error: {0}")]
    Network(String),

    /// Response body did not match the expected shape.
    #[error("transport deserialization error: {0}")]
    Deserialization(String),
}

/// Answer provider (LLM) failures.
#[derive(Debug, Error)]
pub enum AnswerError {
    /// Generic provider-side failure.
    #[error("answer provider error: {message}")]
    Provider { message: String },

    /// The configured per-call timeout elapsed.
    #[error("answer provider timed out")]
    Timeout,

    /// API key rejected.
    #[error("answer provider authentication failed")]
    AuthenticationFailed,

    /// Provider asked us to slow down.
    #[error("answer provider rate limited (retry after {retry_after_ms:?} ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    /// Response body did not match the expected shape.
    #[error("answer deserialization error: {0}")]
    Deserialization(String),
}

/// Catalog source problems. The loader logs these and degrades the table
/// to empty; they never surface past startup.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Top-level JSON value was not an object.
    #[error("catalog source is not a JSON object")]
    NotAnObject,

    /// A key did not parse as a positive integer.
    #[error("catalog key is not a positive integer: {0:?}")]
    InvalidKey(String),

    /// Keys do not form a contiguous 1..=N range.
    #[error("catalog keys are not contiguous (missing {expected})")]
    KeyGap { expected: usize },

    /// An entry did not match the expected record shape.
    #[error("catalog entry {key} is malformed: {message}")]
    InvalidEntry { key: usize, message: String },
}
