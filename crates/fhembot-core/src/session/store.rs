//! Session store trait.
//!
//! Defines the persistence interface for per-user dialogue sessions.
//! Implementations live in fhembot-infra.

use chrono::{DateTime, Utc};
use fhembot_types::error::StoreError;
use fhembot_types::session::Session;

/// Trait for per-user session persistence, keyed by the platform user id.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
/// Implementations live in fhembot-infra.
pub trait SessionStore: Send + Sync {
    /// Fetch the session for a user, or a fresh Initial-state record when
    /// the user has never been seen. The fresh record is not persisted
    /// until the first `put`.
    fn get(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<Session, StoreError>> + Send;

    /// Upsert the session for a user.
    fn put(
        &self,
        user_id: &str,
        session: &Session,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// Delete the session for a user. No-op if none exists.
    fn delete(
        &self,
        user_id: &str,
    ) -> impl std::future::Future<Output = Result<(), StoreError>> + Send;

    /// List user ids whose last committed turn is older than the cutoff.
    fn list_idle_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> impl std::future::Future<Output = Result<Vec<String>, StoreError>> + Send;
}
