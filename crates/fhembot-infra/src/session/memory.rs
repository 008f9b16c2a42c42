//! In-memory session store backed by a concurrent map.
//!
//! Sessions vanish on restart; every user then starts over from the unit
//! menu. Suitable for development and small deployments.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use fhembot_core::session::SessionStore;
use fhembot_types::error::StoreError;
use fhembot_types::session::Session;

/// Process-local implementation of the session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: DashMap<String, Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Number of stored sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl SessionStore for MemorySessionStore {
    async fn get(&self, user_id: &str) -> Result<Session, StoreError> {
        Ok(self
            .sessions
            .get(user_id)
            .map(|entry| entry.clone())
            .unwrap_or_default())
    }

    async fn put(&self, user_id: &str, session: &Session) -> Result<(), StoreError> {
        self.sessions.insert(user_id.to_string(), session.clone());
        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<(), StoreError> {
        self.sessions.remove(user_id);
        Ok(())
    }

    async fn list_idle_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<String>, StoreError> {
        Ok(self
            .sessions
            .iter()
            .filter(|entry| entry.value().last_updated < cutoff)
            .map(|entry| entry.key().clone())
            .collect())
    }
}
