//! Session store implementations.
//!
//! Two backends: a process-local map for ephemeral deployments and a SQLite
//! store that survives restarts. The store trait returns `impl Future` and
//! cannot be boxed as a trait object, so runtime selection goes through the
//! [`SessionBackend`] enum.

pub mod memory;
pub mod sqlite;

pub use memory::MemorySessionStore;
pub use sqlite::SqliteSessionStore;

use std::path::Path;

use chrono::{DateTime, Utc};
use fhembot_core::session::SessionStore;
use fhembot_types::config::{SessionBackendKind, SessionConfig};
use fhembot_types::error::StoreError;
use fhembot_types::session::Session;
use tracing::info;

use crate::sqlite::pool::{self, DatabasePool};

/// Runtime-selected session store.
pub enum SessionBackend {
    Memory(MemorySessionStore),
    Sqlite(SqliteSessionStore),
}

impl SessionBackend {
    /// Build the backend named by config. The SQLite backend opens (and
    /// migrates) the database under `data_dir`.
    pub async fn from_config(config: &SessionConfig, data_dir: &Path) -> Result<Self, StoreError> {
        match config.backend {
            SessionBackendKind::Memory => {
                info!("session store: in-memory");
                Ok(SessionBackend::Memory(MemorySessionStore::new()))
            }
            SessionBackendKind::Sqlite => {
                let url = pool::database_url(data_dir);
                let db = DatabasePool::new(&url)
                    .await
                    .map_err(|e| StoreError::Unavailable(e.to_string()))?;
                info!(%url, "session store: sqlite");
                Ok(SessionBackend::Sqlite(SqliteSessionStore::new(db)))
            }
        }
    }
}

impl SessionStore for SessionBackend {
    async fn get(&self, user_id: &str) -> Result<Session, StoreError> {
        match self {
            SessionBackend::Memory(store) => store.get(user_id).await,
            SessionBackend::Sqlite(store) => store.get(user_id).await,
        }
    }

    async fn put(&self, user_id: &str, session: &Session) -> Result<(), StoreError> {
        match self {
            SessionBackend::Memory(store) => store.put(user_id, session).await,
            SessionBackend::Sqlite(store) => store.put(user_id, session).await,
        }
    }

    async fn delete(&self, user_id: &str) -> Result<(), StoreError> {
        match self {
            SessionBackend::Memory(store) => store.delete(user_id).await,
            SessionBackend::Sqlite(store) => store.delete(user_id).await,
        }
    }

    async fn list_idle_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<String>, StoreError> {
        match self {
            SessionBackend::Memory(store) => store.list_idle_older_than(cutoff).await,
            SessionBackend::Sqlite(store) => store.list_idle_older_than(cutoff).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fhembot_types::session::DialogueState;

    #[tokio::test]
    async fn test_memory_backend_from_config() {
        let config = SessionConfig::default();
        assert_eq!(config.backend, SessionBackendKind::Memory);

        let backend = SessionBackend::from_config(&config, std::path::Path::new("/nonexistent"))
            .await
            .unwrap();
        assert!(matches!(backend, SessionBackend::Memory(_)));
    }

    #[tokio::test]
    async fn test_sqlite_backend_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = SessionConfig {
            backend: SessionBackendKind::Sqlite,
            ..SessionConfig::default()
        };

        let backend = SessionBackend::from_config(&config, dir.path()).await.unwrap();
        assert!(matches!(backend, SessionBackend::Sqlite(_)));

        // The database file was created under the data dir.
        assert!(dir.path().join("fhembot.db").exists());
        std::mem::forget(dir);
    }

    #[tokio::test]
    async fn test_backend_delegates_to_inner_store() {
        let backend = SessionBackend::Memory(MemorySessionStore::new());

        let mut session = Session::new();
        session.state = DialogueState::Feedback;
        backend.put("ana@example.org", &session).await.unwrap();

        let got = backend.get("ana@example.org").await.unwrap();
        assert_eq!(got.state, DialogueState::Feedback);

        backend.delete("ana@example.org").await.unwrap();
        let fresh = backend.get("ana@example.org").await.unwrap();
        assert_eq!(fresh.state, DialogueState::Initial);
    }
}
