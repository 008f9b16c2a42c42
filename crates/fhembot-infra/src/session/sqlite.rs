//! SQLite session store implementation.
//!
//! Implements `SessionStore` from `fhembot-core` using sqlx with split
//! read/write pools. The history column holds JSON text; datetimes are
//! RFC 3339 UTC text with fixed microsecond precision so string comparison
//! matches chronological order in the idle scan.

use chrono::{DateTime, SecondsFormat, Utc};
use fhembot_core::session::SessionStore;
use fhembot_types::error::StoreError;
use fhembot_types::session::{DialogueState, HistoryTurn, InfoSystem, Session};
use sqlx::Row;

use crate::sqlite::pool::DatabasePool;

/// SQLite-backed implementation of the session store.
pub struct SqliteSessionStore {
    pool: DatabasePool,
}

impl SqliteSessionStore {
    /// Create a new session store backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct SessionRow {
    state: String,
    unit: Option<String>,
    system: Option<String>,
    pending_escalation: Option<String>,
    history: String,
    last_updated: String,
}

impl SessionRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            state: row.try_get("state")?,
            unit: row.try_get("unit")?,
            system: row.try_get("system")?,
            pending_escalation: row.try_get("pending_escalation")?,
            history: row.try_get("history")?,
            last_updated: row.try_get("last_updated")?,
        })
    }

    fn into_session(self) -> Result<Session, StoreError> {
        let state: DialogueState = self.state.parse().map_err(StoreError::Serialization)?;
        let system = match self.system {
            Some(s) => Some(s.parse::<InfoSystem>().map_err(StoreError::Serialization)?),
            None => None,
        };
        let history: Vec<HistoryTurn> = serde_json::from_str(&self.history)
            .map_err(|e| StoreError::Serialization(format!("invalid history JSON: {e}")))?;
        let last_updated = parse_datetime(&self.last_updated)?;

        Ok(Session {
            state,
            unit: self.unit,
            system,
            pending_escalation: self.pending_escalation,
            history,
            last_updated,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| StoreError::Serialization(format!("invalid datetime: {e}")))
}

/// Fixed-width UTC timestamps: the idle scan compares this column as text.
fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// ---------------------------------------------------------------------------
// SessionStore implementation
// ---------------------------------------------------------------------------

impl SessionStore for SqliteSessionStore {
    async fn get(&self, user_id: &str) -> Result<Session, StoreError> {
        let row = sqlx::query(
            "SELECT state, unit, system, pending_escalation, history, last_updated
             FROM sessions WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool.reader)
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        match row {
            Some(row) => {
                let session_row =
                    SessionRow::from_row(&row).map_err(|e| StoreError::Unavailable(e.to_string()))?;
                session_row.into_session()
            }
            None => Ok(Session::new()),
        }
    }

    async fn put(&self, user_id: &str, session: &Session) -> Result<(), StoreError> {
        let history = serde_json::to_string(&session.history)
            .map_err(|e| StoreError::Serialization(format!("failed to serialize history: {e}")))?;

        sqlx::query(
            r#"INSERT INTO sessions (user_id, state, unit, system, pending_escalation, history, last_updated)
               VALUES (?, ?, ?, ?, ?, ?, ?)
               ON CONFLICT (user_id) DO UPDATE SET
                   state = excluded.state,
                   unit = excluded.unit,
                   system = excluded.system,
                   pending_escalation = excluded.pending_escalation,
                   history = excluded.history,
                   last_updated = excluded.last_updated"#,
        )
        .bind(user_id)
        .bind(session.state.to_string())
        .bind(session.unit.as_deref())
        .bind(session.system.map(|s| s.to_string()))
        .bind(session.pending_escalation.as_deref())
        .bind(&history)
        .bind(format_datetime(&session.last_updated))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, user_id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM sessions WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        Ok(())
    }

    async fn list_idle_older_than(
        &self,
        cutoff: DateTime<Utc>,
    ) -> Result<Vec<String>, StoreError> {
        let rows = sqlx::query("SELECT user_id FROM sessions WHERE last_updated < ? ORDER BY user_id")
            .bind(format_datetime(&cutoff))
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let mut user_ids = Vec::with_capacity(rows.len());
        for row in &rows {
            let user_id: String = row
                .try_get("user_id")
                .map_err(|e| StoreError::Unavailable(e.to_string()))?;
            user_ids.push(user_id);
        }

        Ok(user_ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fhembot_types::session::HistoryTurn;

    async fn test_pool() -> DatabasePool {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        std::mem::forget(dir);
        DatabasePool::new(&url).await.unwrap()
    }

    fn full_session() -> Session {
        let mut session = Session::new();
        session.state = DialogueState::Feedback;
        session.unit = Some("Hospital Júlia Kubitschek".to_string());
        session.system = Some(InfoSystem::Sigh);
        session.pending_escalation = Some("Preciso do censo de junho.".to_string());
        session.push_history(HistoryTurn::user("qual a taxa de ocupação?"));
        session.push_history(HistoryTurn::assistant("A taxa está no painel."));
        session
    }

    #[tokio::test]
    async fn test_get_unknown_returns_fresh_initial() {
        let pool = test_pool().await;
        let store = SqliteSessionStore::new(pool.clone());

        let session = store.get("nobody@example.org").await.unwrap();
        assert_eq!(session.state, DialogueState::Initial);

        // A fresh record is not persisted until the first put.
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions")
            .fetch_one(&pool.reader)
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let pool = test_pool().await;
        let store = SqliteSessionStore::new(pool);

        let session = full_session();
        store.put("ana@example.org", &session).await.unwrap();

        let got = store.get("ana@example.org").await.unwrap();
        assert_eq!(got.state, session.state);
        assert_eq!(got.unit, session.unit);
        assert_eq!(got.system, session.system);
        assert_eq!(got.pending_escalation, session.pending_escalation);
        assert_eq!(got.history, session.history);
        // Microsecond precision survives the text column.
        assert_eq!(
            got.last_updated.timestamp_micros(),
            session.last_updated.timestamp_micros()
        );
    }

    #[tokio::test]
    async fn test_put_upserts() {
        let pool = test_pool().await;
        let store = SqliteSessionStore::new(pool);

        let mut session = Session::new();
        store.put("ana@example.org", &session).await.unwrap();

        session.state = DialogueState::UnitSelected;
        session.unit = Some("Hospital Regional Antônio Dias".to_string());
        session.system = Some(InfoSystem::Tasy);
        store.put("ana@example.org", &session).await.unwrap();

        let got = store.get("ana@example.org").await.unwrap();
        assert_eq!(got.state, DialogueState::UnitSelected);
        assert_eq!(got.system, Some(InfoSystem::Tasy));
    }

    #[tokio::test]
    async fn test_empty_optionals_roundtrip() {
        let pool = test_pool().await;
        let store = SqliteSessionStore::new(pool);

        store.put("ana@example.org", &Session::new()).await.unwrap();

        let got = store.get("ana@example.org").await.unwrap();
        assert!(got.unit.is_none());
        assert!(got.system.is_none());
        assert!(got.pending_escalation.is_none());
        assert!(got.history.is_empty());
    }

    #[tokio::test]
    async fn test_delete_removes_only_that_user() {
        let pool = test_pool().await;
        let store = SqliteSessionStore::new(pool);

        store.put("ana@example.org", &full_session()).await.unwrap();
        store.put("bruno@example.org", &Session::new()).await.unwrap();

        store.delete("ana@example.org").await.unwrap();

        let ana = store.get("ana@example.org").await.unwrap();
        assert_eq!(ana.state, DialogueState::Initial);
        let bruno = store.get("bruno@example.org").await.unwrap();
        assert_eq!(bruno.state, DialogueState::Initial);
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions")
            .fetch_one(&store.pool.reader)
            .await
            .unwrap();
        assert_eq!(count.0, 1);
    }

    #[tokio::test]
    async fn test_delete_nonexistent_is_noop() {
        let pool = test_pool().await;
        let store = SqliteSessionStore::new(pool);

        store.delete("nobody@example.org").await.unwrap();
    }

    #[tokio::test]
    async fn test_list_idle_older_than() {
        let pool = test_pool().await;
        let store = SqliteSessionStore::new(pool);

        let mut stale = Session::new();
        stale.last_updated = Utc::now() - chrono::Duration::hours(3);
        store.put("stale@example.org", &stale).await.unwrap();
        store.put("fresh@example.org", &Session::new()).await.unwrap();

        let cutoff = Utc::now() - chrono::Duration::hours(1);
        let idle = store.list_idle_older_than(cutoff).await.unwrap();
        assert_eq!(idle, vec!["stale@example.org".to_string()]);
    }

    #[tokio::test]
    async fn test_corrupt_state_surfaces_serialization_error() {
        let pool = test_pool().await;
        let store = SqliteSessionStore::new(pool.clone());

        sqlx::query(
            "INSERT INTO sessions (user_id, state, history, last_updated) VALUES (?, ?, ?, ?)",
        )
        .bind("broken@example.org")
        .bind("no_such_state")
        .bind("[]")
        .bind(format_datetime(&Utc::now()))
        .execute(&pool.writer)
        .await
        .unwrap();

        let result = store.get("broken@example.org").await;
        assert!(matches!(result, Err(StoreError::Serialization(_))));
    }
}
