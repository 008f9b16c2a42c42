//! Idle session eviction.
//!
//! A background task that periodically removes sessions whose last activity
//! is older than the configured idle timeout. A long-dormant user restarts
//! from the unit menu on their next message.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::store::SessionStore;

/// Spawn the idle sweeper task.
///
/// Every `interval`, sessions idle for longer than `idle_timeout` are
/// deleted. The task exits when `cancel` fires.
pub fn spawn_sweeper<S>(
    store: Arc<S>,
    idle_timeout: Duration,
    interval: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()>
where
    S: SessionStore + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // interval fires immediately on the first tick; consume it so a
        // fresh start does not sweep before anything could go idle.
        ticker.tick().await;
        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("session sweeper stopped");
                    return;
                }
                _ = ticker.tick() => {}
            }
            sweep_once(store.as_ref(), idle_timeout).await;
        }
    })
}

/// Run one eviction pass: list sessions idle past the timeout and delete
/// each one. Store failures are logged and skipped.
pub async fn sweep_once<S: SessionStore>(store: &S, idle_timeout: Duration) {
    let Some(cutoff) = chrono::Duration::from_std(idle_timeout)
        .ok()
        .and_then(|timeout| Utc::now().checked_sub_signed(timeout))
    else {
        warn!(?idle_timeout, "idle timeout out of range, skipping sweep");
        return;
    };

    let idle = match store.list_idle_older_than(cutoff).await {
        Ok(idle) => idle,
        Err(error) => {
            warn!(%error, "idle session listing failed");
            return;
        }
    };

    let mut evicted = 0usize;
    for user_id in &idle {
        match store.delete(user_id).await {
            Ok(()) => evicted += 1,
            Err(error) => warn!(user = %user_id, %error, "failed to evict idle session"),
        }
    }

    if evicted > 0 {
        debug!(evicted, "evicted idle sessions");
    }
}
