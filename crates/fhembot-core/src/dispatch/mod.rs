//! Event dispatch: per-user ordered lanes with bounded parallelism.
//!
//! Inbound events are hashed by user id onto a fixed set of lanes, one
//! worker task per lane. Events for the same user always land on the same
//! lane and are processed strictly in arrival order; events for different
//! users proceed in parallel up to the worker count. Each lane queue is
//! bounded, so ingestion pushes back instead of buffering without limit.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use fhembot_types::config::DispatcherConfig;
use fhembot_types::error::TransportError;
use fhembot_types::message::{ConversationKind, InboundEvent, Reply};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

use crate::answer::AnswerProvider;
use crate::dialogue::engine::{DialogueEngine, Turn};
use crate::dialogue::messages;
use crate::session::SessionStore;
use crate::transport::TransportSink;

/// Errors that can occur while queueing an event.
#[derive(Debug, Error)]
pub enum IngestError {
    /// The lane queue for this user is full.
    #[error("dispatch queue full for user {0}")]
    QueueFull(String),

    /// The dispatcher has been shut down.
    #[error("dispatcher is shut down")]
    Closed,
}

/// Hashed-lane event dispatcher.
///
/// Owns the lane senders and worker handles. Dropping the dispatcher (or
/// calling [`Dispatcher::shutdown`]) closes the lanes; workers drain what
/// is already queued and exit.
pub struct Dispatcher {
    lanes: Vec<mpsc::Sender<InboundEvent>>,
    workers: Vec<JoinHandle<()>>,
}

impl Dispatcher {
    /// Start the worker pool and return the dispatcher handle.
    pub fn spawn<A, S, T>(
        engine: Arc<DialogueEngine<A>>,
        store: Arc<S>,
        sink: Arc<T>,
        config: &DispatcherConfig,
    ) -> Self
    where
        A: AnswerProvider + 'static,
        S: SessionStore + 'static,
        T: TransportSink + 'static,
    {
        // mpsc::channel panics on zero capacity; clamp both knobs.
        let workers = config.workers.max(1);
        let capacity = config.queue_capacity.max(1);

        let mut lanes = Vec::with_capacity(workers);
        let mut handles = Vec::with_capacity(workers);
        for lane in 0..workers {
            let (tx, rx) = mpsc::channel(capacity);
            lanes.push(tx);
            handles.push(tokio::spawn(lane_loop(
                lane,
                rx,
                Arc::clone(&engine),
                Arc::clone(&store),
                Arc::clone(&sink),
            )));
        }
        debug!(workers, capacity, "dispatcher started");

        Self {
            lanes,
            workers: handles,
        }
    }

    /// Queue one event, waiting for lane space when the queue is full.
    ///
    /// Self-authored and group messages are dropped here and never reach
    /// the engine; dropping them is a success, not an error.
    pub async fn ingest(&self, event: InboundEvent) -> Result<(), IngestError> {
        if !accepts(&event) {
            return Ok(());
        }
        let lane = self.lane_for(&event.user_id);
        let sender = self.lanes.get(lane).ok_or(IngestError::Closed)?;
        sender.send(event).await.map_err(|_| IngestError::Closed)
    }

    /// Queue one event without waiting; a full lane surfaces as
    /// [`IngestError::QueueFull`] so callers can signal backpressure.
    pub fn try_ingest(&self, event: InboundEvent) -> Result<(), IngestError> {
        if !accepts(&event) {
            return Ok(());
        }
        let lane = self.lane_for(&event.user_id);
        let sender = self.lanes.get(lane).ok_or(IngestError::Closed)?;
        sender.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(event) => IngestError::QueueFull(event.user_id),
            mpsc::error::TrySendError::Closed(_) => IngestError::Closed,
        })
    }

    /// Number of lanes (the cross-user parallelism bound).
    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Close the lanes and wait for every worker to drain its queue.
    pub async fn shutdown(mut self) {
        self.lanes.clear();
        let joined = futures_util::future::join_all(self.workers.drain(..)).await;
        for (lane, result) in joined.into_iter().enumerate() {
            if let Err(e) = result {
                warn!(lane, error = %e, "dispatch lane terminated abnormally");
            }
        }
        debug!("dispatcher stopped");
    }

    fn lane_for(&self, user_id: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        user_id.hash(&mut hasher);
        (hasher.finish() as usize) % self.lanes.len().max(1)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("lanes", &self.lanes.len())
            .field("workers", &self.workers.len())
            .finish()
    }
}

/// Ingestion filter: only direct messages from other senders are processed.
fn accepts(event: &InboundEvent) -> bool {
    if event.sender_is_self {
        debug!(user = %event.user_id, "dropping own message");
        return false;
    }
    if event.kind == ConversationKind::Group {
        debug!(user = %event.user_id, "dropping group message");
        return false;
    }
    true
}

async fn lane_loop<A, S, T>(
    lane: usize,
    mut rx: mpsc::Receiver<InboundEvent>,
    engine: Arc<DialogueEngine<A>>,
    store: Arc<S>,
    sink: Arc<T>,
) where
    A: AnswerProvider,
    S: SessionStore,
    T: TransportSink,
{
    debug!(lane, "dispatch lane started");
    while let Some(event) = rx.recv().await {
        handle_event(lane, &event, &engine, &*store, &*sink).await;
    }
    debug!(lane, "dispatch lane drained");
}

/// Run one event through the engine, commit the session, then deliver.
///
/// A store failure on either side ends the turn with a technical-notice
/// reply; the lane itself keeps running. The session commit happens before
/// any outbound send, so a delivery failure can re-serve a turn but never
/// lose a state change.
async fn handle_event<A, S, T>(
    lane: usize,
    event: &InboundEvent,
    engine: &DialogueEngine<A>,
    store: &S,
    sink: &T,
) where
    A: AnswerProvider,
    S: SessionStore,
    T: TransportSink,
{
    let session = match store.get(&event.user_id).await {
        Ok(session) => session,
        Err(e) => {
            error!(lane, user = %event.user_id, error = %e, "session read failed");
            deliver_notice(sink, &event.user_id).await;
            return;
        }
    };

    let Turn {
        next,
        mut reply,
        escalation,
    } = engine.process(event, session).await;

    let committed = match &next {
        Some(session) => store.put(&event.user_id, session).await,
        None => store.delete(&event.user_id).await,
    };
    if let Err(e) = committed {
        error!(lane, user = %event.user_id, error = %e, "session commit failed");
        deliver_notice(sink, &event.user_id).await;
        return;
    }

    if let Some(forward) = escalation {
        match send_with_retry(sink, &forward).await {
            Ok(()) => {
                // Delivered; release the buffered text.
                if let Some(mut session) = next {
                    session.pending_escalation = None;
                    if let Err(e) = store.put(&event.user_id, &session).await {
                        warn!(
                            lane,
                            user = %event.user_id,
                            error = %e,
                            "could not clear delivered escalation buffer"
                        );
                    }
                }
            }
            Err(e) => {
                warn!(lane, user = %event.user_id, error = %e, "escalation forward failed");
                reply.body = messages::escalation_failure();
            }
        }
    }

    if let Err(e) = send_with_retry(sink, &reply).await {
        error!(lane, user = %event.user_id, error = %e, "reply delivery failed");
    }
}

async fn deliver_notice<T: TransportSink>(sink: &T, user_id: &str) {
    let notice = Reply::direct(user_id, messages::TECHNICAL_DIFFICULTIES);
    if let Err(e) = send_with_retry(sink, &notice).await {
        error!(user = %user_id, error = %e, "technical notice delivery failed");
    }
}

/// One immediate retry on send failure; the second error is final.
async fn send_with_retry<T: TransportSink>(sink: &T, reply: &Reply) -> Result<(), TransportError> {
    match sink.send(reply).await {
        Ok(()) => Ok(()),
        Err(e) => {
            debug!(destination = %reply.destination, error = %e, "send failed, retrying once");
            sink.send(reply).await
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
