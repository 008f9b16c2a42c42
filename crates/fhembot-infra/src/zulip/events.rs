//! Zulip event loop.
//!
//! Registers a message event queue and long-polls it, feeding direct
//! messages into the dispatcher. An expired queue is registered again
//! transparently; network failures back off before the next poll.

use std::time::Duration;

use fhembot_core::dispatch::{Dispatcher, IngestError};
use fhembot_types::error::TransportError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::client::{PollError, ZulipClient};
use super::types::Event;

/// Pause after a failed poll or registration before trying again.
const POLL_BACKOFF: Duration = Duration::from_secs(5);

/// Run the inbound event loop until `cancel` fires.
///
/// The initial queue registration must succeed (bad credentials should
/// fail startup, not retry forever); after that the loop rides out queue
/// expiry and network trouble on its own.
pub async fn run_event_loop(
    client: &ZulipClient,
    dispatcher: &Dispatcher,
    cancel: CancellationToken,
) -> Result<(), TransportError> {
    let mut queue = client.register_queue().await?;
    info!(queue = %queue.queue_id, "listening for messages");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                debug!("event loop stopped");
                return Ok(());
            }
            polled = client.poll_events(&mut queue) => match polled {
                Ok(events) => deliver_batch(client.bot_email(), dispatcher, events).await,
                Err(PollError::QueueExpired) => {
                    warn!("event queue expired, registering a new one");
                    match client.register_queue().await {
                        Ok(fresh) => queue = fresh,
                        Err(error) => {
                            warn!(%error, "queue registration failed");
                            back_off(&cancel).await;
                        }
                    }
                }
                Err(PollError::Transport(error)) => {
                    warn!(%error, "event poll failed");
                    back_off(&cancel).await;
                }
            }
        }
    }
}

async fn back_off(cancel: &CancellationToken) {
    tokio::select! {
        _ = cancel.cancelled() => {}
        _ = tokio::time::sleep(POLL_BACKOFF) => {}
    }
}

/// Map one polled batch onto inbound events and queue them.
async fn deliver_batch(bot_email: &str, dispatcher: &Dispatcher, events: Vec<Event>) {
    for event in events {
        let Some(message) = event.message else {
            debug!(kind = %event.kind, id = event.id, "skipping non-message event");
            continue;
        };
        let inbound = message.into_inbound(bot_email);
        match dispatcher.ingest(inbound).await {
            Ok(()) => {}
            Err(IngestError::Closed) => {
                warn!("dispatcher closed, dropping remaining events");
                return;
            }
            Err(error) => warn!(%error, "failed to queue inbound event"),
        }
    }
}
