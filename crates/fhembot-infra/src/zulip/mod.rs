//! Zulip transport adapter.
//!
//! This module provides the [`ZulipClient`] which implements the
//! [`TransportSink`](fhembot_core::transport::TransportSink) trait against
//! the Zulip REST API, plus the event-queue long-poll loop that feeds
//! inbound direct messages into the dispatcher.

pub mod client;
pub mod events;
pub mod types;

pub use client::{EventQueue, PollError, ZulipClient};
pub use events::run_event_loop;
