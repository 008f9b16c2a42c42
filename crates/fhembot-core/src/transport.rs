//! Outbound transport trait.
//!
//! The sending half of the chat platform connection. The dispatcher only
//! ever sees this trait; the Zulip REST implementation lives in
//! fhembot-infra.

use fhembot_types::error::TransportError;
use fhembot_types::message::Reply;

/// Trait for delivering replies to the chat platform.
///
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait TransportSink: Send + Sync {
    /// Deliver one reply to its destination address.
    fn send(
        &self,
        reply: &Reply,
    ) -> impl std::future::Future<Output = Result<(), TransportError>> + Send;
}
