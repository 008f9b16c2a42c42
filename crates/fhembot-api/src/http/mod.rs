//! HTTP layer for fhembot.
//!
//! Axum-based surface exposing a health probe and the webhook ingestion
//! path as an alternative to long polling.

pub mod error;
pub mod handlers;
pub mod router;

pub use router::{HttpState, build_router};
