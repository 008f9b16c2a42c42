//! Shared domain types for fhembot.
//!
//! This crate contains the core domain types used across the fhembot
//! assistant: Session, InboundEvent, Reply, lookup catalogs, answer-provider
//! request/response types, configuration, and their associated error types.
//!
//! Zero infrastructure dependencies -- only serde, chrono, thiserror.

pub mod answer;
pub mod catalog;
pub mod config;
pub mod error;
pub mod message;
pub mod session;
