//! Infrastructure layer for fhembot.
//!
//! Contains implementations of the port traits defined in `fhembot-core`:
//! session stores (in-memory and SQLite), the Zulip transport adapter, and
//! the OpenAI-compatible answer provider, plus the config and catalog
//! loaders.

pub mod answer;
pub mod catalog;
pub mod config;
pub mod session;
pub mod sqlite;
pub mod zulip;
