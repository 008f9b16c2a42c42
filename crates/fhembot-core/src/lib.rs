//! Dialogue engine, dispatcher, and port trait definitions for fhembot.
//!
//! This crate holds the conversation logic: the total state machine over
//! per-user sessions, the content handlers behind the indicator menu, and
//! the dispatch lanes that keep one user's turns ordered while distinct
//! users proceed in parallel. The traits defined here (`SessionStore`,
//! `AnswerProvider`, `TransportSink`) are the "ports" that the
//! infrastructure layer implements. It depends only on `fhembot-types` --
//! never on `fhembot-infra` or any database/IO crate.

pub mod answer;
pub mod dialogue;
pub mod dispatch;
pub mod handlers;
pub mod session;
pub mod transport;
