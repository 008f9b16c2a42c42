//! Session persistence port and lifecycle tasks.

pub mod store;
pub mod sweeper;

pub use store::SessionStore;
