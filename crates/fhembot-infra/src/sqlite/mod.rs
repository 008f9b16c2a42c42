//! SQLite persistence layer.

pub mod pool;

pub use pool::DatabasePool;
