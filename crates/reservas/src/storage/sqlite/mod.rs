//! SQLite storage backend implementation.
//!
//! Stores every document kind in one `records` table as JSON, using
//! `rusqlite` for synchronous operations and `tokio-rusqlite` for async
//! wrapping.

mod conversions;
mod error;
mod repository;
mod schema;

pub use repository::SqliteRecordStore;
