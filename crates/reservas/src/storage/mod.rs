//! Storage backend implementations.
//!
//! This module provides concrete implementations of the `RecordStore` trait
//! defined in `reservas_core::storage`, plus the cache-aside decorator that
//! sits in front of them. The record store is selected at compile time via
//! feature flags.
//!
//! # Feature Flags
//!
//! - `inmemory` (default): HashMap-backed store, data is lost on restart
//! - `sqlite`: SQLite storage backend using `rusqlite` and `tokio-rusqlite`
//!
//! These features are mutually exclusive - only one storage backend can be
//! enabled at a time.
//!
//! # Examples
//!
//! Build with SQLite:
//! ```bash
//! cargo build -p reservas --no-default-features --features sqlite,memory
//! ```

// Compile-time checks for mutual exclusivity
#[cfg(all(feature = "sqlite", feature = "inmemory"))]
compile_error!(
    "Features 'sqlite' and 'inmemory' are mutually exclusive. \
    Enable only one storage backend at a time."
);

#[cfg(not(any(feature = "sqlite", feature = "inmemory")))]
compile_error!(
    "No storage backend selected. Enable 'inmemory' or 'sqlite' feature. \
    Example: cargo build -p reservas --features sqlite"
);

pub mod cached;

// The in-memory store backs the unit tests regardless of the selected backend.
#[cfg(any(feature = "inmemory", test))]
pub mod inmemory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use cached::CacheAsideRepository;

#[cfg(feature = "inmemory")]
pub use inmemory::InMemoryRecordStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteRecordStore;
