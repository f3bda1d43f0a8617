//! Cache-aside repository decorator.
//!
//! Wraps a `RecordStore` with a `KeyStore`:
//!
//! - **Reads**: Check cache first, on miss fetch from the store and populate cache
//! - **Writes**: Persist to the store, then invalidate the affected keys
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let store = Arc::new(SqliteRecordStore::<Reservation>::new("reservas.db").await?);
//! let cache = Arc::new(MemoryKeyStore::new(10_000));
//! let policy = CachePolicy::new("reservation", 60, 60);
//!
//! let repo = CacheAsideRepository::new(store, cache, policy, Duration::from_millis(250));
//! ```

mod repository;

pub use repository::CacheAsideRepository;
