//! In-memory storage backend.
//!
//! Stores each kind in a `HashMap` wrapped in `Arc<RwLock<_>>`. Useful for
//! tests and for development where persistence is not required.
//!
//! # Example
//!
//! ```rust,ignore
//! use reservas::storage::inmemory::InMemoryRecordStore;
//! use reservas_core::records::Reservation;
//!
//! let store = InMemoryRecordStore::<Reservation>::new();
//! ```

mod repository;

pub use repository::InMemoryRecordStore;
