//! In-memory key store backend.
//!
//! Provides a thread-safe in-process cache with TTL support for
//! single-instance deployments and tests.

mod cache;

pub use cache::MemoryKeyStore;
