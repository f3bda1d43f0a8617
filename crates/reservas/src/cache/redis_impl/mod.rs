//! Redis key store backend.
//!
//! Provides a shared cache for multi-instance deployments. Every instance
//! pointed at the same Redis sees the same invalidations.

mod cache;
mod error;

pub use cache::RedisKeyStore;
