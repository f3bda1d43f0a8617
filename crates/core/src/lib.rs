//! Core types and pure functions for the reservas services.
//!
//! This crate holds everything that does not perform I/O: the entity kinds,
//! cache key derivation, cache (de)serialization, per-kind cache policies and
//! the traits the application crate implements for its backends.

pub mod cache;
pub mod records;
pub mod storage;
