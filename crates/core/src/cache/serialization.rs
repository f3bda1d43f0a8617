//! Pure functions for serializing/deserializing records to/from cache bytes.
//!
//! Cache values are JSON so they stay human-readable when inspected with
//! `redis-cli` and identical to the API representation.

use thiserror::Error;

use crate::records::Document;
use crate::storage::Record;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    /// Failed to serialize a value to bytes.
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    /// Failed to deserialize bytes to a value.
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Serializes a single record to JSON bytes.
pub fn serialize_record<T: Document>(record: &Record<T>) -> Result<Vec<u8>> {
    serde_json::to_vec(record).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a single record.
pub fn deserialize_record<T: Document>(bytes: &[u8]) -> Result<Record<T>> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

/// Serializes a listing of records to JSON bytes.
pub fn serialize_records<T: Document>(records: &[Record<T>]) -> Result<Vec<u8>> {
    serde_json::to_vec(records).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a listing of records.
pub fn deserialize_records<T: Document>(bytes: &[u8]) -> Result<Vec<Record<T>>> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
