use thiserror::Error;

/// Errors that can occur during repository operations.
///
/// A missing record is not an error for reads, updates and deletes: those
/// return `Ok(None)`. `NotFound` is kept for backends that need to report a
/// lookup failure in the middle of a larger operation.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("{entity_type} already exists: {id}")]
    AlreadyExists {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

impl RepositoryError {
    /// Returns true when the backing store could not serve the request at all.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            RepositoryError::ConnectionFailed(_) | RepositoryError::QueryFailed(_)
        )
    }
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;
