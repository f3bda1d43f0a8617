use async_trait::async_trait;
use uuid::Uuid;

use crate::records::Document;

use super::{Record, Result};

/// Persistence backend for a single document kind.
///
/// Absence is reported as `Ok(None)`; `Err` is reserved for failures of the
/// store itself.
#[async_trait]
pub trait RecordStore<T: Document>: Send + Sync {
    /// Returns every stored record of this kind.
    async fn find_all(&self) -> Result<Vec<Record<T>>>;

    /// Gets a record by its ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Record<T>>>;

    /// Inserts a new document, assigning its ID and timestamps.
    async fn insert(&self, data: T) -> Result<Record<T>>;

    /// Applies a patch to an existing record and refreshes `updated_at`.
    async fn update_by_id(&self, id: Uuid, patch: T::Patch) -> Result<Option<Record<T>>>;

    /// Removes a record, returning its last stored value.
    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Record<T>>>;
}

/// The CRUD operations request handlers consume for one entity kind.
#[async_trait]
pub trait EntityRepository<T: Document>: Send + Sync {
    /// Lists every record of this kind.
    async fn find_all(&self) -> Result<Vec<Record<T>>>;

    /// Gets a record by its ID.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Record<T>>>;

    /// Creates a new record.
    async fn create(&self, data: T) -> Result<Record<T>>;

    /// Updates an existing record.
    async fn update(&self, id: Uuid, patch: T::Patch) -> Result<Option<Record<T>>>;

    /// Deletes a record by its ID.
    async fn delete(&self, id: Uuid) -> Result<Option<Record<T>>>;
}
