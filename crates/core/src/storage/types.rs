use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted document together with its store-assigned identity.
///
/// The document fields are flattened into the same JSON object as `id`,
/// `createdAt` and `updatedAt`, which is also the cached representation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record<T> {
    pub id: Uuid,
    #[serde(flatten)]
    pub data: T,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<T> Record<T> {
    /// Wraps freshly inserted data with a new ID and matching timestamps.
    pub fn new(data: T, now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            data,
            created_at: now,
            updated_at: now,
        }
    }

    /// Sets a specific ID for this record (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Marks the record as modified at `now`. `created_at` is never touched.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }
}
