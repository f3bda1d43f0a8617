//! In-memory record store implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use reservas_core::records::Document;
use reservas_core::storage::{Record, RecordStore, RepositoryError, Result};

/// In-memory record store for one document kind.
///
/// Every mutation completes under a single write-lock acquisition, so a caller
/// dropping the future can never observe a half-applied update.
/// Data is not persisted and will be lost when the last clone is dropped.
#[derive(Debug)]
pub struct InMemoryRecordStore<T: Document> {
    records: Arc<RwLock<HashMap<Uuid, Record<T>>>>,
}

impl<T: Document> Clone for InMemoryRecordStore<T> {
    fn clone(&self) -> Self {
        Self {
            records: Arc::clone(&self.records),
        }
    }
}

impl<T: Document> Default for InMemoryRecordStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Document> InMemoryRecordStore<T> {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored records.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }
}

/// Fails if another record already holds one of `data`'s unique keys.
fn check_unique<T: Document>(
    records: &HashMap<Uuid, Record<T>>,
    data: &T,
    id: Uuid,
) -> Result<()> {
    for (field, value) in data.unique_keys() {
        let taken = records
            .values()
            .filter(|other| other.id != id)
            .any(|other| other.data.unique_keys().contains(&(field, value.clone())));
        if taken {
            return Err(RepositoryError::AlreadyExists {
                entity_type: T::ENTITY_TYPE,
                id: format!("{field} {value}"),
            });
        }
    }
    Ok(())
}

#[async_trait]
impl<T: Document> RecordStore<T> for InMemoryRecordStore<T> {
    async fn find_all(&self) -> Result<Vec<Record<T>>> {
        let records = self.records.read().await;
        let mut all: Vec<Record<T>> = records.values().cloned().collect();
        all.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Record<T>>> {
        let records = self.records.read().await;
        Ok(records.get(&id).cloned())
    }

    async fn insert(&self, data: T) -> Result<Record<T>> {
        let record = Record::new(data, Utc::now());
        let mut records = self.records.write().await;
        check_unique(&records, &record.data, record.id)?;
        records.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update_by_id(&self, id: Uuid, patch: T::Patch) -> Result<Option<Record<T>>> {
        let mut records = self.records.write().await;
        let Some(current) = records.get(&id) else {
            return Ok(None);
        };

        let mut updated = current.clone();
        updated.data.apply_patch(patch);
        check_unique(&records, &updated.data, id)?;
        updated.touch(Utc::now());

        records.insert(id, updated.clone());
        Ok(Some(updated))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Record<T>>> {
        let mut records = self.records.write().await;
        Ok(records.remove(&id))
    }
}
