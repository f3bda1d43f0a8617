//! Generic cache-aside repository.
//!
//! One implementation serves every document kind; the differences between
//! kinds are carried by [`CachePolicy`].
//!
//! # Consistency
//!
//! Within one operation the store mutation happens before the cache
//! invalidation, which happens before the result is returned. Across
//! concurrent operations nothing is ordered: a reader that misses, reads the
//! store and then populates the cache can do so after a concurrent writer has
//! already invalidated, leaving a stale entry until its TTL runs out. There is
//! no in-process lock to close that window.
//!
//! # Cache faults
//!
//! Every cache call is bounded by a timeout. Failures, timeouts and
//! undecodable payloads are logged, counted in [`CacheStats`] and otherwise
//! treated as a miss (reads) or a no-op (writes). Only record store errors
//! reach the caller.

use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use reservas_core::cache::{
    deserialize_record, deserialize_records, serialize_record, serialize_records, CacheError,
    CachePolicy, CacheStats, KeyStore, Result as CacheResult, WritePolicy,
};
use reservas_core::records::Document;
use reservas_core::storage::{EntityRepository, Record, RecordStore, Result};

/// Cache-aside decorator over a record store.
///
/// # Type Parameters
///
/// * `T` - The document kind
/// * `R` - The underlying record store
/// * `C` - The key store used as cache
pub struct CacheAsideRepository<T, R, C>
where
    T: Document,
    R: RecordStore<T>,
    C: KeyStore,
{
    store: Arc<R>,
    cache: Arc<C>,
    policy: CachePolicy,
    timeout: Duration,
    stats: Arc<CacheStats>,
    _kind: PhantomData<fn() -> T>,
}

impl<T, R, C> CacheAsideRepository<T, R, C>
where
    T: Document,
    R: RecordStore<T>,
    C: KeyStore,
{
    /// Creates a new cache-aside repository.
    ///
    /// # Arguments
    ///
    /// * `store` - The record store holding the source of truth
    /// * `cache` - The key store shared with other repositories
    /// * `policy` - Key prefix, TTLs and write behavior for this kind
    /// * `timeout` - Upper bound for every single cache call
    pub fn new(store: Arc<R>, cache: Arc<C>, policy: CachePolicy, timeout: Duration) -> Self {
        Self {
            store,
            cache,
            policy,
            timeout,
            stats: Arc::new(CacheStats::new()),
            _kind: PhantomData,
        }
    }

    /// Counters for this repository's cache activity.
    pub fn stats(&self) -> Arc<CacheStats> {
        Arc::clone(&self.stats)
    }

    /// Runs one cache call under the configured timeout.
    async fn bounded<V, F>(&self, call: F) -> CacheResult<V>
    where
        F: Future<Output = CacheResult<V>> + Send,
    {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(result) => result,
            Err(_) => Err(CacheError::Timeout(
                u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            )),
        }
    }

    /// Reads a key, absorbing any cache fault as a miss.
    async fn cache_get(&self, key: &str) -> Option<Vec<u8>> {
        match self.bounded(self.cache.get(key)).await {
            Ok(bytes) => bytes,
            Err(err) => {
                self.stats.record_error();
                tracing::warn!(kind = T::KIND, key = %key, error = %err, "Cache read failed");
                None
            }
        }
    }

    async fn cache_set(&self, key: &str, bytes: &[u8], ttl: Duration) {
        match self.bounded(self.cache.set(key, bytes, ttl)).await {
            Ok(()) => self.stats.record_population(),
            Err(err) => {
                self.stats.record_error();
                tracing::warn!(kind = T::KIND, key = %key, error = %err, "Failed to populate cache");
            }
        }
    }

    /// Deletes `keys`. A failure leaves stale entries until their TTL expires.
    async fn invalidate(&self, keys: &[String]) {
        match self.bounded(self.cache.delete_many(keys)).await {
            Ok(()) => self.stats.record_invalidation(),
            Err(err) => {
                self.stats.record_error();
                tracing::warn!(
                    kind = T::KIND,
                    keys = ?keys,
                    error = %err,
                    "Failed to invalidate cache"
                );
            }
        }
    }

    /// Drops a payload that could not be decoded.
    async fn discard_corrupt(&self, key: &str, err: impl std::fmt::Display) {
        self.stats.record_corrupt();
        tracing::warn!(kind = T::KIND, key = %key, error = %err, "Discarding undecodable cache entry");
        if let Err(err) = self.bounded(self.cache.delete(key)).await {
            self.stats.record_error();
            tracing::warn!(kind = T::KIND, key = %key, error = %err, "Failed to discard cache entry");
        }
    }

    /// Caches a freshly written record under its singular key.
    async fn write_through(&self, record: &Record<T>) {
        let key = self.policy.entity_key(record.id);
        match serialize_record(record) {
            Ok(bytes) => self.cache_set(&key, &bytes, self.policy.entity_ttl()).await,
            Err(err) => {
                tracing::warn!(kind = T::KIND, key = %key, error = %err, "Failed to serialize record")
            }
        }
    }
}

#[async_trait]
impl<T, R, C> EntityRepository<T> for CacheAsideRepository<T, R, C>
where
    T: Document,
    R: RecordStore<T> + 'static,
    C: KeyStore + 'static,
{
    async fn find_all(&self) -> Result<Vec<Record<T>>> {
        if !self.policy.cache_collection_reads {
            return self.store.find_all().await;
        }

        let key = self.policy.collection_key();

        if let Some(bytes) = self.cache_get(&key).await {
            match deserialize_records::<T>(&bytes) {
                Ok(records) => {
                    self.stats.record_hit();
                    tracing::trace!(kind = T::KIND, count = records.len(), "Cache hit for collection");
                    return Ok(records);
                }
                Err(err) => self.discard_corrupt(&key, err).await,
            }
        }

        // Cache miss - fetch from the store
        self.stats.record_miss();
        tracing::trace!(kind = T::KIND, "Cache miss for collection");
        let records = self.store.find_all().await?;

        match serialize_records(&records) {
            Ok(bytes) => {
                self.cache_set(&key, &bytes, self.policy.collection_ttl())
                    .await
            }
            Err(err) => {
                tracing::warn!(kind = T::KIND, key = %key, error = %err, "Failed to serialize collection")
            }
        }

        Ok(records)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Record<T>>> {
        let key = self.policy.entity_key(id);

        if let Some(bytes) = self.cache_get(&key).await {
            match deserialize_record::<T>(&bytes) {
                Ok(record) => {
                    self.stats.record_hit();
                    tracing::trace!(kind = T::KIND, %id, "Cache hit");
                    return Ok(Some(record));
                }
                Err(err) => self.discard_corrupt(&key, err).await,
            }
        }

        self.stats.record_miss();
        tracing::trace!(kind = T::KIND, %id, "Cache miss");
        let Some(record) = self.store.find_by_id(id).await? else {
            return Ok(None);
        };

        match serialize_record(&record) {
            Ok(bytes) => self.cache_set(&key, &bytes, self.policy.entity_ttl()).await,
            Err(err) => {
                tracing::warn!(kind = T::KIND, key = %key, error = %err, "Failed to serialize record")
            }
        }

        Ok(Some(record))
    }

    async fn create(&self, data: T) -> Result<Record<T>> {
        // 1. Persist to the store
        let record = self.store.insert(data).await?;

        // 2. Drop the listing; it is repopulated lazily on the next read
        self.invalidate(&[self.policy.collection_key()]).await;

        if self.policy.write_policy == WritePolicy::WriteThrough {
            self.write_through(&record).await;
        }

        tracing::debug!(kind = T::KIND, id = %record.id, "Record created");
        Ok(record)
    }

    async fn update(&self, id: Uuid, patch: T::Patch) -> Result<Option<Record<T>>> {
        // 1. Persist to the store
        let Some(record) = self.store.update_by_id(id, patch).await? else {
            return Ok(None);
        };

        // 2. Invalidate both keys before returning. With write-through the
        //    fresh value is stored afterwards, so a failed set still leaves no
        //    pre-update value behind.
        self.invalidate(&[self.policy.entity_key(id), self.policy.collection_key()])
            .await;

        if self.policy.write_policy == WritePolicy::WriteThrough {
            self.write_through(&record).await;
        }

        tracing::debug!(kind = T::KIND, %id, "Record updated");
        Ok(Some(record))
    }

    async fn delete(&self, id: Uuid) -> Result<Option<Record<T>>> {
        // 1. Persist deletion to the store
        let Some(record) = self.store.delete_by_id(id).await? else {
            return Ok(None);
        };

        // 2. Invalidate both keys
        self.invalidate(&[self.policy.entity_key(id), self.policy.collection_key()])
            .await;

        tracing::debug!(kind = T::KIND, %id, "Record deleted");
        Ok(Some(record))
    }
}
