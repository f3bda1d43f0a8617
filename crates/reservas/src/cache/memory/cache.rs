//! In-memory key store with LRU eviction.
//!
//! Provides a thread-safe in-process cache with TTL support using tokio
//! synchronization primitives and an LRU eviction policy. Suitable for a
//! single-instance deployment or for tests; a multi-instance deployment needs
//! the `redis` backend so every instance sees the same invalidations.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use reservas_core::cache::{KeyStore, Result};

/// A single cached value with its expiration instant.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(value: Vec<u8>, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// In-memory key store with LRU eviction.
///
/// Expiration is lazy: an expired entry is dropped the next time it is read.
/// Until then it still occupies a slot and is the first candidate for LRU
/// eviction once it stops being touched.
#[derive(Debug, Clone)]
pub struct MemoryKeyStore {
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
}

impl MemoryKeyStore {
    /// Creates a new in-memory key store holding at most `max_entries` values.
    ///
    /// A `max_entries` of zero is treated as one.
    pub fn new(max_entries: usize) -> Self {
        let capacity = NonZeroUsize::new(max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            store: Arc::new(RwLock::new(LruCache::new(capacity))),
        }
    }

    /// Number of stored entries, expired ones included.
    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}

#[async_trait]
impl KeyStore for MemoryKeyStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        // `LruCache::get` updates recency, so even reads need the write lock.
        let mut store = self.store.write().await;

        match store.get(key) {
            Some(entry) if entry.is_expired() => {
                store.pop(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let mut store = self.store.write().await;
        store.put(key.to_string(), CacheEntry::new(value.to_vec(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut store = self.store.write().await;
        store.pop(key);
        Ok(())
    }

    async fn delete_many(&self, keys: &[String]) -> Result<()> {
        let mut store = self.store.write().await;
        for key in keys {
            store.pop(key);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Default max entries for tests
    const TEST_MAX_ENTRIES: usize = 1000;

    /// TTL long enough to never expire during a test.
    const LONG_TTL: Duration = Duration::from_secs(300);

    #[tokio::test]
    async fn test_set_and_get() {
        let cache = MemoryKeyStore::new(TEST_MAX_ENTRIES);
        let key = "reservation:all";
        let value = b"[]";

        cache.set(key, value, LONG_TTL).await.unwrap();
        let result = cache.get(key).await.unwrap();

        assert_eq!(result, Some(value.to_vec()));
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let cache = MemoryKeyStore::new(TEST_MAX_ENTRIES);
        let result = cache.get("nonexistent:key").await.unwrap();

        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_delete() {
        let cache = MemoryKeyStore::new(TEST_MAX_ENTRIES);
        let key = "auth:to-delete";

        cache.set(key, b"to be deleted", LONG_TTL).await.unwrap();
        assert!(cache.get(key).await.unwrap().is_some());

        cache.delete(key).await.unwrap();
        assert!(cache.get(key).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_absent_key_succeeds() {
        let cache = MemoryKeyStore::new(TEST_MAX_ENTRIES);

        assert!(cache.delete("auth:never-set").await.is_ok());
        assert!(cache.delete("auth:never-set").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_many() {
        let cache = MemoryKeyStore::new(TEST_MAX_ENTRIES);

        cache.set("notification:1", b"1", LONG_TTL).await.unwrap();
        cache.set("notification:all", b"[]", LONG_TTL).await.unwrap();
        cache.set("reservation:all", b"[]", LONG_TTL).await.unwrap();

        cache
            .delete_many(&[
                "notification:1".to_string(),
                "notification:all".to_string(),
                "notification:absent".to_string(),
            ])
            .await
            .unwrap();

        assert!(cache.get("notification:1").await.unwrap().is_none());
        assert!(cache.get("notification:all").await.unwrap().is_none());
        assert!(cache.get("reservation:all").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let cache = MemoryKeyStore::new(TEST_MAX_ENTRIES);
        let key = "test:ttl";

        cache
            .set(key, b"short-lived", Duration::from_millis(50))
            .await
            .unwrap();

        // Should exist immediately
        assert!(cache.get(key).await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(100)).await;

        // Expired entries read as absent and are dropped
        assert!(cache.get(key).await.unwrap().is_none());
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_overwrite_resets_ttl() {
        let cache = MemoryKeyStore::new(TEST_MAX_ENTRIES);
        let key = "test:overwrite";

        cache
            .set(key, b"old", Duration::from_millis(50))
            .await
            .unwrap();
        cache.set(key, b"new", LONG_TTL).await.unwrap();

        tokio::time::sleep(Duration::from_millis(100)).await;

        assert_eq!(cache.get(key).await.unwrap(), Some(b"new".to_vec()));
    }

    #[tokio::test]
    async fn test_lru_eviction() {
        // Create a cache with only 3 entries max
        let cache = MemoryKeyStore::new(3);

        cache.set("key1", b"value1", LONG_TTL).await.unwrap();
        cache.set("key2", b"value2", LONG_TTL).await.unwrap();
        cache.set("key3", b"value3", LONG_TTL).await.unwrap();

        // Access key1 to make it recently used
        cache.get("key1").await.unwrap();

        // Insert a 4th entry - should evict key2 (least recently used)
        cache.set("key4", b"value4", LONG_TTL).await.unwrap();

        assert!(cache.get("key1").await.unwrap().is_some());
        assert!(cache.get("key2").await.unwrap().is_none());
        assert!(cache.get("key3").await.unwrap().is_some());
        assert!(cache.get("key4").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_zero_max_entries_holds_one_value() {
        let cache = MemoryKeyStore::new(0);

        cache.set("key1", b"value1", LONG_TTL).await.unwrap();
        cache.set("key2", b"value2", LONG_TTL).await.unwrap();

        assert!(cache.get("key1").await.unwrap().is_none());
        assert!(cache.get("key2").await.unwrap().is_some());
    }
}
