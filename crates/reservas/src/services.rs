//! Per-kind entity services.
//!
//! A service is the handle request handlers hold for one document kind. It
//! binds a cache-aside repository to that kind's [`CachePolicy`] and exposes
//! the five CRUD operations unchanged.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use reservas_core::cache::{CachePolicy, CacheStats, KeyStore};
use reservas_core::records::{AuthRecord, Document, Notification, Reservation};
use reservas_core::storage::{EntityRepository, Record, RecordStore, Result};

use crate::storage::CacheAsideRepository;

/// Cloneable CRUD handle for one document kind.
pub struct EntityService<T: Document> {
    repository: Arc<dyn EntityRepository<T>>,
    stats: Arc<CacheStats>,
}

impl<T: Document> Clone for EntityService<T> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            stats: Arc::clone(&self.stats),
        }
    }
}

impl<T: Document> EntityService<T> {
    /// Wraps an existing repository. `stats` is what `/healthz` reports.
    pub fn new(repository: Arc<dyn EntityRepository<T>>, stats: Arc<CacheStats>) -> Self {
        Self { repository, stats }
    }

    /// Builds a service over `store` cached in `cache` according to `policy`.
    pub fn cached<R, C>(
        store: Arc<R>,
        cache: Arc<C>,
        policy: CachePolicy,
        cache_timeout: Duration,
    ) -> Self
    where
        R: RecordStore<T> + 'static,
        C: KeyStore + 'static,
    {
        tracing::debug!(
            kind = T::KIND,
            prefix = %policy.kind_prefix,
            entity_ttl = policy.entity_ttl_seconds,
            collection_ttl = policy.collection_ttl_seconds,
            collection_reads = policy.cache_collection_reads,
            write_policy = %policy.write_policy,
            "Configuring cache-aside repository"
        );
        let repository = CacheAsideRepository::new(store, cache, policy, cache_timeout);
        let stats = repository.stats();
        Self::new(Arc::new(repository), stats)
    }

    /// Cache counters for this kind.
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Lists every record, from the cache when the policy allows it.
    pub async fn find_all(&self) -> Result<Vec<Record<T>>> {
        self.repository.find_all().await
    }

    /// Gets one record, or `None` if it does not exist.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Record<T>>> {
        self.repository.find_by_id(id).await
    }

    /// Stores a new record and drops the cached listing.
    pub async fn create(&self, data: T) -> Result<Record<T>> {
        self.repository.create(data).await
    }

    /// Applies `patch` and invalidates the affected keys.
    pub async fn update(&self, id: Uuid, patch: T::Patch) -> Result<Option<Record<T>>> {
        self.repository.update(id, patch).await
    }

    /// Removes a record and returns its last value.
    pub async fn delete(&self, id: Uuid) -> Result<Option<Record<T>>> {
        self.repository.delete(id).await
    }
}

pub type AuthService = EntityService<AuthRecord>;
pub type NotificationService = EntityService<Notification>;
pub type ReservationService = EntityService<Reservation>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use reservas_core::cache::WritePolicy;
    use reservas_core::records::{NotificationPatch, NotificationStatus};

    use crate::cache::memory::MemoryKeyStore;
    use crate::storage::inmemory::InMemoryRecordStore;

    fn timeout() -> Duration {
        Duration::from_millis(250)
    }

    #[tokio::test]
    async fn test_services_share_one_cache_without_collisions() {
        let cache = Arc::new(MemoryKeyStore::new(100));
        let reservations: ReservationService = EntityService::cached(
            Arc::new(InMemoryRecordStore::new()),
            cache.clone(),
            CachePolicy::new("reservation", 60, 60),
            timeout(),
        );
        let auths: AuthService = EntityService::cached(
            Arc::new(InMemoryRecordStore::new()),
            cache.clone(),
            CachePolicy::new("auth", 3600, 3600),
            timeout(),
        );

        let date = NaiveDate::from_ymd_opt(2024, 6, 20).unwrap();
        reservations
            .create(Reservation::new("ana@example.com", date, "20:30", 2))
            .await
            .unwrap();
        auths
            .create(AuthRecord::new("ana", "secret", "ana@example.com"))
            .await
            .unwrap();

        assert_eq!(reservations.find_all().await.unwrap().len(), 1);
        assert_eq!(auths.find_all().await.unwrap().len(), 1);
        assert_eq!(reservations.find_all().await.unwrap().len(), 1);

        assert_eq!(reservations.stats().snapshot().hits, 1);
        assert_eq!(auths.stats().snapshot().hits, 0);
    }

    #[tokio::test]
    async fn test_clones_share_repository_and_stats() {
        let service: NotificationService = EntityService::cached(
            Arc::new(InMemoryRecordStore::new()),
            Arc::new(MemoryKeyStore::new(100)),
            CachePolicy::new("notification", 3600, 300)
                .with_write_policy(WritePolicy::WriteThrough),
            timeout(),
        );
        let clone = service.clone();

        let created = service
            .create(Notification::new("user-1", "Welcome", "Hello"))
            .await
            .unwrap();
        let patch = NotificationPatch {
            status: Some(NotificationStatus::Read),
            ..Default::default()
        };
        clone.update(created.id, patch).await.unwrap();

        let found = service.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found.data.status, NotificationStatus::Read);
        // Write-through: the read is a hit
        assert_eq!(clone.stats().snapshot().hits, 1);

        assert!(clone.delete(created.id).await.unwrap().is_some());
        assert!(service.find_by_id(created.id).await.unwrap().is_none());
    }
}
