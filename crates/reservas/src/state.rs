//! Application state with cached entity services.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. The record store and key store backends are chosen by
//! feature flags; see `storage` and `cache` for the mutual-exclusion checks.

use std::sync::Arc;

use anyhow::Result;

use reservas_core::records::{AuthRecord, Notification, Reservation};

#[cfg(feature = "memory")]
use crate::cache::MemoryKeyStore;
#[cfg(feature = "redis")]
use crate::cache::RedisKeyStore;
use crate::config::Config;
use crate::services::{AuthService, EntityService, NotificationService, ReservationService};
#[cfg(feature = "inmemory")]
use crate::storage::InMemoryRecordStore;
#[cfg(feature = "sqlite")]
use crate::storage::SqliteRecordStore;

/// Shared application state.
///
/// Cloned for each request handler. All three services share one key store
/// connection and one record store connection.
#[derive(Clone)]
pub struct AppState {
    pub auths: AuthService,
    pub notifications: NotificationService,
    pub reservations: ReservationService,
}

impl AppState {
    pub fn new(
        auths: AuthService,
        notifications: NotificationService,
        reservations: ReservationService,
    ) -> Self {
        Self {
            auths,
            notifications,
            reservations,
        }
    }

    /// Connects the configured backends and wires one service per kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the cache or the record store cannot be reached.
    pub async fn from_config(config: &Config) -> Result<Self> {
        #[cfg(feature = "memory")]
        let cache = {
            tracing::info!(max_entries = config.cache_max_entries, "Using in-memory cache");
            Arc::new(MemoryKeyStore::new(config.cache_max_entries))
        };

        #[cfg(feature = "redis")]
        let cache = {
            tracing::info!(url = %config.redis_url, "Using Redis cache");
            Arc::new(RedisKeyStore::new(&config.redis_url, config.cache_timeout()).await?)
        };

        #[cfg(feature = "inmemory")]
        let (auth_store, notification_store, reservation_store) = {
            tracing::info!("Using in-memory record store");
            (
                Arc::new(InMemoryRecordStore::<AuthRecord>::new()),
                Arc::new(InMemoryRecordStore::<Notification>::new()),
                Arc::new(InMemoryRecordStore::<Reservation>::new()),
            )
        };

        #[cfg(feature = "sqlite")]
        let (auth_store, notification_store, reservation_store) = {
            tracing::info!(path = %config.sqlite_path, "Using SQLite record store");
            let conn = tokio_rusqlite::Connection::open(&config.sqlite_path).await?;
            (
                Arc::new(SqliteRecordStore::<AuthRecord>::from_connection(conn.clone()).await?),
                Arc::new(SqliteRecordStore::<Notification>::from_connection(conn.clone()).await?),
                Arc::new(SqliteRecordStore::<Reservation>::from_connection(conn).await?),
            )
        };

        let timeout = config.cache_timeout();

        Ok(Self::new(
            EntityService::cached(auth_store, cache.clone(), config.auth_cache.clone(), timeout),
            EntityService::cached(
                notification_store,
                cache.clone(),
                config.notification_cache.clone(),
                timeout,
            ),
            EntityService::cached(
                reservation_store,
                cache,
                config.reservation_cache.clone(),
                timeout,
            ),
        ))
    }
}

#[cfg(test)]
impl AppState {
    /// In-process state with the default per-kind policies, for handler tests.
    pub fn for_tests() -> Self {
        use std::time::Duration;

        use crate::cache::memory::MemoryKeyStore;
        use crate::config::{
            default_auth_policy, default_notification_policy, default_reservation_policy,
        };
        use crate::storage::inmemory::InMemoryRecordStore;

        let cache = Arc::new(MemoryKeyStore::new(1_000));
        let timeout = Duration::from_millis(250);

        Self::new(
            EntityService::cached(
                Arc::new(InMemoryRecordStore::<AuthRecord>::new()),
                cache.clone(),
                default_auth_policy(),
                timeout,
            ),
            EntityService::cached(
                Arc::new(InMemoryRecordStore::<Notification>::new()),
                cache.clone(),
                default_notification_policy(),
                timeout,
            ),
            EntityService::cached(
                Arc::new(InMemoryRecordStore::<Reservation>::new()),
                cache,
                default_reservation_policy(),
                timeout,
            ),
        )
    }
}
