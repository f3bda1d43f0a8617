use std::{env, time::Duration};

use reservas_core::cache::{ensure_distinct_prefixes, CachePolicy, PolicyError, WritePolicy};
use reservas_core::records::{AuthRecord, Document, Notification, Reservation};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of cache entries for the in-memory cache (default: 10,000)
    /// Note: Only used when the `memory` feature is enabled.
    #[allow(dead_code)]
    pub cache_max_entries: usize,
    /// Upper bound for a single cache call in milliseconds (default: 250)
    pub cache_timeout_ms: u64,
    /// Path to SQLite database file (default: "reservas.db")
    /// Note: Only used when the `sqlite` feature is enabled.
    #[allow(dead_code)]
    pub sqlite_path: String,
    /// Redis connection URL (default: "redis://localhost:6379")
    /// Note: Only used when the `redis` feature is enabled.
    #[allow(dead_code)]
    pub redis_url: String,
    pub auth_cache: CachePolicy,
    pub notification_cache: CachePolicy,
    pub reservation_cache: CachePolicy,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `CACHE_TIMEOUT_MS` - Per-call cache timeout (default: 250)
    /// - `SQLITE_PATH` - SQLite database path (default: "reservas.db")
    /// - `REDIS_URL` - Redis connection URL (default: "redis://localhost:6379")
    /// - `AUTH_CACHE_*`, `NOTIFICATION_CACHE_*`, `RESERVATION_CACHE_*` - per-kind
    ///   policy overrides, see [`CachePolicy::from_lookup`]
    ///
    /// # Errors
    ///
    /// Returns an error if a per-kind override is malformed or two kinds end
    /// up with the same key prefix.
    pub fn from_env() -> Result<Self, PolicyError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, PolicyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let config = Self {
            cache_max_entries: lookup("CACHE_MAX_ENTRIES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            cache_timeout_ms: lookup("CACHE_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(250),
            sqlite_path: lookup("SQLITE_PATH").unwrap_or_else(|| "reservas.db".to_string()),
            redis_url: lookup("REDIS_URL")
                .unwrap_or_else(|| "redis://localhost:6379".to_string()),
            auth_cache: CachePolicy::from_lookup("AUTH", default_auth_policy(), &lookup)?,
            notification_cache: CachePolicy::from_lookup(
                "NOTIFICATION",
                default_notification_policy(),
                &lookup,
            )?,
            reservation_cache: CachePolicy::from_lookup(
                "RESERVATION",
                default_reservation_policy(),
                &lookup,
            )?,
        };

        ensure_distinct_prefixes([
            &config.auth_cache,
            &config.notification_cache,
            &config.reservation_cache,
        ])?;

        Ok(config)
    }

    /// Get the per-call cache timeout as a Duration.
    pub fn cache_timeout(&self) -> Duration {
        Duration::from_millis(self.cache_timeout_ms)
    }
}

/// Accounts change rarely and are listed often: cache both scopes for an hour.
pub fn default_auth_policy() -> CachePolicy {
    CachePolicy::new(AuthRecord::KIND, 3600, 3600)
}

/// Notifications are written through; the listing churns, so it lives five minutes.
pub fn default_notification_policy() -> CachePolicy {
    CachePolicy::new(Notification::KIND, 3600, 300).with_write_policy(WritePolicy::WriteThrough)
}

/// Reservations change often: short TTLs and no cached listing.
pub fn default_reservation_policy() -> CachePolicy {
    CachePolicy::new(Reservation::KIND, 60, 60).with_collection_reads(false)
}
