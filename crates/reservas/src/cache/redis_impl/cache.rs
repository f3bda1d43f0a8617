//! Redis key store implementation.
//!
//! Values are stored as plain strings with `SET EX`. Invalidation of several
//! keys is a single `DEL` with every key, which Redis applies atomically.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::{ConnectionManager, ConnectionManagerConfig};
use redis::AsyncCommands;

use reservas_core::cache::{KeyStore, Result};

use super::error::map_redis_error;

/// Reconnect backoff grows by this many milliseconds per attempt.
const RECONNECT_FACTOR_MS: u64 = 50;

/// Upper bound on the reconnect backoff.
const RECONNECT_MAX_DELAY_MS: u64 = 2_000;

/// Redis key store using a connection manager that reconnects on failure.
#[derive(Clone)]
pub struct RedisKeyStore {
    conn: ConnectionManager,
}

impl RedisKeyStore {
    /// Creates a new Redis connection.
    ///
    /// # Arguments
    ///
    /// * `url` - Redis connection URL (e.g., "redis://localhost:6379")
    /// * `timeout` - Connect and response timeout for every command
    ///
    /// # Errors
    ///
    /// Returns `CacheError::ConnectionFailed` if the connection cannot be established.
    pub async fn new(url: &str, timeout: Duration) -> Result<Self> {
        let client = redis::Client::open(url).map_err(map_redis_error)?;
        let config = ConnectionManagerConfig::new()
            .set_factor(RECONNECT_FACTOR_MS)
            .set_max_delay(RECONNECT_MAX_DELAY_MS)
            .set_connection_timeout(timeout)
            .set_response_timeout(timeout);
        let conn = ConnectionManager::new_with_config(client, config)
            .await
            .map_err(map_redis_error)?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl KeyStore for RedisKeyStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let result: Option<Vec<u8>> = conn.get(key).await.map_err(map_redis_error)?;
        Ok(result)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        // EX rejects zero, so sub-second TTLs round up.
        let seconds = ttl.as_secs().max(1);
        conn.set_ex::<_, _, ()>(key, value, seconds)
            .await
            .map_err(map_redis_error)
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key).await.map_err(map_redis_error)
    }

    async fn delete_many(&self, keys: &[String]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(keys).await.map_err(map_redis_error)
    }
}
