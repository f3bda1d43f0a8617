use std::time::Duration;

use async_trait::async_trait;

use super::Result;

/// Key-value store used as the cache tier.
///
/// Every operation completes before returning; callers await each call and
/// there is no fire-and-forget variant.
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Gets a value by key. Missing and expired keys both return `None`.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Sets a value that expires after `ttl`.
    async fn set(&self, key: &str, value: &[u8], ttl: Duration) -> Result<()>;

    /// Deletes a key. Deleting an absent key succeeds.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Deletes several keys, each independently of the others.
    async fn delete_many(&self, keys: &[String]) -> Result<()>;
}
