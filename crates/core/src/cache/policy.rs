//! Per-kind cache configuration.
//!
//! The services differ only in how they cache: which TTLs they use, whether
//! the full listing is cached at all, and whether writes refresh the singular
//! key or just drop it. All of that is expressed here as data so the
//! cache-aside repository has a single implementation.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::keys::{collection_key, entity_key, validate_prefix};

/// What a successful create/update does to the singular key.
///
/// The collection key is always deleted on writes regardless of this policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WritePolicy {
    /// Delete the singular key; the next read repopulates it.
    #[default]
    Invalidate,
    /// Store the freshly written record under the singular key.
    WriteThrough,
}

impl fmt::Display for WritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WritePolicy::Invalidate => write!(f, "invalidate"),
            WritePolicy::WriteThrough => write!(f, "write_through"),
        }
    }
}

impl FromStr for WritePolicy {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "invalidate" => Ok(WritePolicy::Invalidate),
            "write_through" | "write-through" => Ok(WritePolicy::WriteThrough),
            _ => Err(PolicyError::InvalidValue {
                variable: "WRITE_POLICY".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Errors raised by an inconsistent cache policy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyError {
    #[error("Invalid cache key prefix: {0:?}")]
    InvalidPrefix(String),
    #[error("{0} must be greater than zero")]
    ZeroTtl(&'static str),
    #[error("Invalid value for {variable}: {value:?}")]
    InvalidValue { variable: String, value: String },
    #[error("Cache key prefix {0:?} is used by more than one kind")]
    DuplicatePrefix(String),
}

/// Cache configuration for one entity kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachePolicy {
    /// Namespace for every key of this kind.
    pub kind_prefix: String,
    /// TTL for singular keys.
    pub entity_ttl_seconds: u64,
    /// TTL for the collection key.
    pub collection_ttl_seconds: u64,
    /// When false, `find_all` always goes to the record store.
    pub cache_collection_reads: bool,
    pub write_policy: WritePolicy,
}

impl CachePolicy {
    /// Creates a policy that caches collection reads and invalidates on writes.
    pub fn new(
        kind_prefix: impl Into<String>,
        entity_ttl_seconds: u64,
        collection_ttl_seconds: u64,
    ) -> Self {
        Self {
            kind_prefix: kind_prefix.into(),
            entity_ttl_seconds,
            collection_ttl_seconds,
            cache_collection_reads: true,
            write_policy: WritePolicy::Invalidate,
        }
    }

    /// Enables or disables caching of the full listing.
    pub fn with_collection_reads(mut self, enabled: bool) -> Self {
        self.cache_collection_reads = enabled;
        self
    }

    /// Sets the singular-key write policy.
    pub fn with_write_policy(mut self, write_policy: WritePolicy) -> Self {
        self.write_policy = write_policy;
        self
    }

    /// Checks the prefix and TTLs.
    pub fn validate(&self) -> Result<(), PolicyError> {
        if !validate_prefix(&self.kind_prefix) {
            return Err(PolicyError::InvalidPrefix(self.kind_prefix.clone()));
        }
        if self.entity_ttl_seconds == 0 {
            return Err(PolicyError::ZeroTtl("entity_ttl_seconds"));
        }
        if self.collection_ttl_seconds == 0 {
            return Err(PolicyError::ZeroTtl("collection_ttl_seconds"));
        }
        Ok(())
    }

    /// TTL applied to singular keys.
    pub fn entity_ttl(&self) -> Duration {
        Duration::from_secs(self.entity_ttl_seconds)
    }

    /// TTL applied to the collection key.
    pub fn collection_ttl(&self) -> Duration {
        Duration::from_secs(self.collection_ttl_seconds)
    }

    /// Singular key for `id` under this policy's prefix.
    pub fn entity_key(&self, id: Uuid) -> String {
        entity_key(&self.kind_prefix, id)
    }

    /// Collection key under this policy's prefix.
    pub fn collection_key(&self) -> String {
        collection_key(&self.kind_prefix)
    }

    /// Overrides `defaults` with `<ENV_PREFIX>_CACHE_*` variables.
    ///
    /// `lookup` resolves a variable name to its value, which keeps this pure:
    /// pass `|name| std::env::var(name).ok()` to read the process environment.
    ///
    /// Recognized variables:
    /// - `<ENV_PREFIX>_CACHE_PREFIX`
    /// - `<ENV_PREFIX>_CACHE_ENTITY_TTL_SECONDS`
    /// - `<ENV_PREFIX>_CACHE_COLLECTION_TTL_SECONDS`
    /// - `<ENV_PREFIX>_CACHE_COLLECTION_READS` (`true`/`false`)
    /// - `<ENV_PREFIX>_CACHE_WRITE_POLICY` (`invalidate`/`write_through`)
    pub fn from_lookup<F>(env_prefix: &str, defaults: Self, lookup: F) -> Result<Self, PolicyError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |suffix: &str| format!("{}_CACHE_{}", env_prefix, suffix);
        let mut policy = defaults;

        if let Some(prefix) = lookup(&var("PREFIX")) {
            policy.kind_prefix = prefix;
        }
        if let Some(ttl) = lookup(&var("ENTITY_TTL_SECONDS")) {
            policy.entity_ttl_seconds = parse_value(&var("ENTITY_TTL_SECONDS"), &ttl)?;
        }
        if let Some(ttl) = lookup(&var("COLLECTION_TTL_SECONDS")) {
            policy.collection_ttl_seconds = parse_value(&var("COLLECTION_TTL_SECONDS"), &ttl)?;
        }
        if let Some(enabled) = lookup(&var("COLLECTION_READS")) {
            policy.cache_collection_reads = parse_value(&var("COLLECTION_READS"), &enabled)?;
        }
        if let Some(write_policy) = lookup(&var("WRITE_POLICY")) {
            policy.write_policy = write_policy
                .parse()
                .map_err(|_| PolicyError::InvalidValue {
                    variable: var("WRITE_POLICY"),
                    value: write_policy.clone(),
                })?;
        }

        policy.validate()?;
        Ok(policy)
    }
}

/// Fails if two policies share a key prefix, which would let one kind's
/// entries be served as another's.
pub fn ensure_distinct_prefixes<'a>(
    policies: impl IntoIterator<Item = &'a CachePolicy>,
) -> Result<(), PolicyError> {
    let mut seen: Vec<&str> = Vec::new();
    for policy in policies {
        if seen.contains(&policy.kind_prefix.as_str()) {
            return Err(PolicyError::DuplicatePrefix(policy.kind_prefix.clone()));
        }
        seen.push(&policy.kind_prefix);
    }
    Ok(())
}

fn parse_value<V: FromStr>(variable: &str, value: &str) -> Result<V, PolicyError> {
    value.trim().parse().map_err(|_| PolicyError::InvalidValue {
        variable: variable.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn defaults() -> CachePolicy {
        CachePolicy::new("notification", 3600, 300)
    }

    #[test]
    fn test_ttl_conversion() {
        let policy = defaults();
        assert_eq!(policy.entity_ttl(), Duration::from_secs(3600));
        assert_eq!(policy.collection_ttl(), Duration::from_secs(300));
    }

    #[test]
    fn test_keys_use_prefix() {
        let id = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").unwrap();
        let policy = defaults();

        assert_eq!(
            policy.entity_key(id),
            "notification:550e8400-e29b-41d4-a716-446655440000"
        );
        assert_eq!(policy.collection_key(), "notification:all");
    }

    #[test]
    fn test_validate_rejects_zero_ttl() {
        assert_eq!(
            CachePolicy::new("auth", 0, 60).validate(),
            Err(PolicyError::ZeroTtl("entity_ttl_seconds"))
        );
        assert_eq!(
            CachePolicy::new("auth", 60, 0).validate(),
            Err(PolicyError::ZeroTtl("collection_ttl_seconds"))
        );
    }

    #[test]
    fn test_validate_rejects_colliding_prefix() {
        assert_eq!(
            CachePolicy::new("auth:v2", 60, 60).validate(),
            Err(PolicyError::InvalidPrefix("auth:v2".to_string()))
        );
    }

    #[test]
    fn test_write_policy_parsing() {
        assert_eq!("invalidate".parse(), Ok(WritePolicy::Invalidate));
        assert_eq!("Write-Through".parse(), Ok(WritePolicy::WriteThrough));
        assert_eq!("write_through".parse(), Ok(WritePolicy::WriteThrough));
        assert!("sometimes".parse::<WritePolicy>().is_err());
        assert_eq!(WritePolicy::WriteThrough.to_string(), "write_through");
    }

    #[test]
    fn test_from_lookup_without_overrides_keeps_defaults() {
        let policy = CachePolicy::from_lookup("NOTIFICATION", defaults(), lookup_from(&[])).unwrap();
        assert_eq!(policy, defaults());
    }

    #[test]
    fn test_from_lookup_applies_overrides() {
        let lookup = lookup_from(&[
            ("NOTIFICATION_CACHE_PREFIX", "notif"),
            ("NOTIFICATION_CACHE_ENTITY_TTL_SECONDS", "120"),
            ("NOTIFICATION_CACHE_COLLECTION_TTL_SECONDS", " 30 "),
            ("NOTIFICATION_CACHE_COLLECTION_READS", "false"),
            ("NOTIFICATION_CACHE_WRITE_POLICY", "write_through"),
            ("AUTH_CACHE_ENTITY_TTL_SECONDS", "1"),
        ]);

        let policy = CachePolicy::from_lookup("NOTIFICATION", defaults(), lookup).unwrap();

        assert_eq!(policy.kind_prefix, "notif");
        assert_eq!(policy.entity_ttl_seconds, 120);
        assert_eq!(policy.collection_ttl_seconds, 30);
        assert!(!policy.cache_collection_reads);
        assert_eq!(policy.write_policy, WritePolicy::WriteThrough);
    }

    #[test]
    fn test_from_lookup_reports_bad_values() {
        let lookup = lookup_from(&[("AUTH_CACHE_ENTITY_TTL_SECONDS", "an hour")]);

        let result = CachePolicy::from_lookup("AUTH", CachePolicy::new("auth", 3600, 3600), lookup);

        assert_eq!(
            result,
            Err(PolicyError::InvalidValue {
                variable: "AUTH_CACHE_ENTITY_TTL_SECONDS".to_string(),
                value: "an hour".to_string(),
            })
        );
    }

    #[test]
    fn test_from_lookup_validates_result() {
        let lookup = lookup_from(&[("AUTH_CACHE_COLLECTION_TTL_SECONDS", "0")]);

        let result = CachePolicy::from_lookup("AUTH", CachePolicy::new("auth", 3600, 3600), lookup);

        assert_eq!(result, Err(PolicyError::ZeroTtl("collection_ttl_seconds")));
    }

    #[test]
    fn test_ensure_distinct_prefixes() {
        let auth = CachePolicy::new("auth", 60, 60);
        let notification = CachePolicy::new("notification", 60, 60);
        let clash = CachePolicy::new("auth", 300, 300);

        assert_eq!(ensure_distinct_prefixes([&auth, &notification]), Ok(()));
        assert_eq!(
            ensure_distinct_prefixes([&auth, &notification, &clash]),
            Err(PolicyError::DuplicatePrefix("auth".to_string()))
        );
    }
}
