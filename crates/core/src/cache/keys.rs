use uuid::Uuid;

/// Scope segment of the key that addresses a kind's full listing.
pub const COLLECTION_SCOPE: &str = "all";

/// Returns the cache key for a single record: `<prefix>:<id>`.
pub fn entity_key(prefix: &str, id: Uuid) -> String {
    format!("{}:{}", prefix, id)
}

/// Returns the cache key for the full listing of a kind: `<prefix>:all`.
///
/// Record IDs are UUIDs, so this can never equal an [`entity_key`].
pub fn collection_key(prefix: &str) -> String {
    format!("{}:{}", prefix, COLLECTION_SCOPE)
}

/// Checks that a prefix keeps the key spaces of different kinds disjoint.
///
/// A prefix must be non-empty and may not contain `:` or whitespace.
pub fn validate_prefix(prefix: &str) -> bool {
    !prefix.is_empty() && !prefix.contains(':') && !prefix.chars().any(char::is_whitespace)
}
