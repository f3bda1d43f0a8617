mod error;
mod keys;
mod policy;
mod serialization;
mod stats;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{collection_key, entity_key, validate_prefix, COLLECTION_SCOPE};
pub use policy::{ensure_distinct_prefixes, CachePolicy, PolicyError, WritePolicy};
pub use serialization::{
    deserialize_record, deserialize_records, serialize_record, serialize_records,
    SerializationError,
};
pub use stats::{CacheStats, CacheStatsSnapshot};
pub use traits::KeyStore;
