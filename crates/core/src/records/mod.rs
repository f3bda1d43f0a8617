//! Entity kinds served by the reservas services.
//!
//! Each kind is a plain serde document implementing [`Document`]. Identity and
//! timestamps live in [`crate::storage::Record`], not in the documents.

mod auth;
mod error;
mod notification;
mod reservation;
mod validation;

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use auth::{AuthRecord, AuthRecordPatch};
pub use error::ValidationError;
pub use notification::{Notification, NotificationPatch, NotificationStatus};
pub use reservation::{Reservation, ReservationPatch, ReservationStatus};
pub use validation::{
    is_valid_email, is_valid_time, missing_fields, parse_document, parse_patch,
    require_non_blank,
};

/// A document kind that can be stored, cached and served over the API.
pub trait Document:
    Serialize + DeserializeOwned + Clone + fmt::Debug + PartialEq + Send + Sync + 'static
{
    /// Partial update for this kind. Every field is optional.
    type Patch: Serialize + DeserializeOwned + Clone + fmt::Debug + Default + Send + Sync + 'static;

    /// Storage collection name and default cache key prefix.
    const KIND: &'static str;

    /// Human readable type name used in error messages.
    const ENTITY_TYPE: &'static str;

    /// JSON fields that must be present and non-blank on create.
    const REQUIRED_FIELDS: &'static [&'static str];

    /// Applies every field set in `patch`, leaving the rest untouched.
    fn apply_patch(&mut self, patch: Self::Patch);

    /// Checks domain rules on a complete document.
    fn validate(&self) -> Result<(), ValidationError>;

    /// Checks domain rules on the fields a patch sets.
    fn validate_patch(patch: &Self::Patch) -> Result<(), ValidationError>;

    /// Trims fields that are stored trimmed.
    fn normalize(&mut self) {}

    /// `(field, value)` pairs that no two records of this kind may share.
    fn unique_keys(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}
