//! Pure validation helpers shared by the entity kinds and the HTTP layer.

use chrono::NaiveTime;
use serde_json::Value;

use super::{Document, ValidationError};

/// Returns the required fields that are absent, `null` or blank strings.
///
/// Numbers and booleans are never considered missing; range checks belong to
/// [`Document::validate`].
pub fn missing_fields<'a>(payload: &Value, required: &[&'a str]) -> Vec<&'a str> {
    required
        .iter()
        .copied()
        .filter(|field| match payload.get(*field) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        })
        .collect()
}

/// Fails with [`ValidationError::BlankField`] if `value` is empty after trimming.
pub fn require_non_blank(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(())
}

/// Minimal structural email check: `local@domain`, no whitespace.
pub fn is_valid_email(email: &str) -> bool {
    let email = email.trim();
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// Accepts `HH:MM` or `HH:MM:SS`.
pub fn is_valid_time(time: &str) -> bool {
    let time = time.trim();
    NaiveTime::parse_from_str(time, "%H:%M").is_ok()
        || NaiveTime::parse_from_str(time, "%H:%M:%S").is_ok()
}

/// Parses and validates a create payload for `T`.
///
/// Field presence is checked on the raw JSON first so that every missing field
/// is reported at once, then the payload is deserialized, normalized and
/// validated.
pub fn parse_document<T: Document>(payload: Value) -> Result<T, ValidationError> {
    let missing = missing_fields(&payload, T::REQUIRED_FIELDS);
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(
            missing.into_iter().map(String::from).collect(),
        ));
    }

    let mut document: T =
        serde_json::from_value(payload).map_err(|e| ValidationError::Malformed(e.to_string()))?;
    document.normalize();
    document.validate()?;
    Ok(document)
}

/// Parses and validates an update payload for `T`.
pub fn parse_patch<T: Document>(payload: Value) -> Result<T::Patch, ValidationError> {
    let patch: T::Patch =
        serde_json::from_value(payload).map_err(|e| ValidationError::Malformed(e.to_string()))?;
    T::validate_patch(&patch)?;
    Ok(patch)
}
