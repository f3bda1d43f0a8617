//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and records. These are
//! testable in isolation without database access.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use uuid::Uuid;

use reservas_core::records::Document;
use reservas_core::storage::Record;

/// Convert a SQLite row to a record.
///
/// Expected columns: id, body, created_at, updated_at
pub fn row_to_record<T: Document>(row: &Row) -> rusqlite::Result<Record<T>> {
    let id: String = row.get(0)?;
    let body: String = row.get(1)?;
    let created_at: String = row.get(2)?;
    let updated_at: String = row.get(3)?;

    Ok(Record {
        id: parse_uuid(&id)?,
        data: parse_body(&body)?,
        created_at: parse_datetime(&created_at)?,
        updated_at: parse_datetime(&updated_at)?,
    })
}

/// Serialize a document body for storage.
pub fn body_to_json<T: Document>(data: &T) -> serde_json::Result<String> {
    serde_json::to_string(data)
}

/// Parse a stored document body.
pub fn parse_body<T: Document>(body: &str) -> rusqlite::Result<T> {
    serde_json::from_str(body)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))
}

/// Current time at the precision stored in SQLite.
///
/// Records returned from writes must compare equal to the same records read
/// back, so sub-microsecond digits are dropped up front.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Format a datetime for SQLite storage.
///
/// The width is fixed so that text ordering matches chronological ordering.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(e)))
}
