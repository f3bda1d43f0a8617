//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `RepositoryError`
//! from `reservas_core::storage`.

use reservas_core::storage::RepositoryError;

/// Maps a rusqlite error to a RepositoryError.
///
/// # Error Mapping
///
/// - `SQLITE_CONSTRAINT_PRIMARYKEY` / `SQLITE_CONSTRAINT_UNIQUE` → `RepositoryError::AlreadyExists`
/// - Undecodable stored values → `RepositoryError::Serialization`
/// - Cannot open / busy / locked → `RepositoryError::ConnectionFailed`
/// - All other errors → `RepositoryError::QueryFailed`
fn map_rusqlite_error(err: &rusqlite::Error, entity_type: &'static str, id: &str) -> RepositoryError {
    match err {
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                || sqlite_err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            RepositoryError::AlreadyExists {
                entity_type,
                id: id.to_string(),
            }
        }

        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if matches!(
                sqlite_err.code,
                rusqlite::ErrorCode::CannotOpen
                    | rusqlite::ErrorCode::DatabaseBusy
                    | rusqlite::ErrorCode::DatabaseLocked
            ) =>
        {
            RepositoryError::ConnectionFailed(err.to_string())
        }

        rusqlite::Error::FromSqlConversionFailure(..) => {
            RepositoryError::Serialization(format!("Stored {entity_type} is unreadable: {err}"))
        }

        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

/// Maps a tokio_rusqlite error to a RepositoryError.
///
/// This is the main entry point for error mapping in async code. Errors
/// raised inside a `call` closure by `serde_json` are reported as
/// serialization failures.
pub fn map_tokio_rusqlite_error(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
) -> RepositoryError {
    map_tokio_rusqlite_error_with_id(err, entity_type, "unknown")
}

/// Maps a tokio_rusqlite error with a known ID to a RepositoryError.
///
/// Use this variant when the record ID is known at the call site.
pub fn map_tokio_rusqlite_error_with_id(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
    id: impl Into<String>,
) -> RepositoryError {
    let id_str = id.into();
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => {
            map_rusqlite_error(rusqlite_err, entity_type, &id_str)
        }
        tokio_rusqlite::Error::ConnectionClosed | tokio_rusqlite::Error::Close(_) => {
            RepositoryError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        tokio_rusqlite::Error::Other(inner) if inner.is::<serde_json::Error>() => {
            RepositoryError::Serialization(inner.to_string())
        }
        tokio_rusqlite::Error::Other(inner) => match inner.downcast_ref::<RepositoryError>() {
            Some(repo_err) => repo_err.clone(),
            None => RepositoryError::QueryFailed(err.to_string()),
        },
        _ => RepositoryError::QueryFailed(err.to_string()),
    }
}

/// Reports a unique key clash on `field`/`value` as `AlreadyExists` naming
/// that key. Any other failure is passed through unchanged.
pub fn map_unique_key_error(
    err: rusqlite::Error,
    entity_type: &'static str,
    field: &str,
    value: &str,
) -> tokio_rusqlite::Error {
    match map_rusqlite_error(&err, entity_type, &format!("{field} {value}")) {
        conflict @ RepositoryError::AlreadyExists { .. } => {
            tokio_rusqlite::Error::Other(Box::new(conflict))
        }
        _ => tokio_rusqlite::Error::Rusqlite(err),
    }
}
