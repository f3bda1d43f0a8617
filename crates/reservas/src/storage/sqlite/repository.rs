//! SQLite record store implementation.
//!
//! Implements `RecordStore` from `reservas_core::storage` using SQLite.

use std::marker::PhantomData;

use async_trait::async_trait;
use tokio_rusqlite::Connection;
use uuid::Uuid;

use reservas_core::records::Document;
use reservas_core::storage::{Record, RecordStore, RepositoryError, Result};

use super::conversions::{body_to_json, format_datetime, now, row_to_record};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id, map_unique_key_error};
use super::schema;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// Helper to wrap serde_json errors for tokio_rusqlite closures.
fn wrap_json_err(e: serde_json::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Other(Box::new(e))
}

/// Claims every unique key of `data` for the record `id`.
///
/// Must run inside the transaction that writes the record, so a clash rolls
/// the whole write back.
fn claim_unique_keys<T: Document>(
    conn: &rusqlite::Connection,
    id: &str,
    data: &T,
) -> std::result::Result<(), tokio_rusqlite::Error> {
    for (field, value) in data.unique_keys() {
        conn.execute(
            schema::INSERT_UNIQUE_KEY,
            [T::KIND, field, value.as_str(), id],
        )
        .map_err(|e| map_unique_key_error(e, T::ENTITY_TYPE, field, &value))?;
    }
    Ok(())
}

/// SQLite-backed record store for one document kind.
///
/// Each `call` closure runs to completion on the connection's thread even if
/// the awaiting future is dropped, so an abandoned request never leaves a
/// half-written row.
pub struct SqliteRecordStore<T: Document> {
    conn: Connection,
    _kind: PhantomData<fn() -> T>,
}

impl<T: Document> SqliteRecordStore<T> {
    /// Creates a new store with a file-based database.
    ///
    /// The database file will be created if it doesn't exist.
    /// Schema tables are created automatically.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::from_connection(conn).await
    }

    /// Creates a new store with an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::from_connection(conn).await
    }

    /// Creates a store on an existing connection, so several kinds can share
    /// one database.
    pub async fn from_connection(conn: Connection) -> Result<Self> {
        Self::init_schema(&conn).await?;

        Ok(Self {
            conn,
            _kind: PhantomData,
        })
    }

    /// Initialize the database schema.
    async fn init_schema(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

#[async_trait]
impl<T: Document> RecordStore<T> for SqliteRecordStore<T> {
    async fn find_all(&self) -> Result<Vec<Record<T>>> {
        self.conn
            .call(|conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_RECORDS_BY_KIND)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([T::KIND], row_to_record::<T>)
                    .map_err(wrap_err)?;

                let mut records = Vec::new();
                for row_result in rows {
                    records.push(row_result.map_err(wrap_err)?);
                }
                Ok(records)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error(e, T::ENTITY_TYPE))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Record<T>>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_RECORD_BY_ID).map_err(wrap_err)?;
                match stmt.query_row([T::KIND, id_str.as_str()], row_to_record::<T>) {
                    Ok(record) => Ok(Some(record)),
                    Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                    Err(e) => Err(wrap_err(e)),
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, T::ENTITY_TYPE, id.to_string()))
    }

    async fn insert(&self, data: T) -> Result<Record<T>> {
        let record = Record::new(data, now());
        let body = body_to_json(&record.data)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        let id = record.id.to_string();
        let created_at = format_datetime(&record.created_at);
        let updated_at = format_datetime(&record.updated_at);

        let data = record.data.clone();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;
                tx.execute(
                    schema::INSERT_RECORD,
                    [
                        T::KIND,
                        id.as_str(),
                        body.as_str(),
                        created_at.as_str(),
                        updated_at.as_str(),
                    ],
                )
                .map_err(wrap_err)?;
                claim_unique_keys(&tx, &id, &data)?;
                tx.commit().map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, T::ENTITY_TYPE, record.id.to_string()))?;

        Ok(record)
    }

    async fn update_by_id(&self, id: Uuid, patch: T::Patch) -> Result<Option<Record<T>>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let current = {
                    let mut stmt = tx.prepare(schema::SELECT_RECORD_BY_ID).map_err(wrap_err)?;
                    match stmt.query_row([T::KIND, id_str.as_str()], row_to_record::<T>) {
                        Ok(record) => record,
                        Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                        Err(e) => return Err(wrap_err(e)),
                    }
                };

                let mut updated = current;
                updated.data.apply_patch(patch);
                updated.touch(now());
                let body = body_to_json(&updated.data).map_err(wrap_json_err)?;
                let updated_at = format_datetime(&updated.updated_at);

                tx.execute(
                    schema::UPDATE_RECORD,
                    [T::KIND, id_str.as_str(), body.as_str(), updated_at.as_str()],
                )
                .map_err(wrap_err)?;
                tx.execute(schema::DELETE_UNIQUE_KEYS, [T::KIND, id_str.as_str()])
                    .map_err(wrap_err)?;
                claim_unique_keys(&tx, &id_str, &updated.data)?;
                tx.commit().map_err(wrap_err)?;

                Ok(Some(updated))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, T::ENTITY_TYPE, id.to_string()))
    }

    async fn delete_by_id(&self, id: Uuid) -> Result<Option<Record<T>>> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let tx = conn.transaction().map_err(wrap_err)?;

                let existing = {
                    let mut stmt = tx.prepare(schema::SELECT_RECORD_BY_ID).map_err(wrap_err)?;
                    match stmt.query_row([T::KIND, id_str.as_str()], row_to_record::<T>) {
                        Ok(record) => record,
                        Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                        Err(e) => return Err(wrap_err(e)),
                    }
                };

                tx.execute(schema::DELETE_RECORD, [T::KIND, id_str.as_str()])
                    .map_err(wrap_err)?;
                tx.execute(schema::DELETE_UNIQUE_KEYS, [T::KIND, id_str.as_str()])
                    .map_err(wrap_err)?;
                tx.commit().map_err(wrap_err)?;

                Ok(Some(existing))
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, T::ENTITY_TYPE, id.to_string()))
    }
}
