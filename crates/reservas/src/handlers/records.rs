//! CRUD handlers shared by every document kind.
//!
//! Each handler is generic over the kind and extracts that kind's
//! [`EntityService`] as its state, so one set of functions serves
//! `/api/auths`, `/api/notifications` and `/api/reservations`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;
use uuid::Uuid;

use reservas_core::records::{parse_document, parse_patch, Document};
use reservas_core::storage::{Record, RepositoryError};

use crate::handlers::AppError;
use crate::services::EntityService;

/// Routes for one kind, to be nested under its collection path.
pub fn routes<T, S>(service: EntityService<T>) -> Router<S>
where
    T: Document,
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(list_records::<T>).post(create_record::<T>))
        .route(
            "/{id}",
            get(get_record::<T>)
                .put(update_record::<T>)
                .delete(delete_record::<T>),
        )
        .with_state(service)
}

fn not_found<T: Document>(id: Uuid) -> AppError {
    AppError::from(RepositoryError::NotFound {
        entity_type: T::ENTITY_TYPE,
        id: id.to_string(),
    })
}

/// List all records (GET /api/<kind>).
pub async fn list_records<T: Document>(
    State(service): State<EntityService<T>>,
) -> Result<Json<Vec<Record<T>>>, AppError> {
    Ok(Json(service.find_all().await?))
}

/// Get a single record by ID (GET /api/<kind>/{id}).
pub async fn get_record<T: Document>(
    State(service): State<EntityService<T>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Record<T>>, AppError> {
    service
        .find_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| not_found::<T>(id))
}

/// Create a new record (POST /api/<kind>).
pub async fn create_record<T: Document>(
    State(service): State<EntityService<T>>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Record<T>>), AppError> {
    let document = parse_document::<T>(payload)?;
    let record = service.create(document).await?;

    tracing::info!(kind = T::KIND, id = %record.id, "Created record");

    Ok((StatusCode::CREATED, Json(record)))
}

/// Update a record by ID (PUT /api/<kind>/{id}).
pub async fn update_record<T: Document>(
    State(service): State<EntityService<T>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<Value>,
) -> Result<Json<Record<T>>, AppError> {
    let patch = parse_patch::<T>(payload)?;
    let record = service
        .update(id, patch)
        .await?
        .ok_or_else(|| not_found::<T>(id))?;

    tracing::info!(kind = T::KIND, %id, "Updated record");

    Ok(Json(record))
}

/// Delete a record by ID (DELETE /api/<kind>/{id}).
///
/// Responds with the record as it was before deletion.
pub async fn delete_record<T: Document>(
    State(service): State<EntityService<T>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Record<T>>, AppError> {
    let record = service
        .delete(id)
        .await?
        .ok_or_else(|| not_found::<T>(id))?;

    tracing::info!(kind = T::KIND, %id, "Deleted record");

    Ok(Json(record))
}
