use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use reservas_core::records::ValidationError;
use reservas_core::storage::{repository_error_to_status_code, RepositoryError};

/// Handler error that wraps `anyhow::Error`.
///
/// The response status is derived from the wrapped error: repository errors
/// go through `repository_error_to_status_code`, validation errors are 400 and
/// anything else is 500. Bodies are always `{"error": ...}` JSON.
pub struct AppError(pub anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let Some(validation_error) = self.0.downcast_ref::<ValidationError>() {
            return validation_response(validation_error);
        }

        let status_code = if let Some(repo_error) = self.0.downcast_ref::<RepositoryError>() {
            let code = repository_error_to_status_code(repo_error);
            StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };

        if status_code.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        }

        (status_code, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}

fn validation_response(err: &ValidationError) -> Response {
    let body = match err {
        ValidationError::MissingFields(fields) => json!({
            "error": "Incomplete data",
            "missingFields": fields,
        }),
        other => json!({
            "error": "Validation error",
            "details": other.to_string(),
        }),
    };
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
