use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] umami_shared::Error),

    #[error("Invalid request body: {0}")]
    Body(#[from] JsonRejection),

    #[error("Invalid path: {0}")]
    Path(#[from] PathRejection),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = self.to_string();

        let (status, body) = match self {
            AppError::Domain(umami_shared::Error::InvalidInput { field, reason }) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "invalid_input", "field": field, "message": reason}),
            ),
            AppError::Domain(umami_shared::Error::NotFound(id)) => (
                StatusCode::NOT_FOUND,
                json!({"error": "not_found", "id": id, "message": message}),
            ),
            AppError::Domain(umami_shared::Error::Unavailable(_)) => {
                tracing::error!("{message}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({"error": "unavailable", "message": message, "retryable": true}),
                )
            }
            AppError::Body(_) | AppError::Path(_) => (
                StatusCode::BAD_REQUEST,
                json!({"error": "bad_request", "message": message}),
            ),
        };

        (status, Json(body)).into_response()
    }
}
