use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use super::AppState;

/// GET /health - Liveness, the process answers
pub async fn health() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "umami",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

/// GET /ready - The catalog store answers queries
///
/// Reports the ingredient count and the text matching mode. An empty catalog
/// is ready; `seed` fills it.
pub async fn ready(State(state): State<AppState>) -> impl IntoResponse {
    match state.catalog.ingredient_count().await {
        Ok(ingredients) => (
            StatusCode::OK,
            Json(json!({
                "status": "ready",
                "catalog": {
                    "ingredients": ingredients,
                    "similarity": state.catalog.similarity_mode().as_ref(),
                },
            })),
        ),
        Err(err) => {
            tracing::error!(error = %err, "readiness check failed: catalog unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "not_ready",
                    "reason": "catalog_unavailable",
                    "retryable": err.is_retryable(),
                })),
            )
        }
    }
}
