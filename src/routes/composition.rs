use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use umami_composition::{Composition, LineInput, parse_lines};

use crate::{error::AppError, routes::AppState};

/// POST /api/ingredients/compose_preview
///
/// Body: `[{"ingredient_id": 1, "quantity": 100, "unit": "g"}, ...]`
pub async fn preview(
    State(state): State<AppState>,
    body: Result<Json<Vec<LineInput>>, JsonRejection>,
) -> Result<Json<Composition>, AppError> {
    let Json(inputs) = body?;
    let lines = parse_lines(inputs)?;
    let composition = state.composer.compose(&lines).await?;

    Ok(Json(composition))
}
