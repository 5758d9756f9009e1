use axum::{
    Json,
    extract::{Path, Query, State, rejection::PathRejection},
};
use umami_catalog::{BrowsePage, BrowseParams, IngredientView};

use crate::{error::AppError, routes::AppState};

/// GET /api/ingredients
///
/// Repeated keys (`umami[]=a&umami[]=b`) are kept in order; malformed
/// values are ignored rather than rejected.
pub async fn browse(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<BrowsePage>, AppError> {
    let params = BrowseParams::from_pairs(pairs);
    let page = state.catalog.browse(&params).await?;

    Ok(Json(page))
}

/// GET /api/ingredients/{id}
pub async fn detail(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<IngredientView>, AppError> {
    let Path(id) = id?;
    let view = state.catalog.detail(id).await?;

    Ok(Json(view))
}
