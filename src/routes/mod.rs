use axum::{
    Router,
    routing::{get, post},
};
use umami_catalog::Catalog;
use umami_composition::Composer;

mod composition;
mod health;
mod ingredients;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Catalog,
    pub composer: Composer,
}

pub fn router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/api/ingredients", get(ingredients::browse))
        .route("/api/ingredients/{id}", get(ingredients::detail))
        .route(
            "/api/ingredients/compose_preview",
            post(composition::preview),
        )
        .with_state(app_state)
}
