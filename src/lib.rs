pub mod cli;
pub mod config;
pub mod db;
pub mod error;
pub mod observability;
pub mod routes;

use std::sync::Arc;

pub use config::Config;
pub use routes::AppState;

use umami_catalog::{Catalog, SqliteStore};
use umami_composition::Composer;

/// Build the application router on top of SQLite pools
///
/// Used by `serve` and by integration tests, which skip the tower layers.
pub fn create_app(
    config: &Config,
    read_pool: sqlx::SqlitePool,
    write_pool: sqlx::SqlitePool,
) -> axum::Router {
    let store = Arc::new(SqliteStore::new(
        read_pool,
        write_pool,
        config.catalog.similarity_mode(),
    ));

    let state = AppState {
        catalog: Catalog::new(store.clone(), config.catalog.paging()),
        composer: Composer::new(store, config.composition.lookup_timeout()),
    };

    routes::router(state)
}
