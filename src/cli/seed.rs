use anyhow::Result;
use umami_catalog::{IngredientStore, SqliteStore};
use umami_shared::NewIngredient;

use crate::config::Config;

/// Seed the zero-umami reference ingredient, safe to run repeatedly
#[tracing::instrument(skip_all)]
pub async fn seed(config: &Config) -> Result<i64> {
    let pool = crate::db::create_pool(&config.database.url, 1).await?;
    let store = SqliteStore::new(pool.clone(), pool.clone(), config.catalog.similarity_mode());

    let id = store.upsert(NewIngredient::water()).await?;
    tracing::info!(id, "Seeded reference ingredient water");

    pool.close().await;

    Ok(id)
}
