use anyhow::Result;
use sqlx::{SqlitePool, migrate::MigrateDatabase, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use std::str::FromStr;

use crate::config::Config;

/// Create the database if needed and apply pending migrations
#[tracing::instrument(skip_all, fields(url = %config.database.url))]
pub async fn migrate(config: &Config) -> Result<()> {
    tracing::info!("Running database migrations...");

    let options = SqliteConnectOptions::from_str(&config.database.url)?.create_if_missing(true);
    let pool = SqlitePool::connect_with(options).await?;

    let mut conn = pool.acquire().await?;
    umami_db::migrator::<sqlx::Sqlite>()?
        .run(&mut *conn, &Plan::apply_all())
        .await?;
    drop(conn);

    pool.close().await;

    tracing::info!("Migrations completed successfully");

    Ok(())
}

/// Drop the database if it exists and recreate it with migrations
#[tracing::instrument(skip_all, fields(url = %config.database.url))]
pub async fn reset(config: &Config) -> Result<()> {
    if sqlx::Sqlite::database_exists(&config.database.url).await? {
        tracing::warn!("Dropping existing database: {}", config.database.url);
        sqlx::Sqlite::drop_database(&config.database.url).await?;
    } else {
        tracing::info!("Database does not exist, nothing to drop");
    }

    migrate(config).await?;

    tracing::info!("Database reset completed successfully");

    Ok(())
}
