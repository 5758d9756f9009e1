#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use rust_decimal::Decimal;
use serde_json::Value;
use temp_dir::TempDir;
use tower::ServiceExt;
use umami::config::{
    CatalogConfig, CompositionConfig, Config, DatabaseConfig, ObservabilityConfig, ServerConfig,
};
use umami_catalog::{IngredientStore, SqliteStore};
use umami_shared::{Flags, NewIngredient, RawChemistry};

pub struct TestApp {
    _dir: TempDir,
    pub config: Config,
    pub router: Router,
    pub ids: Vec<i64>,
}

pub fn test_config(dir: &TempDir) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
        },
        database: DatabaseConfig {
            url: format!("sqlite:{}", dir.child("umami.db").display()),
            max_connections: 2,
        },
        catalog: CatalogConfig::default(),
        composition: CompositionConfig::default(),
        observability: ObservabilityConfig::default(),
    }
}

fn ingredient(name: &str, category: &str, glu: i64, imp: i64, dietary: &[&str]) -> NewIngredient {
    NewIngredient {
        base_name: name.to_owned(),
        category: Some(category.to_owned()),
        chemistry: RawChemistry {
            glu: Decimal::from(glu),
            imp: Decimal::from(imp),
            ..Default::default()
        },
        flags: Some(Flags {
            dietary_restrictions: dietary.iter().map(|d| d.to_string()).collect(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Migrated on-disk catalog with kombu, bonito flakes and tomato seeded.
pub async fn setup_app() -> anyhow::Result<TestApp> {
    let dir = TempDir::new()?;
    let config = test_config(&dir);

    umami::cli::migrate(&config).await?;

    let pool = umami::db::create_pool(&config.database.url, 2).await?;
    let store = SqliteStore::new(pool.clone(), pool.clone(), config.catalog.similarity_mode());

    let mut ids = vec![];
    for new in [
        ingredient("kombu", "Algae", 2240, 0, &["vegan", "vegetarian"]),
        ingredient("bonito flakes", "Seafood", 30, 700, &["pescatarian"]),
        ingredient("tomato", "Vegetables", 246, 0, &["vegan", "vegetarian"]),
    ] {
        ids.push(store.upsert(new).await?);
    }

    let router = umami::create_app(&config, pool.clone(), pool);

    Ok(TestApp {
        _dir: dir,
        config,
        router,
        ids,
    })
}

impl TestApp {
    pub async fn get(&self, uri: &str) -> anyhow::Result<(StatusCode, Value)> {
        let request = Request::builder().uri(uri).body(Body::empty())?;

        send(self.router.clone(), request).await
    }

    pub async fn post(&self, uri: &str, body: &str) -> anyhow::Result<(StatusCode, Value)> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_owned()))?;

        send(self.router.clone(), request).await
    }
}

async fn send(router: Router, request: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let response = router.oneshot(request).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };

    Ok((status, json))
}
