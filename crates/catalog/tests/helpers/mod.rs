use std::{path::PathBuf, str::FromStr, sync::Arc};

use rust_decimal::Decimal;
use sqlx::{SqlitePool, sqlite::SqliteConnectOptions};
use sqlx_migrator::{Migrate, Plan};
use temp_dir::TempDir;
use umami_catalog::{
    BrowseParams, Catalog, IngredientStore, MemoryStore, Paging, SimilarityMode, SqliteStore,
};
use umami_shared::{Alias, Flags, NewIngredient, RawChemistry, Tcm};

pub async fn setup_test_pool(path: PathBuf) -> anyhow::Result<SqlitePool> {
    let opts = SqliteConnectOptions::from_str(&format!("sqlite:{}", path.to_str().unwrap()))?
        .create_if_missing(true);
    let pool = SqlitePool::connect_with(opts).await?;
    let mut conn = pool.acquire().await?;
    umami_db::migrator::<sqlx::Sqlite>()?
        .run(&mut *conn, &Plan::apply_all())
        .await?;

    Ok(pool)
}

#[allow(dead_code)]
pub async fn setup_sqlite_store(
    dir: &TempDir,
    mode: SimilarityMode,
) -> anyhow::Result<(SqlitePool, SqliteStore)> {
    let pool = setup_test_pool(dir.child("db.sqlite3")).await?;
    let store = SqliteStore::new(pool.clone(), pool.clone(), mode);

    Ok((pool, store))
}

/// The same catalog backed by memory and by SQLite.
#[allow(dead_code)]
pub struct Catalogs {
    _dir: TempDir,
    pub all: Vec<(&'static str, Catalog)>,
}

#[allow(dead_code)]
pub async fn setup_catalogs(mode: SimilarityMode) -> anyhow::Result<Catalogs> {
    setup_catalogs_with(mode, fixtures).await
}

#[allow(dead_code)]
pub async fn setup_catalogs_with(
    mode: SimilarityMode,
    fixtures: fn() -> Vec<NewIngredient>,
) -> anyhow::Result<Catalogs> {
    let dir = TempDir::new()?;
    let (_, sqlite) = setup_sqlite_store(&dir, mode).await?;
    let memory = MemoryStore::new(mode);

    let stores: Vec<(&'static str, Arc<dyn IngredientStore>)> =
        vec![("memory", Arc::new(memory)), ("sqlite", Arc::new(sqlite))];

    let mut all = Vec::new();
    for (name, store) in stores {
        for ingredient in fixtures() {
            store.upsert(ingredient).await?;
        }
        all.push((name, Catalog::new(store, Paging::default())));
    }

    Ok(Catalogs { _dir: dir, all })
}

#[allow(dead_code)]
pub fn params(pairs: &[(&str, &str)]) -> BrowseParams {
    BrowseParams::from_pairs(pairs.iter().copied())
}

#[allow(dead_code)]
pub fn ingredient(
    name: &str,
    category: &str,
    [glu, asp, imp, gmp, amp]: [i64; 5],
    dietary: &[&str],
    allergens: &[&str],
) -> NewIngredient {
    NewIngredient {
        base_name: name.to_owned(),
        category: Some(category.to_owned()),
        chemistry: RawChemistry::new(
            Decimal::from(glu),
            Decimal::from(asp),
            Decimal::from(imp),
            Decimal::from(gmp),
            Decimal::from(amp),
        ),
        flags: Some(Flags {
            dietary_restrictions: dietary.iter().map(|d| (*d).to_owned()).collect(),
            allergens: allergens.iter().map(|a| (*a).to_owned()).collect(),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[allow(dead_code)]
/// Synergy descending: shiitake, anchovy, bonito flakes, pork, beef, kombu,
/// parmesan, tomato, white rice.
pub fn fixtures() -> Vec<NewIngredient> {
    vec![
        NewIngredient {
            aliases: vec![Alias {
                name: "konbu".to_owned(),
                language: "ja".to_owned(),
            }],
            tcm: Some(Tcm {
                four_qi: vec!["Cold".to_owned()],
                five_flavors: vec!["Salty".to_owned()],
                meridians: vec!["Kidney".to_owned(), "Liver".to_owned()],
                overview: None,
                confidence: Decimal::ONE,
            }),
            ..ingredient("kombu", "Algae", [2240, 0, 0, 0, 0], &["vegan"], &[])
        },
        ingredient("parmesan", "Dairy", [1680, 0, 0, 0, 0], &["vegetarian"], &["milk"]),
        NewIngredient {
            display_name: Some("Dried Shiitake".to_owned()),
            tcm: Some(Tcm {
                four_qi: vec!["Neutral".to_owned()],
                five_flavors: vec!["Sweet".to_owned()],
                meridians: vec!["Stomach".to_owned()],
                overview: None,
                confidence: Decimal::ONE,
            }),
            ..ingredient("shiitake", "Mushrooms", [1060, 0, 0, 150, 0], &["vegan"], &[])
        },
        NewIngredient {
            display_name: Some("Tomato".to_owned()),
            ..ingredient("tomato", "Vegetables", [246, 0, 0, 0, 0], &["vegan"], &[])
        },
        ingredient("anchovy", "Seafood", [630, 0, 300, 0, 0], &["pescatarian"], &["fish"]),
        NewIngredient {
            aliases: vec![Alias {
                name: "Katsuobushi".to_owned(),
                language: "ja".to_owned(),
            }],
            ..ingredient("bonito flakes", "Seafood", [30, 0, 700, 0, 0], &["pescatarian"], &["fish"])
        },
        ingredient("beef", "Meat", [33, 0, 80, 0, 0], &[], &[]),
        ingredient("pork", "Meat", [23, 0, 200, 0, 0], &["gluten_free"], &[]),
        NewIngredient {
            display_name: Some("White Rice".to_owned()),
            ..ingredient("white rice", "Grains", [20, 0, 0, 0, 0], &["vegan"], &[])
        },
    ]
}
