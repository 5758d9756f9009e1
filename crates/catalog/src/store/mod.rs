mod memory;
mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use serde::Deserialize;
use strum::{AsRefStr, Display, EnumString};
use umami_shared::{IngredientDetail, IngredientSummary, NewIngredient, Page, Result};

use crate::{NameEntry, Predicate, Relevance, SortOrder};

/// How text queries are matched against names.
#[derive(
    EnumString, Display, AsRefStr, Default, Clone, Copy, Debug, PartialEq, Eq, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMode {
    /// Trigram ranking plus literal substring hits.
    #[default]
    Trigram,
    /// Literal substring hits only, no relevance scores.
    SubstringOnly,
}

/// 1-based page of `size` rows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageRequest {
    pub number: u32,
    pub size: u32,
}

impl PageRequest {
    pub fn new(number: u32, size: u32) -> Self {
        Self {
            number: number.max(1),
            size: size.max(1),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.number - 1) * u64::from(self.size)
    }

    pub fn limit(&self) -> u64 {
        u64::from(self.size)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct StoreQuery {
    pub predicate: Predicate,
    pub order: SortOrder,
    /// Scores used by a relevance sort term.
    pub relevance: Option<Relevance>,
    pub page: PageRequest,
}

/// Read and write access to the ingredient catalog.
#[async_trait::async_trait]
pub trait IngredientStore: Send + Sync {
    /// Ingredient with its aliases, `NotFound` when the id is unknown.
    async fn get(&self, id: i64) -> Result<IngredientDetail>;

    /// Matches of `query.predicate` in `query.order`, one page of them.
    async fn find(&self, query: &StoreQuery) -> Result<Page<IngredientSummary>>;

    /// Number of stored ingredients.
    async fn count(&self) -> Result<u64>;

    /// Names and aliases of every ingredient, for text ranking.
    async fn name_entries(&self) -> Result<Vec<NameEntry>>;

    /// Replaces the whole record keyed by id, or by base name when no id is
    /// given, and returns its id.
    async fn upsert(&self, ingredient: NewIngredient) -> Result<i64>;

    /// Removes the ingredient and everything it owns.
    async fn delete(&self, id: i64) -> Result<()>;

    fn similarity_mode(&self) -> SimilarityMode;
}
