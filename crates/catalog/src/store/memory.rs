use std::collections::BTreeMap;

use tokio::sync::RwLock;
use umami_shared::{Error, IngredientDetail, IngredientSummary, NewIngredient, Page, Result};

use super::{IngredientStore, SimilarityMode, StoreQuery};
use crate::NameEntry;

/// Catalog held in memory, evaluating predicates directly.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<BTreeMap<i64, IngredientDetail>>,
    mode: SimilarityMode,
}

impl MemoryStore {
    pub fn new(mode: SimilarityMode) -> Self {
        Self {
            records: RwLock::default(),
            mode,
        }
    }

    pub async fn with_ingredients(
        mode: SimilarityMode,
        ingredients: impl IntoIterator<Item = NewIngredient>,
    ) -> Result<Self> {
        let store = Self::new(mode);
        for ingredient in ingredients {
            store.upsert(ingredient).await?;
        }

        Ok(store)
    }
}

#[async_trait::async_trait]
impl IngredientStore for MemoryStore {
    async fn get(&self, id: i64) -> Result<IngredientDetail> {
        self.records
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(Error::NotFound(id))
    }

    async fn find(&self, query: &StoreQuery) -> Result<Page<IngredientSummary>> {
        let records = self.records.read().await;

        let mut matches: Vec<&IngredientDetail> = records
            .values()
            .filter(|detail| query.predicate.matches(detail))
            .collect();

        matches.sort_by(|a, b| {
            query
                .order
                .compare(&a.summary, &b.summary, query.relevance.as_ref())
        });

        let count = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(query.page.offset() as usize)
            .take(query.page.limit() as usize)
            .map(|detail| detail.summary.clone())
            .collect();

        Ok(Page { count, items })
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.records.read().await.len() as u64)
    }

    async fn name_entries(&self) -> Result<Vec<NameEntry>> {
        Ok(self
            .records
            .read()
            .await
            .values()
            .map(|detail| NameEntry {
                id: detail.summary.id,
                base_name: detail.summary.base_name.clone(),
                display_name: detail.summary.display_name.clone(),
                aliases: detail.aliases.iter().map(|a| a.name.clone()).collect(),
            })
            .collect())
    }

    async fn upsert(&self, ingredient: NewIngredient) -> Result<i64> {
        let mut records = self.records.write().await;

        let base_name = ingredient.base_name.trim().to_owned();
        let owner = records
            .values()
            .find(|d| d.summary.base_name == base_name)
            .map(|d| d.summary.id);

        let id = match (ingredient.id, owner) {
            (Some(id), Some(owner)) if id != owner => {
                return Err(Error::invalid(
                    "base_name",
                    format!("already used by ingredient {owner}"),
                ));
            }
            (Some(id), _) => id,
            (None, Some(owner)) => owner,
            (None, None) => records.keys().next_back().map_or(1, |last| last + 1),
        };

        let detail = ingredient.into_detail(id)?;
        records.insert(id, detail);

        Ok(id)
    }

    async fn delete(&self, id: i64) -> Result<()> {
        self.records
            .write()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::NotFound(id))
    }

    fn similarity_mode(&self) -> SimilarityMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use umami_shared::RawChemistry;

    use super::*;
    use crate::{PageRequest, Predicate, SortKey, sort};

    fn named(name: &str, glu: rust_decimal::Decimal) -> NewIngredient {
        NewIngredient {
            base_name: name.to_owned(),
            chemistry: RawChemistry {
                glu,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn upsert_replaces_by_base_name() {
        let store = MemoryStore::default();

        let first = store.upsert(named("tomato", dec!(246))).await.unwrap();
        let again = store.upsert(named("tomato", dec!(300))).await.unwrap();
        let other = store.upsert(named("kombu", dec!(2240))).await.unwrap();

        assert_eq!(first, again);
        assert_ne!(first, other);
        assert_eq!(
            store.get(first).await.unwrap().summary.chemistry.umami_aa(),
            dec!(300)
        );
    }

    #[tokio::test]
    async fn find_orders_and_paginates() {
        let store = MemoryStore::with_ingredients(
            SimilarityMode::Trigram,
            [
                named("tomato", dec!(246)),
                named("kombu", dec!(2240)),
                named("parmesan", dec!(1680)),
            ],
        )
        .await
        .unwrap();

        let page = store
            .find(&StoreQuery {
                predicate: Predicate::always(),
                order: sort::resolve(&[], SortKey::Synergy, false),
                relevance: None,
                page: PageRequest::new(1, 2),
            })
            .await
            .unwrap();

        assert_eq!(page.count, 3);
        assert_eq!(store.count().await.unwrap(), 3);
        let names: Vec<_> = page.items.iter().map(|i| i.base_name.as_str()).collect();
        assert_eq!(names, vec!["kombu", "parmesan"]);
    }

    #[tokio::test]
    async fn delete_unknown_is_not_found() {
        let store = MemoryStore::default();
        assert_eq!(store.delete(9).await.unwrap_err(), Error::NotFound(9));
        assert_eq!(store.get(9).await.unwrap_err(), Error::NotFound(9));
    }
}
