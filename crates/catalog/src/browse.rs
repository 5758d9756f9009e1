use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use umami_shared::{IngredientDetail, IngredientSummary, Result};

use crate::{
    BrowseParams, CompareOp, IngredientStore, Metric, PageRequest, Predicate, SimilarityMode,
    SortKey, StoreQuery, filter, similarity, sort,
};

const RELATED_LIMIT: u32 = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Paging {
    pub default_size: u32,
    pub max_size: u32,
}

impl Default for Paging {
    fn default() -> Self {
        Self {
            default_size: 24,
            max_size: 100,
        }
    }
}

impl Paging {
    /// Missing or zero sizes fall back to the default, oversized ones are
    /// capped.
    pub fn request(&self, page: Option<u32>, size: Option<u32>) -> PageRequest {
        let size = size
            .filter(|s| *s > 0)
            .unwrap_or(self.default_size)
            .min(self.max_size);

        PageRequest::new(page.unwrap_or(1), size)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BrowsePage {
    pub count: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u64,
    pub results: Vec<IngredientSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct IngredientView {
    #[serde(flatten)]
    pub detail: IngredientDetail,
    pub similar: Vec<IngredientSummary>,
    pub complementary: Vec<IngredientSummary>,
}

/// Read side of the ingredient catalog.
#[derive(Clone)]
pub struct Catalog {
    store: Arc<dyn IngredientStore>,
    paging: Paging,
}

impl Catalog {
    pub fn new(store: Arc<dyn IngredientStore>, paging: Paging) -> Self {
        Self { store, paging }
    }

    pub async fn ingredient_count(&self) -> Result<u64> {
        self.store.count().await
    }

    pub fn similarity_mode(&self) -> SimilarityMode {
        self.store.similarity_mode()
    }

    #[tracing::instrument(skip_all, fields(q = params.text_query(), sort = %params.sort))]
    pub async fn browse(&self, params: &BrowseParams) -> Result<BrowsePage> {
        let relevance = match (params.text_query(), self.store.similarity_mode()) {
            (Some(query), SimilarityMode::Trigram) => {
                let entries = self.store.name_entries().await?;
                Some(similarity::rank(query, &entries))
            }
            _ => None,
        };

        let predicate = filter::build(params, relevance.as_ref());
        let order = sort::resolve(&params.umami, params.sort, relevance.is_some());
        let page = self.paging.request(params.page, params.page_size);

        let found = self
            .store
            .find(&StoreQuery {
                predicate,
                order,
                relevance,
                page,
            })
            .await?;

        tracing::debug!(count = found.count, "browse");

        Ok(BrowsePage {
            count: found.count,
            page: page.number,
            page_size: page.size,
            total_pages: found.count.div_ceil(page.limit()),
            results: found.items,
        })
    }

    /// The ingredient with its aliases, same-category neighbours and the
    /// ingredients that balance its umami profile.
    #[tracing::instrument(skip(self))]
    pub async fn detail(&self, id: i64) -> Result<IngredientView> {
        let detail = self.store.get(id).await?;
        let not_self = Predicate::IdIn { ids: vec![id] }.negate();

        let similar = match &detail.summary.category {
            Some(category) => {
                self.related(
                    Predicate::all([
                        Predicate::CategoryIn {
                            categories: vec![category.clone()],
                        },
                        not_self.clone(),
                    ]),
                    SortKey::Synergy,
                )
                .await?
            }
            None => Vec::new(),
        };

        let chemistry = &detail.summary.chemistry;
        let (lead, other, key) = if chemistry.umami_aa() > chemistry.umami_nuc() {
            (Metric::UmamiNuc, Metric::UmamiAa, SortKey::Nuc)
        } else {
            (Metric::UmamiAa, Metric::UmamiNuc, SortKey::Aa)
        };

        let complementary = self
            .related(
                Predicate::all([
                    Predicate::Exceeds {
                        metric: lead,
                        other,
                    },
                    Predicate::compare(lead, CompareOp::Gt, Decimal::ZERO),
                    not_self,
                ]),
                key,
            )
            .await?;

        Ok(IngredientView {
            detail,
            similar,
            complementary,
        })
    }

    async fn related(&self, predicate: Predicate, key: SortKey) -> Result<Vec<IngredientSummary>> {
        let found = self
            .store
            .find(&StoreQuery {
                predicate,
                order: sort::resolve(&[], key, false),
                relevance: None,
                page: PageRequest::new(1, RELATED_LIMIT),
            })
            .await?;

        Ok(found.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paging_falls_back_and_caps() {
        let paging = Paging::default();

        assert_eq!(paging.request(None, None), PageRequest::new(1, 24));
        assert_eq!(paging.request(Some(0), Some(0)), PageRequest::new(1, 24));
        assert_eq!(paging.request(Some(3), Some(500)), PageRequest::new(3, 100));
    }
}
