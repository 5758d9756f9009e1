use std::{sync::Arc, time::Duration};

use futures::future::try_join_all;
use umami_catalog::IngredientStore;
use umami_shared::{Error, IngredientDetail, Result};

use crate::{Composition, Line, Portion, calculator};

/// Resolves composition lines against the catalog and aggregates them.
#[derive(Clone)]
pub struct Composer {
    store: Arc<dyn IngredientStore>,
    lookup_timeout: Duration,
}

impl Composer {
    pub fn new(store: Arc<dyn IngredientStore>, lookup_timeout: Duration) -> Self {
        Self {
            store,
            lookup_timeout,
        }
    }

    /// Lookups run concurrently; the first failing one fails the request.
    #[tracing::instrument(skip_all, fields(lines = lines.len()))]
    pub async fn compose(&self, lines: &[Line]) -> Result<Composition> {
        let details = try_join_all(lines.iter().map(|line| self.lookup(line.ingredient_id))).await?;

        let portions: Vec<Portion> = lines
            .iter()
            .zip(details)
            .map(|(line, detail)| Portion {
                id: detail.summary.id,
                name: detail.summary.name().to_owned(),
                quantity: line.quantity,
                unit: line.unit,
                chemistry: *detail.summary.chemistry.raw(),
            })
            .collect();

        let composition = calculator::compose(&portions)?;

        tracing::debug!(
            euc = %composition.total_synergy,
            zone = %composition.synergy_zone,
            "composition computed"
        );

        Ok(composition)
    }

    async fn lookup(&self, id: i64) -> Result<IngredientDetail> {
        match tokio::time::timeout(self.lookup_timeout, self.store.get(id)).await {
            Ok(detail) => detail,
            Err(_) => {
                tracing::warn!(id, timeout = ?self.lookup_timeout, "ingredient lookup timed out");
                Err(Error::unavailable(format!(
                    "lookup of ingredient {id} timed out"
                )))
            }
        }
    }
}
