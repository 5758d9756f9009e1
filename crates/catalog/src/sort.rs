use std::cmp::Ordering;

use serde::Serialize;
use strum::{AsRefStr, Display, EnumString, VariantArray};
use umami_shared::IngredientSummary;

use crate::{Metric, Relevance};

/// Sort directive requested by the client.
#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Serialize,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    Relevance,
    #[default]
    Synergy,
    Aa,
    Nuc,
    Alpha,
    /// Accepted for compatibility, ordered like `Synergy`.
    Tcm,
}

impl SortKey {
    /// Unknown keys fall back to the default.
    pub fn parse_lenient(raw: &str) -> Self {
        raw.trim().parse().unwrap_or_default()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Metric(Metric),
    /// Display name, base name when there is none. Case-insensitive.
    Name,
    Relevance,
    Id,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SortTerm {
    pub field: SortField,
    pub direction: Direction,
}

impl SortTerm {
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: Direction::Asc,
        }
    }

    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: Direction::Desc,
        }
    }
}

/// Lexicographic list of sort terms, always ending with the id so the order is
/// total.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SortOrder(Vec<SortTerm>);

impl Default for SortOrder {
    fn default() -> Self {
        Self::new(by_metric(Metric::UmamiSynergy))
    }
}

impl SortOrder {
    pub fn new(mut terms: Vec<SortTerm>) -> Self {
        if !terms.iter().any(|t| t.field == SortField::Id) {
            terms.push(SortTerm::asc(SortField::Id));
        }

        Self(terms)
    }

    pub fn terms(&self) -> &[SortTerm] {
        &self.0
    }

    pub fn uses_relevance(&self) -> bool {
        self.0.iter().any(|t| t.field == SortField::Relevance)
    }

    pub fn compare(
        &self,
        a: &IngredientSummary,
        b: &IngredientSummary,
        relevance: Option<&Relevance>,
    ) -> Ordering {
        for term in &self.0 {
            let ordering = match term.field {
                SortField::Metric(metric) => metric.of(&a.chemistry).cmp(&metric.of(&b.chemistry)),
                SortField::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
                SortField::Relevance => {
                    let score = |id| relevance.and_then(|r| r.score(id)).unwrap_or(0.0);
                    score(a.id).total_cmp(&score(b.id))
                }
                SortField::Id => a.id.cmp(&b.id),
            };

            let ordering = match term.direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            };

            if ordering != Ordering::Equal {
                return ordering;
            }
        }

        Ordering::Equal
    }
}

/// `metric` descending, then the usual secondary metric descending.
fn by_metric(metric: Metric) -> Vec<SortTerm> {
    let secondary = match metric {
        Metric::UmamiSynergy => Metric::UmamiAa,
        _ => Metric::UmamiSynergy,
    };

    vec![
        SortTerm::desc(SortField::Metric(metric)),
        SortTerm::desc(SortField::Metric(secondary)),
    ]
}

/// Picks the ordering for a browse request.
///
/// Active umami-level filters take precedence over the requested key: two or
/// more force synergy first, exactly one sorts by that metric. `relevance` only
/// applies when a text query produced scores.
pub fn resolve(umami_filters: &[Metric], requested: SortKey, has_relevance: bool) -> SortOrder {
    let terms = match umami_filters {
        [] => match requested {
            SortKey::Relevance if has_relevance => vec![
                SortTerm::desc(SortField::Relevance),
                SortTerm::desc(SortField::Metric(Metric::UmamiSynergy)),
            ],
            SortKey::Aa => by_metric(Metric::UmamiAa),
            SortKey::Nuc => by_metric(Metric::UmamiNuc),
            SortKey::Alpha => vec![SortTerm::asc(SortField::Name)],
            SortKey::Relevance | SortKey::Synergy | SortKey::Tcm => {
                by_metric(Metric::UmamiSynergy)
            }
        },
        [only] => by_metric(*only),
        _ => by_metric(Metric::UmamiSynergy),
    };

    SortOrder::new(terms)
}
