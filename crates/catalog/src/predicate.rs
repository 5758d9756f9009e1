//! Store-agnostic boolean expression over ingredient records.
//!
//! The filter builder produces a [`Predicate`] and each store either evaluates it
//! directly ([`Predicate::matches`]) or renders it into its own query language.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};
use umami_shared::{Chemistry, IngredientDetail, IngredientSummary};

/// Cached chemistry value a clause can compare against.
#[derive(
    EnumString,
    Display,
    VariantArray,
    AsRefStr,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    UmamiAa,
    UmamiNuc,
    UmamiSynergy,
}

impl Metric {
    pub fn of(&self, chemistry: &Chemistry) -> Decimal {
        match self {
            Metric::UmamiAa => chemistry.umami_aa(),
            Metric::UmamiNuc => chemistry.umami_nuc(),
            Metric::UmamiSynergy => chemistry.umami_synergy(),
        }
    }

    /// Tier-4 cutoff, mg/100g. At or above it the ingredient counts as high umami.
    pub fn high_umami_threshold(&self) -> Decimal {
        match self {
            Metric::UmamiAa => dec!(740),
            Metric::UmamiNuc => dec!(650),
            Metric::UmamiSynergy => dec!(1900),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    Gt,
    Gte,
    Lte,
}

impl CompareOp {
    pub fn test(&self, left: Decimal, right: Decimal) -> bool {
        match self {
            CompareOp::Gt => left > right,
            CompareOp::Gte => left >= right,
            CompareOp::Lte => left <= right,
        }
    }
}

/// Tag set attached to an ingredient.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagField {
    Allergens,
    DietaryRestrictions,
    FourQi,
    FiveFlavors,
    Meridians,
}

impl TagField {
    pub fn tags<'a>(&self, ingredient: &'a IngredientSummary) -> &'a [String] {
        match self {
            TagField::Allergens => &ingredient.flags.allergens,
            TagField::DietaryRestrictions => &ingredient.flags.dietary_restrictions,
            TagField::FourQi => &ingredient.tcm.four_qi,
            TagField::FiveFlavors => &ingredient.tcm.five_flavors,
            TagField::Meridians => &ingredient.tcm.meridians,
        }
    }
}

/// Text searched by [`Predicate::TextContains`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextField {
    BaseName,
    DisplayName,
    Category,
    /// Any alias name.
    Alias,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    /// True when every clause holds; an empty list is true.
    And { all: Vec<Predicate> },
    /// True when at least one clause holds; an empty list is false.
    Or { any: Vec<Predicate> },
    Not { not: Box<Predicate> },
    Compare {
        metric: Metric,
        op: CompareOp,
        value: Decimal,
    },
    /// `metric > other` on the same record.
    Exceeds { metric: Metric, other: Metric },
    HasTag { field: TagField, tag: String },
    NoTags { field: TagField },
    CategoryIn { categories: Vec<String> },
    /// Case-insensitive substring match, `needle` is stored lowercased.
    TextContains {
        fields: Vec<TextField>,
        needle: String,
    },
    IdIn { ids: Vec<i64> },
}

impl Default for Predicate {
    fn default() -> Self {
        Self::always()
    }
}

impl Predicate {
    pub fn always() -> Self {
        Self::And { all: Vec::new() }
    }

    pub fn never() -> Self {
        Self::Or { any: Vec::new() }
    }

    /// Conjunction, flattening nested `And`s and unwrapping a single clause.
    pub fn all(clauses: impl IntoIterator<Item = Predicate>) -> Self {
        let mut all = Vec::new();
        for clause in clauses {
            match clause {
                Self::And { all: inner } => all.extend(inner),
                other => all.push(other),
            }
        }

        if all.len() == 1 {
            return all.remove(0);
        }

        Self::And { all }
    }

    /// Disjunction, flattening nested `Or`s and unwrapping a single clause.
    pub fn any(clauses: impl IntoIterator<Item = Predicate>) -> Self {
        let mut any = Vec::new();
        for clause in clauses {
            match clause {
                Self::Or { any: inner } => any.extend(inner),
                other => any.push(other),
            }
        }

        if any.len() == 1 {
            return any.remove(0);
        }

        Self::Or { any }
    }

    pub fn negate(self) -> Self {
        match self {
            Self::Not { not } => *not,
            other => Self::Not {
                not: Box::new(other),
            },
        }
    }

    pub fn compare(metric: Metric, op: CompareOp, value: Decimal) -> Self {
        Self::Compare { metric, op, value }
    }

    pub fn has_tag(field: TagField, tag: impl Into<String>) -> Self {
        Self::HasTag {
            field,
            tag: tag.into(),
        }
    }

    pub fn text_contains(fields: impl Into<Vec<TextField>>, needle: &str) -> Self {
        Self::TextContains {
            fields: fields.into(),
            needle: needle.to_lowercase(),
        }
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Self::And { all } if all.is_empty())
    }

    pub fn matches(&self, ingredient: &IngredientDetail) -> bool {
        let summary = &ingredient.summary;

        match self {
            Self::And { all } => all.iter().all(|p| p.matches(ingredient)),
            Self::Or { any } => any.iter().any(|p| p.matches(ingredient)),
            Self::Not { not } => !not.matches(ingredient),
            Self::Compare { metric, op, value } => {
                op.test(metric.of(&summary.chemistry), *value)
            }
            Self::Exceeds { metric, other } => {
                metric.of(&summary.chemistry) > other.of(&summary.chemistry)
            }
            Self::HasTag { field, tag } => field.tags(summary).iter().any(|t| t == tag),
            Self::NoTags { field } => field.tags(summary).is_empty(),
            Self::CategoryIn { categories } => summary
                .category
                .as_ref()
                .is_some_and(|c| categories.contains(c)),
            Self::TextContains { fields, needle } => fields.iter().any(|field| match field {
                TextField::BaseName => contains_ci(&summary.base_name, needle),
                TextField::DisplayName => summary
                    .display_name
                    .as_deref()
                    .is_some_and(|n| contains_ci(n, needle)),
                TextField::Category => summary
                    .category
                    .as_deref()
                    .is_some_and(|c| contains_ci(c, needle)),
                TextField::Alias => ingredient
                    .aliases
                    .iter()
                    .any(|a| contains_ci(&a.name, needle)),
            }),
            Self::IdIn { ids } => ids.contains(&summary.id),
        }
    }
}

fn contains_ci(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}
