//! Typed browse parameters.
//!
//! Every `(name, value)` pair of a query string is turned into at most one
//! [`Facet`]. Unknown names, unknown enumerated values, blank values and
//! malformed numbers are dropped, never reported.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use strum::{AsRefStr, Display, EnumString, VariantArray};
use umami_shared::tag::normalize_tag;

use crate::{Metric, SortKey};

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
    Serialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FlavorRole {
    /// Tier-4 on any metric.
    HighUmami,
    /// Staple food that is not high umami.
    FlavorCarrier,
    /// Neither high umami nor a staple.
    FlavorSupporting,
}

/// Dietary selection, matched inclusively.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Dietary {
    Vegan,
    Vegetarian,
    Pescatarian,
    NonVegetarian,
    /// Any other tag, matched by exact membership.
    Tag(String),
}

impl Dietary {
    pub fn parse(raw: &str) -> Option<Self> {
        let tag = normalize_tag(raw)?;

        Some(match tag.as_str() {
            "vegan" => Self::Vegan,
            "vegetarian" => Self::Vegetarian,
            "pescatarian" => Self::Pescatarian,
            "non_vegetarian" => Self::NonVegetarian,
            _ => Self::Tag(tag),
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Bound {
    Min,
    Max,
}

/// Inclusive bound on a cached chemistry value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Range {
    pub metric: Metric,
    pub bound: Bound,
    pub value: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Facet {
    Query(String),
    Sort(SortKey),
    Umami(Metric),
    FlavorRole(FlavorRole),
    FourQi(String),
    FiveFlavor(String),
    Meridian(String),
    AllergenInclude(String),
    AllergenExclude(String),
    Dietary(Dietary),
    Category(String),
    Range(Range),
    Page(u32),
    PageSize(u32),
}

impl Facet {
    /// Parses one query parameter. Names are accepted with or without a
    /// trailing `[]`.
    pub fn parse(name: &str, value: &str) -> Option<Self> {
        let name = name.trim();
        let name = name.strip_suffix("[]").unwrap_or(name);
        let value = value.trim();

        // `q` may be blank: a later blank query clears an earlier one.
        if name == "q" {
            return Some(Self::Query(value.to_owned()));
        }

        if value.is_empty() {
            return None;
        }

        let facet = match name {
            "sort" => Self::Sort(SortKey::parse_lenient(value)),
            "umami" => Self::Umami(Metric::from_str(value).ok()?),
            "flavor" => Self::FlavorRole(FlavorRole::from_str(value).ok()?),
            "qi" => Self::FourQi(value.to_owned()),
            "flavors" => Self::FiveFlavor(value.to_owned()),
            "meridians" => Self::Meridian(value.to_owned()),
            "allergens_include" => Self::AllergenInclude(normalize_tag(value)?),
            "allergens_exclude" => Self::AllergenExclude(normalize_tag(value)?),
            "dietary" => Self::Dietary(Dietary::parse(value)?),
            "category" => Self::Category(value.to_owned()),
            "aa_min" => range(Metric::UmamiAa, Bound::Min, value)?,
            "aa_max" => range(Metric::UmamiAa, Bound::Max, value)?,
            "nuc_min" => range(Metric::UmamiNuc, Bound::Min, value)?,
            "nuc_max" => range(Metric::UmamiNuc, Bound::Max, value)?,
            "syn_min" => range(Metric::UmamiSynergy, Bound::Min, value)?,
            "syn_max" => range(Metric::UmamiSynergy, Bound::Max, value)?,
            "page" => Self::Page(value.parse().ok()?),
            "page_size" => Self::PageSize(value.parse().ok()?),
            _ => return None,
        };

        Some(facet)
    }
}

fn range(metric: Metric, bound: Bound, value: &str) -> Option<Facet> {
    let value = Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .ok()?;

    Some(Facet::Range(Range {
        metric,
        bound,
        value,
    }))
}

/// All facets of one browse request, grouped.
///
/// Multi-valued facets keep first-seen order without duplicates. For `q`,
/// `sort`, `page` and `page_size` the last value wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BrowseParams {
    pub query: Option<String>,
    pub sort: SortKey,
    pub umami: Vec<Metric>,
    pub flavor_roles: Vec<FlavorRole>,
    pub four_qi: Vec<String>,
    pub five_flavors: Vec<String>,
    pub meridians: Vec<String>,
    pub allergens_include: Vec<String>,
    pub allergens_exclude: Vec<String>,
    pub dietary: Vec<Dietary>,
    pub categories: Vec<String>,
    pub ranges: Vec<Range>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl BrowseParams {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        pairs
            .into_iter()
            .filter_map(|(k, v)| Facet::parse(k.as_ref(), v.as_ref()))
            .fold(Self::default(), |mut params, facet| {
                params.push(facet);
                params
            })
    }

    pub fn push(&mut self, facet: Facet) {
        match facet {
            Facet::Query(q) => self.query = Some(q).filter(|q| !q.is_empty()),
            Facet::Sort(sort) => self.sort = sort,
            Facet::Umami(metric) => push_unique(&mut self.umami, metric),
            Facet::FlavorRole(role) => push_unique(&mut self.flavor_roles, role),
            Facet::FourQi(v) => push_unique(&mut self.four_qi, v),
            Facet::FiveFlavor(v) => push_unique(&mut self.five_flavors, v),
            Facet::Meridian(v) => push_unique(&mut self.meridians, v),
            Facet::AllergenInclude(v) => push_unique(&mut self.allergens_include, v),
            Facet::AllergenExclude(v) => push_unique(&mut self.allergens_exclude, v),
            Facet::Dietary(v) => push_unique(&mut self.dietary, v),
            Facet::Category(v) => push_unique(&mut self.categories, v),
            Facet::Range(range) => self.ranges.push(range),
            Facet::Page(page) => self.page = Some(page),
            Facet::PageSize(size) => self.page_size = Some(size),
        }
    }

    /// The trimmed text query, if any.
    pub fn text_query(&self) -> Option<&str> {
        self.query.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }
}

fn push_unique<T: PartialEq>(values: &mut Vec<T>, value: T) {
    if !values.contains(&value) {
        values.push(value);
    }
}
