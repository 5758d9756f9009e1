use strum::VariantArray;

use crate::{
    BrowseParams, CompareOp, Dietary, FlavorRole, Metric, Predicate, Relevance, TagField,
    TextField,
    facet::{Bound, Range},
};

/// Name or category fragments marking a staple food.
pub const STAPLE_TERMS: [&str; 7] = ["rice", "bread", "noodle", "pasta", "flour", "wheat", "grain"];

const VEGAN: &str = "vegan";
const VEGETARIAN: &str = "vegetarian";
const PESCATARIAN: &str = "pescatarian";

/// Composes the browse predicate.
///
/// Facets are AND-ed together, values inside one facet are OR-ed, except
/// allergen exclusions which must all hold. With a text query, `relevance`
/// holds the ranker's matches; without it the query degrades to a literal
/// substring search over names and aliases.
pub fn build(params: &BrowseParams, relevance: Option<&Relevance>) -> Predicate {
    let mut clauses = Vec::new();

    if let Some(query) = params.text_query() {
        clauses.push(match relevance {
            Some(relevance) => relevance.predicate(),
            None => Predicate::text_contains(
                [TextField::BaseName, TextField::DisplayName, TextField::Alias],
                query,
            ),
        });
    }

    if !params.umami.is_empty() {
        clauses.push(Predicate::any(params.umami.iter().map(|m| high_umami_on(*m))));
    }

    if !params.flavor_roles.is_empty() {
        clauses.push(Predicate::any(params.flavor_roles.iter().map(flavor_role)));
    }

    for (field, values) in [
        (TagField::FourQi, &params.four_qi),
        (TagField::FiveFlavors, &params.five_flavors),
        (TagField::Meridians, &params.meridians),
        (TagField::Allergens, &params.allergens_include),
    ] {
        if !values.is_empty() {
            clauses.push(Predicate::any(
                values.iter().map(|v| Predicate::has_tag(field, v)),
            ));
        }
    }

    for allergen in &params.allergens_exclude {
        clauses.push(Predicate::has_tag(TagField::Allergens, allergen).negate());
    }

    if let Some(dietary) = dietary(&params.dietary) {
        clauses.push(dietary);
    }

    if !params.categories.is_empty() {
        clauses.push(Predicate::CategoryIn {
            categories: params.categories.clone(),
        });
    }

    clauses.extend(params.ranges.iter().map(range));

    Predicate::all(clauses)
}

fn high_umami_on(metric: Metric) -> Predicate {
    Predicate::compare(metric, CompareOp::Gte, metric.high_umami_threshold())
}

/// Tier-4 on any metric.
pub fn high_umami() -> Predicate {
    Predicate::any(Metric::VARIANTS.iter().map(|m| high_umami_on(*m)))
}

pub fn staple() -> Predicate {
    Predicate::any(STAPLE_TERMS.iter().map(|term| {
        Predicate::text_contains(
            [TextField::BaseName, TextField::DisplayName, TextField::Category],
            term,
        )
    }))
}

fn flavor_role(role: &FlavorRole) -> Predicate {
    match role {
        FlavorRole::HighUmami => high_umami(),
        FlavorRole::FlavorCarrier => Predicate::all([staple(), high_umami().negate()]),
        FlavorRole::FlavorSupporting => {
            Predicate::all([high_umami().negate(), staple().negate()])
        }
    }
}

fn diet(tag: &str) -> Predicate {
    Predicate::has_tag(TagField::DietaryRestrictions, tag)
}

/// Inclusive dietary matching: selecting a diet also admits every stricter one.
fn dietary(selected: &[Dietary]) -> Option<Predicate> {
    match selected {
        [] => None,
        // Non-vegetarian alone is a plain exclusion of the vegetarian diets.
        [Dietary::NonVegetarian] => Some(Predicate::all([
            diet(VEGAN).negate(),
            diet(VEGETARIAN).negate(),
        ])),
        _ => Some(Predicate::any(selected.iter().map(|d| match d {
            Dietary::Vegan => diet(VEGAN),
            Dietary::Vegetarian => Predicate::any([diet(VEGETARIAN), diet(VEGAN)]),
            Dietary::Pescatarian => {
                Predicate::any([diet(PESCATARIAN), diet(VEGETARIAN), diet(VEGAN)])
            }
            Dietary::NonVegetarian => Predicate::any([
                diet(PESCATARIAN),
                Predicate::all([
                    diet(VEGAN).negate(),
                    diet(VEGETARIAN).negate(),
                    diet(PESCATARIAN).negate(),
                    Predicate::NoTags {
                        field: TagField::DietaryRestrictions,
                    }
                    .negate(),
                ]),
            ]),
            Dietary::Tag(tag) => diet(tag),
        }))),
    }
}

fn range(range: &Range) -> Predicate {
    let op = match range.bound {
        Bound::Min => CompareOp::Gte,
        Bound::Max => CompareOp::Lte,
    };

    Predicate::compare(range.metric, op, range.value)
}
