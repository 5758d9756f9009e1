use crate::Chemistry;
use rust_decimal_macros::dec;

/// Lowercases a free-form tag and joins words with `_`.
///
/// Returns `None` when nothing is left after trimming.
pub fn normalize_tag(raw: &str) -> Option<String> {
    let tag = raw
        .trim()
        .to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_");

    if tag.is_empty() { None } else { Some(tag) }
}

/// Normalises every tag, dropping empties and duplicates while keeping the
/// first-seen order.
pub fn normalize_tags<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tags: Vec<String> = Vec::new();

    for tag in raw.into_iter().filter_map(|t| normalize_tag(t.as_ref())) {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }

    tags
}

/// Umami tags inferred from chemistry when an import carries none.
pub fn infer_umami_tags(chemistry: &Chemistry) -> Vec<String> {
    let aa = chemistry.umami_aa();
    let nuc = chemistry.umami_nuc();
    let synergy = chemistry.umami_synergy();

    let mut tags = Vec::new();

    if aa > nuc && aa > dec!(10) {
        tags.push("umami_aa".to_owned());
    } else if nuc > aa && nuc > dec!(10) {
        tags.push("umami_nuc".to_owned());
    }

    if synergy > dec!(50) {
        tags.push("high_synergy".to_owned());
    }

    if synergy > dec!(100) || aa > dec!(50) || nuc > dec!(50) {
        tags.push("umami_carrier".to_owned());
    }

    tags
}

const CARRIER_CATEGORIES: [&str; 3] = ["meat", "seafood", "seasonings and spices"];

/// Flavor role tag inferred from the food category.
pub fn infer_flavor_tags(category: Option<&str>) -> Vec<String> {
    let is_carrier = category
        .map(|c| c.trim().to_lowercase())
        .is_some_and(|c| CARRIER_CATEGORIES.contains(&c.as_str()));

    if is_carrier {
        vec!["flavor_carrier".to_owned()]
    } else {
        vec!["flavor_supporting".to_owned()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawChemistry;

    #[test]
    fn normalizes_tags() {
        assert_eq!(normalize_tag("  Gluten Free "), Some("gluten_free".to_owned()));
        assert_eq!(normalize_tag("Non-Vegetarian"), Some("non_vegetarian".to_owned()));
        assert_eq!(normalize_tag("   "), None);

        assert_eq!(
            normalize_tags(["Vegan", "vegan", "", "Tree nuts", "tree-nuts"]),
            vec!["vegan".to_owned(), "tree_nuts".to_owned()]
        );
    }

    #[test]
    fn infers_umami_tags_from_chemistry() {
        let kombu = Chemistry::from_raw(RawChemistry {
            glu: dec!(2240),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(
            infer_umami_tags(&kombu),
            vec!["umami_aa", "high_synergy", "umami_carrier"]
        );

        assert!(infer_umami_tags(&Chemistry::zero()).is_empty());
    }

    #[test]
    fn infers_flavor_role_from_category() {
        assert_eq!(infer_flavor_tags(Some("Seafood")), vec!["flavor_carrier"]);
        assert_eq!(infer_flavor_tags(Some("Vegetables")), vec!["flavor_supporting"]);
        assert_eq!(infer_flavor_tags(None), vec!["flavor_supporting"]);
    }
}
