//! Trigram name matching.
//!
//! Trigrams follow the usual `pg_trgm` construction: text is lowercased and
//! split into alphanumeric words, each word is padded with two leading spaces
//! and one trailing space, and every 3-character window becomes a trigram.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::Predicate;

/// Combined name similarity at or below this is not a match on its own.
pub const MIN_SIMILARITY: f64 = 0.05;

const NAME_WEIGHT: f64 = 0.9;
const BASE_NAME_WEIGHT: f64 = 0.1;

pub fn trigrams(text: &str) -> BTreeSet<String> {
    let mut grams = BTreeSet::new();

    for word in text
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
    {
        let padded: Vec<char> = format!("  {word} ").chars().collect();
        for window in padded.windows(3) {
            grams.insert(window.iter().collect::<String>());
        }
    }

    grams
}

/// Jaccard index of the two trigram sets, 0.0 when either side has none.
pub fn similarity(left: &str, right: &str) -> f64 {
    let left = trigrams(left);
    let right = trigrams(right);

    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let shared = left.intersection(&right).count();
    let union = left.len() + right.len() - shared;

    shared as f64 / union as f64
}

/// Names of one ingredient, as matched by the ranker.
#[derive(Debug, Clone, PartialEq)]
pub struct NameEntry {
    pub id: i64,
    pub base_name: String,
    pub display_name: Option<String>,
    pub aliases: Vec<String>,
}

/// Ingredients matching a text query, with their relevance score.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Relevance {
    scores: HashMap<i64, f64>,
}

impl Relevance {
    pub fn score(&self, id: i64) -> Option<f64> {
        self.scores.get(&id).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    /// Restricts a query to the matched ingredients.
    pub fn predicate(&self) -> Predicate {
        let mut ids: Vec<i64> = self.scores.keys().copied().collect();
        ids.sort_unstable();

        Predicate::IdIn { ids }
    }
}

impl FromIterator<(i64, f64)> for Relevance {
    fn from_iter<T: IntoIterator<Item = (i64, f64)>>(iter: T) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

/// Scores `entries` against `query`.
///
/// `score = (sim_base + sim_display) * 0.9 + sim_base * 0.1`. An entry is kept
/// when the summed similarity exceeds [`MIN_SIMILARITY`] or when the query is a
/// literal, case-insensitive substring of its base name, display name or any
/// alias. A blank query matches nothing.
pub fn rank(query: &str, entries: &[NameEntry]) -> Relevance {
    let query = query.trim();
    if query.is_empty() {
        return Relevance::default();
    }

    let needle = query.to_lowercase();

    entries
        .iter()
        .filter_map(|entry| {
            let sim_base = similarity(&entry.base_name, query);
            let sim_display = entry
                .display_name
                .as_deref()
                .map(|name| similarity(name, query))
                .unwrap_or(0.0);
            let sim_name = sim_base + sim_display;

            let literal = entry.base_name.to_lowercase().contains(&needle)
                || entry
                    .display_name
                    .as_deref()
                    .is_some_and(|n| n.to_lowercase().contains(&needle))
                || entry
                    .aliases
                    .iter()
                    .any(|a| a.to_lowercase().contains(&needle));

            if sim_name > MIN_SIMILARITY || literal {
                Some((
                    entry.id,
                    sim_name * NAME_WEIGHT + sim_base * BASE_NAME_WEIGHT,
                ))
            } else {
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: i64, base: &str, display: Option<&str>, aliases: &[&str]) -> NameEntry {
        NameEntry {
            id,
            base_name: base.to_owned(),
            display_name: display.map(str::to_owned),
            aliases: aliases.iter().map(|a| (*a).to_owned()).collect(),
        }
    }

    #[test]
    fn builds_padded_trigrams() {
        let grams = trigrams("Cat");
        let expected: BTreeSet<String> = ["  c", " ca", "cat", "at "]
            .into_iter()
            .map(str::to_owned)
            .collect();
        assert_eq!(grams, expected);

        assert!(trigrams("  -- ").is_empty());
    }

    #[test]
    fn identical_words_are_fully_similar() {
        assert_eq!(similarity("tomato", "Tomato"), 1.0);
        assert_eq!(similarity("tomato", ""), 0.0);
        assert!(similarity("tomato", "tomatoes") > 0.5);
        assert!(similarity("tomato", "kombu") < MIN_SIMILARITY);
    }

    #[test]
    fn ranks_by_weighted_name_similarity() {
        let entries = vec![
            entry(1, "tomato", Some("Tomato"), &[]),
            entry(2, "sun dried tomato", Some("Sun-dried Tomato"), &[]),
            entry(3, "kombu", Some("Kombu"), &[]),
        ];

        let relevance = rank("tomato", &entries);
        let exact = relevance.score(1).unwrap();
        let partial = relevance.score(2).unwrap();

        assert_eq!(relevance.len(), 2);
        assert!(exact > partial);
        // base and display both match exactly: 2.0 * 0.9 + 1.0 * 0.1
        assert!((exact - 1.9).abs() < 1e-9);
        assert_eq!(relevance.score(3), None);
    }

    #[test]
    fn alias_substring_is_included_regardless_of_score() {
        let entries = vec![entry(7, "kombu", Some("Kombu"), &["昆布", "dashima"])];

        let relevance = rank("昆布", &entries);
        assert_eq!(relevance.len(), 1);
        assert_eq!(relevance.predicate(), Predicate::IdIn { ids: vec![7] });
    }

    #[test]
    fn no_hits_is_empty_not_error() {
        let entries = vec![entry(1, "tomato", None, &[])];

        assert!(rank("xyzzy", &entries).is_empty());
        assert!(rank("   ", &entries).is_empty());
        assert_eq!(
            rank("xyzzy", &entries).predicate(),
            Predicate::IdIn { ids: vec![] }
        );
    }
}
