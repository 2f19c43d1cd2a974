//! # Keyword Deduplication Module
//!
//! This module collapses near-duplicate keyword spellings ("neural network"
//! vs "neural networks", case variants, minor typos) across the whole corpus
//! into a single canonical form, then reduces each link's scored keyword set
//! to a plain list of deduplicated strings.
//!
//! ## Algorithm
//!
//! Every ordered pair of (link, position) keyword slots is compared once, in
//! a single linear pass over a deterministic (lexicographic by link) slot
//! order. When two slots score above the similarity threshold, both are
//! rewritten to the shorter spelling and the pass continues with the
//! rewritten value. There is no re-iteration to a fixed point: chains of
//! near-duplicates only collapse fully if the relevant comparisons happen
//! later in the pass. The pass is O(T²) in the total number of keyword
//! slots (at most five per link), which is fine for corpora up to a few
//! hundred links.

use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::keywords::KeywordSet;

/// Similarity ratio above which two keyword spellings are merged
pub const SIMILARITY_THRESHOLD: f64 = 88.0;

/// Normalized similarity ratio between two keyword strings, 0-100.
///
/// Case-insensitive and tolerant of small edit distances.
pub fn similarity(a: &str, b: &str) -> f64 {
    strsim::normalized_levenshtein(&a.to_lowercase(), &b.to_lowercase()) * 100.0
}

/// Merge near-duplicate keyword spellings across the corpus, in place.
///
/// The canonical form for a merged pair is the shorter string; on equal
/// lengths the first (current) spelling wins.
pub fn merge_near_duplicates(keywords: &mut BTreeMap<String, KeywordSet>) {
    let links: Vec<String> = keywords.keys().cloned().collect();
    let mut sets: Vec<KeywordSet> = links
        .iter()
        .filter_map(|link| keywords.get(link).cloned())
        .collect();

    let mut merges = 0usize;
    for a in 0..sets.len() {
        for i in 0..sets[a].len() {
            let mut current = sets[a][i].0.clone();
            for b in 0..sets.len() {
                for j in 0..sets[b].len() {
                    if a == b && i == j {
                        continue;
                    }
                    let other = sets[b][j].0.clone();
                    if similarity(&current, &other) > SIMILARITY_THRESHOLD {
                        // Keep the shorter keyword
                        let canonical = if current.len() > other.len() {
                            other
                        } else {
                            current
                        };
                        sets[a][i].0 = canonical.clone();
                        sets[b][j].0 = canonical.clone();
                        current = canonical;
                        merges += 1;
                    }
                }
            }
        }
    }

    debug!("Merged {} near-duplicate keyword slots", merges);
    for (link, set) in links.into_iter().zip(sets) {
        keywords.insert(link, set);
    }
}

/// Reduce each link's scored keyword set to deduplicated plain strings.
///
/// Runs the merge pass first, then drops scores and collapses identical
/// strings per link.
pub fn simplify_keywords(mut keywords: BTreeMap<String, KeywordSet>) -> BTreeMap<String, Vec<String>> {
    merge_near_duplicates(&mut keywords);

    keywords
        .into_iter()
        .map(|(link, set)| {
            let unique: BTreeSet<String> = set.into_iter().map(|(kw, _)| kw).collect();
            (link, unique.into_iter().collect())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(entries: &[(&str, &[(&str, f64)])]) -> BTreeMap<String, KeywordSet> {
        entries
            .iter()
            .map(|(link, kws)| {
                (
                    link.to_string(),
                    kws.iter().map(|(k, s)| (k.to_string(), *s)).collect(),
                )
            })
            .collect()
    }

    #[test]
    fn test_similarity_scale() {
        assert_eq!(similarity("rust", "rust"), 100.0);
        assert!(similarity("neural network", "neural networks") > SIMILARITY_THRESHOLD);
        assert!(similarity("neural network", "database index") < 50.0);
    }

    #[test]
    fn test_similarity_is_case_insensitive() {
        assert_eq!(similarity("Machine Learning", "machine learning"), 100.0);
    }

    #[test]
    fn test_merge_rewrites_both_slots_to_shorter() {
        let mut keywords = corpus(&[
            ("https://a.com/1", &[("neural network", 0.9)]),
            ("https://b.com/2", &[("neural networks", 0.8)]),
        ]);

        merge_near_duplicates(&mut keywords);

        assert_eq!(keywords["https://a.com/1"][0].0, "neural network");
        assert_eq!(keywords["https://b.com/2"][0].0, "neural network");
        // Scores stay per-slot
        assert_eq!(keywords["https://a.com/1"][0].1, 0.9);
        assert_eq!(keywords["https://b.com/2"][0].1, 0.8);
    }

    #[test]
    fn test_merge_leaves_dissimilar_slots_alone() {
        let mut keywords = corpus(&[
            ("https://a.com/1", &[("neural network", 0.9)]),
            ("https://b.com/2", &[("database index", 0.8)]),
        ]);

        merge_near_duplicates(&mut keywords);

        assert_eq!(keywords["https://a.com/1"][0].0, "neural network");
        assert_eq!(keywords["https://b.com/2"][0].0, "database index");
    }

    #[test]
    fn test_merge_within_one_link() {
        let mut keywords = corpus(&[(
            "https://a.com/1",
            &[("machine learning", 0.9), ("Machine Learning", 0.5)],
        )]);

        merge_near_duplicates(&mut keywords);

        let set = &keywords["https://a.com/1"];
        assert_eq!(set[0].0, set[1].0);
    }

    #[test]
    fn test_simplify_drops_scores_and_duplicates() {
        let keywords = corpus(&[(
            "https://a.com/1",
            &[("machine learning", 0.9), ("machine learning", 0.5), ("rust", 0.4)],
        )]);

        let simplified = simplify_keywords(keywords);
        let set = &simplified["https://a.com/1"];
        assert_eq!(set.len(), 2);
        assert!(set.contains(&"machine learning".to_string()));
        assert!(set.contains(&"rust".to_string()));
    }

    #[test]
    fn test_simplify_never_grows_a_set() {
        let keywords = corpus(&[
            ("https://a.com/1", &[("alpha waves", 0.9), ("alpha wave", 0.8)]),
            ("https://b.com/2", &[("beta", 0.7)]),
        ]);
        let raw_len = keywords["https://a.com/1"].len();

        let simplified = simplify_keywords(keywords);
        assert!(simplified["https://a.com/1"].len() <= raw_len);
        assert_eq!(simplified["https://b.com/2"], vec!["beta".to_string()]);
    }

    #[test]
    fn test_error_sentinel_survives_simplify() {
        let keywords = corpus(&[("https://a.com/1", &[("ERROR", 0.0)])]);
        let simplified = simplify_keywords(keywords);
        assert_eq!(simplified["https://a.com/1"], vec!["ERROR".to_string()]);
    }
}
