//! # Keyword Extraction Module
//!
//! This module derives a small ranked list of representative terms from a
//! text body using the RAKE (Rapid Automatic Keyword Extraction) algorithm.
//! The extractor is treated as an oracle by the rest of the pipeline: it
//! returns at most `TOP_N` scored keywords and the scores are opaque.
//!
//! ## Key Components
//!
//! - `KeywordSet`: ordered `(keyword, score)` pairs for one link
//! - `KeywordModel`: the RAKE model, built once and shared across workers
//! - `error_sentinel`: the poison-pill keyword set for permanently failed links

use std::cmp::Ordering;

use rake::{KeywordScore, Rake, StopWords};

/// A scored keyword set for one link, ranked by relevance.
///
/// Serializes as an array of 2-element `[keyword, score]` arrays, which is
/// the on-disk cache format.
pub type KeywordSet = Vec<(String, f64)>;

/// Maximum number of keywords kept per link
pub const TOP_N: usize = 5;

/// Keyword marking a permanently failed link
pub const ERROR_KEYWORD: &str = "ERROR";

/// The keyword set recorded for a link whose pipeline task failed.
///
/// Cached like any other result, so failed links are not retried on later
/// runs.
pub fn error_sentinel() -> KeywordSet {
    vec![(ERROR_KEYWORD.to_string(), 0.0)]
}

/// English stop words for the RAKE phrase delimiter set
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any", "are",
    "aren't", "as", "at", "be", "because", "been", "before", "being", "below", "between", "both",
    "but", "by", "can", "can't", "cannot", "could", "couldn't", "did", "didn't", "do", "does",
    "doesn't", "doing", "don't", "down", "during", "each", "few", "for", "from", "further", "had",
    "hadn't", "has", "hasn't", "have", "haven't", "having", "he", "he'd", "he'll", "he's", "her",
    "here", "here's", "hers", "herself", "him", "himself", "his", "how", "how's", "i", "i'd",
    "i'll", "i'm", "i've", "if", "in", "into", "is", "isn't", "it", "it's", "its", "itself",
    "let's", "me", "more", "most", "mustn't", "my", "myself", "no", "nor", "not", "of", "off",
    "on", "once", "only", "or", "other", "ought", "our", "ours", "ourselves", "out", "over",
    "own", "same", "shan't", "she", "she'd", "she'll", "she's", "should", "shouldn't", "so",
    "some", "such", "than", "that", "that's", "the", "their", "theirs", "them", "themselves",
    "then", "there", "there's", "these", "they", "they'd", "they'll", "they're", "they've",
    "this", "those", "through", "to", "too", "under", "until", "up", "very", "was", "wasn't",
    "we", "we'd", "we'll", "we're", "we've", "were", "weren't", "what", "what's", "when",
    "when's", "where", "where's", "which", "while", "who", "who's", "whom", "why", "why's",
    "with", "won't", "would", "wouldn't", "you", "you'd", "you'll", "you're", "you've", "your",
    "yours", "yourself", "yourselves",
];

/// RAKE-based keyword extractor.
///
/// Constructed once and shared read-only across pipeline workers; `Rake`
/// holds only its stop-word set and is `Send + Sync`.
pub struct KeywordModel {
    rake: Rake,
    top_n: usize,
}

impl Default for KeywordModel {
    fn default() -> Self {
        Self::new()
    }
}

impl KeywordModel {
    /// Create a new model with the built-in English stop words
    pub fn new() -> Self {
        let mut stop_words = StopWords::new();
        for word in STOP_WORDS {
            stop_words.insert((*word).to_string());
        }
        Self {
            rake: Rake::new(stop_words),
            top_n: TOP_N,
        }
    }

    /// Extract the top scored keywords from a text
    ///
    /// Returns at most `TOP_N` `(keyword, score)` pairs ranked by score,
    /// highest first. Empty or stop-word-only text yields an empty set.
    pub fn extract(&self, text: &str) -> KeywordSet {
        let mut scored: Vec<KeywordScore> = self.rake.run(text);
        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        scored
            .into_iter()
            .take(self.top_n)
            .map(|ks| (ks.keyword, ks.score))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_caps_at_top_n() {
        let model = KeywordModel::new();
        let text = "Neural networks learn hierarchical representations. \
            Convolutional layers detect local patterns. Recurrent models \
            process sequential data. Gradient descent optimizes parameters. \
            Transfer learning reuses pretrained weights. Attention mechanisms \
            weigh relevant context. Dropout regularizes deep models.";

        let keywords = model.extract(text);
        assert!(!keywords.is_empty());
        assert!(keywords.len() <= TOP_N);
    }

    #[test]
    fn test_extract_ranked_by_score() {
        let model = KeywordModel::new();
        let text = "Database indexes speed up query planning. A query planner \
            uses the database indexes to avoid full table scans.";

        let keywords = model.extract(text);
        for pair in keywords.windows(2) {
            assert!(pair[0].1 >= pair[1].1);
        }
    }

    #[test]
    fn test_extract_empty_text() {
        let model = KeywordModel::new();
        assert!(model.extract("").is_empty());
    }

    #[test]
    fn test_error_sentinel_shape() {
        let sentinel = error_sentinel();
        assert_eq!(sentinel, vec![("ERROR".to_string(), 0.0)]);
    }

    #[test]
    fn test_keyword_set_serializes_as_pair_arrays() {
        let set: KeywordSet = vec![("rust".to_string(), 1.5)];
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"[["rust",1.5]]"#);
    }
}
