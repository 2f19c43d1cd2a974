//! # Link Parsing Module
//!
//! Parses the input markdown document into an ordered mapping from display
//! label to URL. This is the input side of the report: the order links appear
//! in the document drives the order of domains in the final output.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

fn link_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\[(.*)\]\((.*)\)").expect("valid link pattern"))
}

/// An insertion-ordered map from display label to URL.
///
/// Duplicate labels overwrite the earlier URL but keep the first entry's
/// position, matching last-write-wins dictionary semantics.
#[derive(Debug, Default, Clone)]
pub struct LinkMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl LinkMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a label/URL pair, overwriting the URL of an existing label
    pub fn insert(&mut self, label: impl Into<String>, url: impl Into<String>) {
        let label = label.into();
        let url = url.into();
        match self.index.get(&label) {
            Some(&idx) => self.entries[idx].1 = url,
            None => {
                self.index.insert(label.clone(), self.entries.len());
                self.entries.push((label, url));
            }
        }
    }

    /// Iterate `(label, url)` pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(l, u)| (l.as_str(), u.as_str()))
    }

    /// Iterate URLs in insertion order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(_, u)| u.as_str())
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse all markdown links in a document into a label-to-URL map
pub fn parse_markdown_links(content: &str) -> LinkMap {
    let mut links = LinkMap::new();
    for caps in link_pattern().captures_iter(content) {
        let label = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
        let url = caps.get(2).map(|m| m.as_str()).unwrap_or_default();
        links.insert(label, url);
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic_links() {
        let doc = "intro\n- [Rust Book](https://doc.rust-lang.org/book/)\n\
                   - [Tokio](https://tokio.rs/)\ntrailing";
        let links = parse_markdown_links(doc);

        assert_eq!(links.len(), 2);
        let pairs: Vec<(&str, &str)> = links.iter().collect();
        assert_eq!(pairs[0], ("Rust Book", "https://doc.rust-lang.org/book/"));
        assert_eq!(pairs[1], ("Tokio", "https://tokio.rs/"));
    }

    #[test]
    fn test_duplicate_labels_last_write_wins() {
        let doc = "[Home](https://old.example.com/)\n[Other](https://b.com/)\n\
                   [Home](https://new.example.com/)";
        let links = parse_markdown_links(doc);

        assert_eq!(links.len(), 2);
        let pairs: Vec<(&str, &str)> = links.iter().collect();
        // Overwritten URL, original position
        assert_eq!(pairs[0], ("Home", "https://new.example.com/"));
        assert_eq!(pairs[1], ("Other", "https://b.com/"));
    }

    #[test]
    fn test_no_links() {
        let links = parse_markdown_links("just plain text");
        assert!(links.is_empty());
    }

    #[test]
    fn test_urls_in_order() {
        let doc = "[a](https://a.com/1)\n[b](https://b.com/2)";
        let links = parse_markdown_links(doc);
        let urls: Vec<&str> = links.urls().collect();
        assert_eq!(urls, vec!["https://a.com/1", "https://b.com/2"]);
    }
}
