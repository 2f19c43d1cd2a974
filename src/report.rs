//! # Report Rendering Module
//!
//! Renders the final markdown report: one section per domain (in first-seen
//! order), listing each link with its display label and deduplicated
//! keywords.

use std::collections::{BTreeMap, HashMap};

use crate::links::LinkMap;

/// Render the grouped, annotated report as markdown.
///
/// Each domain becomes a `# domain (count)` section listing its links as
/// `- [label](url) - keyword, keyword` bullets. Links without a known label
/// or keywords render with empty fields rather than being dropped.
pub fn render_markdown(
    links: &LinkMap,
    groups: &[(String, Vec<String>)],
    keywords: &BTreeMap<String, Vec<String>>,
) -> String {
    // Reverse mapping; a URL listed under several labels keeps the last one
    let mut labels: HashMap<&str, &str> = HashMap::new();
    for (label, url) in links.iter() {
        labels.insert(url, label);
    }

    let mut out = String::new();
    for (domain, domain_links) in groups {
        out.push_str(&format!("# {} ({})\n", domain, domain_links.len()));
        for link in domain_links {
            let label = labels.get(link.as_str()).copied().unwrap_or_default();
            let keywords_str = keywords
                .get(link)
                .map(|kws| kws.join(", "))
                .unwrap_or_default();
            out.push_str(&format!("- [{}]({}) - {}\n", label, link, keywords_str));
        }
        out.push('\n');
    }
    out
}
