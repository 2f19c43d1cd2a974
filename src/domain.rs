//! # Domain Grouping Module
//!
//! Partitions links by their URL host for the final report. Grouping keeps
//! the original relative order of links within each bucket and lists domains
//! in first-seen order.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::error::Error as CrateError;

/// Error type for domain grouping
#[derive(Debug, Error)]
pub enum DomainError {
    /// The link does not match the expected `http(s)://host/...` shape
    #[error("URL does not match http(s)://host: {0}")]
    MalformedUrl(String),
}

impl From<DomainError> for CrateError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::MalformedUrl(url) => CrateError::MalformedUrl(url),
        }
    }
}

fn host_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^https?://([^/]+)").expect("valid host pattern"))
}

/// Extract the host component of a link
pub fn domain_of(link: &str) -> Result<&str, DomainError> {
    host_pattern()
        .captures(link)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| DomainError::MalformedUrl(link.to_string()))
}

/// Group links by their URL host.
///
/// Returns `(domain, links)` pairs with domains in first-seen order and
/// links kept in their input order. Fails on the first link whose host
/// cannot be extracted; a structurally broken input aborts the run.
pub fn group_by_domain<'a, I>(links: I) -> Result<Vec<(String, Vec<String>)>, DomainError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut groups: Vec<(String, Vec<String>)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for link in links {
        let domain = domain_of(link)?;
        match positions.get(domain) {
            Some(&idx) => groups[idx].1.push(link.to_string()),
            None => {
                positions.insert(domain.to_string(), groups.len());
                groups.push((domain.to_string(), vec![link.to_string()]));
            }
        }
    }

    Ok(groups)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_of() {
        assert_eq!(domain_of("https://example.com/page").unwrap(), "example.com");
        assert_eq!(domain_of("http://blog.example.com/post").unwrap(), "blog.example.com");
        assert_eq!(domain_of("https://a.com").unwrap(), "a.com");
    }

    #[test]
    fn test_domain_of_malformed() {
        let result = domain_of("not-a-url");
        assert!(matches!(result, Err(DomainError::MalformedUrl(_))));

        let result = domain_of("ftp://example.com/file");
        assert!(matches!(result, Err(DomainError::MalformedUrl(_))));
    }

    #[test]
    fn test_grouping_keeps_first_seen_order() {
        let links = ["https://a.com/x", "https://a.com/y", "https://b.com/z"];
        let groups = group_by_domain(links).unwrap();

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "a.com");
        assert_eq!(
            groups[0].1,
            vec!["https://a.com/x".to_string(), "https://a.com/y".to_string()]
        );
        assert_eq!(groups[1].0, "b.com");
        assert_eq!(groups[1].1, vec!["https://b.com/z".to_string()]);
    }

    #[test]
    fn test_grouping_aborts_on_malformed_link() {
        let links = ["https://a.com/x", "mailto:someone@example.com"];
        assert!(group_by_domain(links).is_err());
    }
}
