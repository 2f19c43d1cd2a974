//! # Content Extraction Module
//!
//! This module fetches a web page and reduces it to the readable subset of its
//! content: the main article body with navigation, ads, and boilerplate
//! stripped. It is the first stage of the per-link pipeline, feeding text to
//! the keyword extractor.
//!
//! ## Key Components
//!
//! - `ExtractorConfig`: Configuration for fetching and the article threshold
//! - `ContentExtractor`: Shared HTTP client + readability-based extraction
//!
//! ## Features
//!
//! - Realistic browser User-Agent for sites that reject default clients
//! - Mozilla readability algorithm for boilerplate removal
//! - Title fallback for pages whose readable body is too short to be a
//!   genuine article (paywalled or JS-rendered pages)

use std::io::Cursor;

use readability::extractor;
use scraper::{Html, Selector};
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::error::Error as CrateError;

/// Browser User-Agent sent with every fetch
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/85.0.4183.121 Safari/537.36";

/// Error type for content extraction operations
#[derive(Debug, Error)]
pub enum ContentError {
    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing error
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Readability extraction error
    #[error("Readability error: {0}")]
    Readability(String),
}

impl From<ContentError> for CrateError {
    fn from(err: ContentError) -> Self {
        match err {
            ContentError::Http(e) => CrateError::Fetch(e.to_string()),
            ContentError::UrlParse(e) => CrateError::Fetch(format!("URL parse error: {}", e)),
            ContentError::Readability(e) => CrateError::Extraction(e),
        }
    }
}

/// Configuration for the content extractor
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Minimum length of readable text, in characters, for the body to be
    /// considered a genuine article; shorter pages fall back to their title
    pub min_article_chars: usize,

    /// User agent to use for requests
    pub user_agent: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            min_article_chars: 500,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

/// Fetches pages and reduces them to readable article text
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    client: reqwest::Client,
    config: ExtractorConfig,
}

impl ContentExtractor {
    /// Create a new extractor with default configuration
    pub fn new() -> Result<Self, ContentError> {
        Self::with_config(ExtractorConfig::default())
    }

    /// Create a new extractor with custom configuration
    pub fn with_config(config: ExtractorConfig) -> Result<Self, ContentError> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .build()?;
        Ok(Self { client, config })
    }

    /// Fetch a link and return its readable text
    ///
    /// Performs an HTTP GET and reduces the response to the main article
    /// text. If the readable text is shorter than the configured threshold,
    /// the page title is returned instead.
    ///
    /// # Errors
    ///
    /// Returns an error on network failure, non-2xx status, or if the page
    /// cannot be reduced to readable content.
    #[instrument(skip(self))]
    pub async fn fetch_readable(&self, link: &str) -> Result<String, ContentError> {
        let url = Url::parse(link)?;
        let response = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;
        let html = response.text().await?;

        debug!("Fetched {} bytes from {}", html.len(), link);
        self.extract_readable(&html, &url)
    }

    /// Reduce raw HTML to readable article text, falling back to the title
    /// for short bodies
    fn extract_readable(&self, html: &str, url: &Url) -> Result<String, ContentError> {
        let mut cursor = Cursor::new(html.as_bytes());
        let product = extractor::extract(&mut cursor, url)
            .map_err(|e| ContentError::Readability(format!("{:?}", e)))?;

        let text = product.text;
        if text.chars().count() < self.config.min_article_chars {
            // Small text, probably not a good article
            debug!("Readable text too short for {}, using title", url);
            let title = if product.title.is_empty() {
                page_title(html)
            } else {
                product.title
            };
            return Ok(title);
        }
        Ok(text)
    }
}

/// Extract the `<title>` element text from a page
fn page_title(html: &str) -> String {
    let document = Html::parse_document(html);
    match Selector::parse("title") {
        Ok(selector) => document
            .select(&selector)
            .next()
            .map(|element| element.text().collect::<String>())
            .unwrap_or_default(),
        Err(_) => String::new(),
    }
}
