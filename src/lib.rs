//! # Linkshelf - Categorized Link Reports
//!
//! This crate turns a collection of hyperlinks into a categorized, annotated
//! report. For each link it fetches the readable article text, derives a small
//! set of representative keywords, merges near-duplicate keywords across the
//! whole corpus, and groups the links by source domain.
//!
//! ## Features
//!
//! - Concurrent fetch-and-extract pipeline with bounded parallelism
//! - Persistent JSON caches for content and keywords (idempotent re-runs)
//! - Per-link failure isolation: a failed fetch never aborts the batch
//! - Readability-based article extraction with a title fallback for thin pages
//! - RAKE keyword extraction, capped at the top five terms per link
//! - Fuzzy cross-document keyword deduplication
//! - Domain grouping for the final report
//! - Async API with Tokio
//! - Robust error handling and logging
//!
//! ## Example
//!
//! ```rust,no_run
//! use linkshelf::content::ContentExtractor;
//! use linkshelf::keywords::KeywordModel;
//! use linkshelf::pipeline::{Pipeline, PipelineConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let extractor = ContentExtractor::new()?;
//!     let model = KeywordModel::new();
//!     let pipeline = Pipeline::new(PipelineConfig::default(), extractor, model);
//!
//!     let links = vec!["https://example.com/article".to_string()];
//!     let keywords = pipeline.run(&links, None).await?;
//!     println!("{:?}", keywords);
//!     Ok(())
//! }
//! ```

mod error;

pub mod cache;
pub mod content;
pub mod dedup;
pub mod domain;
pub mod keywords;
pub mod links;
pub mod pipeline;
pub mod report;

pub use error::Error;

/// Re-export of common types for public use
pub mod prelude {
    pub use crate::error::Error;
    pub use crate::error::Result;
}
