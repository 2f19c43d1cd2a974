//! Error types for the linkshelf crate

use thiserror::Error;

/// Result type for linkshelf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for linkshelf operations
#[derive(Debug, Error)]
pub enum Error {
    /// Fetching a page failed (network or HTTP status)
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Content or keyword extraction failed
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// A link did not match the expected http(s)://host shape
    #[error("Malformed URL: {0}")]
    MalformedUrl(String),

    /// A cache file could not be read, parsed, or written
    #[error("Cache I/O error: {0}")]
    CacheIo(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}
