//! # Persistent Cache Module
//!
//! This module provides the durable key-value stores used by the pipeline:
//! one mapping link to extracted content and one mapping link to its scored
//! keyword set. Each store is a single JSON file, pretty-printed with
//! lexicographically sorted keys so repeated runs produce diffable output.
//!
//! ## Key Components
//!
//! - `FileCache`: a JSON-file-backed map of URL to value
//! - `CacheError`: I/O and JSON failures, which abort the run
//!
//! Writes are whole-file and serialized through a per-store async mutex;
//! durability is best-effort with respect to process crashes.

use std::collections::BTreeMap;
use std::io;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use crate::error::Error as CrateError;

/// Default file name for the link-to-content store
pub const CONTENT_CACHE_FILE: &str = "content_cache.txt";

/// Default file name for the link-to-keywords store
pub const KEYWORDS_CACHE_FILE: &str = "keywords_cache.txt";

/// Error type for cache operations
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<CacheError> for CrateError {
    fn from(err: CacheError) -> Self {
        CrateError::CacheIo(err.to_string())
    }
}

type Result<T> = std::result::Result<T, CacheError>;

/// A persistent map from link to `V`, stored as one JSON object on disk.
///
/// The store owns its mutual-exclusion primitive: concurrent `persist`
/// calls on the same store serialize through the internal mutex. Reads do
/// not take the lock.
#[derive(Debug)]
pub struct FileCache<V> {
    path: PathBuf,
    write_lock: Mutex<()>,
    _value: PhantomData<V>,
}

impl<V> FileCache<V>
where
    V: Serialize + DeserializeOwned,
{
    /// Create a cache backed by the given file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
            _value: PhantomData,
        }
    }

    /// The file path backing this cache
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the full mapping from disk
    ///
    /// A missing file yields an empty map. An unreadable file or corrupt
    /// JSON is an error.
    pub async fn load(&self) -> Result<BTreeMap<String, V>> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => {
                let map: BTreeMap<String, V> = serde_json::from_str(&content)?;
                debug!("Loaded {} entries from {}", map.len(), self.path.display());
                Ok(map)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist the full mapping to disk
    ///
    /// Serializes the map as a pretty-printed JSON object with sorted keys
    /// and replaces the file contents in one write.
    pub async fn persist(&self, map: &BTreeMap<String, V>) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let json = serde_json::to_string_pretty(map)?;
        fs::write(&self.path, json).await?;
        debug!("Persisted {} entries to {}", map.len(), self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::keywords::KeywordSet;

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache: FileCache<String> = FileCache::new(dir.path().join("nope.txt"));

        let map = cache.load().await.unwrap();
        assert!(map.is_empty());
    }

    #[tokio::test]
    async fn test_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache: FileCache<String> = FileCache::new(dir.path().join(CONTENT_CACHE_FILE));

        let mut map = BTreeMap::new();
        map.insert("https://b.com/x".to_string(), "article text".to_string());
        map.insert("https://a.com/y".to_string(), String::new());

        cache.persist(&map).await.unwrap();
        let loaded = cache.load().await.unwrap();
        assert_eq!(loaded, map);
    }

    #[tokio::test]
    async fn test_keys_are_sorted_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let cache: FileCache<String> = FileCache::new(dir.path().join(CONTENT_CACHE_FILE));

        let mut map = BTreeMap::new();
        map.insert("https://z.com/".to_string(), "z".to_string());
        map.insert("https://a.com/".to_string(), "a".to_string());
        cache.persist(&map).await.unwrap();

        let raw = tokio::fs::read_to_string(cache.path()).await.unwrap();
        let a = raw.find("https://a.com/").unwrap();
        let z = raw.find("https://z.com/").unwrap();
        assert!(a < z);
    }

    #[tokio::test]
    async fn test_corrupt_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(KEYWORDS_CACHE_FILE);
        tokio::fs::write(&path, "{not json").await.unwrap();

        let cache: FileCache<KeywordSet> = FileCache::new(&path);
        let result = cache.load().await;
        assert!(matches!(result, Err(CacheError::Json(_))));
    }

    #[tokio::test]
    async fn test_keyword_cache_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let cache: FileCache<KeywordSet> = FileCache::new(dir.path().join(KEYWORDS_CACHE_FILE));

        let mut map = BTreeMap::new();
        map.insert(
            "https://a.com/".to_string(),
            vec![("rust".to_string(), 4.0), ("ERROR".to_string(), 0.0)],
        );
        cache.persist(&map).await.unwrap();

        let loaded = cache.load().await.unwrap();
        assert_eq!(loaded["https://a.com/"][0].0, "rust");
        assert_eq!(loaded["https://a.com/"][1], ("ERROR".to_string(), 0.0));
    }
}
