//! # Task Dispatcher Module
//!
//! This module runs the per-link pipeline (fetch readable content, then
//! extract keywords) across all links with bounded parallelism, isolating
//! per-link failures and periodically checkpointing both caches.
//!
//! ## Key Components
//!
//! - `PipelineConfig`: worker limit and cache flush interval, with a builder
//! - `Pipeline`: owns the caches and the shared extractor/keyword model
//! - `Progress`: aggregate counts reported on every flush tick
//!
//! ## Design
//!
//! Workers receive only their link (plus the cached content snapshot when
//! only keywords are missing) and report results over an mpsc channel; the
//! dispatcher is the sole owner and mutator of the in-memory cache maps.
//! The control loop joins results with `tokio::select!` against an interval
//! ticker, so progress is reported and both caches are flushed every tick
//! without busy-polling. A worker failure is converted at the receive site
//! into sentinel cache entries (empty content, `[("ERROR", 0.0)]` keywords)
//! and logged; it never aborts the run. Cached sentinels are treated as
//! processed on later runs, so failed links are not retried.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use futures::future;
use tokio::sync::{mpsc, Semaphore};
use tracing::{debug, error, info, instrument};

use crate::cache::{CacheError, FileCache, CONTENT_CACHE_FILE, KEYWORDS_CACHE_FILE};
use crate::content::{ContentError, ContentExtractor};
use crate::keywords::{error_sentinel, KeywordModel, KeywordSet};

/// Error type for pipeline operations
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Cache load or flush failure; aborts the run
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

impl From<PipelineError> for crate::Error {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Cache(e) => e.into(),
        }
    }
}

/// Configuration for the task dispatcher
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Upper bound on simultaneous in-flight fetches
    pub concurrency: usize,

    /// How often progress is reported and the caches are flushed
    pub flush_interval: Duration,

    /// Path of the link-to-content cache file
    pub content_cache_path: std::path::PathBuf,

    /// Path of the link-to-keywords cache file
    pub keywords_cache_path: std::path::PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            concurrency: 12,
            flush_interval: Duration::from_secs(10),
            content_cache_path: CONTENT_CACHE_FILE.into(),
            keywords_cache_path: KEYWORDS_CACHE_FILE.into(),
        }
    }
}

/// Builder for PipelineConfig
#[derive(Debug, Default)]
pub struct PipelineConfigBuilder {
    config: PipelineConfig,
}

impl PipelineConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: PipelineConfig::default(),
        }
    }

    /// Set the worker concurrency limit
    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.config.concurrency = concurrency;
        self
    }

    /// Set the progress/flush interval
    pub fn flush_interval(mut self, flush_interval: Duration) -> Self {
        self.config.flush_interval = flush_interval;
        self
    }

    /// Set the content cache file path
    pub fn content_cache_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.config.content_cache_path = path.into();
        self
    }

    /// Set the keywords cache file path
    pub fn keywords_cache_path(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.config.keywords_cache_path = path.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> PipelineConfig {
        self.config
    }
}

impl PipelineConfig {
    /// Create a new builder
    pub fn builder() -> PipelineConfigBuilder {
        PipelineConfigBuilder::new()
    }
}

/// Aggregate progress of a run, reported on every flush tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Links with content resolved (fetched, cached, or sentinel)
    pub content_done: usize,

    /// Links with keywords resolved (extracted, cached, or sentinel)
    pub keywords_done: usize,

    /// Total links in this run
    pub total: usize,
}

/// What one worker produced for its link
struct TaskOutput {
    content: Option<String>,
    keywords: Option<KeywordSet>,
}

/// The fetch-and-extract dispatcher.
///
/// Owns both cache stores and shares the content extractor and keyword
/// model read-only across workers.
pub struct Pipeline {
    config: PipelineConfig,
    extractor: Arc<ContentExtractor>,
    model: Arc<KeywordModel>,
    content_cache: FileCache<String>,
    keywords_cache: FileCache<KeywordSet>,
}

impl Pipeline {
    /// Create a new pipeline
    pub fn new(config: PipelineConfig, extractor: ContentExtractor, model: KeywordModel) -> Self {
        let content_cache = FileCache::new(config.content_cache_path.clone());
        let keywords_cache = FileCache::new(config.keywords_cache_path.clone());
        Self {
            config,
            extractor: Arc::new(extractor),
            model: Arc::new(model),
            content_cache,
            keywords_cache,
        }
    }

    /// Run the pipeline over the given links.
    ///
    /// Returns the full link-to-keywords mapping, including entries that
    /// were already cached and the `ERROR` sentinels of failed links.
    /// Partial results are flushed to both caches on every tick and once
    /// more before returning.
    ///
    /// # Errors
    ///
    /// Only cache I/O failures abort the run; per-link fetch or extraction
    /// failures are recorded as sentinels.
    #[instrument(skip(self, links, progress), fields(links = links.len()))]
    pub async fn run(
        &self,
        links: &[String],
        progress: Option<mpsc::Sender<Progress>>,
    ) -> Result<BTreeMap<String, KeywordSet>, PipelineError> {
        let mut contents = self.content_cache.load().await?;
        let mut keywords = self.keywords_cache.load().await?;

        // Unique links in input order; the cache key is the URL itself
        let mut seen = HashSet::new();
        let unique: Vec<&String> = links.iter().filter(|l| seen.insert(l.as_str())).collect();
        let total = unique.len();

        let mut content_done = 0usize;
        let mut keywords_done = 0usize;

        let semaphore = Arc::new(Semaphore::new(self.config.concurrency));
        let (tx, mut rx) = mpsc::channel::<(String, Result<TaskOutput, ContentError>)>(
            total.max(1),
        );

        let mut pending = 0usize;
        let mut handles = Vec::new();
        for link in unique {
            let need_content = !contents.contains_key(link.as_str());
            let need_keywords = !keywords.contains_key(link.as_str());

            if !need_content {
                content_done += 1;
            }
            if !need_keywords {
                keywords_done += 1;
            }
            if !need_content && !need_keywords {
                debug!("Cache hit for {}", link);
                continue;
            }

            let permit = semaphore.clone().acquire_owned();
            let extractor = self.extractor.clone();
            let model = self.model.clone();
            let cached_content = contents.get(link.as_str()).cloned();
            let link = link.clone();
            let tx = tx.clone();

            pending += 1;
            handles.push(tokio::spawn(async move {
                // Closed only if the whole pipeline was dropped
                let Ok(_permit) = permit.await else { return };

                let result = async {
                    let (content, fetched) = match cached_content {
                        Some(cached) => (cached, None),
                        None => {
                            let text = extractor.fetch_readable(&link).await?;
                            (text.clone(), Some(text))
                        }
                    };
                    let extracted = if need_keywords {
                        Some(model.extract(&content))
                    } else {
                        None
                    };
                    Ok(TaskOutput {
                        content: fetched,
                        keywords: extracted,
                    })
                }
                .await;

                let _ = tx.send((link, result)).await;
            }));
        }
        drop(tx);

        info!(
            "Processing {} links ({} already cached)",
            total,
            total - pending
        );

        let mut ticker = tokio::time::interval(self.config.flush_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        while pending > 0 {
            tokio::select! {
                received = rx.recv() => {
                    let Some((link, result)) = received else { break };
                    match result {
                        Ok(output) => {
                            if let Some(content) = output.content {
                                contents.insert(link.clone(), content);
                                content_done += 1;
                            }
                            if let Some(set) = output.keywords {
                                keywords.insert(link, set);
                                keywords_done += 1;
                            }
                        }
                        Err(e) => {
                            // Poison-pill the link so it is never retried
                            error!("Task for {} failed: {}", link, e);
                            if !contents.contains_key(&link) {
                                content_done += 1;
                            }
                            if !keywords.contains_key(&link) {
                                keywords_done += 1;
                            }
                            contents.insert(link.clone(), String::new());
                            keywords.insert(link, error_sentinel());
                        }
                    }
                    pending -= 1;
                }
                _ = ticker.tick() => {
                    let snapshot = Progress { content_done, keywords_done, total };
                    info!(
                        "Waiting for content to be parsed. Content: {}/{} ; Keywords: {}/{}",
                        content_done, total, keywords_done, total
                    );
                    if let Some(tx) = &progress {
                        let _ = tx.try_send(snapshot);
                    }
                    self.content_cache.persist(&contents).await?;
                    self.keywords_cache.persist(&keywords).await?;
                }
            }
        }

        // Reap the worker tasks; results already arrived over the channel
        future::join_all(handles).await;

        self.content_cache.persist(&contents).await?;
        self.keywords_cache.persist(&keywords).await?;

        if let Some(tx) = &progress {
            let _ = tx
                .try_send(Progress { content_done, keywords_done, total });
        }
        info!("Processed {} links", total);

        Ok(keywords)
    }
}
