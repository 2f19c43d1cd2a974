//! # Linkshelf CLI Application
//!
//! Command-line entry point for the link categorizer. Takes one positional
//! argument, the path of a markdown document containing links, and produces:
//!
//! - `keywords.json`: link to deduplicated keyword strings, sorted keys
//! - `result.md`: links grouped by domain, annotated with their keywords
//! - `content_cache.txt` / `keywords_cache.txt`: persistent caches that make
//!   re-runs cheap and interrupt-safe
//!
//! Per-link failures are reported as `ERROR` annotations in the output
//! instead of aborting the batch. Exit code is nonzero only for structural
//! failures: a missing input file, a malformed URL, or an unusable cache.

mod telemetry;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::instrument;

use linkshelf::content::ContentExtractor;
use linkshelf::dedup::simplify_keywords;
use linkshelf::domain::group_by_domain;
use linkshelf::keywords::KeywordModel;
use linkshelf::links::parse_markdown_links;
use linkshelf::pipeline::{Pipeline, PipelineConfig, Progress};
use linkshelf::report::render_markdown;

/// Final deduplicated keyword output file
const KEYWORDS_OUTPUT_FILE: &str = "keywords.json";

/// Final grouped report file
const REPORT_OUTPUT_FILE: &str = "result.md";

#[derive(Parser)]
#[command(author, version, about = "Turn a markdown file of links into a categorized, keyword-annotated report", long_about = None)]
struct Cli {
    /// Path of the markdown document containing links
    #[arg(required = true)]
    input: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing_subscriber();

    let cli = Cli::parse();
    run(cli).await
}

#[instrument(skip(cli))]
async fn run(cli: Cli) -> anyhow::Result<()> {
    let document = tokio::fs::read_to_string(&cli.input).await?;
    let links = parse_markdown_links(&document);
    println!("Parsed {} links from {}", links.len(), cli.input.display());

    let extractor = ContentExtractor::new()?;
    let model = KeywordModel::new();
    let pipeline = Pipeline::new(PipelineConfig::default(), extractor, model);

    // Progress bar fed from the dispatcher's periodic reports
    let (progress_tx, mut progress_rx) = mpsc::channel::<Progress>(100);
    let progress_bar = ProgressBar::new(links.len() as u64);
    progress_bar.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("##-"),
    );
    progress_bar.set_message("Processing links...");

    let progress_handle = tokio::spawn({
        let progress_bar = progress_bar.clone();
        async move {
            while let Some(progress) = progress_rx.recv().await {
                progress_bar.set_position(progress.keywords_done as u64);
                progress_bar.set_message(format!(
                    "content {}/{}",
                    progress.content_done, progress.total
                ));
            }
            progress_bar.finish_with_message("Processing completed");
        }
    });

    let urls: Vec<String> = links.urls().map(String::from).collect();
    let raw_keywords = pipeline.run(&urls, Some(progress_tx)).await?;
    let _ = progress_handle.await;

    let keywords = simplify_keywords(raw_keywords);
    tokio::fs::write(
        KEYWORDS_OUTPUT_FILE,
        serde_json::to_string_pretty(&keywords)?,
    )
    .await?;
    println!("Saved keywords to {}", KEYWORDS_OUTPUT_FILE);

    let groups = group_by_domain(urls.iter().map(String::as_str))
        .map_err(linkshelf::Error::from)?;
    let report = render_markdown(&links, &groups, &keywords);
    tokio::fs::write(REPORT_OUTPUT_FILE, report).await?;
    println!(
        "Wrote report for {} links across {} domains to {}",
        links.len(),
        groups.len(),
        REPORT_OUTPUT_FILE
    );

    Ok(())
}
