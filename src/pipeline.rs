//! Run orchestration
//!
//! One run loads the source list and memory file, enumerates pending
//! episodes and downloads them one after another. Per-feed and per-episode
//! failures are logged and counted; only setup failures end the run early.

use serde::Serialize;

use crate::config::Config;
use crate::download::{DownloadOutcome, Downloader};
use crate::error::{ErrorContext, Result};
use crate::feed::{load_sources, Episode, FeedFetcher};
use crate::memory::MemoryStore;

/// Knobs that only matter to the caller, not to the config file
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub show_progress: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            show_progress: true,
        }
    }
}

/// What a run did
#[derive(Debug, Default, Clone, Serialize)]
pub struct RunReport {
    pub feeds: usize,
    pub candidates: usize,
    pub downloaded: usize,
    pub skipped: usize,
    pub failed: usize,
    pub bytes: u64,
    pub dry_run: bool,
}

/// Download every pending episode from every configured feed
pub async fn run(config: &Config, options: RunOptions) -> Result<RunReport> {
    let sources = load_sources(&config.sources.list).context("Unable to load file with sources")?;
    let mut memory = MemoryStore::load(&config.sources.memory).context("Unable to load memory file")?;

    let mut report = RunReport {
        feeds: sources.len(),
        dry_run: config.download.dry_run,
        ..Default::default()
    };

    if sources.is_empty() {
        tracing::warn!("No feeds listed in {}", config.sources.list.display());
        return Ok(report);
    }

    if !config.download.dry_run {
        config.ensure_dirs()?;
    }

    let fetcher = FeedFetcher::new(config)?;
    let downloader = Downloader::new(config)?.with_progress(options.show_progress);

    let episodes = fetcher.fetch_candidates(&sources, &memory).await;
    report.candidates = episodes.len();

    let total = episodes.len();
    for (index, episode) in episodes.iter().enumerate() {
        match downloader.download(episode, &mut memory, index, total).await {
            Ok(outcome) => {
                report.downloaded += outcome.count();
                match outcome {
                    DownloadOutcome::Downloaded(result) => report.bytes += result.size,
                    DownloadOutcome::Skipped(_) => report.skipped += 1,
                }
            }
            Err(e) => {
                report.failed += 1;
                if e.leaves_partial_file() {
                    tracing::warn!("{} (partial file kept)", e);
                } else {
                    tracing::warn!("{}", e);
                }
            }
        }
    }

    // Per-commit writes already happened; this retries any that failed
    if let Err(e) = memory.persist_if_dirty() {
        tracing::warn!("{}", e);
    }

    Ok(report)
}

/// Pending episodes paired with the path they would be saved to
pub async fn list(config: &Config) -> Result<Vec<(Episode, std::path::PathBuf)>> {
    let sources = load_sources(&config.sources.list).context("Unable to load file with sources")?;
    let memory = MemoryStore::load(&config.sources.memory).context("Unable to load memory file")?;

    let fetcher = FeedFetcher::new(config)?;
    let downloader = Downloader::new(config)?;

    let episodes = fetcher.fetch_candidates(&sources, &memory).await;
    Ok(episodes
        .into_iter()
        .map(|episode| {
            let path = downloader.destination(&episode);
            (episode, path)
        })
        .collect())
}
