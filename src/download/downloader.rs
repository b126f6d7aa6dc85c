use chrono::{NaiveDate, Utc};
use futures::StreamExt;
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};

use super::naming;
use crate::config::Config;
use crate::error::{DownloadError, PodError};
use crate::feed::Episode;
use crate::memory::MemoryStore;
use crate::processing::tags;
use crate::progress;

type Result<T> = std::result::Result<T, DownloadError>;

const IO_BUFFER_SIZE: usize = 256 * 1024;

/// Result of a committed download
#[derive(Debug)]
pub struct DownloadResult {
    pub path: PathBuf,
    pub size: u64,
    pub download_time: Duration,
    /// False when the `.part` file could not be promoted to its final name
    pub renamed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    AlreadyDownloaded,
    DryRun,
}

#[derive(Debug)]
pub enum DownloadOutcome {
    Downloaded(DownloadResult),
    Skipped(SkipReason),
}

impl DownloadOutcome {
    /// Contribution to the downloaded tally: 1 or 0
    pub fn count(&self) -> usize {
        match self {
            DownloadOutcome::Downloaded(_) => 1,
            DownloadOutcome::Skipped(_) => 0,
        }
    }
}

/// Sequential episode downloader with `.part` staging
pub struct Downloader {
    client: reqwest::Client,
    dir: PathBuf,
    dry_run: bool,
    write_tags: bool,
    show_progress: bool,
    fallback_date: NaiveDate,
}

impl Downloader {
    pub fn new(config: &Config) -> std::result::Result<Self, PodError> {
        // No overall timeout: episodes can take a long time, stalls cannot
        let client = reqwest::Client::builder()
            .connect_timeout(config.http.connect_timeout())
            .read_timeout(config.http.read_timeout())
            .user_agent(config.download.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            dir: config.download.dir.clone(),
            dry_run: config.download.dry_run,
            write_tags: config.post_processing.write_tags,
            show_progress: true,
            fallback_date: Utc::now().date_naive(),
        })
    }

    pub fn with_progress(mut self, visible: bool) -> Self {
        self.show_progress = visible;
        self
    }

    /// Date used in file names of episodes without a publication date
    pub fn with_fallback_date(mut self, date: NaiveDate) -> Self {
        self.fallback_date = date;
        self
    }

    /// Final path an episode is saved to
    pub fn destination(&self, episode: &Episode) -> PathBuf {
        self.dir.join(naming::file_name(episode, self.fallback_date))
    }

    /// Download one episode and commit it to `memory`
    ///
    /// Errors never touch `memory`; a transfer that fails midway leaves its
    /// `.part` file behind so the next run retries from scratch.
    pub async fn download(
        &self,
        episode: &Episode,
        memory: &mut MemoryStore,
        index: usize,
        total: usize,
    ) -> Result<DownloadOutcome> {
        if memory.contains(&episode.media_url) {
            tracing::debug!("Already downloaded, skipping: {}", episode.media_url);
            return Ok(DownloadOutcome::Skipped(SkipReason::AlreadyDownloaded));
        }

        if self.dry_run {
            tracing::info!("Dry run, marking as downloaded: {}", episode.title);
            memory.add(&episode.media_url);
            persist(memory);
            return Ok(DownloadOutcome::Skipped(SkipReason::DryRun));
        }

        let start_time = Instant::now();

        let response = self
            .client
            .get(&episode.media_url)
            .send()
            .await
            .map_err(|e| DownloadError::Network {
                url: episode.media_url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(DownloadError::Status {
                url: episode.media_url.clone(),
                status: status.as_u16(),
            });
        }

        let final_path = self.destination(episode);
        let part_path = part_path_for(&final_path);

        let file = File::create(&part_path)
            .await
            .map_err(|source| DownloadError::Stage {
                path: part_path.clone(),
                source,
            })?;

        let bar = progress::episode_bar(response.content_length(), self.show_progress);
        bar.set_message(progress::format_item_message(index, total));

        let size = match stream_body(response, file, &part_path, &bar).await {
            Ok(size) => size,
            Err(e) => {
                bar.finish_and_clear();
                return Err(e);
            }
        };
        bar.finish_and_clear();

        let renamed = match tokio::fs::rename(&part_path, &final_path).await {
            Ok(()) => true,
            Err(e) => {
                // Data is complete on disk, so the episode still counts as committed
                tracing::warn!(
                    "Failed to rename {} to {}: {}",
                    part_path.display(),
                    final_path.display(),
                    e
                );
                false
            }
        };

        memory.add(&episode.media_url);
        persist(memory);

        let path = if renamed { final_path } else { part_path };

        if self.write_tags && renamed {
            if let Err(e) = tags::write_episode_tags(&path, episode) {
                tracing::warn!("{}", e);
            }
        }

        tracing::info!("Downloaded {}", path.display());

        Ok(DownloadOutcome::Downloaded(DownloadResult {
            path,
            size,
            download_time: start_time.elapsed(),
            renamed,
        }))
    }
}

/// Copy the response body into the staging file, returning the bytes written
async fn stream_body(
    response: reqwest::Response,
    file: File,
    part_path: &Path,
    bar: &ProgressBar,
) -> Result<u64> {
    let transfer_err = |reason: String| DownloadError::Transfer {
        path: part_path.to_path_buf(),
        reason,
    };

    let mut writer = BufWriter::with_capacity(IO_BUFFER_SIZE, file);
    let mut stream = response.bytes_stream();
    let mut written = 0u64;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| transfer_err(e.to_string()))?;
        writer
            .write_all(&chunk)
            .await
            .map_err(|e| transfer_err(e.to_string()))?;
        written += chunk.len() as u64;
        bar.inc(chunk.len() as u64);
    }

    // Ensure all data is written
    writer.flush().await.map_err(|e| transfer_err(e.to_string()))?;
    writer
        .shutdown()
        .await
        .map_err(|e| transfer_err(e.to_string()))?;

    Ok(written)
}

fn part_path_for(final_path: &Path) -> PathBuf {
    let name = final_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    final_path.with_file_name(naming::staging_name(&name))
}

/// Write the memory file; a failure here is retried by the end-of-run persist
fn persist(memory: &mut MemoryStore) {
    if let Err(e) = memory.persist() {
        tracing::warn!("{}", e);
    }
}
