use chrono::{DateTime, FixedOffset};
use std::collections::HashSet;
use std::path::Path;

use super::parse::{parse_feed, Feed};
use crate::config::Config;
use crate::error::{FeedError, PodError, SetupError};
use crate::memory::MemoryStore;

type Result<T> = std::result::Result<T, PodError>;

/// An episode whose media has not been downloaded yet
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    /// Display title of the feed the episode came from
    pub origin: String,
    /// Raw entry title, not yet sanitized
    pub title: String,
    pub published_at: Option<DateTime<FixedOffset>>,
    /// Enclosure URL, doubles as the dedupe key
    pub media_url: String,
    /// Entry description, or the feed description when the entry has none
    pub description: Option<String>,
}

/// Read the source list: one feed URL per line
///
/// Blank lines and lines starting with `#` are ignored.
pub fn load_sources<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| SetupError::SourcesUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Retrieves feeds over HTTP and enumerates pending episodes
pub struct FeedFetcher {
    client: reqwest::Client,
}

impl FeedFetcher {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.http.connect_timeout())
            .timeout(config.http.read_timeout())
            .user_agent(config.download.user_agent.clone())
            .build()?;

        Ok(Self { client })
    }

    /// Fetch and parse a single feed
    pub async fn fetch_feed(&self, url: &str) -> std::result::Result<Feed, FeedError> {
        tracing::debug!("Fetching feed: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FeedError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.bytes().await.map_err(|source| FeedError::Request {
            url: url.to_string(),
            source,
        })?;

        parse_feed(&body).map_err(|reason| FeedError::Parse {
            url: url.to_string(),
            reason,
        })
    }

    /// Collect every episode from `urls` whose enclosure is not in `memory`
    ///
    /// Feeds are visited in order and entries keep their feed order. A feed
    /// that cannot be fetched or parsed is logged and skipped.
    pub async fn fetch_candidates(&self, urls: &[String], memory: &MemoryStore) -> Vec<Episode> {
        let mut episodes = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();

        for url in urls {
            let feed = match self.fetch_feed(url).await {
                Ok(feed) => feed,
                Err(e) => {
                    tracing::warn!("Unable to parse url: {}. Error: {}", url, e);
                    continue;
                }
            };

            let before = episodes.len();
            episodes.extend(collect_pending(&feed, memory, &mut seen));
            tracing::info!(
                "{}: {} new episode{}",
                if feed.title.is_empty() { url.as_str() } else { feed.title.as_str() },
                episodes.len() - before,
                if episodes.len() - before == 1 { "" } else { "s" }
            );
        }

        episodes
    }
}

/// Turn the entries of one parsed feed into pending episodes
fn collect_pending(
    feed: &Feed,
    memory: &MemoryStore,
    seen: &mut HashSet<String>,
) -> Vec<Episode> {
    feed.entries
        .iter()
        .filter_map(|entry| {
            let media_url = entry.enclosure.as_ref()?;
            if memory.contains(media_url) {
                return None;
            }
            // The same enclosure listed twice would otherwise be downloaded twice
            if !seen.insert(media_url.clone()) {
                return None;
            }

            Some(Episode {
                origin: feed.title.clone(),
                title: entry.title.clone(),
                published_at: entry.published_at,
                media_url: media_url.clone(),
                description: entry
                    .description
                    .clone()
                    .or_else(|| feed.description.clone()),
            })
        })
        .collect()
}
