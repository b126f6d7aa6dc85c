//! Domain-specific error types for pod-dl
//!
//! `PodError` covers what can abort a run. Feed, download and tag errors
//! stay in their own types and only ever affect a single feed or episode.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for the pod-dl application
#[derive(Error, Debug)]
pub enum PodError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Setup error: {0}")]
    Setup(#[from] SetupError),

    #[error("Memory file error: {0}")]
    Memory(#[from] MemoryError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Fatal errors raised while preparing a run
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("Unable to load file with sources {path}: {source}")]
    SourcesUnreadable {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Memory file errors
#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("Unable to read memory file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Unable to update memory file {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Feed retrieval and parsing errors
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to fetch feed {url}: {source}")]
    Request { url: String, source: reqwest::Error },

    #[error("Feed {url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("Failed to parse feed {url}: {reason}")]
    Parse { url: String, reason: String },
}

/// Per-episode download errors
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("Failed to download file from {url}: {reason}")]
    Network { url: String, reason: String },

    #[error("Server returned HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to create staging file {path}: {source}")]
    Stage {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to copy data to {path}: {reason}")]
    Transfer { path: PathBuf, reason: String },
}

/// ID3 tag enrichment errors
#[derive(Error, Debug)]
pub enum TagError {
    #[error("Failed to read tags from {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to write tags to {path}: {reason}")]
    Write { path: PathBuf, reason: String },
}

/// Configuration validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("Invalid path: {path}: {reason}")]
    InvalidPath { path: PathBuf, reason: String },
}

impl DownloadError {
    /// Whether a partial `.part` file may have been left behind
    pub fn leaves_partial_file(&self) -> bool {
        matches!(self, DownloadError::Transfer { .. })
    }
}

/// Result type alias using PodError
pub type Result<T> = std::result::Result<T, PodError>;

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    fn context(self, msg: impl Into<String>) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: Into<PodError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let error: PodError = e.into();
            tracing::error!("{}: {}", msg.into(), error);
            error
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::NotFound(PathBuf::from("/test/pod-dl.toml"));
        assert_eq!(
            err.to_string(),
            "Configuration file not found: /test/pod-dl.toml"
        );

        let err = DownloadError::Status {
            url: "https://example.com/a.mp3".to_string(),
            status: 404,
        };
        assert_eq!(
            err.to_string(),
            "Server returned HTTP 404 for https://example.com/a.mp3"
        );
    }

    #[test]
    fn test_error_conversion() {
        let setup_err = SetupError::SourcesUnreadable {
            path: PathBuf::from("podcast_sources.txt"),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        let pod_err: PodError = setup_err.into();
        assert!(matches!(pod_err, PodError::Setup(_)));
    }

    #[test]
    fn test_only_transfer_errors_leave_partial_files() {
        let transfer = DownloadError::Transfer {
            path: PathBuf::from("a.mp3.part"),
            reason: "connection reset".to_string(),
        };
        let network = DownloadError::Network {
            url: "https://example.com/a.mp3".to_string(),
            reason: "dns failure".to_string(),
        };
        assert!(transfer.leaves_partial_file());
        assert!(!network.leaves_partial_file());
    }
}
