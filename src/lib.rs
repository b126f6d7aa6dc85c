//! pod-dl - idempotent podcast downloader library
//!
//! Polls RSS and Atom feeds, downloads episode enclosures that were not
//! retrieved before and remembers them in a plain text memory file.
//!
//! # Features
//!
//! - RSS 2.0 and Atom feeds
//! - Crash-safe `.part` staging with per-episode memory commits
//! - Dry runs that only mark episodes as seen
//! - Optional ID3 tagging from feed metadata
//!
//! # Example
//!
//! ```no_run
//! use pod_dl::{config::Config, pipeline::{self, RunOptions}};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(None)?;
//!     let report = pipeline::run(&config, RunOptions::default()).await?;
//!     println!("{}", pod_dl::progress::format_run_summary(report.downloaded));
//!     Ok(())
//! }
//! ```

// Core modules
pub mod cli;
pub mod config;
pub mod error;
pub mod memory;
pub mod pipeline;
pub mod progress;

// Feature modules organized by functionality
pub mod download;
pub mod feed;
pub mod processing;

// Re-export commonly used types
pub use config::Config;
pub use download::{DownloadOutcome, DownloadResult, Downloader};
pub use error::{PodError, Result};
pub use feed::{Episode, FeedFetcher};
pub use memory::MemoryStore;
pub use pipeline::{RunOptions, RunReport};

// Re-export serde_json for binary
pub use serde_json;
