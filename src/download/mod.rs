//! Episode downloads
//!
//! This module turns pending episodes into files on disk. Transfers are
//! staged in a `.part` file and only promoted once the body was copied in
//! full, after which the media URL is committed to the memory file.

mod downloader;
pub mod naming;

pub use downloader::{DownloadOutcome, DownloadResult, Downloader, SkipReason};
pub use naming::{file_name, sanitize, staging_name};
