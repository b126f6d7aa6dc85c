//! Feed retrieval and episode discovery
//!
//! This module fetches RSS 2.0 and Atom documents and turns their entries
//! into episodes that still need to be downloaded.

mod fetcher;
mod parse;

pub use fetcher::{load_sources, Episode, FeedFetcher};
pub use parse::{parse_feed, Feed, FeedEntry};
