//! Post-download enrichment
//!
//! Writes ID3 tags derived from feed metadata. Nothing in here is allowed to
//! fail a download: callers log the error and move on.

pub mod describe;
pub mod tags;

pub use describe::to_plain_text;
pub use tags::write_episode_tags;
