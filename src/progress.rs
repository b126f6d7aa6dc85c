//! Centralized progress reporting
//!
//! Provides the per-episode transfer bars and the end-of-run summary text.

use human_bytes::human_bytes;
use indicatif::{ProgressBar, ProgressStyle as IndicatifStyle};
use std::time::Duration;

/// Progress display style
#[derive(Debug, Clone, Copy)]
pub enum ProgressStyle {
    /// Transfer with a known content length
    Download,
    /// Transfer without a content length
    Stream,
}

/// Create a progress bar with the specified style
pub fn create_progress_bar(total: Option<u64>, style: ProgressStyle) -> ProgressBar {
    let bar = match total {
        Some(total) => ProgressBar::new(total),
        None => ProgressBar::new_spinner(),
    };
    apply_style(&bar, style);
    bar.enable_steady_tick(Duration::from_millis(100));
    bar
}

/// Create a bar for one episode transfer, or a hidden one when progress is off
pub fn episode_bar(content_length: Option<u64>, visible: bool) -> ProgressBar {
    if !visible {
        return ProgressBar::hidden();
    }
    match content_length {
        Some(total) if total > 0 => create_progress_bar(Some(total), ProgressStyle::Download),
        _ => create_progress_bar(None, ProgressStyle::Stream),
    }
}

/// Apply a style to an existing progress bar
pub fn apply_style(bar: &ProgressBar, style: ProgressStyle) {
    match style {
        ProgressStyle::Download => {
            if let Ok(template) = IndicatifStyle::with_template(
                "{msg} [{bar:20.cyan/blue}] {percent:>3}% {bytes:>10}/{total_bytes:<10} {bytes_per_sec:>12}",
            ) {
                bar.set_style(
                    template
                        .progress_chars("━━╸ ")
                        .with_key(
                            "bytes_per_sec",
                            |state: &indicatif::ProgressState, w: &mut dyn std::fmt::Write| {
                                let bytes_per_sec = state.per_sec();
                                if bytes_per_sec > 1_048_576.0 {
                                    let _ = write!(w, "{:>7.2} MiB/s", bytes_per_sec / 1_048_576.0);
                                } else if bytes_per_sec > 1024.0 {
                                    let _ = write!(w, "{:>7.2} KiB/s", bytes_per_sec / 1024.0);
                                } else {
                                    let _ = write!(w, "{:>7.0}  B/s", bytes_per_sec);
                                }
                            },
                        ),
                );
            }
        }
        ProgressStyle::Stream => {
            if let Ok(template) =
                IndicatifStyle::with_template("{spinner:.cyan} {msg} {bytes:>10} {binary_bytes_per_sec}")
            {
                bar.set_style(template);
            }
        }
    }
}

/// Message shown next to an in-flight transfer
pub fn format_item_message(index: usize, total: usize) -> String {
    format!("downloading {}/{}", index + 1, total)
}

/// Final one-line summary of a run
pub fn format_run_summary(downloaded: usize) -> String {
    if downloaded == 0 {
        "No files downloaded.".to_string()
    } else {
        format!("Successfully downloaded {} files.", downloaded)
    }
}

/// Secondary summary line with byte totals and failures
pub fn format_transfer_details(bytes: u64, failed: usize) -> String {
    if failed == 0 {
        format!("  └─ {} written", human_bytes(bytes as f64))
    } else {
        format!(
            "  └─ {} written, {} episode{} failed (will retry next run)",
            human_bytes(bytes as f64),
            failed,
            if failed == 1 { "" } else { "s" }
        )
    }
}
