//! Progress bar and logging utilities.
//!
//! Bars and spinners share one style here so the two binaries look alike.
//! In log-only mode every bar is hidden and phase logs go to stderr, which
//! keeps output tail-friendly when a run is driven from a script.

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

const BAR_TEMPLATE: &str =
    "{msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({per_sec}, ETA: {eta})";
const SPINNER_TEMPLATE: &str = "{msg} {spinner} [{elapsed_precise}]";
const SPINNER_TICK: Duration = Duration::from_millis(100);

/// Global flag for log-only mode (set from args in main)
pub static LOG_ONLY: AtomicBool = AtomicBool::new(false);

/// Set log-only mode globally
pub fn set_log_only(value: bool) {
    LOG_ONLY.store(value, Ordering::Relaxed);
}

/// Check if log-only mode is enabled
pub fn is_log_only() -> bool {
    LOG_ONLY.load(Ordering::Relaxed)
}

/// Format duration in human-readable form
pub fn format_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.1}m", secs / 60.0)
    }
}

/// Shared tail of the two constructors: hidden in log-only mode, styled
/// (and ticking, for spinners) otherwise.
fn styled(pb: ProgressBar, style: ProgressStyle, msg: &str, tick: Option<Duration>) -> ProgressBar {
    if is_log_only() {
        pb.set_draw_target(ProgressDrawTarget::hidden());
    } else {
        pb.set_style(style);
        if let Some(period) = tick {
            pb.enable_steady_tick(period);
        }
    }
    pb.set_message(msg.to_string());
    pb
}

/// Progress bar over a known length.
pub fn create_progress_bar(len: u64, msg: &str) -> ProgressBar {
    let style = ProgressStyle::default_bar()
        .template(BAR_TEMPLATE)
        .unwrap()
        .progress_chars("=> ");
    styled(ProgressBar::new(len), style, msg, None)
}

/// Spinner for indeterminate phases (file reads, parsing).
pub fn create_spinner(msg: &str) -> ProgressBar {
    let style = ProgressStyle::default_spinner()
        .template(SPINNER_TEMPLATE)
        .unwrap();
    styled(ProgressBar::new_spinner(), style, msg, Some(SPINNER_TICK))
}

/// Log progress periodically for tail-friendly output.
/// Only logs in log-only mode, at the given interval.
pub fn log_progress(phase: &str, current: u64, total: u64, interval: u64) {
    if is_log_only() && (current % interval == 0 || current == total) {
        let pct = 100.0 * current as f64 / total as f64;
        eprintln!("[{}] {}/{} ({:.1}%)", phase, current, total, pct);
    }
}
