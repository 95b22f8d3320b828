//! Progress reporting utilities using indicatif.
//!
//! Stages never touch the terminal themselves. They receive a
//! [`ProgressReporter`] and call [`ProgressReporter::report`] once per file;
//! the front end decides whether that becomes an indicatif bar
//! ([`TerminalProgress`]) or nothing at all ([`SilentProgress`]).

use std::sync::Mutex;

use indicatif::{ProgressBar, ProgressStyle};

/// Receives per-file progress from a stage.
pub trait ProgressReporter: Send + Sync {
    /// Called before item `index` (1-based) of `total` is processed.
    ///
    /// `label` is the path of the file about to be processed.
    fn report(&self, index: usize, total: usize, label: &str);
}

/// Reporter that discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn report(&self, _index: usize, _total: usize, _label: &str) {}
}

/// Progress bar on stderr, one bar per stage.
///
/// A new bar is started whenever the total changes or the index restarts at
/// 1, and the previous bar is finished at that point.
///
/// Callers that want no output pick [`SilentProgress`] instead.
#[derive(Default)]
pub struct TerminalProgress {
    bar: Mutex<Option<ProgressBar>>,
}

impl TerminalProgress {
    /// Create a new progress reporter.
    ///
    /// # Examples
    ///
    /// ```
    /// use mediasweep::progress::TerminalProgress;
    ///
    /// let progress = TerminalProgress::new();
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    /// Finish the active bar, if any.
    pub fn finish(&self) {
        if let Ok(mut guard) = self.bar.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }
}

impl ProgressReporter for TerminalProgress {
    fn report(&self, index: usize, total: usize, label: &str) {
        let Ok(mut guard) = self.bar.lock() else {
            return;
        };

        let restart = match guard.as_ref() {
            Some(pb) => index <= 1 || pb.length() != Some(total as u64),
            None => true,
        };
        if restart {
            if let Some(old) = guard.take() {
                old.finish_and_clear();
            }
            let pb = ProgressBar::new(total as u64);
            pb.set_style(Self::style());
            *guard = Some(pb);
        }

        if let Some(pb) = guard.as_ref() {
            pb.set_position(index as u64);
            pb.set_message(truncate_path(label, 40));
            if index >= total {
                pb.finish_and_clear();
                *guard = None;
            }
        }
    }
}

impl Drop for TerminalProgress {
    fn drop(&mut self) {
        self.finish();
    }
}

/// Truncate a label for display in the progress bar.
///
/// Keeps the end of the label, which carries the file name.
pub fn truncate_path(label: &str, max_len: usize) -> String {
    let count = label.chars().count();
    if count <= max_len {
        return label.to_string();
    }

    let keep = max_len.saturating_sub(3);
    let tail: String = label.chars().skip(count - keep).collect();
    format!("...{tail}")
}
