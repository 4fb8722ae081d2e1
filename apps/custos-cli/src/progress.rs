//! Progress reporting for the purge command
//!
//! Bar wrapper over indicatif, driven by the per-batch callback of the
//! collection purger.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Batch progress bar. The total batch count is only known once the
/// first batch commits, so the bar starts lengthless and is sized on
/// the first callback.
pub struct PurgeProgress {
    bar: ProgressBar,
}

impl PurgeProgress {
    pub fn new(operation: &str) -> Self {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len} batches")
                .expect("Invalid progress bar template")
                .progress_chars("█▓▒░"),
        );
        bar.set_message(operation.to_string());
        bar.enable_steady_tick(Duration::from_millis(100));
        Self { bar }
    }

    /// Record batch `index` of `total` as committed.
    pub fn batch_committed(&self, index: usize, total: usize) {
        self.bar.set_length(total as u64);
        self.bar.set_position(index as u64);
    }

    /// Finish and clear the progress bar
    pub fn finish_and_clear(&self) {
        self.bar.finish_and_clear();
    }
}
