//! Periodic progress logging for long passes

use tracing::info;

/// Logs `processed/total` for a named pass every `every` items
///
/// The first item always logs, so a pass announces itself as `0/total`.
#[derive(Debug)]
pub struct ProgressCounter {
    label: String,
    total: usize,
    every: usize,
    processed: usize,
}

impl ProgressCounter {
    pub fn new(label: impl Into<String>, total: usize, every: usize) -> Self {
        Self {
            label: label.into(),
            total,
            every: every.max(1),
            processed: 0,
        }
    }

    /// Record that one more item is about to be processed
    pub fn tick(&mut self) {
        if self.processed % self.every == 0 {
            info!(
                pass = %self.label,
                processed = self.processed,
                total = self.total,
                "{}: {}/{}",
                self.label,
                self.processed,
                self.total
            );
        }
        self.processed += 1;
    }

    pub fn processed(&self) -> usize {
        self.processed
    }

    pub fn finish(&self) {
        info!(
            pass = %self.label,
            processed = self.processed,
            total = self.total,
            "{}: done, {}/{}",
            self.label,
            self.processed,
            self.total
        );
    }
}
