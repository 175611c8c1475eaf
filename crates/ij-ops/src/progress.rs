//! Progress reporting for long-running engine calls.
//!
//! Engines call [`ProgressObserver::on_progress`] once per scanline, never per
//! sample. Any `FnMut(usize, usize)` closure is an observer.
//!
//! ```rust
//! use ij_ops::progress::ProgressObserver;
//!
//! let mut last = (0, 0);
//! let mut obs = |current: usize, total: usize| last = (current, total);
//! obs.on_progress(3, 10);
//! assert_eq!(last, (3, 10));
//! ```

use tracing::debug;

/// Receives `(current, total)` progress updates.
pub trait ProgressObserver {
    /// Called after `current` of `total` units are done.
    fn on_progress(&mut self, current: usize, total: usize);
}

impl<F: FnMut(usize, usize)> ProgressObserver for F {
    #[inline]
    fn on_progress(&mut self, current: usize, total: usize) {
        self(current, total)
    }
}

/// Observer that discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    #[inline]
    fn on_progress(&mut self, _current: usize, _total: usize) {}
}

/// Observer that emits a `debug!` event at every 10% step.
#[derive(Debug, Clone)]
pub struct LogProgress {
    label: String,
    last_decile: Option<usize>,
}

impl LogProgress {
    /// Creates a logger tagged with `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            last_decile: None,
        }
    }
}

impl ProgressObserver for LogProgress {
    fn on_progress(&mut self, current: usize, total: usize) {
        if total == 0 {
            return;
        }
        let decile = current.min(total) * 10 / total;
        if self.last_decile != Some(decile) {
            self.last_decile = Some(decile);
            debug!(label = %self.label, percent = decile * 10, current, total, "progress");
        }
    }
}
