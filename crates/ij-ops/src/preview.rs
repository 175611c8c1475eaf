//! Reversible in-place operations for live preview.
//!
//! A [`PreviewSession`] holds a dataset mutably and owns at most one
//! pristine backup of it. Every preview run first restores the backup and
//! then reapplies the operation, so parameter changes never compound.
//!
//! ```text
//!            apply_preview              apply_preview(changed)
//!   Clean ─────────────────► Active ──────────────────────┐
//!     ▲   (snapshot, run)      │  ▲   (restore, run)       │
//!     │                        │  └────────────────────────┘
//!     └── toggle_off (restore) ┤
//!     └── commit (keep result) ┘
//! ```
//!
//! Dropping a session that is still active restores the dataset.
//!
//! # Example
//!
//! ```rust
//! use ij_core::{ArrayDataset, DataType, Dataset};
//! use ij_ops::engine::{apply_unary, Scope};
//! use ij_ops::function::UnaryOp;
//! use ij_ops::PreviewSession;
//!
//! let mut ds = ArrayDataset::from_fn(&[8, 8], DataType::U8, |_| 10.0).unwrap();
//! let mut session = PreviewSession::new(&mut ds);
//!
//! for amount in [5.0, 20.0, 40.0] {
//!     let mut op = |d: &mut ArrayDataset| {
//!         apply_unary(d, &UnaryOp::Add(amount), &Scope::all()).map(|_| ())
//!     };
//!     session.apply_preview(&mut op, true).unwrap();
//!     assert_eq!(session.dataset().get(&[0, 0]), 10.0 + amount);
//! }
//!
//! session.toggle_off().unwrap();
//! drop(session);
//! assert_eq!(ds.get(&[0, 0]), 10.0);
//! ```

use ij_core::Dataset;
use tracing::{debug, trace, warn};

use crate::OpsResult;

/// An operation that mutates a dataset in place.
pub trait InPlaceOp<D: ?Sized> {
    /// Runs the operation.
    fn run(&mut self, dataset: &mut D) -> OpsResult<()>;
}

impl<D: ?Sized, F> InPlaceOp<D> for F
where
    F: FnMut(&mut D) -> OpsResult<()>,
{
    fn run(&mut self, dataset: &mut D) -> OpsResult<()> {
        self(dataset)
    }
}

enum PreviewState<D> {
    Clean,
    Active { backup: D },
}

/// Preview state machine over a mutably borrowed dataset.
pub struct PreviewSession<'a, D: Dataset> {
    dataset: &'a mut D,
    state: PreviewState<D>,
}

impl<'a, D: Dataset> PreviewSession<'a, D> {
    /// Starts a session in the clean state.
    pub fn new(dataset: &'a mut D) -> Self {
        Self {
            dataset,
            state: PreviewState::Clean,
        }
    }

    /// `true` while a backup is held.
    pub fn is_active(&self) -> bool {
        matches!(self.state, PreviewState::Active { .. })
    }

    /// Current live contents.
    pub fn dataset(&self) -> &D {
        &*self.dataset
    }

    /// The pristine snapshot, if a preview is active.
    pub fn backup(&self) -> Option<&D> {
        match &self.state {
            PreviewState::Active { backup } => Some(backup),
            PreviewState::Clean => None,
        }
    }

    /// Runs `op` on the live dataset.
    ///
    /// The first call snapshots the dataset. Later calls restore the
    /// snapshot before running `op`, or do nothing at all when
    /// `parameters_changed` is `false`.
    pub fn apply_preview<O>(&mut self, op: &mut O, parameters_changed: bool) -> OpsResult<()>
    where
        O: InPlaceOp<D> + ?Sized,
    {
        match &self.state {
            PreviewState::Clean => {
                debug!(samples = self.dataset.sample_count(), "preview: snapshot");
                self.state = PreviewState::Active {
                    backup: self.dataset.duplicate(),
                };
            }
            PreviewState::Active { .. } if !parameters_changed => {
                trace!("preview: parameters unchanged");
                return Ok(());
            }
            PreviewState::Active { backup } => {
                trace!("preview: restore before rerun");
                self.dataset.copy_from(backup)?;
            }
        }
        op.run(self.dataset)
    }

    /// Restores the snapshot and returns to the clean state.
    ///
    /// Returns `false` if no preview was active.
    pub fn toggle_off(&mut self) -> OpsResult<bool> {
        let state = std::mem::replace(&mut self.state, PreviewState::Clean);
        let PreviewState::Active { backup } = state else {
            return Ok(false);
        };
        if let Err(e) = self.dataset.copy_from(&backup) {
            self.state = PreviewState::Active { backup };
            return Err(e.into());
        }
        debug!("preview: restored");
        Ok(true)
    }

    /// Keeps the last previewed result and drops the snapshot.
    ///
    /// Returns `false` if no preview was active.
    pub fn commit(&mut self) -> bool {
        let was_active = self.is_active();
        self.state = PreviewState::Clean;
        if was_active {
            debug!("preview: committed");
        }
        was_active
    }
}

impl<D: Dataset> Drop for PreviewSession<'_, D> {
    fn drop(&mut self) {
        if let PreviewState::Active { backup } = &self.state {
            if let Err(e) = self.dataset.copy_from(backup) {
                warn!("preview: restore on drop failed: {e}");
            }
        }
    }
}
