//! Error types for dataset operations.

use thiserror::Error;

/// Error type for dataset operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum OpsError {
    /// Region, shape or capability error raised by the data model.
    #[error(transparent)]
    Core(#[from] ij_core::Error),

    /// Kernel weights are malformed.
    #[error("invalid kernel: {0}")]
    InvalidKernel(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl OpsError {
    /// Returns `true` for region and shape violations.
    pub fn is_bounds_error(&self) -> bool {
        matches!(self, Self::Core(e) if e.is_bounds_error())
    }
}

/// Result type for dataset operations.
pub type OpsResult<T> = Result<T, OpsError>;
