//! Error types for ij-core operations.
//!
//! Every error raised by the core is local to a single operation call and is
//! detected before any sample is written.
//!
//! # Overview
//!
//! The [`Error`] enum covers three families:
//! - Bounds violations: a [`Region`](crate::Region) that does not fit its
//!   dataset, or operands whose shapes disagree
//! - Unsupported operations: a capability the concrete
//!   [`Dataset`](crate::Dataset) does not provide
//! - Invalid parameters passed by the caller
//!
//! Values that exceed a numeric type's range are *not* errors; they are
//! resolved by [`BoundsPolicy`](crate::BoundsPolicy).
//!
//! # Usage
//!
//! ```rust
//! use ij_core::{Error, Region};
//!
//! let region = Region::new(vec![2, 0], vec![4, 4]);
//! let err = region.validate(&[4, 4]).unwrap_err();
//! assert!(err.is_bounds_error());
//! ```

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while validating or processing a dataset.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Position, origin or span has the wrong number of axes.
    #[error("rank mismatch: expected {expected} axes, got {got}")]
    RankMismatch {
        /// Dimensionality of the dataset
        expected: usize,
        /// Length of the offending coordinate sequence
        got: usize,
    },

    /// A region leaves the dataset along one axis.
    #[error("region origin {origin} span {span} exceeds extent {extent} on axis {axis}")]
    RegionOutOfBounds {
        /// Axis index
        axis: usize,
        /// Region origin on that axis
        origin: usize,
        /// Region span on that axis
        span: usize,
        /// Dataset extent on that axis
        extent: usize,
    },

    /// A region has a zero span on some axis.
    #[error("region span must be >= 1 on axis {axis}")]
    EmptySpan {
        /// Axis index
        axis: usize,
    },

    /// Two regions of a binary operation have different shapes.
    #[error("span mismatch: {a:?} vs {b:?}")]
    SpanMismatch {
        /// First span
        a: Vec<usize>,
        /// Second span
        b: Vec<usize>,
    },

    /// Two datasets have different dimensions where identical ones are required.
    #[error("dimension mismatch: {a:?} vs {b:?}")]
    DimensionMismatch {
        /// First dimensions
        a: Vec<usize>,
        /// Second dimensions
        b: Vec<usize>,
    },

    /// Dataset dimensions are unusable.
    #[error("invalid dimensions {dims:?}: {reason}")]
    InvalidDimensions {
        /// Requested dimensions
        dims: Vec<usize>,
        /// Why they were rejected
        reason: String,
    },

    /// The dataset implementation does not back this capability.
    #[error("unsupported operation: {operation}")]
    Unsupported {
        /// Name of the capability
        operation: String,
    },

    /// Caller supplied a parameter outside its domain.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl Error {
    /// Creates an [`Error::DimensionMismatch`] error.
    #[inline]
    pub fn dimension_mismatch(a: &[usize], b: &[usize]) -> Self {
        Self::DimensionMismatch {
            a: a.to_vec(),
            b: b.to_vec(),
        }
    }

    /// Creates an [`Error::SpanMismatch`] error.
    #[inline]
    pub fn span_mismatch(a: &[usize], b: &[usize]) -> Self {
        Self::SpanMismatch {
            a: a.to_vec(),
            b: b.to_vec(),
        }
    }

    /// Creates an [`Error::InvalidDimensions`] error.
    #[inline]
    pub fn invalid_dimensions(dims: &[usize], reason: impl Into<String>) -> Self {
        Self::InvalidDimensions {
            dims: dims.to_vec(),
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::Unsupported`] error.
    #[inline]
    pub fn unsupported(operation: impl Into<String>) -> Self {
        Self::Unsupported {
            operation: operation.into(),
        }
    }

    /// Returns `true` for the bounds-violation family.
    ///
    /// These are caller errors: the region or operand shapes were wrong.
    #[inline]
    pub fn is_bounds_error(&self) -> bool {
        matches!(
            self,
            Self::RankMismatch { .. }
                | Self::RegionOutOfBounds { .. }
                | Self::EmptySpan { .. }
                | Self::SpanMismatch { .. }
                | Self::DimensionMismatch { .. }
        )
    }

    /// Returns `true` if the dataset lacks the requested capability.
    #[inline]
    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_out_of_bounds_message() {
        let err = Error::RegionOutOfBounds {
            axis: 1,
            origin: 3,
            span: 4,
            extent: 5,
        };
        let msg = err.to_string();
        assert!(msg.contains("axis 1"));
        assert!(msg.contains("extent 5"));
        assert!(err.is_bounds_error());
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = Error::dimension_mismatch(&[100, 100], &[200, 100]);
        let msg = err.to_string();
        assert!(msg.contains("[100, 100]"));
        assert!(msg.contains("[200, 100]"));
        assert!(err.is_bounds_error());
    }

    #[test]
    fn test_unsupported_is_not_bounds() {
        let err = Error::unsupported("raw f64 access");
        assert!(err.is_unsupported());
        assert!(!err.is_bounds_error());
    }
}
