//! Axis-aligned n-dimensional regions.
//!
//! A [`Region`] is an `origin` plus a `span` with one entry per dataset axis.
//! Engines call [`Region::validate`] before touching any sample, so a region
//! that leaves its dataset is rejected with zero writes.
//!
//! # Coordinate System
//!
//! Axis 0 is X (columns), axis 1 is Y (rows). Further axes index planes,
//! channels, time points and so on.
//!
//! ```text
//! (0,0) ────────► X (axis 0)
//!   │
//!   │   origin
//!   │     ┌──────────┐
//!   │     │  region  │ span[1]
//!   │     └──────────┘
//!   ▼       span[0]
//!   Y (axis 1)
//! ```
//!
//! # Usage
//!
//! ```rust
//! use ij_core::Region;
//!
//! let dims = [64, 48, 3];
//! let region = Region::new(vec![8, 8, 0], vec![16, 16, 3]);
//! region.validate(&dims).unwrap();
//! assert_eq!(region.sample_count(), 16 * 16 * 3);
//! assert!(region.contains(&[8, 23, 2]));
//! ```

use crate::{Error, Result};

/// An origin + span box inside a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Region {
    origin: Vec<usize>,
    span: Vec<usize>,
}

impl Region {
    /// Creates a region from origin and span.
    ///
    /// No validation happens here; call [`validate`](Self::validate) against
    /// the dataset dimensions before use.
    #[inline]
    pub fn new(origin: Vec<usize>, span: Vec<usize>) -> Self {
        Self { origin, span }
    }

    /// Region covering a whole dataset.
    pub fn whole(dims: &[usize]) -> Self {
        Self {
            origin: vec![0; dims.len()],
            span: dims.to_vec(),
        }
    }

    /// Region covering a 2-D rectangle on every plane of a dataset.
    ///
    /// Axes beyond the first two span their full extent.
    ///
    /// ```rust
    /// use ij_core::Region;
    ///
    /// let r = Region::rect(&[10, 10, 4], 2, 3, 5, 5);
    /// assert_eq!(r.origin(), &[2, 3, 0]);
    /// assert_eq!(r.span(), &[5, 5, 4]);
    /// ```
    pub fn rect(dims: &[usize], x: usize, y: usize, width: usize, height: usize) -> Self {
        let mut region = Self::whole(dims);
        if dims.len() >= 2 {
            region.origin[0] = x;
            region.origin[1] = y;
            region.span[0] = width;
            region.span[1] = height;
        }
        region
    }

    /// Origin coordinate per axis.
    #[inline]
    pub fn origin(&self) -> &[usize] {
        &self.origin
    }

    /// Extent per axis.
    #[inline]
    pub fn span(&self) -> &[usize] {
        &self.span
    }

    /// Number of axes.
    #[inline]
    pub fn rank(&self) -> usize {
        self.origin.len()
    }

    /// Exclusive end coordinate on `axis`, saturating at `usize::MAX`.
    #[inline]
    pub fn end(&self, axis: usize) -> usize {
        self.origin[axis].saturating_add(self.span[axis])
    }

    /// Number of samples inside the region.
    pub fn sample_count(&self) -> usize {
        self.span.iter().fold(1, |acc, &s| acc.saturating_mul(s))
    }

    /// Number of scanlines (rows along axis 0) inside the region.
    pub fn line_count(&self) -> usize {
        self.span.iter().skip(1).fold(1, |acc, &s| acc.saturating_mul(s))
    }

    /// Checks the region against dataset dimensions.
    ///
    /// Requires equal rank, `span[i] >= 1` and `origin[i] + span[i] <= dims[i]`
    /// on every axis. `origin[i] < dims[i]` follows from the last two.
    pub fn validate(&self, dims: &[usize]) -> Result<()> {
        if self.origin.len() != dims.len() {
            return Err(Error::RankMismatch {
                expected: dims.len(),
                got: self.origin.len(),
            });
        }
        if self.span.len() != dims.len() {
            return Err(Error::RankMismatch {
                expected: dims.len(),
                got: self.span.len(),
            });
        }
        for axis in 0..dims.len() {
            let (origin, span, extent) = (self.origin[axis], self.span[axis], dims[axis]);
            if span == 0 {
                return Err(Error::EmptySpan { axis });
            }
            let fits = origin
                .checked_add(span)
                .is_some_and(|end| end <= extent);
            if !fits {
                return Err(Error::RegionOutOfBounds {
                    axis,
                    origin,
                    span,
                    extent,
                });
            }
        }
        Ok(())
    }

    /// Returns `true` if `pos` lies inside the region.
    pub fn contains(&self, pos: &[usize]) -> bool {
        pos.len() == self.rank()
            && pos
                .iter()
                .enumerate()
                .all(|(axis, &p)| p >= self.origin[axis] && p < self.end(axis))
    }

    /// Returns `true` if this region has the same shape as `other`.
    #[inline]
    pub fn same_span(&self, other: &Region) -> bool {
        self.span == other.span
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whole_validates() {
        let dims = [5, 4, 3];
        let r = Region::whole(&dims);
        assert!(r.validate(&dims).is_ok());
        assert_eq!(r.sample_count(), 60);
        assert_eq!(r.line_count(), 12);
    }

    #[test]
    fn test_overhang_rejected() {
        let r = Region::new(vec![3, 0], vec![3, 2]);
        let err = r.validate(&[5, 2]).unwrap_err();
        assert_eq!(
            err,
            Error::RegionOutOfBounds {
                axis: 0,
                origin: 3,
                span: 3,
                extent: 5
            }
        );
    }

    #[test]
    fn test_origin_at_extent_rejected() {
        let r = Region::new(vec![0, 4], vec![1, 1]);
        assert!(r.validate(&[4, 4]).is_err());
    }

    #[test]
    fn test_zero_span_rejected() {
        let r = Region::new(vec![0, 0], vec![2, 0]);
        assert_eq!(r.validate(&[4, 4]), Err(Error::EmptySpan { axis: 1 }));
    }

    #[test]
    fn test_rank_mismatch() {
        let r = Region::new(vec![0, 0], vec![1, 1]);
        assert!(matches!(
            r.validate(&[4, 4, 2]),
            Err(Error::RankMismatch { expected: 3, got: 2 })
        ));
    }

    #[test]
    fn test_overflowing_span_rejected() {
        let r = Region::new(vec![1, 0], vec![usize::MAX, 1]);
        assert!(r.validate(&[4, 4]).unwrap_err().is_bounds_error());
    }

    #[test]
    fn test_contains() {
        let r = Region::new(vec![1, 1], vec![2, 2]);
        assert!(r.contains(&[1, 1]));
        assert!(r.contains(&[2, 2]));
        assert!(!r.contains(&[3, 2]));
        assert!(!r.contains(&[0, 1]));
        assert!(!r.contains(&[1, 1, 0]));
    }

    #[test]
    fn test_unvalidated_overflow_saturates() {
        let r = Region::new(vec![5, 0], vec![usize::MAX, 1]);
        assert_eq!(r.end(0), usize::MAX);
        assert!(r.contains(&[6, 0]));
        assert!(!r.contains(&[4, 0]));
        assert_eq!(r.sample_count(), usize::MAX);
    }
}
