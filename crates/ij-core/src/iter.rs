//! Lazy raster-order enumeration of region coordinates.
//!
//! [`RegionIter`] walks a [`Region`] with axis 0 varying fastest, so the first
//! two axes are visited in conventional scanline order. Only the current
//! position is stored; nothing proportional to the region size is allocated.
//!
//! Two refinements are available:
//! - [`RegionIter::single_plane`] pins every axis beyond the first two to a
//!   fixed plane position
//! - [`RegionIter::line_starts`] yields only the first coordinate of each
//!   scanline, for engines that work a row at a time
//!
//! ```rust
//! use ij_core::{Region, RegionIter};
//!
//! let region = Region::new(vec![1, 0], vec![2, 2]);
//! let visited: Vec<Vec<usize>> = RegionIter::new(&region).collect();
//! assert_eq!(visited, vec![vec![1, 0], vec![2, 0], vec![1, 1], vec![2, 1]]);
//! ```

use crate::{Error, Region, Result};

/// Cursor over every coordinate of a region.
///
/// Use [`next_position`](Self::next_position) to borrow coordinates without
/// allocating, or the [`Iterator`] impl to receive owned vectors.
#[derive(Debug, Clone)]
pub struct RegionIter {
    origin: Vec<usize>,
    end: Vec<usize>,
    pos: Vec<usize>,
    total: usize,
    remaining: usize,
    started: bool,
}

impl RegionIter {
    /// Iterates every coordinate of `region`.
    pub fn new(region: &Region) -> Self {
        let origin = region.origin().to_vec();
        let end: Vec<usize> = (0..region.rank()).map(|axis| region.end(axis)).collect();
        Self::from_bounds(origin, end)
    }

    /// Iterates the 2-D plane of `region` selected by `plane`.
    ///
    /// `plane` holds one absolute index per axis beyond the first two, and each
    /// index must fall inside the region on that axis. For 2-D regions `plane`
    /// is empty.
    pub fn single_plane(region: &Region, plane: &[usize]) -> Result<Self> {
        Ok(Self::new(&pin_plane(region, plane)?))
    }

    /// Iterates the first coordinate of each scanline in `region`.
    pub fn line_starts(region: &Region) -> Self {
        let mut iter = Self::new(region);
        if let Some(&o) = iter.origin.first() {
            iter.end[0] = iter.end[0].min(o.saturating_add(1));
        }
        iter.reset_total();
        iter
    }

    fn from_bounds(origin: Vec<usize>, end: Vec<usize>) -> Self {
        let mut iter = Self {
            pos: origin.clone(),
            origin,
            end,
            total: 0,
            remaining: 0,
            started: false,
        };
        iter.reset_total();
        iter
    }

    fn reset_total(&mut self) {
        self.total = if self.origin.is_empty() {
            0
        } else {
            self.origin
                .iter()
                .zip(&self.end)
                .map(|(&o, &e)| e.saturating_sub(o))
                .fold(1, |acc: usize, n| acc.saturating_mul(n))
        };
        self.reset();
    }

    /// Restarts the walk from the region origin.
    pub fn reset(&mut self) {
        self.pos.copy_from_slice(&self.origin);
        self.remaining = self.total;
        self.started = false;
    }

    /// Total number of coordinates this iterator yields from a fresh start.
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Advances and borrows the next coordinate.
    pub fn next_position(&mut self) -> Option<&[usize]> {
        if self.remaining == 0 {
            return None;
        }
        if self.started {
            for axis in 0..self.pos.len() {
                self.pos[axis] += 1;
                if self.pos[axis] < self.end[axis] {
                    break;
                }
                self.pos[axis] = self.origin[axis];
            }
        } else {
            self.started = true;
        }
        self.remaining -= 1;
        Some(&self.pos)
    }
}

impl Iterator for RegionIter {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_position().map(<[usize]>::to_vec)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for RegionIter {}

/// Restricts `region` to one plane on every axis beyond the first two.
pub fn pin_plane(region: &Region, plane: &[usize]) -> Result<Region> {
    let extra = region.rank().saturating_sub(2);
    if plane.len() != extra {
        return Err(Error::RankMismatch {
            expected: extra,
            got: plane.len(),
        });
    }
    let mut origin = region.origin().to_vec();
    let mut span = region.span().to_vec();
    for (i, &index) in plane.iter().enumerate() {
        let axis = i + 2;
        if index < region.origin()[axis] || index >= region.end(axis) {
            return Err(Error::RegionOutOfBounds {
                axis,
                origin: index,
                span: 1,
                extent: region.end(axis),
            });
        }
        origin[axis] = index;
        span[axis] = 1;
    }
    Ok(Region::new(origin, span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_first_axis_fastest() {
        let r = Region::whole(&[2, 2, 2]);
        let order: Vec<Vec<usize>> = RegionIter::new(&r).collect();
        assert_eq!(order[0], vec![0, 0, 0]);
        assert_eq!(order[1], vec![1, 0, 0]);
        assert_eq!(order[2], vec![0, 1, 0]);
        assert_eq!(order[4], vec![0, 0, 1]);
        assert_eq!(order.len(), 8);
    }

    #[test]
    fn test_exactly_once() {
        let r = Region::new(vec![1, 2, 0], vec![3, 4, 2]);
        let seen: HashSet<Vec<usize>> = RegionIter::new(&r).collect();
        assert_eq!(seen.len(), 24);
        assert!(seen.iter().all(|p| r.contains(p)));
    }

    #[test]
    fn test_restartable() {
        let r = Region::whole(&[3, 2]);
        let mut iter = RegionIter::new(&r);
        assert_eq!(iter.by_ref().count(), 6);
        assert!(iter.next_position().is_none());
        iter.reset();
        assert_eq!(iter.len(), 6);
        assert_eq!(iter.next_position(), Some(&[0usize, 0][..]));
    }

    #[test]
    fn test_single_plane() {
        let r = Region::whole(&[2, 2, 3, 2]);
        let visited: Vec<Vec<usize>> = RegionIter::single_plane(&r, &[1, 1]).unwrap().collect();
        assert_eq!(visited.len(), 4);
        assert!(visited.iter().all(|p| p[2] == 1 && p[3] == 1));
    }

    #[test]
    fn test_single_plane_outside_region() {
        let r = Region::new(vec![0, 0, 1], vec![2, 2, 1]);
        assert!(RegionIter::single_plane(&r, &[0]).is_err());
        assert!(RegionIter::single_plane(&r, &[]).is_err());
    }

    #[test]
    fn test_line_starts() {
        let r = Region::new(vec![2, 1, 0], vec![4, 3, 2]);
        let starts: Vec<Vec<usize>> = RegionIter::line_starts(&r).collect();
        assert_eq!(starts.len(), 6);
        assert!(starts.iter().all(|p| p[0] == 2));
        assert_eq!(starts[1], vec![2, 2, 0]);
    }

    #[test]
    fn test_line_starts_near_usize_max() {
        let r = Region::new(vec![usize::MAX - 1, 0], vec![usize::MAX, 2]);
        let starts: Vec<Vec<usize>> = RegionIter::line_starts(&r).collect();
        assert_eq!(starts, vec![vec![usize::MAX - 1, 0], vec![usize::MAX - 1, 1]]);
    }
}
