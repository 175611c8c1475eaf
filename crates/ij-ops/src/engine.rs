//! Point-operation engines.
//!
//! The unary engine reads each sample of a region, applies a
//! [`UnaryFunction`], passes the result through the target's
//! [`BoundsPolicy`](ij_core::BoundsPolicy) and writes it back. The binary
//! engine does the same for two equally-shaped regions combined by a
//! [`BinaryFunction`] (the "blit" used for compositing).
//!
//! Every entry point validates its regions first: a bad region fails with a
//! bounds error and the dataset is left untouched.
//!
//! # Example
//!
//! ```rust
//! use ij_core::{ArrayDataset, DataType, Dataset, Region};
//! use ij_ops::engine::{apply_unary, Scope};
//! use ij_ops::function::UnaryOp;
//!
//! let mut ds = ArrayDataset::from_fn(&[4, 4], DataType::U8, |_| 1.0).unwrap();
//! let scope = Scope::region(Region::new(vec![1, 1], vec![2, 2]));
//! let stats = apply_unary(&mut ds, &UnaryOp::Add(68.6), &scope).unwrap();
//!
//! assert_eq!(stats.visited, 4);
//! assert_eq!(ds.get(&[1, 1]), 69.0);
//! assert_eq!(ds.get(&[0, 0]), 1.0);
//! ```

use ij_core::{
    pin_plane, Dataset, DatasetAccessor, DatasetReader, Error, Region, RegionIter,
    SampleAccessor, SampleReader,
};
use tracing::{debug, trace};

use crate::function::{BinaryFunction, UnaryFunction};
use crate::progress::{NoProgress, ProgressObserver};
use crate::OpsResult;

/// Which samples an engine call touches.
///
/// Defaults to the whole dataset. A plane restriction pins every axis beyond
/// the first two, so only one 2-D plane of the region is visited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    region: Option<Region>,
    plane: Option<Vec<usize>>,
}

impl Scope {
    /// The whole dataset.
    pub fn all() -> Self {
        Self::default()
    }

    /// A sub-region.
    pub fn region(region: Region) -> Self {
        Self {
            region: Some(region),
            plane: None,
        }
    }

    /// Restricts the scope to one plane (indices for axes 2..).
    pub fn with_plane(mut self, plane: Vec<usize>) -> Self {
        self.plane = Some(plane);
        self
    }

    /// Validates against `dims` and returns the concrete region to visit.
    pub fn resolve(&self, dims: &[usize]) -> Result<Region, Error> {
        if dims.len() < 2 {
            return Err(Error::invalid_dimensions(dims, "at least two axes required"));
        }
        let region = match &self.region {
            Some(r) => {
                r.validate(dims)?;
                r.clone()
            }
            None => {
                let whole = Region::whole(dims);
                whole.validate(dims)?;
                whole
            }
        };
        match &self.plane {
            Some(plane) => pin_plane(&region, plane),
            None => Ok(region),
        }
    }
}

/// What an engine call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    /// Samples read and written.
    pub visited: usize,
    /// Scanlines processed.
    pub lines: usize,
}

/// Applies `func` in place to every sample in `scope`.
pub fn apply_unary<D, F>(dataset: &mut D, func: &F, scope: &Scope) -> OpsResult<TransformStats>
where
    D: Dataset + ?Sized,
    F: UnaryFunction + ?Sized,
{
    apply_unary_observed(dataset, func, scope, &mut NoProgress)
}

/// [`apply_unary`] with a progress callback per scanline.
pub fn apply_unary_observed<D, F>(
    dataset: &mut D,
    func: &F,
    scope: &Scope,
    observer: &mut dyn ProgressObserver,
) -> OpsResult<TransformStats>
where
    D: Dataset + ?Sized,
    F: UnaryFunction + ?Sized,
{
    let region = scope.resolve(dataset.dims())?;
    debug!(
        samples = region.sample_count(),
        data_type = %dataset.data_type(),
        "apply_unary"
    );

    let mut acc = DatasetAccessor::new(dataset);
    Ok(for_each_line(&region, observer, |pos| {
        let v = acc.read(pos);
        acc.write(pos, func.compute(v));
    }))
}

/// Applies `func` to `src` and writes the results to the same positions in `dst`.
///
/// This is the copy-producing variant: `src` is never modified, `dst` may have
/// a different type and larger dimensions, and results go through `dst`'s
/// policy. The region must fit both datasets.
pub fn apply_unary_into<S, D, F>(
    src: &S,
    dst: &mut D,
    func: &F,
    scope: &Scope,
) -> OpsResult<TransformStats>
where
    S: Dataset + ?Sized,
    D: Dataset + ?Sized,
    F: UnaryFunction + ?Sized,
{
    let region = scope.resolve(src.dims())?;
    region.validate(dst.dims())?;
    debug!(
        samples = region.sample_count(),
        from = %src.data_type(),
        to = %dst.data_type(),
        "apply_unary_into"
    );

    let reader = DatasetReader::new(src);
    let mut writer = DatasetAccessor::new(dst);
    Ok(for_each_line(&region, &mut NoProgress, |pos| {
        writer.write(pos, func.compute(reader.read(pos)));
    }))
}

/// Combines two regions sample by sample into `dst` in place.
///
/// For each offset `o` within the common span,
/// `dst[dst_origin + o] = f(dst[dst_origin + o], src[src_origin + o])`.
/// Both regions must be valid for their datasets and have identical spans.
pub fn blit<D, S, F>(
    dst: &mut D,
    dst_region: &Region,
    src: &S,
    src_region: &Region,
    func: &F,
) -> OpsResult<TransformStats>
where
    D: Dataset + ?Sized,
    S: Dataset + ?Sized,
    F: BinaryFunction + ?Sized,
{
    dst_region.validate(dst.dims())?;
    src_region.validate(src.dims())?;
    check_spans(dst_region, src_region)?;
    debug!(samples = dst_region.sample_count(), "blit");

    let reader = DatasetReader::new(src);
    let mut acc = DatasetAccessor::new(dst);
    let mut src_pos = src_region.origin().to_vec();
    Ok(for_each_offset(dst_region, |offset, dst_pos| {
        translate(src_region.origin(), offset, &mut src_pos);
        let v = func.compute(acc.read(dst_pos), reader.read(&src_pos));
        acc.write(dst_pos, v);
    }))
}

/// Blits the whole of `src` into `dst` with its origin at `at`.
///
/// ```rust
/// use ij_core::{ArrayDataset, DataType, Dataset};
/// use ij_ops::engine::blit_at;
/// use ij_ops::function::BinaryOp;
///
/// let mut bg = ArrayDataset::from_fn(&[4, 4], DataType::U8, |_| 10.0).unwrap();
/// let fg = ArrayDataset::from_f64(&[2, 1], DataType::U8, &[0.0, 99.0]).unwrap();
/// blit_at(&mut bg, &[1, 2], &fg, &BinaryOp::CopyNonZero).unwrap();
/// assert_eq!(bg.get(&[1, 2]), 10.0);
/// assert_eq!(bg.get(&[2, 2]), 99.0);
/// ```
pub fn blit_at<D, S, F>(dst: &mut D, at: &[usize], src: &S, func: &F) -> OpsResult<TransformStats>
where
    D: Dataset + ?Sized,
    S: Dataset + ?Sized,
    F: BinaryFunction + ?Sized,
{
    let src_region = Region::whole(src.dims());
    let dst_region = Region::new(at.to_vec(), src.dims().to_vec());
    blit(dst, &dst_region, src, &src_region, func)
}

/// Combines regions of `a` and `b` into a region of a third dataset.
///
/// `out[o] = f(a[a_origin + o], b[b_origin + o])`. All three spans must match.
pub fn combine<A, B, D, F>(
    a: &A,
    a_region: &Region,
    b: &B,
    b_region: &Region,
    dst: &mut D,
    dst_region: &Region,
    func: &F,
) -> OpsResult<TransformStats>
where
    A: Dataset + ?Sized,
    B: Dataset + ?Sized,
    D: Dataset + ?Sized,
    F: BinaryFunction + ?Sized,
{
    a_region.validate(a.dims())?;
    b_region.validate(b.dims())?;
    dst_region.validate(dst.dims())?;
    check_spans(a_region, b_region)?;
    check_spans(a_region, dst_region)?;
    debug!(samples = dst_region.sample_count(), "combine");

    let ra = DatasetReader::new(a);
    let rb = DatasetReader::new(b);
    let mut writer = DatasetAccessor::new(dst);
    let mut a_pos = a_region.origin().to_vec();
    let mut b_pos = b_region.origin().to_vec();
    Ok(for_each_offset(dst_region, |offset, dst_pos| {
        translate(a_region.origin(), offset, &mut a_pos);
        translate(b_region.origin(), offset, &mut b_pos);
        writer.write(dst_pos, func.compute(ra.read(&a_pos), rb.read(&b_pos)));
    }))
}

fn check_spans(a: &Region, b: &Region) -> Result<(), Error> {
    if a.same_span(b) {
        Ok(())
    } else {
        Err(Error::span_mismatch(a.span(), b.span()))
    }
}

#[inline]
fn translate(origin: &[usize], offset: &[usize], out: &mut [usize]) {
    for ((o, d), p) in origin.iter().zip(offset).zip(out.iter_mut()) {
        *p = o + d;
    }
}

/// Visits every position of a validated region, a scanline at a time.
pub(crate) fn for_each_line(
    region: &Region,
    observer: &mut dyn ProgressObserver,
    mut visit: impl FnMut(&[usize]),
) -> TransformStats {
    let width = region.span()[0];
    let x0 = region.origin()[0];
    let mut starts = RegionIter::line_starts(region);
    let total = starts.total();
    let mut pos = region.origin().to_vec();
    let mut stats = TransformStats::default();

    while let Some(start) = starts.next_position() {
        pos.copy_from_slice(start);
        for x in x0..x0 + width {
            pos[0] = x;
            visit(&pos);
        }
        stats.visited += width;
        stats.lines += 1;
        observer.on_progress(stats.lines, total);
    }
    trace!(visited = stats.visited, lines = stats.lines, "region done");
    stats
}

/// Visits a validated region passing both the offset from its origin and
/// the absolute position.
fn for_each_offset(region: &Region, mut visit: impl FnMut(&[usize], &[usize])) -> TransformStats {
    let mut offsets = RegionIter::new(&Region::whole(region.span()));
    let mut pos = region.origin().to_vec();
    let mut stats = TransformStats::default();
    while let Some(offset) = offsets.next_position() {
        translate(region.origin(), offset, &mut pos);
        if offset[0] == 0 {
            stats.lines += 1;
        }
        visit(offset, &pos);
        stats.visited += 1;
    }
    stats
}
