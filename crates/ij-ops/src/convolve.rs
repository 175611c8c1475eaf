//! 3x3 convolution over the first two axes.
//!
//! Each output sample is the weighted sum of itself and its eight neighbours
//! in the XY plane, clamped through the dataset's bounds policy. Every plane
//! of the region is snapshotted before it is written, so outputs never feed
//! back into the neighbourhood of later samples.
//!
//! # Edge handling
//!
//! A neighbour that falls outside the region takes the value of the centre
//! sample. A flat plane therefore maps to `value * kernel.sum()` everywhere,
//! edges included.
//!
//! ```text
//!   region edge
//!   │ c c c        c = centre value substituted
//!   │ c[x]a        a, b = real neighbours
//!   │ c b b
//! ```
//!
//! # Example
//!
//! ```rust
//! use ij_core::{ArrayDataset, DataType, Dataset};
//! use ij_ops::convolve::{convolve3x3, Kernel3x3};
//! use ij_ops::engine::Scope;
//!
//! let mut ds = ArrayDataset::from_fn(&[5, 5], DataType::U8, |_| 10.0).unwrap();
//! convolve3x3(&mut ds, &Kernel3x3::SHARPEN, &Scope::all()).unwrap();
//! assert!(ds.to_f64_vec().iter().all(|&v| v == 40.0));
//! ```

use ij_core::{Dataset, Region, RegionIter};
use tracing::{debug, trace};

use crate::engine::{Scope, TransformStats};
use crate::progress::{NoProgress, ProgressObserver};
use crate::{OpsError, OpsResult};

/// Row-major 3x3 kernel weights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel3x3 {
    weights: [f64; 9],
}

impl Kernel3x3 {
    /// Flat sharpen: centre 12, all eight neighbours -1 (sum 4).
    pub const SHARPEN: Kernel3x3 = Kernel3x3::new([
        -1.0, -1.0, -1.0,
        -1.0, 12.0, -1.0,
        -1.0, -1.0, -1.0,
    ]);

    /// Leaves every sample unchanged.
    pub const IDENTITY: Kernel3x3 = Kernel3x3::new([
        0.0, 0.0, 0.0,
        0.0, 1.0, 0.0,
        0.0, 0.0, 0.0,
    ]);

    /// Creates a kernel from nine row-major weights.
    pub const fn new(weights: [f64; 9]) -> Self {
        Self { weights }
    }

    /// Creates a kernel from a slice, which must hold exactly nine finite weights.
    ///
    /// ```rust
    /// use ij_ops::convolve::Kernel3x3;
    ///
    /// assert!(Kernel3x3::from_slice(&[1.0; 9]).is_ok());
    /// assert!(Kernel3x3::from_slice(&[1.0; 8]).is_err());
    /// ```
    pub fn from_slice(weights: &[f64]) -> OpsResult<Self> {
        let arr: [f64; 9] = weights.try_into().map_err(|_| {
            OpsError::InvalidKernel(format!("expected 9 weights, got {}", weights.len()))
        })?;
        if arr.iter().any(|w| !w.is_finite()) {
            return Err(OpsError::InvalidKernel("weights must be finite".into()));
        }
        Ok(Self::new(arr))
    }

    /// Row-major weights.
    #[inline]
    pub fn weights(&self) -> &[f64; 9] {
        &self.weights
    }

    /// Weight for neighbour offset `(dx, dy)`, each in `-1..=1`.
    #[inline]
    pub fn weight(&self, dx: isize, dy: isize) -> f64 {
        self.weights[((dy + 1) * 3 + (dx + 1)) as usize]
    }

    /// Sum of all weights; the gain applied to a flat input.
    pub fn sum(&self) -> f64 {
        self.weights.iter().sum()
    }
}

/// Convolves every plane of `scope` in place.
pub fn convolve3x3<D>(
    dataset: &mut D,
    kernel: &Kernel3x3,
    scope: &Scope,
) -> OpsResult<TransformStats>
where
    D: Dataset + ?Sized,
{
    convolve3x3_observed(dataset, kernel, scope, &mut NoProgress)
}

/// [`convolve3x3`] with a progress callback per scanline.
pub fn convolve3x3_observed<D>(
    dataset: &mut D,
    kernel: &Kernel3x3,
    scope: &Scope,
    observer: &mut dyn ProgressObserver,
) -> OpsResult<TransformStats>
where
    D: Dataset + ?Sized,
{
    let region = scope.resolve(dataset.dims())?;
    let (width, height) = (region.span()[0], region.span()[1]);
    let total_lines = region.line_count();
    debug!(
        width,
        height,
        planes = total_lines / height,
        kernel_sum = kernel.sum(),
        "convolve3x3"
    );

    let policy = dataset.policy();
    let mut input = vec![0.0; width * height];
    let mut row = vec![0.0; width];
    let mut stats = TransformStats::default();
    let mut planes = plane_starts(&region);
    let mut pos = region.origin().to_vec();

    while let Some(start) = planes.next_position() {
        pos.copy_from_slice(start);
        read_plane(&*dataset, &mut pos, width, height, &mut input);
        for y in 0..height {
            convolve_row(&input, width, height, y, kernel, &mut row);
            pos[1] = region.origin()[1] + y;
            for (dx, &v) in row.iter().enumerate() {
                pos[0] = region.origin()[0] + dx;
                dataset.set(&pos, policy.apply(v));
            }
            stats.lines += 1;
            stats.visited += width;
            observer.on_progress(stats.lines, total_lines);
        }
        trace!(plane = ?&pos[2..], "plane convolved");
    }
    Ok(stats)
}

/// Iterates the first position of every XY plane in `region`.
pub(crate) fn plane_starts(region: &Region) -> RegionIter {
    let mut span = region.span().to_vec();
    span[0] = 1;
    span[1] = 1;
    RegionIter::new(&Region::new(region.origin().to_vec(), span))
}

/// Copies one `width x height` plane, starting at `pos`, into `out`.
///
/// `pos` is left pointing at the plane start.
pub(crate) fn read_plane<D: Dataset + ?Sized>(
    dataset: &D,
    pos: &mut [usize],
    width: usize,
    height: usize,
    out: &mut [f64],
) {
    let (x0, y0) = (pos[0], pos[1]);
    for y in 0..height {
        pos[1] = y0 + y;
        for x in 0..width {
            pos[0] = x0 + x;
            out[y * width + x] = dataset.get(pos);
        }
    }
    pos[0] = x0;
    pos[1] = y0;
}

/// Computes output row `y` of a frozen `width x height` plane.
pub(crate) fn convolve_row(
    input: &[f64],
    width: usize,
    height: usize,
    y: usize,
    kernel: &Kernel3x3,
    out: &mut [f64],
) {
    for (x, slot) in out.iter_mut().enumerate().take(width) {
        let center = input[y * width + x];
        let mut sum = 0.0;
        for dy in -1isize..=1 {
            for dx in -1isize..=1 {
                let nx = x as isize + dx;
                let ny = y as isize + dy;
                let inside = nx >= 0 && ny >= 0 && (nx as usize) < width && (ny as usize) < height;
                let v = if inside {
                    input[ny as usize * width + nx as usize]
                } else {
                    center
                };
                sum += kernel.weight(dx, dy) * v;
            }
        }
        *slot = sum;
    }
}
