//! High-level operations on datasets.
//!
//! One-call wrappers around the engines that pick the sequential or
//! parallel path from an [`EngineConfig`], plus the named operations that
//! interactive tools expose directly (clamp-min, sharpen, invert, rotate,
//! type conversion).
//!
//! # Example
//!
//! ```rust
//! use ij_core::{ArrayDataset, DataType, Dataset};
//! use ij_ops::dataset_ops::{clamp_min, convert, sharpen};
//! use ij_ops::{EngineConfig, Scope};
//!
//! let cfg = EngineConfig::default();
//! let mut ds = ArrayDataset::from_fn(&[32, 32], DataType::U8, |p| p[0] as f64).unwrap();
//!
//! clamp_min(&mut ds, 10.0, &Scope::all(), &cfg).unwrap();
//! sharpen(&mut ds, &Scope::all(), &cfg).unwrap();
//! let float = convert(&ds, DataType::F32).unwrap();
//! assert_eq!(float.data_type(), DataType::F32);
//! ```

use ij_core::{ArrayDataset, DataType, Dataset};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::convolve::{self, Kernel3x3};
use crate::engine::{self, Scope, TransformStats};
use crate::function::{UnaryFunction, UnaryOp};
use crate::geometry::{self, Reorient};
use crate::progress::{NoProgress, ProgressObserver};
use crate::OpsResult;

/// Summary statistics over a region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DatasetStats {
    /// Samples visited.
    pub count: usize,
    /// Smallest sample.
    pub min: f64,
    /// Largest sample.
    pub max: f64,
    /// Arithmetic mean.
    pub mean: f64,
}

/// Applies a unary function in place.
pub fn apply<D, F>(
    dataset: &mut D,
    func: &F,
    scope: &Scope,
    config: &EngineConfig,
) -> OpsResult<TransformStats>
where
    D: Dataset + Sync + ?Sized,
    F: UnaryFunction + Sync + ?Sized,
{
    apply_observed(dataset, func, scope, config, &mut NoProgress)
}

/// [`apply`] with a progress observer.
pub fn apply_observed<D, F>(
    dataset: &mut D,
    func: &F,
    scope: &Scope,
    config: &EngineConfig,
    observer: &mut dyn ProgressObserver,
) -> OpsResult<TransformStats>
where
    D: Dataset + Sync + ?Sized,
    F: UnaryFunction + Sync + ?Sized,
{
    let samples = scope.resolve(dataset.dims())?.sample_count();
    #[cfg(feature = "parallel")]
    if config.use_parallel(samples) {
        return crate::parallel::apply_unary(dataset, func, scope, Some(observer));
    }
    debug!(samples, parallel = config.use_parallel(samples), "apply");
    engine::apply_unary_observed(dataset, func, scope, observer)
}

/// Convolves with a 3x3 kernel in place.
pub fn convolve<D>(
    dataset: &mut D,
    kernel: &Kernel3x3,
    scope: &Scope,
    config: &EngineConfig,
) -> OpsResult<TransformStats>
where
    D: Dataset + ?Sized,
{
    convolve_observed(dataset, kernel, scope, config, &mut NoProgress)
}

/// [`convolve`] with a progress observer.
pub fn convolve_observed<D>(
    dataset: &mut D,
    kernel: &Kernel3x3,
    scope: &Scope,
    config: &EngineConfig,
    observer: &mut dyn ProgressObserver,
) -> OpsResult<TransformStats>
where
    D: Dataset + ?Sized,
{
    let samples = scope.resolve(dataset.dims())?.sample_count();
    #[cfg(feature = "parallel")]
    if config.use_parallel(samples) {
        return crate::parallel::convolve3x3(dataset, kernel, scope, Some(observer));
    }
    debug!(samples, parallel = config.use_parallel(samples), "convolve");
    convolve::convolve3x3_observed(dataset, kernel, scope, observer)
}

/// Raises every sample below `min` to `min`.
pub fn clamp_min<D>(
    dataset: &mut D,
    min: f64,
    scope: &Scope,
    config: &EngineConfig,
) -> OpsResult<TransformStats>
where
    D: Dataset + Sync + ?Sized,
{
    apply(dataset, &UnaryOp::ClampMin(min), scope, config)
}

/// Applies the flat sharpen kernel.
pub fn sharpen<D>(
    dataset: &mut D,
    scope: &Scope,
    config: &EngineConfig,
) -> OpsResult<TransformStats>
where
    D: Dataset + ?Sized,
{
    convolve(dataset, &Kernel3x3::SHARPEN, scope, config)
}

/// Inverts sample values.
///
/// Integral types invert over the full type range. Float types have no
/// meaningful type range, so they invert over the data range of the scope.
///
/// ```rust
/// use ij_core::{ArrayDataset, DataType, Dataset};
/// use ij_ops::dataset_ops::invert;
/// use ij_ops::{EngineConfig, Scope};
///
/// let mut ds = ArrayDataset::from_f64(&[2, 1], DataType::U8, &[0.0, 200.0]).unwrap();
/// invert(&mut ds, &Scope::all(), &EngineConfig::default()).unwrap();
/// assert_eq!(ds.to_f64_vec(), vec![255.0, 55.0]);
///
/// let mut ds = ArrayDataset::from_f64(&[2, 1], DataType::F32, &[0.5, 2.0]).unwrap();
/// invert(&mut ds, &Scope::all(), &EngineConfig::default()).unwrap();
/// assert_eq!(ds.to_f64_vec(), vec![2.0, 0.5]);
/// ```
pub fn invert<D>(dataset: &mut D, scope: &Scope, config: &EngineConfig) -> OpsResult<TransformStats>
where
    D: Dataset + Sync + ?Sized,
{
    let data_type = dataset.data_type();
    let op = if data_type.is_integral() {
        UnaryOp::invert_for(data_type)
    } else {
        let s = stats(dataset, scope)?;
        UnaryOp::Invert { min: s.min, max: s.max }
    };
    apply(dataset, &op, scope, config)
}

/// Rotates the XY plane 90 degrees counter-clockwise into a new dataset.
pub fn rotate_left<S: Dataset + ?Sized>(src: &S) -> OpsResult<ArrayDataset> {
    reorient(src, Reorient::RotateLeft)
}

/// Rotates the XY plane 90 degrees clockwise into a new dataset.
pub fn rotate_right<S: Dataset + ?Sized>(src: &S) -> OpsResult<ArrayDataset> {
    reorient(src, Reorient::RotateRight)
}

/// Applies any [`Reorient`] into a new dataset, keeping axis labels.
pub fn reorient<S: Dataset + ?Sized>(src: &S, op: Reorient) -> OpsResult<ArrayDataset> {
    let out = geometry::transform(src, &op)?;
    Ok(out.with_axes(src.axes().to_vec())?)
}

/// Copies `src` into a new dataset of another sample type.
///
/// Every value passes through the target type's bounds policy. Axis labels
/// are kept.
pub fn convert<S: Dataset>(src: &S, target: DataType) -> OpsResult<ArrayDataset> {
    let from = src.data_type();
    if !from.is_integral() && target.is_integral() {
        warn!(%from, to = %target, "lossy conversion: fractions truncated, values clamped");
    } else if from.bits() > target.bits() || (from.is_signed() && !target.is_signed()) {
        debug!(%from, to = %target, "narrowing conversion");
    }
    let mut dst = ArrayDataset::new(src.dims(), target)?.with_axes(src.axes().to_vec())?;
    dst.copy_from(src)?;
    Ok(dst)
}

/// Min, max and mean over the resolved scope.
pub fn stats<D: Dataset + ?Sized>(dataset: &D, scope: &Scope) -> OpsResult<DatasetStats> {
    let region = scope.resolve(dataset.dims())?;
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    let mut sum = 0.0;
    let report = engine::for_each_line(&region, &mut NoProgress, |pos| {
        let v = dataset.get(pos);
        min = min.min(v);
        max = max.max(v);
        sum += v;
    });
    let count = report.visited;
    Ok(DatasetStats {
        count,
        min,
        max,
        mean: sum / count as f64,
    })
}
