//! Parallel engine paths using Rayon.
//!
//! Point operations and 3x3 convolution have no output-to-output
//! dependencies, so scanlines are computed in parallel. Each worker reads
//! the frozen input through its own [`DatasetReader`] and fills its own
//! output row; the rows are then committed to the dataset on the calling
//! thread, which is also where progress is reported.
//!
//! Point operations are processed in batches of scanlines so the result
//! buffer stays bounded for very large datasets.
//!
//! # Example
//!
//! ```rust
//! use ij_core::{ArrayDataset, DataType, Dataset};
//! use ij_ops::engine::Scope;
//! use ij_ops::function::UnaryOp;
//! use ij_ops::parallel;
//!
//! let mut ds = ArrayDataset::new(&[256, 256], DataType::U8).unwrap();
//! parallel::apply_unary(&mut ds, &UnaryOp::Fill(3.0), &Scope::all(), None).unwrap();
//! assert_eq!(ds.get(&[255, 255]), 3.0);
//! ```

use ij_core::{Dataset, DatasetReader, RegionIter, SampleReader};
use rayon::prelude::*;
use tracing::debug;

use crate::convolve::{convolve_row, plane_starts, read_plane, Kernel3x3};
use crate::engine::{Scope, TransformStats};
use crate::function::UnaryFunction;
use crate::progress::{NoProgress, ProgressObserver};
use crate::OpsResult;

/// Scanlines computed per parallel batch.
const LINES_PER_BATCH: usize = 256;

/// Parallel version of [`engine::apply_unary`](crate::engine::apply_unary).
pub fn apply_unary<D, F>(
    dataset: &mut D,
    func: &F,
    scope: &Scope,
    observer: Option<&mut dyn ProgressObserver>,
) -> OpsResult<TransformStats>
where
    D: Dataset + Sync + ?Sized,
    F: UnaryFunction + Sync + ?Sized,
{
    let region = scope.resolve(dataset.dims())?;
    let mut fallback = NoProgress;
    let observer = observer.unwrap_or(&mut fallback);
    let width = region.span()[0];
    let x0 = region.origin()[0];
    let policy = dataset.policy();
    debug!(
        samples = region.sample_count(),
        threads = rayon::current_num_threads(),
        "parallel apply_unary"
    );

    let mut starts = RegionIter::line_starts(&region);
    let total = starts.total();
    let mut batch: Vec<Vec<usize>> = Vec::with_capacity(LINES_PER_BATCH.min(total));
    let mut out = vec![0.0; width * LINES_PER_BATCH.min(total)];
    let mut stats = TransformStats::default();

    loop {
        batch.clear();
        while batch.len() < LINES_PER_BATCH {
            match starts.next_position() {
                Some(p) => batch.push(p.to_vec()),
                None => break,
            }
        }
        if batch.is_empty() {
            break;
        }

        let frozen: &D = dataset;
        out[..batch.len() * width]
            .par_chunks_mut(width)
            .zip(batch.par_iter())
            .for_each(|(row, start)| {
                let reader = DatasetReader::new(frozen);
                let mut pos = start.clone();
                for (i, slot) in row.iter_mut().enumerate() {
                    pos[0] = x0 + i;
                    *slot = policy.apply(func.compute(reader.read(&pos)));
                }
            });

        for (line, start) in batch.iter_mut().enumerate() {
            for i in 0..width {
                start[0] = x0 + i;
                dataset.set(start, out[line * width + i]);
            }
            stats.lines += 1;
            stats.visited += width;
            observer.on_progress(stats.lines, total);
        }
    }
    Ok(stats)
}

/// Parallel version of [`convolve3x3`](crate::convolve::convolve3x3).
pub fn convolve3x3<D>(
    dataset: &mut D,
    kernel: &Kernel3x3,
    scope: &Scope,
    observer: Option<&mut dyn ProgressObserver>,
) -> OpsResult<TransformStats>
where
    D: Dataset + ?Sized,
{
    let region = scope.resolve(dataset.dims())?;
    let mut fallback = NoProgress;
    let observer = observer.unwrap_or(&mut fallback);
    let (width, height) = (region.span()[0], region.span()[1]);
    let total = region.line_count();
    let policy = dataset.policy();
    debug!(width, height, kernel_sum = kernel.sum(), "parallel convolve3x3");

    let mut input = vec![0.0; width * height];
    let mut output = vec![0.0; width * height];
    let mut stats = TransformStats::default();
    let mut planes = plane_starts(&region);
    let mut pos = region.origin().to_vec();

    while let Some(start) = planes.next_position() {
        pos.copy_from_slice(start);
        read_plane(&*dataset, &mut pos, width, height, &mut input);

        let frozen = &input;
        output
            .par_chunks_mut(width)
            .enumerate()
            .for_each(|(y, row)| convolve_row(frozen, width, height, y, kernel, row));

        for y in 0..height {
            pos[1] = region.origin()[1] + y;
            for x in 0..width {
                pos[0] = region.origin()[0] + x;
                dataset.set(&pos, policy.apply(output[y * width + x]));
            }
            stats.lines += 1;
            stats.visited += width;
            observer.on_progress(stats.lines, total);
        }
    }
    Ok(stats)
}
