//! Per-task sample accessors.
//!
//! An accessor decouples an engine from the storage behind a [`Dataset`].
//! Writers always route values through a [`BoundsPolicy`], so a function's
//! raw output never reaches an integral dataset unclamped.
//!
//! Accessors are cheap, borrow their dataset, and are not shared: each worker
//! creates its own. Concurrent readers each hold a [`DatasetReader`] over the
//! same `&D`; writing is exclusive through [`DatasetAccessor`].

use crate::{BoundsPolicy, Dataset};

/// Read side of an accessor.
pub trait SampleReader {
    /// Reads the sample at `pos`.
    fn read(&self, pos: &[usize]) -> f64;
}

/// Read/write accessor.
pub trait SampleAccessor: SampleReader {
    /// Writes `value` at `pos` after applying the accessor's bounds policy.
    fn write(&mut self, pos: &[usize], value: f64);
}

/// Shared read-only accessor.
#[derive(Debug)]
pub struct DatasetReader<'a, D: ?Sized> {
    dataset: &'a D,
}

impl<'a, D: Dataset + ?Sized> DatasetReader<'a, D> {
    /// Binds a reader to `dataset`.
    #[inline]
    pub fn new(dataset: &'a D) -> Self {
        Self { dataset }
    }
}

impl<D: Dataset + ?Sized> SampleReader for DatasetReader<'_, D> {
    #[inline]
    fn read(&self, pos: &[usize]) -> f64 {
        self.dataset.get(pos)
    }
}

/// Exclusive accessor that clamps on write.
#[derive(Debug)]
pub struct DatasetAccessor<'a, D: ?Sized> {
    dataset: &'a mut D,
    policy: BoundsPolicy,
}

impl<'a, D: Dataset + ?Sized> DatasetAccessor<'a, D> {
    /// Binds an accessor using the dataset's own type policy.
    #[inline]
    pub fn new(dataset: &'a mut D) -> Self {
        let policy = dataset.policy();
        Self { dataset, policy }
    }

    /// Binds an accessor with an explicit policy.
    #[inline]
    pub fn with_policy(dataset: &'a mut D, policy: BoundsPolicy) -> Self {
        Self { dataset, policy }
    }

    /// Policy applied on every write.
    #[inline]
    pub fn policy(&self) -> BoundsPolicy {
        self.policy
    }
}

impl<D: Dataset + ?Sized> SampleReader for DatasetAccessor<'_, D> {
    #[inline]
    fn read(&self, pos: &[usize]) -> f64 {
        self.dataset.get(pos)
    }
}

impl<D: Dataset + ?Sized> SampleAccessor for DatasetAccessor<'_, D> {
    #[inline]
    fn write(&mut self, pos: &[usize], value: f64) {
        self.dataset.set(pos, self.policy.apply(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ArrayDataset, DataType, Rounding};

    #[test]
    fn test_write_applies_policy() {
        let mut ds = ArrayDataset::new(&[2, 2], DataType::U8).unwrap();
        {
            let mut acc = DatasetAccessor::new(&mut ds);
            acc.write(&[0, 0], 69.6);
            acc.write(&[1, 0], -4.0);
            acc.write(&[0, 1], 1024.0);
            assert_eq!(acc.read(&[0, 0]), 69.0);
        }
        assert_eq!(ds.to_f64_vec(), vec![69.0, 0.0, 255.0, 0.0]);
    }

    #[test]
    fn test_custom_policy() {
        let mut ds = ArrayDataset::new(&[1, 1], DataType::U8).unwrap();
        let policy = ds.policy().with_rounding(Rounding::Nearest);
        let mut acc = DatasetAccessor::with_policy(&mut ds, policy);
        acc.write(&[0, 0], 69.6);
        assert_eq!(acc.read(&[0, 0]), 70.0);
    }

    #[test]
    fn test_readers_share_dataset() {
        let ds = ArrayDataset::from_fn(&[3, 1], DataType::I16, |p| p[0] as f64 - 1.0).unwrap();
        let a = DatasetReader::new(&ds);
        let b = DatasetReader::new(&ds);
        assert_eq!(a.read(&[0, 0]), -1.0);
        assert_eq!(b.read(&[2, 0]), 1.0);
    }
}
