//! The dataset abstraction consumed by the processing engines.
//!
//! This module provides:
//! - [`Dataset`] - Capability set every sample container offers: dimensions,
//!   sample get/set, duplication, whole-dataset copy
//! - [`ArrayDataset`] - Owned in-memory implementation backed by a typed
//!   [`Samples`] buffer
//! - [`Axis`] - Axis labels
//!
//! # Memory Layout
//!
//! [`ArrayDataset`] stores samples with axis 0 contiguous, then axis 1, and
//! so on. The linear index of position `p` is `sum(p[i] * stride[i])` with
//! `stride[0] = 1`:
//!
//! ```text
//! plane 0: [x0 x1 x2 ...]  ← y = 0
//!          [x0 x1 x2 ...]  ← y = 1
//! plane 1: ...
//! ```
//!
//! # Usage
//!
//! ```rust
//! use ij_core::{ArrayDataset, DataType, Dataset};
//!
//! let mut ds = ArrayDataset::new(&[4, 3], DataType::U8).unwrap();
//! ds.set(&[1, 2], 300.0);
//! assert_eq!(ds.get(&[1, 2]), 255.0);
//!
//! let copy = ds.duplicate();
//! assert_eq!(copy.get(&[1, 2]), 255.0);
//! ```

use std::fmt;

use crate::{BoundsPolicy, DataType, Error, Region, RegionIter, Result};

/// Label of one dataset axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    /// Horizontal image axis.
    X,
    /// Vertical image axis.
    Y,
    /// Depth / slice axis.
    Z,
    /// Channel axis.
    Channel,
    /// Time axis.
    Time,
    /// Any other labelled axis.
    Other(String),
}

impl Axis {
    /// Conventional labels for a dataset of `rank` axes.
    pub fn defaults(rank: usize) -> Vec<Axis> {
        (0..rank)
            .map(|i| match i {
                0 => Axis::X,
                1 => Axis::Y,
                2 => Axis::Z,
                3 => Axis::Channel,
                4 => Axis::Time,
                n => Axis::Other(format!("d{n}")),
            })
            .collect()
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => f.write_str("X"),
            Axis::Y => f.write_str("Y"),
            Axis::Z => f.write_str("Z"),
            Axis::Channel => f.write_str("Channel"),
            Axis::Time => f.write_str("Time"),
            Axis::Other(name) => f.write_str(name),
        }
    }
}

/// An n-dimensional array of real samples of one declared type.
///
/// `get` and `set` may assume `pos` is in bounds; the engines validate every
/// region before iterating it. Use [`check_position`] for untrusted input.
pub trait Dataset {
    /// Extent per axis. Always at least two axes.
    fn dims(&self) -> &[usize];

    /// Declared sample type.
    fn data_type(&self) -> DataType;

    /// Axis labels, one per dimension.
    fn axes(&self) -> &[Axis];

    /// Reads the sample at `pos` as a real value.
    fn get(&self, pos: &[usize]) -> f64;

    /// Stores `value` at `pos`, narrowing to the declared type.
    fn set(&mut self, pos: &[usize], value: f64);

    /// Deep copy.
    fn duplicate(&self) -> Self
    where
        Self: Sized;

    /// Number of axes.
    fn rank(&self) -> usize {
        self.dims().len()
    }

    /// Total number of samples.
    fn sample_count(&self) -> usize {
        self.dims().iter().product()
    }

    /// Bounds policy derived from [`data_type`](Self::data_type).
    fn policy(&self) -> BoundsPolicy {
        BoundsPolicy::for_type(self.data_type())
    }

    /// Overwrites every sample from `other`.
    ///
    /// Fails with [`Error::DimensionMismatch`] before writing anything if the
    /// dimensions differ. Values pass through this dataset's policy.
    fn copy_from(&mut self, other: &dyn Dataset) -> Result<()> {
        if self.dims() != other.dims() {
            return Err(Error::dimension_mismatch(self.dims(), other.dims()));
        }
        let policy = self.policy();
        let mut iter = RegionIter::new(&Region::whole(other.dims()));
        while let Some(pos) = iter.next_position() {
            self.set(pos, policy.apply(other.get(pos)));
        }
        Ok(())
    }

    /// Overwrites every sample of `other` from this dataset.
    fn copy_into(&self, other: &mut dyn Dataset) -> Result<()>
    where
        Self: Sized,
    {
        other.copy_from(self)
    }

    /// Borrows the backing store as `f64` samples.
    ///
    /// Only datasets that keep `f64` storage can offer this.
    fn as_f64_slice(&self) -> Result<&[f64]> {
        Err(Error::unsupported("raw f64 access"))
    }
}

/// Checks that `pos` addresses a sample inside `dims`.
pub fn check_position(dims: &[usize], pos: &[usize]) -> Result<()> {
    if pos.len() != dims.len() {
        return Err(Error::RankMismatch {
            expected: dims.len(),
            got: pos.len(),
        });
    }
    for (axis, (&p, &extent)) in pos.iter().zip(dims).enumerate() {
        if p >= extent {
            return Err(Error::RegionOutOfBounds {
                axis,
                origin: p,
                span: 1,
                extent,
            });
        }
    }
    Ok(())
}

/// Typed sample storage.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    /// 8-bit signed samples.
    I8(Vec<i8>),
    /// 8-bit unsigned samples.
    U8(Vec<u8>),
    /// 16-bit signed samples.
    I16(Vec<i16>),
    /// 16-bit unsigned samples.
    U16(Vec<u16>),
    /// 32-bit signed samples.
    I32(Vec<i32>),
    /// 32-bit unsigned samples.
    U32(Vec<u32>),
    /// 32-bit float samples.
    F32(Vec<f32>),
    /// 64-bit float samples.
    F64(Vec<f64>),
}

impl Samples {
    /// Zero-filled storage of `len` samples.
    pub fn zeros(data_type: DataType, len: usize) -> Self {
        match data_type {
            DataType::I8 => Self::I8(vec![0; len]),
            DataType::U8 => Self::U8(vec![0; len]),
            DataType::I16 => Self::I16(vec![0; len]),
            DataType::U16 => Self::U16(vec![0; len]),
            DataType::I32 => Self::I32(vec![0; len]),
            DataType::U32 => Self::U32(vec![0; len]),
            DataType::F32 => Self::F32(vec![0.0; len]),
            DataType::F64 => Self::F64(vec![0.0; len]),
        }
    }

    /// Type of the stored samples.
    pub fn data_type(&self) -> DataType {
        match self {
            Self::I8(_) => DataType::I8,
            Self::U8(_) => DataType::U8,
            Self::I16(_) => DataType::I16,
            Self::U16(_) => DataType::U16,
            Self::I32(_) => DataType::I32,
            Self::U32(_) => DataType::U32,
            Self::F32(_) => DataType::F32,
            Self::F64(_) => DataType::F64,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        match self {
            Self::I8(v) => v.len(),
            Self::U8(v) => v.len(),
            Self::I16(v) => v.len(),
            Self::U16(v) => v.len(),
            Self::I32(v) => v.len(),
            Self::U32(v) => v.len(),
            Self::F32(v) => v.len(),
            Self::F64(v) => v.len(),
        }
    }

    /// Returns `true` if there are no samples.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reads sample `idx` as `f64`.
    #[inline]
    pub fn get(&self, idx: usize) -> f64 {
        match self {
            Self::I8(v) => v[idx] as f64,
            Self::U8(v) => v[idx] as f64,
            Self::I16(v) => v[idx] as f64,
            Self::U16(v) => v[idx] as f64,
            Self::I32(v) => v[idx] as f64,
            Self::U32(v) => v[idx] as f64,
            Self::F32(v) => v[idx] as f64,
            Self::F64(v) => v[idx],
        }
    }

    /// Stores `value` at `idx`.
    ///
    /// Float-to-integer `as` casts truncate toward zero and saturate at the
    /// type limits (NaN stores 0), matching [`BoundsPolicy`]'s default.
    #[inline]
    pub fn set(&mut self, idx: usize, value: f64) {
        match self {
            Self::I8(v) => v[idx] = value as i8,
            Self::U8(v) => v[idx] = value as u8,
            Self::I16(v) => v[idx] = value as i16,
            Self::U16(v) => v[idx] = value as u16,
            Self::I32(v) => v[idx] = value as i32,
            Self::U32(v) => v[idx] = value as u32,
            Self::F32(v) => v[idx] = value as f32,
            Self::F64(v) => v[idx] = value,
        }
    }

    /// Copies all samples out as `f64`.
    pub fn to_f64(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.get(i)).collect()
    }
}

/// Owned in-memory dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayDataset {
    dims: Vec<usize>,
    strides: Vec<usize>,
    axes: Vec<Axis>,
    samples: Samples,
}

impl ArrayDataset {
    /// Creates a zero-filled dataset.
    ///
    /// Requires at least two axes, a non-zero extent on every axis and a
    /// sample count that fits in `usize`.
    pub fn new(dims: &[usize], data_type: DataType) -> Result<Self> {
        let len = checked_len(dims)?;
        Ok(Self {
            dims: dims.to_vec(),
            strides: strides_for(dims),
            axes: Axis::defaults(dims.len()),
            samples: Samples::zeros(data_type, len),
        })
    }

    /// Creates a dataset from raw values in storage order.
    ///
    /// Each value passes through the type's [`BoundsPolicy`].
    pub fn from_f64(dims: &[usize], data_type: DataType, values: &[f64]) -> Result<Self> {
        let mut ds = Self::new(dims, data_type)?;
        if values.len() != ds.samples.len() {
            return Err(Error::invalid_dimensions(
                dims,
                format!("expected {} values, got {}", ds.samples.len(), values.len()),
            ));
        }
        let policy = ds.policy();
        for (i, &v) in values.iter().enumerate() {
            ds.samples.set(i, policy.apply(v));
        }
        Ok(ds)
    }

    /// Creates a dataset by evaluating `f` at every position.
    ///
    /// ```rust
    /// use ij_core::{ArrayDataset, DataType, Dataset};
    ///
    /// let ramp = ArrayDataset::from_fn(&[4, 2], DataType::U16, |p| (p[0] + 10 * p[1]) as f64)
    ///     .unwrap();
    /// assert_eq!(ramp.get(&[3, 1]), 13.0);
    /// ```
    pub fn from_fn(
        dims: &[usize],
        data_type: DataType,
        mut f: impl FnMut(&[usize]) -> f64,
    ) -> Result<Self> {
        let mut ds = Self::new(dims, data_type)?;
        let policy = ds.policy();
        let mut iter = RegionIter::new(&Region::whole(dims));
        while let Some(pos) = iter.next_position() {
            let idx = ds.index_of(pos);
            ds.samples.set(idx, policy.apply(f(pos)));
        }
        Ok(ds)
    }

    /// Replaces the axis labels.
    pub fn with_axes(mut self, axes: Vec<Axis>) -> Result<Self> {
        if axes.len() != self.dims.len() {
            return Err(Error::RankMismatch {
                expected: self.dims.len(),
                got: axes.len(),
            });
        }
        self.axes = axes;
        Ok(self)
    }

    /// Linear storage index of `pos`.
    #[inline]
    pub fn index_of(&self, pos: &[usize]) -> usize {
        pos.iter().zip(&self.strides).map(|(p, s)| p * s).sum()
    }

    /// All samples as `f64`, in storage order.
    pub fn to_f64_vec(&self) -> Vec<f64> {
        self.samples.to_f64()
    }

    /// Reads a sample after checking `pos`.
    pub fn try_get(&self, pos: &[usize]) -> Result<f64> {
        check_position(&self.dims, pos)?;
        Ok(self.get(pos))
    }

    /// Number of 2-D planes (product of axes beyond the first two).
    pub fn plane_count(&self) -> usize {
        self.dims.iter().skip(2).product()
    }
}

impl Dataset for ArrayDataset {
    #[inline]
    fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    fn data_type(&self) -> DataType {
        self.samples.data_type()
    }

    fn axes(&self) -> &[Axis] {
        &self.axes
    }

    #[inline]
    fn get(&self, pos: &[usize]) -> f64 {
        self.samples.get(self.index_of(pos))
    }

    #[inline]
    fn set(&mut self, pos: &[usize], value: f64) {
        let idx = self.index_of(pos);
        self.samples.set(idx, value);
    }

    fn duplicate(&self) -> Self {
        self.clone()
    }

    fn copy_from(&mut self, other: &dyn Dataset) -> Result<()> {
        if self.dims != other.dims() {
            return Err(Error::dimension_mismatch(&self.dims, other.dims()));
        }
        if other.data_type() == self.data_type() {
            if let Ok(src) = other.as_f64_slice() {
                if let Samples::F64(dst) = &mut self.samples {
                    dst.copy_from_slice(src);
                    return Ok(());
                }
            }
        }
        let policy = self.policy();
        let mut iter = RegionIter::new(&Region::whole(other.dims()));
        while let Some(pos) = iter.next_position() {
            let idx = self.index_of(pos);
            self.samples.set(idx, policy.apply(other.get(pos)));
        }
        Ok(())
    }

    fn as_f64_slice(&self) -> Result<&[f64]> {
        match &self.samples {
            Samples::F64(v) => Ok(v),
            other => Err(Error::unsupported(format!(
                "raw f64 access on {} storage",
                other.data_type()
            ))),
        }
    }
}

fn checked_len(dims: &[usize]) -> Result<usize> {
    if dims.len() < 2 {
        return Err(Error::invalid_dimensions(dims, "at least two axes required"));
    }
    if dims.contains(&0) {
        return Err(Error::invalid_dimensions(dims, "every axis needs at least one sample"));
    }
    dims.iter()
        .try_fold(1usize, |acc, &d| acc.checked_mul(d))
        .ok_or_else(|| Error::invalid_dimensions(dims, "sample count overflows"))
}

fn strides_for(dims: &[usize]) -> Vec<usize> {
    let mut strides = Vec::with_capacity(dims.len());
    let mut stride = 1;
    for &d in dims {
        strides.push(stride);
        stride *= d;
    }
    strides
}
