//! Geometric transformations: 90-degree rotations and flips.
//!
//! A [`CoordinateTransformer`] maps input positions to output positions and
//! says how the output dimensions follow from the input ones. The engine in
//! [`transform`] walks every input sample and copies it to its mapped
//! position through the output type's bounds policy.
//!
//! Only the first two axes move; higher axes pass through unchanged.
//!
//! # Operations
//!
//! - [`Reorient::RotateLeft`] - 90 degrees counter-clockwise
//! - [`Reorient::RotateRight`] - 90 degrees clockwise
//! - [`Reorient::Rotate180`] - half turn
//! - [`Reorient::FlipHorizontal`] / [`Reorient::FlipVertical`] - mirrors
//!
//! # Example
//!
//! ```rust
//! use ij_core::{ArrayDataset, DataType, Dataset};
//! use ij_ops::geometry::{transform, Reorient};
//!
//! // 3x2 image:  0 1 2
//! //             3 4 5
//! let src = ArrayDataset::from_f64(&[3, 2], DataType::U8, &[0., 1., 2., 3., 4., 5.]).unwrap();
//! let left = transform(&src, &Reorient::RotateLeft).unwrap();
//!
//! // 2x3 image:  2 5
//! //             1 4
//! //             0 3
//! assert_eq!(left.dims(), &[2, 3]);
//! assert_eq!(left.to_f64_vec(), vec![2., 5., 1., 4., 0., 3.]);
//! ```

use ij_core::{ArrayDataset, Dataset, DatasetAccessor, Error, Region, RegionIter, SampleAccessor};
use tracing::debug;

use crate::OpsResult;

/// Maps positions between an input and an output dataset.
pub trait CoordinateTransformer {
    /// Output dimensions for a given input shape.
    fn output_dims(&self, input_dims: &[usize]) -> Vec<usize>;

    /// Writes the output position of input position `input` into `output`.
    fn map(&self, input_dims: &[usize], input: &[usize], output: &mut [usize]);

    /// Writes the input position that lands on `output` into `input`.
    fn inverse(&self, input_dims: &[usize], output: &[usize], input: &mut [usize]);

    /// `true` if output dimensions always equal input dimensions.
    fn is_shape_preserving(&self) -> bool;
}

/// Axis-aligned reorientations of the XY plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Reorient {
    /// 90 degrees counter-clockwise.
    RotateLeft,
    /// 90 degrees clockwise.
    RotateRight,
    /// 180 degrees.
    Rotate180,
    /// Mirror left-right.
    FlipHorizontal,
    /// Mirror top-bottom.
    FlipVertical,
}

impl Reorient {
    /// The transform that undoes this one.
    pub fn inverse_op(&self) -> Reorient {
        match self {
            Self::RotateLeft => Self::RotateRight,
            Self::RotateRight => Self::RotateLeft,
            other => *other,
        }
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RotateLeft => "rotate-left",
            Self::RotateRight => "rotate-right",
            Self::Rotate180 => "rotate-180",
            Self::FlipHorizontal => "flip-horizontal",
            Self::FlipVertical => "flip-vertical",
        }
    }
}

impl CoordinateTransformer for Reorient {
    fn output_dims(&self, input_dims: &[usize]) -> Vec<usize> {
        let mut dims = input_dims.to_vec();
        if !self.is_shape_preserving() && dims.len() >= 2 {
            dims.swap(0, 1);
        }
        dims
    }

    fn map(&self, input_dims: &[usize], input: &[usize], output: &mut [usize]) {
        output.copy_from_slice(input);
        let (w, h) = (input_dims[0], input_dims[1]);
        let (x, y) = (input[0], input[1]);
        let (ox, oy) = match self {
            Self::RotateLeft => (y, w - 1 - x),
            Self::RotateRight => (h - 1 - y, x),
            Self::Rotate180 => (w - 1 - x, h - 1 - y),
            Self::FlipHorizontal => (w - 1 - x, y),
            Self::FlipVertical => (x, h - 1 - y),
        };
        output[0] = ox;
        output[1] = oy;
    }

    fn inverse(&self, input_dims: &[usize], output: &[usize], input: &mut [usize]) {
        input.copy_from_slice(output);
        let (w, h) = (input_dims[0], input_dims[1]);
        let (ox, oy) = (output[0], output[1]);
        let (x, y) = match self {
            Self::RotateLeft => (w - 1 - oy, ox),
            Self::RotateRight => (oy, h - 1 - ox),
            Self::Rotate180 => (w - 1 - ox, h - 1 - oy),
            Self::FlipHorizontal => (w - 1 - ox, oy),
            Self::FlipVertical => (ox, h - 1 - oy),
        };
        input[0] = x;
        input[1] = y;
    }

    fn is_shape_preserving(&self) -> bool {
        !matches!(self, Self::RotateLeft | Self::RotateRight)
    }
}

/// Applies `transformer` to `src`, producing a new dataset of the same type.
pub fn transform<S, T>(src: &S, transformer: &T) -> OpsResult<ArrayDataset>
where
    S: Dataset + ?Sized,
    T: CoordinateTransformer + ?Sized,
{
    let dims = transformer.output_dims(src.dims());
    let mut dst = ArrayDataset::new(&dims, src.data_type())?;
    transform_into(src, transformer, &mut dst)?;
    Ok(dst)
}

/// Applies `transformer` to `src`, writing into an existing dataset.
///
/// `dst` must have exactly the transformer's output dimensions.
pub fn transform_into<S, T, D>(src: &S, transformer: &T, dst: &mut D) -> OpsResult<()>
where
    S: Dataset + ?Sized,
    T: CoordinateTransformer + ?Sized,
    D: Dataset + ?Sized,
{
    let in_dims = src.dims().to_vec();
    if in_dims.len() < 2 {
        return Err(Error::invalid_dimensions(&in_dims, "at least two axes required").into());
    }
    let out_dims = transformer.output_dims(&in_dims);
    if dst.dims() != out_dims.as_slice() {
        return Err(Error::dimension_mismatch(&out_dims, dst.dims()).into());
    }
    debug!(
        input = ?in_dims,
        output = ?out_dims,
        shape_preserving = transformer.is_shape_preserving(),
        "geometric transform"
    );

    let mut acc = DatasetAccessor::new(dst);
    let mut out = vec![0; in_dims.len()];
    let mut iter = RegionIter::new(&Region::whole(&in_dims));
    while let Some(pos) = iter.next_position() {
        transformer.map(&in_dims, pos, &mut out);
        acc.write(&out, src.get(pos));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ij_core::DataType;

    fn numbered(dims: &[usize]) -> ArrayDataset {
        let n = dims.iter().product::<usize>();
        let values: Vec<f64> = (0..n).map(|i| i as f64).collect();
        ArrayDataset::from_f64(dims, DataType::I32, &values).unwrap()
    }

    #[test]
    fn test_rotate_left_formula() {
        let dims = [4, 3];
        let mut out = [0; 2];
        Reorient::RotateLeft.map(&dims, &[1, 2], &mut out);
        // out[1] = dim[0]-1-in[0], out[0] = in[1]
        assert_eq!(out, [2, 2]);
        Reorient::RotateLeft.map(&dims, &[0, 0], &mut out);
        assert_eq!(out, [0, 3]);
    }

    #[test]
    fn test_rotate_right_formula() {
        let dims = [4, 3];
        let mut out = [0; 2];
        Reorient::RotateRight.map(&dims, &[1, 2], &mut out);
        // out[1] = in[0], out[0] = dim[1]-1-in[1]
        assert_eq!(out, [0, 1]);
    }

    #[test]
    fn test_inverse_matches_map() {
        let dims = [5, 3, 2];
        for op in [
            Reorient::RotateLeft,
            Reorient::RotateRight,
            Reorient::Rotate180,
            Reorient::FlipHorizontal,
            Reorient::FlipVertical,
        ] {
            let mut out = [0; 3];
            let mut back = [0; 3];
            for pos in RegionIter::new(&Region::whole(&dims)) {
                op.map(&dims, &pos, &mut out);
                op.inverse(&dims, &out, &mut back);
                assert_eq!(back.as_slice(), pos.as_slice(), "{}", op.name());
            }
        }
    }

    #[test]
    fn test_shape_flags() {
        assert!(!Reorient::RotateLeft.is_shape_preserving());
        assert!(!Reorient::RotateRight.is_shape_preserving());
        assert!(Reorient::FlipVertical.is_shape_preserving());
        assert_eq!(Reorient::RotateRight.output_dims(&[7, 3, 2]), vec![3, 7, 2]);
        assert_eq!(Reorient::Rotate180.output_dims(&[7, 3]), vec![7, 3]);
    }

    #[test]
    fn test_rotate_right_values() {
        // 3x2:  0 1 2      2x3:  3 0
        //       3 4 5            4 1
        //                        5 2
        let src = numbered(&[3, 2]);
        let dst = transform(&src, &Reorient::RotateRight).unwrap();
        assert_eq!(dst.dims(), &[2, 3]);
        assert_eq!(dst.to_f64_vec(), vec![3., 0., 4., 1., 5., 2.]);
    }

    #[test]
    fn test_higher_axes_pass_through() {
        let src = numbered(&[2, 3, 2]);
        let dst = transform(&src, &Reorient::RotateLeft).unwrap();
        assert_eq!(dst.dims(), &[3, 2, 2]);
        // input (1, 2, 1) -> output (2, 0, 1)
        assert_eq!(dst.get(&[2, 0, 1]), src.get(&[1, 2, 1]));
    }

    #[test]
    fn test_flips() {
        let src = numbered(&[3, 2]);
        let h = transform(&src, &Reorient::FlipHorizontal).unwrap();
        assert_eq!(h.to_f64_vec(), vec![2., 1., 0., 5., 4., 3.]);
        let v = transform(&src, &Reorient::FlipVertical).unwrap();
        assert_eq!(v.to_f64_vec(), vec![3., 4., 5., 0., 1., 2.]);
        let r = transform(&src, &Reorient::Rotate180).unwrap();
        assert_eq!(r.to_f64_vec(), vec![5., 4., 3., 2., 1., 0.]);
    }

    #[test]
    fn test_into_wrong_dims() {
        let src = numbered(&[3, 2]);
        let mut dst = ArrayDataset::new(&[3, 2], DataType::I32).unwrap();
        let err = transform_into(&src, &Reorient::RotateLeft, &mut dst).unwrap_err();
        assert!(err.is_bounds_error());
        assert!(dst.to_f64_vec().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_inverse_op() {
        for op in [Reorient::RotateLeft, Reorient::FlipHorizontal, Reorient::Rotate180] {
            let src = numbered(&[4, 3]);
            let there = transform(&src, &op).unwrap();
            let back = transform(&there, &op.inverse_op()).unwrap();
            assert_eq!(back, src);
        }
    }
}
