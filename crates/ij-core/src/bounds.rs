//! Mapping of unbounded results onto a type's representable range.
//!
//! A [`BoundsPolicy`] is applied once per output sample by every write path
//! in the processing engines. For integral types it removes the fractional
//! part and clamps into `[min, max]`; for floating types it passes the value
//! through.
//!
//! Overflow is never an error. Out-of-range results saturate at the type
//! bounds.
//!
//! ```rust
//! use ij_core::{BoundsPolicy, DataType};
//!
//! let policy = BoundsPolicy::for_type(DataType::U8);
//! assert_eq!(policy.apply(1.0 + 68.6), 69.0);
//! assert_eq!(policy.apply(300.0), 255.0);
//! assert_eq!(policy.apply(-13.4), 0.0);
//!
//! let signed = BoundsPolicy::for_type(DataType::I8);
//! assert_eq!(signed.apply(-13.4), -13.0);
//! ```

use crate::DataType;

/// How an integral policy discards the fractional part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Rounding {
    /// Toward zero (`69.6 -> 69`, `-13.4 -> -13`).
    #[default]
    Truncate,
    /// To the nearest integer, halves away from zero (`69.6 -> 70`).
    Nearest,
}

/// Rounding and clamping rule for one output type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundsPolicy {
    min: f64,
    max: f64,
    integral: bool,
    rounding: Rounding,
}

impl BoundsPolicy {
    /// Creates a policy from an explicit range.
    ///
    /// `min` and `max` are swapped if given in the wrong order.
    pub fn new(min: f64, max: f64, integral: bool) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            integral,
            rounding: Rounding::default(),
        }
    }

    /// Derives the policy for a declared sample type.
    #[inline]
    pub fn for_type(data_type: DataType) -> Self {
        Self::new(
            data_type.min_value(),
            data_type.max_value(),
            data_type.is_integral(),
        )
    }

    /// Returns the same policy with a different rounding mode.
    #[inline]
    pub fn with_rounding(mut self, rounding: Rounding) -> Self {
        self.rounding = rounding;
        self
    }

    /// Smallest value the policy will produce.
    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Largest value the policy will produce.
    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Whether the target type is integral.
    #[inline]
    pub fn is_integral(&self) -> bool {
        self.integral
    }

    /// Rounding mode used for integral targets.
    #[inline]
    pub fn rounding(&self) -> Rounding {
        self.rounding
    }

    /// Maps a raw result to a storable value.
    ///
    /// Integral targets: NaN becomes 0, the fractional part is removed per
    /// [`Rounding`], then the value is clamped. Floating targets are returned
    /// unchanged.
    #[inline]
    pub fn apply(&self, value: f64) -> f64 {
        if !self.integral {
            return value;
        }
        if value.is_nan() {
            return 0.0f64.clamp(self.min, self.max);
        }
        let whole = match self.rounding {
            Rounding::Truncate => value.trunc(),
            Rounding::Nearest => value.round(),
        };
        whole.clamp(self.min, self.max)
    }
}

impl From<DataType> for BoundsPolicy {
    fn from(data_type: DataType) -> Self {
        Self::for_type(data_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_u8_truncates_then_clamps() {
        let p = BoundsPolicy::for_type(DataType::U8);
        assert_eq!(p.apply(69.6), 69.0);
        assert_eq!(p.apply(255.9), 255.0);
        assert_eq!(p.apply(1e9), 255.0);
        assert_eq!(p.apply(-0.5), 0.0);
    }

    #[test]
    fn test_nearest_rounding() {
        let p = BoundsPolicy::for_type(DataType::U8).with_rounding(Rounding::Nearest);
        assert_eq!(p.apply(69.6), 70.0);
        assert_eq!(p.apply(69.4), 69.0);
        assert_eq!(p.apply(254.5), 255.0);

        let s = BoundsPolicy::for_type(DataType::I8).with_rounding(Rounding::Nearest);
        assert_eq!(s.apply(-13.4), -13.0);
        assert_eq!(s.apply(-13.5), -14.0);
    }

    #[test]
    fn test_signed_ranges() {
        let p = BoundsPolicy::for_type(DataType::I16);
        assert_eq!(p.apply(-40000.0), -32768.0);
        assert_eq!(p.apply(40000.0), 32767.0);
        assert_eq!(p.apply(-13.4), -13.0);
    }

    #[test]
    fn test_nan_is_zero_for_integers() {
        assert_eq!(BoundsPolicy::for_type(DataType::U16).apply(f64::NAN), 0.0);
        assert!(BoundsPolicy::for_type(DataType::F32).apply(f64::NAN).is_nan());
    }

    #[test]
    fn test_float_passthrough() {
        let p = BoundsPolicy::for_type(DataType::F64);
        assert_relative_eq!(p.apply(-13.4), -13.4);
        assert_relative_eq!(p.apply(1e300), 1e300);
    }

    #[test]
    fn test_custom_range_normalizes_order() {
        let p = BoundsPolicy::new(10.0, 0.0, true);
        assert_eq!(p.min(), 0.0);
        assert_eq!(p.max(), 10.0);
        assert_eq!(p.apply(12.0), 10.0);
    }
}
