//! Pure numeric functions applied sample by sample.
//!
//! Engines take any [`UnaryFunction`] or [`BinaryFunction`]. The closed
//! catalogs [`UnaryOp`] and [`BinaryOp`] cover the usual point operations and
//! blit modes; plain closures work too.
//!
//! Functions return raw real results. Clamping into the target type is the
//! engine's job, through [`BoundsPolicy`](ij_core::BoundsPolicy).
//!
//! # Example
//!
//! ```rust
//! use ij_ops::function::{BinaryFunction, BinaryOp, UnaryFunction, UnaryOp};
//!
//! assert_eq!(UnaryOp::ClampMin(10.0).compute(3.0), 10.0);
//! assert_eq!(UnaryOp::Xor(0xFF).compute(0x0F as f64), 0xF0 as f64);
//! assert_eq!(BinaryOp::CopyNonZero.compute(5.0, 0.0), 5.0);
//! assert_eq!(BinaryOp::CopyNonZero.compute(5.0, 9.0), 9.0);
//!
//! let half = |x: f64| x / 2.0;
//! assert_eq!(half.compute(8.0), 4.0);
//! ```

use std::fmt;
use std::str::FromStr;

use ij_core::DataType;

use crate::{OpsError, OpsResult};

/// Maps one real input to one real output.
pub trait UnaryFunction {
    /// Computes the output for `x`.
    fn compute(&self, x: f64) -> f64;
}

/// Maps two real inputs to one real output.
///
/// `a` is the first operand (the blit destination), `b` the second (the source).
pub trait BinaryFunction {
    /// Computes the output for `(a, b)`.
    fn compute(&self, a: f64, b: f64) -> f64;
}

impl<F: Fn(f64) -> f64> UnaryFunction for F {
    #[inline]
    fn compute(&self, x: f64) -> f64 {
        self(x)
    }
}

impl<F: Fn(f64, f64) -> f64> BinaryFunction for F {
    #[inline]
    fn compute(&self, a: f64, b: f64) -> f64 {
        self(a, b)
    }
}

/// Catalog of unary point operations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnaryOp {
    /// Returns the input unchanged.
    Identity,
    /// Replaces every sample with a constant.
    Fill(f64),
    /// Adds a constant.
    Add(f64),
    /// Subtracts a constant.
    Subtract(f64),
    /// Multiplies by a constant.
    Multiply(f64),
    /// Divides by a constant (IEEE semantics for zero).
    Divide(f64),
    /// Bitwise AND with a constant, on the integer part.
    And(i64),
    /// Bitwise OR with a constant, on the integer part.
    Or(i64),
    /// Bitwise XOR with a constant, on the integer part.
    Xor(i64),
    /// Raises values below the constant to the constant.
    ClampMin(f64),
    /// Lowers values above the constant to the constant.
    ClampMax(f64),
    /// Clamps into `[min, max]`.
    Clamp {
        /// Lower bound
        min: f64,
        /// Upper bound
        max: f64,
    },
    /// Mirrors values inside a range: `max - (x - min)`.
    Invert {
        /// Range minimum
        min: f64,
        /// Range maximum
        max: f64,
    },
    /// Absolute value.
    Abs,
    /// Square.
    Sqr,
    /// Square root.
    Sqrt,
    /// Natural logarithm.
    Log,
    /// Natural exponential.
    Exp,
    /// `1 / x`.
    Reciprocal,
    /// `x^g` for positive `x`, 0 otherwise.
    Gamma(f64),
}

impl UnaryOp {
    /// Inversion over the full range of an integral type.
    ///
    /// For float types the range is the finite type range, which is rarely
    /// what a caller wants; prefer an explicit data range there.
    pub fn invert_for(data_type: DataType) -> Self {
        Self::Invert {
            min: data_type.min_value(),
            max: data_type.max_value(),
        }
    }

    /// Builds an operation from its name and optional constant.
    ///
    /// ```rust
    /// use ij_ops::function::UnaryOp;
    ///
    /// assert_eq!(UnaryOp::from_name("add", Some(2.0)).unwrap(), UnaryOp::Add(2.0));
    /// assert!(UnaryOp::from_name("add", None).is_err());
    /// assert_eq!(UnaryOp::from_name("abs", None).unwrap(), UnaryOp::Abs);
    /// ```
    pub fn from_name(name: &str, value: Option<f64>) -> OpsResult<Self> {
        let need = || {
            value.ok_or_else(|| {
                OpsError::InvalidParameter(format!("operation '{name}' requires a value"))
            })
        };
        let op = match name.to_ascii_lowercase().as_str() {
            "identity" | "nop" => Self::Identity,
            "fill" | "set" => Self::Fill(need()?),
            "add" => Self::Add(need()?),
            "subtract" | "sub" => Self::Subtract(need()?),
            "multiply" | "mul" => Self::Multiply(need()?),
            "divide" | "div" => Self::Divide(need()?),
            "and" => Self::And(need()? as i64),
            "or" => Self::Or(need()? as i64),
            "xor" => Self::Xor(need()? as i64),
            "clamp-min" | "min" => Self::ClampMin(need()?),
            "clamp-max" | "max" => Self::ClampMax(need()?),
            "abs" => Self::Abs,
            "sqr" => Self::Sqr,
            "sqrt" => Self::Sqrt,
            "log" => Self::Log,
            "exp" => Self::Exp,
            "reciprocal" => Self::Reciprocal,
            "gamma" => Self::Gamma(need()?),
            other => {
                return Err(OpsError::InvalidParameter(format!(
                    "unknown unary operation '{other}'"
                )));
            }
        };
        Ok(op)
    }

    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Identity => "identity",
            Self::Fill(_) => "fill",
            Self::Add(_) => "add",
            Self::Subtract(_) => "subtract",
            Self::Multiply(_) => "multiply",
            Self::Divide(_) => "divide",
            Self::And(_) => "and",
            Self::Or(_) => "or",
            Self::Xor(_) => "xor",
            Self::ClampMin(_) => "clamp-min",
            Self::ClampMax(_) => "clamp-max",
            Self::Clamp { .. } => "clamp",
            Self::Invert { .. } => "invert",
            Self::Abs => "abs",
            Self::Sqr => "sqr",
            Self::Sqrt => "sqrt",
            Self::Log => "log",
            Self::Exp => "exp",
            Self::Reciprocal => "reciprocal",
            Self::Gamma(_) => "gamma",
        }
    }
}

impl UnaryFunction for UnaryOp {
    fn compute(&self, x: f64) -> f64 {
        match *self {
            Self::Identity => x,
            Self::Fill(c) => c,
            Self::Add(c) => x + c,
            Self::Subtract(c) => x - c,
            Self::Multiply(c) => x * c,
            Self::Divide(c) => x / c,
            Self::And(c) => ((x as i64) & c) as f64,
            Self::Or(c) => ((x as i64) | c) as f64,
            Self::Xor(c) => ((x as i64) ^ c) as f64,
            Self::ClampMin(m) => {
                if x < m {
                    m
                } else {
                    x
                }
            }
            Self::ClampMax(m) => {
                if x > m {
                    m
                } else {
                    x
                }
            }
            Self::Clamp { min, max } => x.max(min).min(max),
            Self::Invert { min, max } => max - (x - min),
            Self::Abs => x.abs(),
            Self::Sqr => x * x,
            Self::Sqrt => x.sqrt(),
            Self::Log => x.ln(),
            Self::Exp => x.exp(),
            Self::Reciprocal => 1.0 / x,
            Self::Gamma(g) => {
                if x <= 0.0 {
                    0.0
                } else {
                    x.powf(g)
                }
            }
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Catalog of binary operations used for compositing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `a + b`.
    Add,
    /// `a - b`.
    Subtract,
    /// `a * b`.
    Multiply,
    /// `a / b` (IEEE semantics for zero).
    Divide,
    /// Bitwise AND of integer parts.
    And,
    /// Bitwise OR of integer parts.
    Or,
    /// Bitwise XOR of integer parts.
    Xor,
    /// Smaller of the two.
    Min,
    /// Larger of the two.
    Max,
    /// `(a + b) / 2`.
    Average,
    /// `|a - b|`.
    Difference,
    /// Takes `b`.
    Copy,
    /// Takes `b` where it is non-zero, otherwise keeps `a`.
    CopyNonZero,
}

impl BinaryOp {
    /// All operations.
    pub const ALL: [BinaryOp; 13] = [
        Self::Add,
        Self::Subtract,
        Self::Multiply,
        Self::Divide,
        Self::And,
        Self::Or,
        Self::Xor,
        Self::Min,
        Self::Max,
        Self::Average,
        Self::Difference,
        Self::Copy,
        Self::CopyNonZero,
    ];

    /// Short name, as accepted by [`FromStr`].
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Subtract => "subtract",
            Self::Multiply => "multiply",
            Self::Divide => "divide",
            Self::And => "and",
            Self::Or => "or",
            Self::Xor => "xor",
            Self::Min => "min",
            Self::Max => "max",
            Self::Average => "average",
            Self::Difference => "difference",
            Self::Copy => "copy",
            Self::CopyNonZero => "copy-non-zero",
        }
    }
}

impl BinaryFunction for BinaryOp {
    fn compute(&self, a: f64, b: f64) -> f64 {
        match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide => a / b,
            Self::And => ((a as i64) & (b as i64)) as f64,
            Self::Or => ((a as i64) | (b as i64)) as f64,
            Self::Xor => ((a as i64) ^ (b as i64)) as f64,
            Self::Min => a.min(b),
            Self::Max => a.max(b),
            Self::Average => (a + b) / 2.0,
            Self::Difference => (a - b).abs(),
            Self::Copy => b,
            Self::CopyNonZero => {
                if b != 0.0 {
                    b
                } else {
                    a
                }
            }
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BinaryOp {
    type Err = OpsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        match lower.as_str() {
            "transparent" | "copy-transparent" => return Ok(Self::CopyNonZero),
            "diff" => return Ok(Self::Difference),
            _ => {}
        }
        Self::ALL
            .into_iter()
            .find(|op| op.name() == lower)
            .ok_or_else(|| OpsError::InvalidParameter(format!("unknown blit mode '{s}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clamp_min_idempotent() {
        let op = UnaryOp::ClampMin(17.0);
        for x in [-1e9, -3.5, 0.0, 16.999, 17.0, 17.5, 1e9] {
            let once = op.compute(x);
            assert_eq!(op.compute(once), once);
            assert!(once >= 17.0);
        }
    }

    #[test]
    fn test_clamp_max() {
        assert_eq!(UnaryOp::ClampMax(5.0).compute(9.0), 5.0);
        assert_eq!(UnaryOp::ClampMax(5.0).compute(-9.0), -9.0);
        assert_eq!(UnaryOp::Clamp { min: 0.0, max: 1.0 }.compute(2.0), 1.0);
    }

    #[test]
    fn test_bitwise_on_integer_part() {
        assert_eq!(UnaryOp::And(0b1100).compute(0b1010 as f64 + 0.7), 0b1000 as f64);
        assert_eq!(UnaryOp::Or(1).compute(4.0), 5.0);
        assert_eq!(BinaryOp::Xor.compute(6.0, 3.0), 5.0);
        assert_eq!(BinaryOp::And.compute(6.0, 3.0), 2.0);
        assert_eq!(BinaryOp::Or.compute(6.0, 3.0), 7.0);
    }

    #[test]
    fn test_invert_for_u8() {
        let op = UnaryOp::invert_for(DataType::U8);
        assert_eq!(op.compute(0.0), 255.0);
        assert_eq!(op.compute(255.0), 0.0);
        assert_eq!(op.compute(100.0), 155.0);

        let signed = UnaryOp::invert_for(DataType::I8);
        assert_eq!(signed.compute(-128.0), 127.0);
    }

    #[test]
    fn test_math_functions() {
        assert_relative_eq!(UnaryOp::Sqrt.compute(16.0), 4.0);
        assert_relative_eq!(UnaryOp::Log.compute(std::f64::consts::E), 1.0);
        assert_relative_eq!(UnaryOp::Exp.compute(0.0), 1.0);
        assert_relative_eq!(UnaryOp::Gamma(0.5).compute(9.0), 3.0);
        assert_eq!(UnaryOp::Gamma(0.5).compute(-9.0), 0.0);
        assert_relative_eq!(UnaryOp::Reciprocal.compute(4.0), 0.25);
        assert_eq!(UnaryOp::Sqr.compute(-3.0), 9.0);
    }

    #[test]
    fn test_binary_blends() {
        assert_eq!(BinaryOp::Average.compute(2.0, 5.0), 3.5);
        assert_eq!(BinaryOp::Difference.compute(2.0, 5.0), 3.0);
        assert_eq!(BinaryOp::Min.compute(2.0, 5.0), 2.0);
        assert_eq!(BinaryOp::Max.compute(2.0, 5.0), 5.0);
        assert_eq!(BinaryOp::Multiply.compute(2.0, 5.0), 10.0);
        assert_eq!(BinaryOp::Subtract.compute(2.0, 5.0), -3.0);
        assert_eq!(BinaryOp::Copy.compute(2.0, 0.0), 0.0);
    }

    #[test]
    fn test_parse_names() {
        for op in BinaryOp::ALL {
            assert_eq!(op.name().parse::<BinaryOp>().unwrap(), op);
        }
        assert_eq!("transparent".parse::<BinaryOp>().unwrap(), BinaryOp::CopyNonZero);
        assert!("screen".parse::<BinaryOp>().is_err());
        assert!(UnaryOp::from_name("frobnicate", Some(1.0)).is_err());
    }
}
