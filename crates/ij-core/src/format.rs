//! Sample data types.
//!
//! [`DataType`] is the declared numeric type of every sample in a dataset.
//! It determines the representable range and whether values are integral,
//! which in turn drives the [`BoundsPolicy`](crate::BoundsPolicy) applied
//! on every write.
//!
//! # Usage
//!
//! ```rust
//! use ij_core::DataType;
//!
//! let t: DataType = "uint8".parse().unwrap();
//! assert_eq!(t, DataType::U8);
//! assert_eq!(t.max_value(), 255.0);
//! assert!(t.is_integral());
//! ```

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Declared numeric type of a dataset's samples.
///
/// Integer formats:
/// - `I8` / `U8` - 8-bit signed [-128, 127] / unsigned [0, 255]
/// - `I16` / `U16` - 16-bit signed / unsigned
/// - `I32` / `U32` - 32-bit signed / unsigned
///
/// Floating-point formats:
/// - `F32` - 32-bit single-precision IEEE 754
/// - `F64` - 64-bit double-precision IEEE 754
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DataType {
    /// 8-bit signed integer.
    I8,
    /// 8-bit unsigned integer.
    #[default]
    U8,
    /// 16-bit signed integer.
    I16,
    /// 16-bit unsigned integer.
    U16,
    /// 32-bit signed integer.
    I32,
    /// 32-bit unsigned integer.
    U32,
    /// 32-bit float.
    F32,
    /// 64-bit float.
    F64,
}

impl DataType {
    /// All supported types, integral first.
    pub const ALL: [DataType; 8] = [
        Self::I8,
        Self::U8,
        Self::I16,
        Self::U16,
        Self::I32,
        Self::U32,
        Self::F32,
        Self::F64,
    ];

    /// Number of bits per sample.
    #[inline]
    pub const fn bits(&self) -> u32 {
        match self {
            Self::I8 | Self::U8 => 8,
            Self::I16 | Self::U16 => 16,
            Self::I32 | Self::U32 | Self::F32 => 32,
            Self::F64 => 64,
        }
    }

    /// Whether samples hold integers.
    #[inline]
    pub const fn is_integral(&self) -> bool {
        !self.is_float()
    }

    /// Whether samples hold floating-point values.
    #[inline]
    pub const fn is_float(&self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Whether the type can represent negative values.
    #[inline]
    pub const fn is_signed(&self) -> bool {
        !matches!(self, Self::U8 | Self::U16 | Self::U32)
    }

    /// Smallest representable value.
    ///
    /// For floats this is the most negative finite value.
    #[inline]
    pub const fn min_value(&self) -> f64 {
        match self {
            Self::I8 => i8::MIN as f64,
            Self::U8 | Self::U16 | Self::U32 => 0.0,
            Self::I16 => i16::MIN as f64,
            Self::I32 => i32::MIN as f64,
            Self::F32 => f32::MIN as f64,
            Self::F64 => f64::MIN,
        }
    }

    /// Largest representable value.
    #[inline]
    pub const fn max_value(&self) -> f64 {
        match self {
            Self::I8 => i8::MAX as f64,
            Self::U8 => u8::MAX as f64,
            Self::I16 => i16::MAX as f64,
            Self::U16 => u16::MAX as f64,
            Self::I32 => i32::MAX as f64,
            Self::U32 => u32::MAX as f64,
            Self::F32 => f32::MAX as f64,
            Self::F64 => f64::MAX,
        }
    }

    /// Short lowercase name, as accepted by [`FromStr`].
    pub const fn name(&self) -> &'static str {
        match self {
            Self::I8 => "i8",
            Self::U8 => "u8",
            Self::I16 => "i16",
            Self::U16 => "u16",
            Self::I32 => "i32",
            Self::U32 => "u32",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DataType {
    type Err = Error;

    /// Parses short (`u8`) and long (`uint8`, `float32`) spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = match s.to_ascii_lowercase().as_str() {
            "i8" | "int8" | "byte" => Self::I8,
            "u8" | "uint8" | "ubyte" => Self::U8,
            "i16" | "int16" | "short" => Self::I16,
            "u16" | "uint16" | "ushort" => Self::U16,
            "i32" | "int32" | "int" => Self::I32,
            "u32" | "uint32" | "uint" => Self::U32,
            "f32" | "float32" | "float" => Self::F32,
            "f64" | "float64" | "double" => Self::F64,
            other => {
                return Err(Error::InvalidParameter(format!(
                    "unknown data type '{other}'"
                )));
            }
        };
        Ok(t)
    }
}
