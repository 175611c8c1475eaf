//! # ij-core
//!
//! Core types for n-dimensional sample processing.
//!
//! This crate provides the data model that the processing engines in
//! `ij-ops` consume:
//!
//! - [`DataType`] - Declared numeric type of a dataset's samples
//! - [`BoundsPolicy`] - Rounding/clamping of results into a type's range
//! - [`Region`] - Origin + span box, validated before any iteration
//! - [`RegionIter`] - Lazy raster-order coordinate walk, optionally pinned to one plane
//! - [`Dataset`], [`ArrayDataset`] - Sample container capability set and its in-memory
//!   implementation
//! - [`SampleReader`], [`SampleAccessor`] - Per-task read/write handles
//!
//! ## Crate Structure
//!
//! ```text
//! ij-core (this crate)
//!    ^
//!    |
//!    +-- ij-ops (functions, engines, convolution, preview)
//!    +-- ij-cli (command-line front end)
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` - Serialization for [`DataType`], [`Region`], [`Axis`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod accessor;
pub mod bounds;
pub mod dataset;
pub mod error;
pub mod format;
pub mod iter;
pub mod region;

pub use accessor::{DatasetAccessor, DatasetReader, SampleAccessor, SampleReader};
pub use bounds::{BoundsPolicy, Rounding};
pub use dataset::{check_position, ArrayDataset, Axis, Dataset, Samples};
pub use error::{Error, Result};
pub use format::DataType;
pub use iter::{pin_plane, RegionIter};
pub use region::Region;

/// Prelude module for convenient imports.
///
/// ```
/// use ij_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::accessor::{DatasetAccessor, DatasetReader, SampleAccessor, SampleReader};
    pub use crate::bounds::{BoundsPolicy, Rounding};
    pub use crate::dataset::{ArrayDataset, Axis, Dataset};
    pub use crate::error::{Error, Result};
    pub use crate::format::DataType;
    pub use crate::iter::RegionIter;
    pub use crate::region::Region;
}
