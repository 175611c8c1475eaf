//! # ij-ops
//!
//! Pixel-transform engines for n-dimensional datasets.
//!
//! Every operation here walks a validated [`Region`](ij_core::Region) of a
//! [`Dataset`](ij_core::Dataset), computes new values in `f64` and stores
//! them through the dataset's [`BoundsPolicy`](ij_core::BoundsPolicy).
//!
//! # Modules
//!
//! - [`function`] - Unary and binary numeric function catalog
//! - [`engine`] - Unary apply, binary blit and combine engines
//! - [`convolve`] - 3x3 convolution with centre-replicated edges
//! - [`geometry`] - 90-degree rotations and flips
//! - [`shadows`] - Eight directional shadow kernels and the demo loop
//! - [`preview`] - Reversible live-preview sessions
//! - [`dataset_ops`] - One-call named operations with path selection
//! - [`progress`] - Progress observers
//! - `parallel` - Rayon scanline paths (feature `parallel`)
//!
//! # Example
//!
//! ```rust
//! use ij_core::{ArrayDataset, DataType, Dataset};
//! use ij_ops::{engine, Scope, UnaryOp};
//!
//! let mut ds = ArrayDataset::new(&[8, 8], DataType::U8).unwrap();
//! engine::apply_unary(&mut ds, &UnaryOp::Add(300.0), &Scope::all()).unwrap();
//! assert_eq!(ds.get(&[7, 7]), 255.0);
//! ```
//!
//! # Common Operations
//!
//! ## Blit
//!
//! ```rust,ignore
//! use ij_ops::{engine, BinaryOp};
//!
//! // Paste `logo` at (10, 20), skipping its zero samples
//! engine::blit_at(&mut canvas, &[10, 20], &logo, &BinaryOp::CopyNonZero)?;
//! ```
//!
//! ## Preview
//!
//! ```rust,ignore
//! use ij_ops::PreviewSession;
//!
//! let mut session = PreviewSession::new(&mut image);
//! session.apply_preview(&mut op, true)?;
//! session.toggle_off()?;
//! ```
//!
//! ## Feature Flags
//!
//! - `parallel` (default) - Rayon paths chosen through [`EngineConfig`]
//! - `serde` - Serialization for [`EngineConfig`], [`Reorient`], [`ShadowDirection`]

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod config;
pub mod convolve;
pub mod dataset_ops;
pub mod engine;
pub mod function;
pub mod geometry;
pub mod preview;
pub mod progress;
pub mod shadows;

#[cfg(feature = "parallel")]
pub mod parallel;

pub use config::EngineConfig;
pub use convolve::Kernel3x3;
pub use engine::{Scope, TransformStats};
pub use error::{OpsError, OpsResult};
pub use function::{BinaryOp, UnaryOp};
pub use geometry::Reorient;
pub use preview::PreviewSession;
pub use shadows::ShadowDirection;
