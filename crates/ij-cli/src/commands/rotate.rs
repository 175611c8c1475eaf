//! Rotate command.
//!
//! Rotates the XY plane by 90 or 180 degrees, or mirrors it.

use anyhow::{bail, Result};
use ij_ops::dataset_ops::reorient;
use ij_ops::Reorient;

use super::{generate, print_summary};
use crate::RotateArgs;

/// Run the rotate command.
pub fn run(args: RotateArgs) -> Result<()> {
    let op = match args.dir.to_ascii_lowercase().as_str() {
        "left" | "ccw" => Reorient::RotateLeft,
        "right" | "cw" => Reorient::RotateRight,
        "180" => Reorient::Rotate180,
        "flip-h" | "flop" => Reorient::FlipHorizontal,
        "flip-v" | "flip" => Reorient::FlipVertical,
        other => bail!("Unknown direction: {other}"),
    };

    let ds = generate(&args.input)?;
    print_summary("input ", &ds)?;
    let out = reorient(&ds, op)?;
    print_summary(op.name(), &out)
}
