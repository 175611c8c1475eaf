//! Convert command (like ChangeToUINT32 / ChangeToFLOAT32).

use anyhow::Result;
use ij_core::DataType;
use ij_ops::dataset_ops::convert;

use super::{generate, print_summary};
use crate::ConvertArgs;

/// Run the convert command.
pub fn run(args: ConvertArgs) -> Result<()> {
    let target: DataType = args.to.parse()?;
    let ds = generate(&args.input)?;
    print_summary("input ", &ds)?;
    let out = convert(&ds, target)?;
    print_summary("output", &out)
}
