//! Blit command.
//!
//! Pastes a second generated pattern into the first, combining samples
//! with a binary mode.

use anyhow::{bail, Result};
use ij_core::Dataset;
use ij_ops::engine::blit_at;
use ij_ops::BinaryOp;

use super::{generate, parse_list, parse_size, pattern, print_summary};
use crate::BlitArgs;

/// Run the blit command.
pub fn run(args: BlitArgs) -> Result<()> {
    let mut dst = generate(&args.input)?;
    let mode: BinaryOp = args.mode.parse()?;

    let xy = parse_size(&args.src_size)?;
    if xy.len() != 2 {
        bail!("Source size must be WxH: {}", args.src_size);
    }
    // The pasted pattern covers every higher plane of the destination.
    let mut src_dims = xy;
    src_dims.extend_from_slice(&dst.dims()[2..]);
    let src = pattern(&src_dims, dst.data_type(), &args.src_pattern, args.input.fill)?;

    let at_xy = parse_list(&args.at, ',')?;
    let [x, y] = at_xy[..] else {
        bail!("Position must be x,y: {}", args.at);
    };
    let mut at = vec![0; src_dims.len()];
    at[0] = x;
    at[1] = y;

    print_summary("dst   ", &dst)?;
    print_summary("src   ", &src)?;
    let stats = blit_at(&mut dst, &at, &src, &mode)?;
    println!("{mode}: {} samples", stats.visited);
    print_summary("output", &dst)
}
