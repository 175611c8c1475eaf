//! Shadows command.
//!
//! Cycles the eight shadow directions over one pattern, printing a summary
//! per frame.

use std::sync::atomic::AtomicBool;

use anyhow::Result;
use ij_ops::shadows::shadows_demo;
use ij_ops::Scope;

use super::{generate, print_summary};
use crate::ShadowsArgs;

/// Run the shadows command.
pub fn run(args: ShadowsArgs) -> Result<()> {
    let mut ds = generate(&args.input)?;
    print_summary("input    ", &ds)?;

    let stop = AtomicBool::new(false);
    let mut failed = None;
    let frames = shadows_demo(&mut ds, &Scope::all(), &stop, Some(args.frames), |dir, frame| {
        if let Err(e) = print_summary(&format!("{dir:<9}"), frame) {
            failed = Some(e);
            stop.store(true, std::sync::atomic::Ordering::Relaxed);
        }
    })?;
    if let Some(e) = failed {
        return Err(e);
    }
    println!("{frames} frames");
    print_summary("restored ", &ds)
}
