//! Apply command.
//!
//! Runs a unary operation (or sharpen/invert) over a generated pattern,
//! optionally restricted to a region or plane. With `--sweep` each value is
//! shown through a preview session and reverted at the end.

use anyhow::{bail, Context, Result};
use ij_core::{ArrayDataset, Dataset, Region};
use ij_ops::dataset_ops::{self, apply_observed};
use ij_ops::progress::LogProgress;
use ij_ops::{EngineConfig, OpsResult, PreviewSession, Scope, UnaryOp};
use tracing::info;

use super::{generate, parse_list, print_summary};
use crate::ApplyArgs;

/// Run the apply command.
pub fn run(args: ApplyArgs, config: &EngineConfig) -> Result<()> {
    let mut ds = generate(&args.input)?;
    let scope = build_scope(&ds, args.region.as_deref(), args.plane.as_deref())?;
    print_summary("input ", &ds)?;

    if let Some(sweep) = &args.sweep {
        let values = sweep
            .split(',')
            .map(|v| v.trim().parse::<f64>().with_context(|| format!("Invalid sweep value: {v}")))
            .collect::<Result<Vec<_>>>()?;
        let mut session = PreviewSession::new(&mut ds);
        let mut last = None;
        for value in values {
            let mut op = |d: &mut ArrayDataset| run_op(d, &args.op, Some(value), &scope, config);
            session.apply_preview(&mut op, last != Some(value))?;
            last = Some(value);
            print_summary(&format!("{:>6}", value), session.dataset())?;
        }
        session.toggle_off()?;
        drop(session);
        print_summary("after ", &ds)?;
        return Ok(());
    }

    run_op(&mut ds, &args.op, args.value, &scope, config)?;
    print_summary("output", &ds)
}

fn run_op(
    ds: &mut ArrayDataset,
    name: &str,
    value: Option<f64>,
    scope: &Scope,
    config: &EngineConfig,
) -> OpsResult<()> {
    let stats = match name {
        "sharpen" => dataset_ops::sharpen(ds, scope, config)?,
        "invert" => dataset_ops::invert(ds, scope, config)?,
        _ => {
            let op = UnaryOp::from_name(name, value)?;
            let mut progress = LogProgress::new(op.name());
            apply_observed(ds, &op, scope, config, &mut progress)?
        }
    };
    info!(visited = stats.visited, lines = stats.lines, "{name} done");
    Ok(())
}

fn build_scope(ds: &ArrayDataset, region: Option<&str>, plane: Option<&str>) -> Result<Scope> {
    let mut scope = match region {
        Some(r) => {
            let xywh = parse_list(r, ',')?;
            let [x, y, w, h] = xywh[..] else {
                bail!("Region must be x,y,w,h: {r}");
            };
            Scope::region(Region::rect(ds.dims(), x, y, w, h))
        }
        None => Scope::all(),
    };
    if let Some(p) = plane {
        scope = scope.with_plane(parse_list(p, ',')?);
    }
    Ok(scope)
}
