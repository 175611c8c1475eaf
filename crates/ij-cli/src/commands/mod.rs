//! CLI command implementations

pub mod apply;
pub mod blit;
pub mod convert;
pub mod rotate;
pub mod shadows;

use anyhow::{bail, Context, Result};
use ij_core::{ArrayDataset, DataType, Dataset};
use ij_ops::dataset_ops::stats;
use ij_ops::{EngineConfig, Scope};

use crate::PatternArgs;

/// Engine configuration from the global flags.
pub fn engine_config(sequential: bool) -> EngineConfig {
    if sequential {
        EngineConfig::sequential()
    } else {
        EngineConfig::default()
    }
}

/// Parses `64x64` or `64x64x3`.
pub fn parse_size(s: &str) -> Result<Vec<usize>> {
    let dims = parse_list(s, 'x').with_context(|| format!("Invalid size: {s}"))?;
    if dims.len() < 2 {
        bail!("Size needs at least width and height: {s}");
    }
    Ok(dims)
}

/// Parses a separated list of unsigned integers.
pub fn parse_list(s: &str, sep: char) -> Result<Vec<usize>> {
    s.split(sep)
        .map(|part| {
            part.trim()
                .parse::<usize>()
                .with_context(|| format!("'{part}' is not a non-negative integer"))
        })
        .collect()
}

/// Builds the input dataset described by `args`.
pub fn generate(args: &PatternArgs) -> Result<ArrayDataset> {
    let dims = parse_size(&args.size)?;
    let data_type: DataType = args.data_type.parse()?;
    pattern(&dims, data_type, &args.pattern, args.fill)
}

/// Fills a new dataset with a named pattern scaled to the type range.
pub fn pattern(dims: &[usize], data_type: DataType, name: &str, fill: f64) -> Result<ArrayDataset> {
    let [w, h, ..] = dims[..] else {
        bail!("Pattern needs at least width and height");
    };
    let (w, h) = (w.max(1) as f64, h.max(1) as f64);
    let span = if data_type.is_integral() {
        data_type.max_value().min(255.0)
    } else {
        1.0
    };
    let mut state = 0x2545_f491_4f6c_dd1du64;
    let ds = match name {
        "gradient" => ArrayDataset::from_fn(dims, data_type, |p| {
            let t = (p[0] as f64 / w + p[1] as f64 / h) / 2.0;
            (t * span).floor()
        }),
        "checker" => ArrayDataset::from_fn(dims, data_type, |p| {
            if (p[0] / 8 + p[1] / 8) % 2 == 0 { span } else { 0.0 }
        }),
        "flat" => ArrayDataset::from_fn(dims, data_type, |_| fill),
        "noise" => ArrayDataset::from_fn(dims, data_type, |_| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            ((state >> 11) as f64 / (1u64 << 53) as f64 * span).floor()
        }),
        other => bail!("Unknown pattern: {other}"),
    };
    Ok(ds?)
}

/// FNV-1a over the stored values.
pub fn checksum(ds: &ArrayDataset) -> u64 {
    ds.to_f64_vec().iter().fold(0xcbf2_9ce4_8422_2325, |hash, v| {
        v.to_bits()
            .to_le_bytes()
            .iter()
            .fold(hash, |h, &b| (h ^ b as u64).wrapping_mul(0x0100_0000_01b3))
    })
}

/// Prints dims, type, min/max/mean and checksum.
pub fn print_summary(label: &str, ds: &ArrayDataset) -> Result<()> {
    let s = stats(ds, &Scope::all())?;
    let dims: Vec<String> = ds.dims().iter().map(|d| d.to_string()).collect();
    println!(
        "{label}: {} {}  min={} max={} mean={:.4}  checksum={:016x}",
        dims.join("x"),
        ds.data_type(),
        s.min,
        s.max,
        s.mean,
        checksum(ds)
    );
    Ok(())
}
