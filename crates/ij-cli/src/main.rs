//! ij - pixel-transform engines on generated test patterns
//!
//! Runs point operations, blits, rotations, type conversions and the
//! shadows demo, then prints a summary of the result.

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "ij")]
#[command(author, version, about = "n-dimensional pixel-transform engines")]
#[command(long_about = "
Runs the pixel-transform engines on generated test patterns and prints
min/max/mean and a checksum of the result.

Examples:
  ij apply --op add --value 68.6 --type u8 --size 64x64
  ij apply --op clamp-min --value 40 --region 8,8,16,16
  ij apply --op sharpen --pattern checker --size 256x256x3
  ij blit --mode copy-transparent --at 10,10
  ij rotate --dir left --size 64x32
  ij convert --to float32 --type u16
  ij shadows --frames 16
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// Disable the parallel engine paths
    #[arg(long, global = true)]
    sequential: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a unary operation in place
    #[command(visible_alias = "a")]
    Apply(ApplyArgs),

    /// Combine a second pattern into the first with a binary mode
    Blit(BlitArgs),

    /// Rotate or flip the XY plane
    Rotate(RotateArgs),

    /// Convert to another sample type
    #[command(visible_alias = "c")]
    Convert(ConvertArgs),

    /// Cycle the eight shadow directions
    Shadows(ShadowsArgs),
}

/// Generated input shared by every command.
#[derive(Args, Clone)]
struct PatternArgs {
    /// Dimensions, e.g. 64x64 or 64x64x3
    #[arg(short, long, default_value = "64x64")]
    size: String,

    /// Sample type: i8, u8, i16, u16, i32, u32, f32, f64
    #[arg(short = 't', long = "type", default_value = "u8")]
    data_type: String,

    /// Pattern: gradient, checker, flat, noise
    #[arg(short, long, default_value = "gradient")]
    pattern: String,

    /// Value used by the flat pattern
    #[arg(long, default_value = "1.0")]
    fill: f64,
}

#[derive(Args)]
struct ApplyArgs {
    #[command(flatten)]
    input: PatternArgs,

    /// Operation: add, subtract, multiply, divide, and, or, xor, fill,
    /// clamp-min, clamp-max, abs, sqr, sqrt, log, exp, reciprocal, gamma,
    /// invert, sharpen
    #[arg(short, long)]
    op: String,

    /// Constant for operations that take one
    #[arg(long, allow_negative_numbers = true)]
    value: Option<f64>,

    /// Sub-region as x,y,w,h (all planes)
    #[arg(short, long)]
    region: Option<String>,

    /// Restrict to one plane (indices for axes beyond Y, comma separated)
    #[arg(long)]
    plane: Option<String>,

    /// Preview each value in --sweep and revert, instead of applying once
    #[arg(long)]
    sweep: Option<String>,
}

#[derive(Args)]
struct BlitArgs {
    #[command(flatten)]
    input: PatternArgs,

    /// Mode: add, subtract, multiply, divide, and, or, xor, min, max,
    /// average, difference, copy, copy-transparent
    #[arg(short, long, default_value = "copy")]
    mode: String,

    /// Size of the pasted pattern (WxH)
    #[arg(long, default_value = "16x16")]
    src_size: String,

    /// Pattern of the pasted dataset
    #[arg(long, default_value = "checker")]
    src_pattern: String,

    /// Destination position as x,y
    #[arg(long, default_value = "0,0")]
    at: String,
}

#[derive(Args)]
struct RotateArgs {
    #[command(flatten)]
    input: PatternArgs,

    /// Direction: left, right, 180, flip-h, flip-v
    #[arg(short, long, default_value = "right")]
    dir: String,
}

#[derive(Args)]
struct ConvertArgs {
    #[command(flatten)]
    input: PatternArgs,

    /// Target type, e.g. uint32, float32
    #[arg(long)]
    to: String,
}

#[derive(Args)]
struct ShadowsArgs {
    #[command(flatten)]
    input: PatternArgs,

    /// Number of frames to show
    #[arg(short, long, default_value = "8")]
    frames: usize,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let config = commands::engine_config(cli.sequential);
    match cli.command {
        Commands::Apply(args) => commands::apply::run(args, &config),
        Commands::Blit(args) => commands::blit::run(args),
        Commands::Rotate(args) => commands::rotate::run(args),
        Commands::Convert(args) => commands::convert::run(args),
        Commands::Shadows(args) => commands::shadows::run(args),
    }
}
