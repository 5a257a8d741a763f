//! greycard - single-patch color calibration CLI
//!
//! Calibrates white balance from a neutral patch in a captured frame and
//! renders a corrected PNG.

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use greycard_calib::{CalibConfig, FramePipeline};
use greycard_core::Rect;
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "greycard")]
#[command(author, version, about = "Single-patch color calibration")]
#[command(long_about = "
White balance from one neutral patch, fixed color correction, tone shaping
and a focus check for captured RGBA frames.

Examples:
  greycard calibrate frame.png --auto          # Find a neutral patch, print gains
  greycard calibrate frame.png --region 300,220,60
  greycard render frame.png -o out.png --gains 1.08,1.0,0.93
  greycard render frame.png -o out.png --auto --crop
  greycard focus frame.png                     # Laplacian variance + verdict
  greycard capture frame.png -o photo.png --auto
  greycard --config studio.yaml capture frame.png -o photo.png
  greycard config > defaults.yaml
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,

    /// YAML configuration overriding the built-in defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample a patch and print white balance gains
    #[command(visible_alias = "cal")]
    Calibrate(CalibrateArgs),

    /// Render a corrected image
    #[command(visible_alias = "r")]
    Render(RenderArgs),

    /// Check focus on the frame center
    Focus(FocusArgs),

    /// Crop to the region of interest
    Crop(CropArgs),

    /// Full capture flow: focus check, calibrate, render, save
    Capture(CaptureArgs),

    /// Print the effective configuration as YAML
    Config,
}

/// Patch selection shared by commands that calibrate.
#[derive(Args, Clone, Copy)]
struct PatchArgs {
    /// Search the frame for a neutral patch
    #[arg(long, conflicts_with = "region")]
    auto: bool,

    /// Patch square as x,y,size (default: centered box)
    #[arg(long, value_parser = commands::parse_region)]
    region: Option<Rect>,
}

#[derive(Args)]
struct CalibrateArgs {
    /// Input PNG
    input: PathBuf,

    #[command(flatten)]
    patch: PatchArgs,
}

#[derive(Args)]
struct RenderArgs {
    /// Input PNG
    input: PathBuf,

    /// Output PNG
    #[arg(short, long)]
    output: PathBuf,

    /// Explicit gains as r,g,b (skips calibration)
    #[arg(long, value_parser = commands::parse_gains, conflicts_with_all = ["auto", "region"])]
    gains: Option<greycard_calib::Gains>,

    #[command(flatten)]
    patch: PatchArgs,

    /// Crop to the configured region of interest first
    #[arg(long)]
    crop: bool,
}

#[derive(Args)]
struct FocusArgs {
    /// Input PNG
    input: PathBuf,

    /// Override the blur threshold
    #[arg(short, long)]
    threshold: Option<f32>,
}

#[derive(Args)]
struct CropArgs {
    /// Input PNG
    input: PathBuf,

    /// Output PNG
    #[arg(short, long)]
    output: PathBuf,

    /// Fractional rectangle as x,y,w,h (default: configured crop)
    #[arg(long, value_parser = commands::parse_frac_rect)]
    rect: Option<greycard_core::FracRect>,
}

#[derive(Args)]
struct CaptureArgs {
    /// Input PNG
    input: PathBuf,

    /// Output PNG
    #[arg(short, long)]
    output: PathBuf,

    #[command(flatten)]
    patch: PatchArgs,

    /// Keep the full frame instead of cropping
    #[arg(long)]
    no_crop: bool,
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&PathBuf>) -> Result<CalibConfig> {
    match path {
        Some(p) => CalibConfig::from_file(p)
            .with_context(|| format!("Failed to load config: {}", p.display())),
        None => Ok(CalibConfig::default()),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    let config = load_config(cli.config.as_ref())?;
    if let Commands::Config = cli.command {
        return commands::config::run(&config);
    }
    let pipeline = FramePipeline::new(config).context("Invalid configuration")?;

    match cli.command {
        Commands::Calibrate(args) => commands::calibrate::run(args, &pipeline),
        Commands::Render(args) => commands::render::run(args, &pipeline),
        Commands::Focus(args) => commands::focus::run(args, &pipeline),
        Commands::Crop(args) => commands::crop::run(args, &pipeline),
        Commands::Capture(args) => commands::capture::run(args, &pipeline),
        Commands::Config => Ok(()),
    }
}
