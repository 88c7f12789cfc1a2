//! pinch_calc: interactive entry point.

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use pinch_calc::app::{run, AppConfig};
use pinch_calc::debounce::{CLICK_THRESHOLD, LOCK_DURATION};

/// Hand-tracked virtual calculator.
#[derive(Debug, Parser)]
#[command(name = "pinch_calc", version, about)]
struct Cli {
    /// Pinch distance in pixels at or below which a hover becomes a press
    #[arg(long, default_value_t = CLICK_THRESHOLD)]
    threshold: f32,

    /// Frames ignored after each accepted press
    #[arg(long, default_value_t = LOCK_DURATION)]
    lock_frames: u32,

    /// Frame width in pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Frame height in pixels
    #[arg(long, default_value_t = 720)]
    height: u32,
}

fn main() {
    if let Err(err) = run_cli() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║         Pinch Calculator — Hand-Tracked Button Pad           ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    #[cfg(feature = "leap")]
    println!("  Mode: LeapMotion hardware");
    #[cfg(not(feature = "leap"))]
    println!("  Mode: Mouse simulation  (use --features leap for hardware)");
    println!();

    let cfg = AppConfig {
        frame_width:     cli.width,
        frame_height:    cli.height,
        click_threshold: cli.threshold,
        lock_frames:     cli.lock_frames,
        ..AppConfig::default()
    };

    println!("  Opening visualizer window…");
    println!();

    run(cfg).context("pinch calculator failed")
}
