#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Hexbound session on autopilot
//! and prints the run summary as JSON.

mod autopilot;
mod config;

use std::{path::PathBuf, time::Duration};

use anyhow::{ensure, Result};
use clap::Parser;
use hexbound_session::{RunSummary, Session};
use serde::Serialize;
use tracing::info;

/// Command-line arguments for the Hexbound CLI.
#[derive(Debug, Parser)]
#[command(name = "hexbound", about = "Runs a headless Hexbound session")]
struct Args {
    /// Optional TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Seed for every random stream; overrides the config file.
    #[arg(long)]
    seed: Option<u64>,
    /// Simulated seconds to run before stopping.
    #[arg(long, default_value_t = 120.0)]
    seconds: f32,
    /// Fixed simulation steps per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Shortens waves to five seconds.
    #[arg(long)]
    test_mode: bool,
    /// Pretty-print the JSON report.
    #[arg(long)]
    pretty: bool,
}

/// JSON report printed after the run.
#[derive(Debug, Serialize)]
struct Report {
    seed: u64,
    frames: u64,
    ended: bool,
    summary: RunSummary,
}

/// Entry point for the Hexbound command-line interface.
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    ensure!(args.fps > 0, "--fps must be greater than zero");
    ensure!(
        args.seconds.is_finite() && args.seconds >= 0.0,
        "--seconds must be a non-negative number"
    );

    let file = match &args.config {
        Some(path) => config::load(path)?,
        None => config::ConfigFile::default(),
    };
    let overrides = config::Overrides {
        seed: args.seed,
        test_mode: args.test_mode,
    };
    let seed = file.seed(overrides);
    let session_config = file.into_session_config(overrides)?;

    let dt = Duration::from_secs(1) / args.fps;
    let frames = (f64::from(args.seconds) * f64::from(args.fps)).round() as u64;
    info!(seed, frames, "starting autopilot session");

    let mut session = Session::new(session_config);
    let outcome = autopilot::run(&mut session, frames, dt);

    let report = Report {
        seed,
        frames: outcome.frames,
        ended: outcome.ended,
        summary: outcome.summary,
    };
    let json = if args.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");
    Ok(())
}
