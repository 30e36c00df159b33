//! Gaze Walls headless runner
//!
//! Plays a run with the autopilot standing in for the eye tracker and prints a
//! JSON summary. `RUST_LOG=info` shows wall activations and outcomes.
//!
//! Usage: `gaze-walls [TUNING.json] [--seed N] [--seconds S] [--accuracy A]`

use std::path::PathBuf;
use std::process::ExitCode;

use gaze_walls::Tuning;
use gaze_walls::sim::run_headless;

/// Default cap on simulated game time
const DEFAULT_SECONDS: f32 = 300.0;
const DEFAULT_ACCURACY: f32 = 0.9;

#[derive(clap::Parser, Debug)]
#[command(name = "gaze-walls", about = "Play a headless Gaze Walls run with the autopilot")]
struct Opts {
    /// Tuning JSON file; built-in defaults when omitted or unreadable
    tuning: Option<PathBuf>,
    /// Run seed; random when omitted
    #[arg(long)]
    seed: Option<u64>,
    /// Cap on simulated game time in seconds
    #[arg(long, default_value_t = DEFAULT_SECONDS)]
    seconds: f32,
    /// Per-tick chance in [0, 1] that the autopilot plays correctly
    #[arg(long, default_value_t = DEFAULT_ACCURACY)]
    accuracy: f32,
}

fn main() -> ExitCode {
    env_logger::init();

    let opts: Opts = clap::Parser::parse();

    let tuning = match &opts.tuning {
        Some(path) => Tuning::load_or_default(path),
        None => Tuning::default(),
    };
    let seed = opts.seed.unwrap_or_else(rand::random);
    log::info!(
        "Gaze Walls (headless) starting: seed {}, accuracy {:.2}, up to {}s",
        seed,
        opts.accuracy,
        opts.seconds
    );

    let summary = run_headless(seed, tuning, opts.accuracy, opts.seconds);
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => {
            println!("{json}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to serialize run summary: {}", e);
            ExitCode::FAILURE
        }
    }
}
