//! Autopilot player and headless runs
//!
//! Produces the gaze a competent player would: perform the shown blink
//! pattern, fixate the next code number, stare down the leading spike, watch
//! the disk. `accuracy` is the per-tick chance of doing so; otherwise the
//! player glances away.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ports::{ObjectId, SyntheticGaze};
use super::state::GameState;
use super::tick::{TickInput, tick};
use super::wall::WallKind;
use crate::consts::SIM_DT;
use crate::tuning::Tuning;

/// Keeps the autopilot's draws independent of the game's own RNG stream
const AUTOPILOT_SEED_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Debug, Clone)]
pub struct Autopilot {
    accuracy: f32,
    rng: Pcg32,
}

impl Autopilot {
    pub fn new(seed: u64, accuracy: f32) -> Self {
        Self {
            accuracy: accuracy.clamp(0.0, 1.0),
            rng: Pcg32::seed_from_u64(seed ^ AUTOPILOT_SEED_SALT),
        }
    }

    pub fn accuracy(&self) -> f32 {
        self.accuracy
    }

    /// Gaze for the coming tick
    pub fn observe(&mut self, state: &GameState) -> SyntheticGaze {
        if state.is_game_over() || self.rng.random::<f32>() >= self.accuracy {
            return SyntheticGaze::idle();
        }

        let fixate = |id: ObjectId| match state.scene.position(id) {
            Some(world) => SyntheticGaze::idle().looking_at(id, world),
            None => SyntheticGaze::idle(),
        };

        match state.active_wall().behavior() {
            WallKind::Blink(blink) => match blink.current_pattern() {
                Some(pattern) => SyntheticGaze::idle().with_eyes(pattern.as_eyes()),
                None => SyntheticGaze::idle(),
            },
            WallKind::Code(code) => code.current_target().map_or_else(SyntheticGaze::idle, fixate),
            WallKind::Spikes(spikes) => spikes
                .leading_spike()
                .map_or_else(SyntheticGaze::idle, |s| fixate(s.id)),
            WallKind::Track(track) => track.disk().map_or_else(SyntheticGaze::idle, fixate),
        }
    }
}

/// Result of a headless run, printed by the binary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub ticks: u64,
    pub seconds: f32,
    pub score: f32,
    pub lives: u8,
    pub walls_cleared: u32,
    pub walls_failed: u32,
    pub game_over: bool,
}

/// Play a run with the autopilot until game over or `max_seconds` of game time
pub fn run_headless(seed: u64, tuning: Tuning, accuracy: f32, max_seconds: f32) -> RunSummary {
    let mut state = GameState::new(seed, tuning);
    let mut pilot = Autopilot::new(seed, accuracy);
    let input = TickInput::default();
    let max_ticks = (max_seconds.max(0.0) / SIM_DT).ceil() as u64;

    let mut last_report = 0;
    while !state.is_game_over() && state.time_ticks < max_ticks {
        let gaze = pilot.observe(&state);
        tick(&mut state, &input, &gaze, SIM_DT);
        // Nobody presents the events in a headless run
        state.drain_events();

        // Progress once per minute of game time
        let minute = state.time_ticks / (60.0 / SIM_DT) as u64;
        if minute > last_report {
            last_report = minute;
            log::info!(
                "{} min: score {:.0}, {} lives, {} cleared",
                minute,
                state.score,
                state.lives,
                state.stats.walls_cleared
            );
        }
    }

    RunSummary {
        seed,
        ticks: state.time_ticks,
        seconds: state.time_ticks as f32 * SIM_DT,
        score: state.score,
        lives: state.lives,
        walls_cleared: state.stats.walls_cleared,
        walls_failed: state.stats.walls_failed,
        game_over: state.is_game_over(),
    }
}
