//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::ports::GazeSource;
use super::state::{GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Start a new run (only honored after game over)
    pub restart: bool,
}

/// Advance the game state by one fixed timestep
///
/// Events produced here stay queued on `state` until the host calls
/// [`GameState::drain_events`].
pub fn tick(state: &mut GameState, input: &TickInput, gaze: &dyn GazeSource, dt: f32) {
    if state.phase == GamePhase::GameOver {
        if input.restart {
            state.restart();
        } else {
            // Let the game-over camera move and fade
            advance_rigs(state, dt);
            return;
        }
    }

    state.time_ticks += 1;
    state.accrue_score(dt);

    let index = state.active_index;
    let outcome = state.advance_active_wall(gaze, dt);

    if let Some(outcome) = outcome {
        state.report_outcome(index, outcome);
    }

    advance_rigs(state, dt);
}

fn advance_rigs(state: &mut GameState, dt: f32) {
    state.camera.advance(dt);
    state.spotlight.advance(dt, &state.scene);
}
