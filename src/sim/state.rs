//! Game state and the wall sequencer
//!
//! `GameState` owns the ring of walls, lives, score and phase, plus the
//! collision scene, RNG and rigs the walls act on. Presentation is one-way:
//! everything the frontend should show or play is pushed as a `GameEvent`.

use glam::{Vec3, Vec4};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::ports::{Blind, GazeSource, ObjectId};
use super::rig::{CameraRig, Spotlight};
use super::scene::Scene;
use super::wall::{Wall, WallContext, WallOutcome};
use crate::tuning::{Tuning, WallType};

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// A wall is active and the score is running
    Playing,
    /// All lives lost; waiting for a restart
    GameOver,
}

/// Visual-only props a wall spawns
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Prop {
    /// Code wall target with its label
    Number(u32),
    Spike,
    /// Hole decal under a spike, with a random roll for variety
    HoleProjector { roll_degrees: f32 },
    Disk,
}

/// What a tint applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TintTarget {
    /// Blink wall eyebrow (charge indicator)
    Eyebrow,
    Prop(ObjectId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sound {
    PatternMatched,
    NumberActivated,
    SpikeRumble,
    DiskHum,
}

/// A sound to play, optionally attached to a prop
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoundCue {
    pub sound: Sound,
    pub source: Option<ObjectId>,
    pub pitch: f32,
    /// Seconds before playback starts
    pub delay: f32,
}

impl SoundCue {
    pub fn plain(sound: Sound) -> Self {
        Self {
            sound,
            source: None,
            pitch: 1.0,
            delay: 0.0,
        }
    }

    pub fn from_source(sound: Sound, source: ObjectId) -> Self {
        Self {
            source: Some(source),
            ..Self::plain(sound)
        }
    }
}

/// One-way signals for the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Torches of a wall switched on/off
    WallLights { wall: usize, on: bool },
    WallActivated { wall: usize, kind: WallType, level: u32 },
    WallEnded { wall: usize, outcome: WallOutcome },
    PropSpawned { id: ObjectId, prop: Prop, position: Vec3 },
    PropMoved { id: ObjectId, position: Vec3 },
    PropDespawned { id: ObjectId },
    Tint { target: TintTarget, color: Vec4 },
    /// Show the open/closed indicator for each eye
    ShowPattern { left: bool, right: bool },
    HidePattern,
    Sound(SoundCue),
    StopSound { source: ObjectId },
    /// Volume in [0, 1] of a looping prop sound
    Volume { source: ObjectId, volume: f32 },
    LifeLost { remaining: u8 },
    /// Rounded score for the HUD
    Score(u32),
    GameOver { score: f32 },
    Restarted,
}

/// Per-run counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    pub walls_cleared: u32,
    pub walls_failed: u32,
}

/// Complete game state
///
/// Events pile up until the host takes them, so a frontend calls
/// [`GameState::drain_events`] once per frame after [`tick`](super::tick::tick).
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Walls in play order
    pub walls: Vec<Wall>,
    /// Index of the wall currently in play
    pub active_index: usize,
    pub lives: u8,
    pub score: f32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub scene: Scene,
    pub camera: CameraRig,
    pub spotlight: Spotlight,
    pub stats: RunStats,
    events: Vec<GameEvent>,
    shown_score: u32,
}

impl GameState {
    /// Build the ring from `tuning.layout` and activate the first wall
    ///
    /// # Panics
    /// If `tuning` fails [`Tuning::validate`]: an empty layout, no lives or a
    /// non-positive charge time.
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        if let Err(e) = tuning.validate() {
            panic!("invalid tuning: {e}");
        }

        let walls: Vec<Wall> = tuning
            .layout
            .iter()
            .enumerate()
            .map(|(i, spec)| Wall::from_spec(i, spec, &tuning))
            .collect();

        // Camera sits in the middle of the ring
        let centroid = walls.iter().map(|w| w.center()).sum::<Vec3>() / walls.len() as f32;
        let mut camera = CameraRig::new(centroid, tuning.camera_speed);
        camera.look_at(walls[0].center());

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            lives: tuning.lives,
            spotlight: Spotlight::new(&tuning.light),
            walls,
            active_index: 0,
            score: 0.0,
            phase: GamePhase::Playing,
            time_ticks: 0,
            scene: Scene::new(),
            camera,
            stats: RunStats::default(),
            events: Vec::new(),
            shown_score: 0,
            tuning,
        };

        log::info!(
            "New run (seed {}, {} walls, {} lives)",
            seed,
            state.walls.len(),
            state.lives
        );
        state.activate_wall(0);
        state
    }

    pub fn with_default_tuning(seed: u64) -> Self {
        Self::new(seed, Tuning::default())
    }

    pub fn active_wall(&self) -> &Wall {
        &self.walls[self.active_index]
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Events produced since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Accrue score at the active wall's level per second
    pub(crate) fn accrue_score(&mut self, dt: f32) {
        self.score += dt * self.active_wall().level() as f32;
        let shown = self.score.round() as u32;
        if shown != self.shown_score {
            self.shown_score = shown;
            self.emit(GameEvent::Score(shown));
        }
    }

    /// Run the active wall for one tick with the player's gaze
    pub(crate) fn advance_active_wall(
        &mut self,
        gaze: &dyn GazeSource,
        dt: f32,
    ) -> Option<WallOutcome> {
        let Self {
            walls,
            active_index,
            scene,
            rng,
            spotlight,
            events,
            camera,
            ..
        } = self;
        let mut ctx = WallContext {
            gaze,
            scene,
            rng,
            spotlight,
            events,
            eye: camera.position,
        };
        walls[*active_index].advance(dt, &mut ctx)
    }

    fn activate_wall(&mut self, index: usize) {
        let Self {
            walls,
            scene,
            rng,
            spotlight,
            events,
            camera,
            ..
        } = self;
        let mut ctx = WallContext {
            gaze: &Blind,
            scene,
            rng,
            spotlight,
            events,
            eye: camera.position,
        };
        let wall = &mut walls[index];
        wall.activate(&mut ctx);
        log::info!(
            "Wall {} ({}) activated at level {}",
            index,
            wall.wall_type().as_str(),
            wall.level()
        );
        let event = GameEvent::WallActivated {
            wall: index,
            kind: wall.wall_type(),
            level: wall.level(),
        };
        self.emit(event);
    }

    /// React to the active wall finishing or failing
    ///
    /// # Panics
    /// If `index` is not the active wall, the wall is still running, or the
    /// game is already over.
    pub fn report_outcome(&mut self, index: usize, outcome: WallOutcome) {
        assert_eq!(
            index, self.active_index,
            "outcome reported for wall {} while wall {} is active",
            index, self.active_index
        );
        assert!(
            !self.walls[index].is_active(),
            "outcome reported for wall {index} before it reset"
        );
        assert_eq!(self.phase, GamePhase::Playing, "outcome reported after game over");

        match outcome {
            WallOutcome::Failed => {
                self.lives = self.lives.saturating_sub(1);
                self.stats.walls_failed += 1;
                log::info!("Wall {} failed, {} lives left", index, self.lives);
                self.emit(GameEvent::LifeLost {
                    remaining: self.lives,
                });
            }
            WallOutcome::Finished => {
                self.stats.walls_cleared += 1;
                log::info!("Wall {} cleared at level {}", index, self.walls[index].level());
            }
        }
        self.emit(GameEvent::WallEnded {
            wall: index,
            outcome,
        });

        // A wall cleared mid-turn must not leave the camera stuck halfway
        self.camera.snap_to(self.walls[index].center());

        self.active_index = (index + 1) % self.walls.len();

        if self.lives > 0 {
            self.activate_wall(self.active_index);
            self.camera.retarget(self.walls[self.active_index].center());
        } else {
            self.enter_game_over();
        }
    }

    fn enter_game_over(&mut self) {
        self.phase = GamePhase::GameOver;
        log::info!(
            "Game over: score {:.0} ({} cleared, {} failed)",
            self.score,
            self.stats.walls_cleared,
            self.stats.walls_failed
        );
        self.emit(GameEvent::GameOver { score: self.score });
        self.camera.retarget(self.tuning.game_over_target);
        self.camera.begin_desaturate();
    }

    /// Rebuild the whole ring from scratch with a fresh seed
    pub fn restart(&mut self) {
        let seed = self.rng.random::<u64>();
        log::info!("Restarting run");
        *self = GameState::new(seed, self.tuning.clone());
        self.emit(GameEvent::Restarted);
    }
}
