//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Gaze and collision reached through injected capabilities
//! - No rendering, audio or platform dependencies

pub mod autopilot;
pub mod blink;
pub mod code;
pub mod geom;
pub mod pattern;
pub mod placement;
pub mod ports;
pub mod rig;
pub mod scene;
pub mod spikes;
pub mod state;
pub mod tick;
pub mod track;
pub mod wall;

pub use autopilot::{Autopilot, RunSummary, run_headless};
pub use blink::BlinkWall;
pub use code::CodeWall;
pub use geom::{Bounds, WallBox};
pub use pattern::Pattern;
pub use ports::{Blind, EyeState, GazePoint, GazeSource, ObjectId, RayHit, SpatialQuery, SyntheticGaze, Tag};
pub use rig::{CameraRig, LightAim, Spotlight};
pub use scene::Scene;
pub use spikes::{Spike, SpikeWall};
pub use state::{GameEvent, GamePhase, GameState, Prop, RunStats, Sound, SoundCue, TintTarget};
pub use tick::{TickInput, tick};
pub use track::TrackWall;
pub use wall::{Wall, WallBehavior, WallContext, WallFrame, WallKind, WallOutcome};
