//! Gaze Walls - an eye-tracking arcade game core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (walls, gaze policies, sequencer, rigs)
//! - `tuning`: Data-driven game balance and wall layout

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

use glam::{Vec3, Vec4};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz, the eye tracker's sample rate)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Rejected samples before a spawn accepts an overlapping position
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10;

    /// Camera stops animating once it is this close to its target (degrees)
    pub const CAMERA_SETTLE_DEGREES: f32 = 1.0;

    /// Distance over which the track disk eases out toward its destination
    pub const TRACK_EASE_DISTANCE: f32 = 5.0;
    /// Per-level decay of the track wall's charge capacity
    pub const TRACK_CHARGE_DECAY: f32 = 0.97;
    /// Per-level growth of the track disk's speed
    pub const TRACK_SPEED_GROWTH: f32 = 1.1;
    /// Per-level growth of the track disk's dash probability
    pub const TRACK_TELEPORT_STEP: f32 = 0.025;

    /// Spikes spawn this far behind the wall face
    pub const SPIKE_OFFSET: f32 = 2.0;
    /// Spike wall speed budget per level (total = level / 3)
    pub const SPIKE_LEVELS_PER_UNIT_SPEED: f32 = 3.0;
}

/// Colors used for tints (linear RGBA)
pub mod palette {
    use glam::Vec4;

    pub const RED: Vec4 = Vec4::new(1.0, 0.0, 0.0, 1.0);
    pub const GREEN: Vec4 = Vec4::new(0.0, 1.0, 0.0, 1.0);
    pub const WHITE: Vec4 = Vec4::new(1.0, 1.0, 1.0, 1.0);
    pub const AMBER: Vec4 = Vec4::new(1.0, 0.75, 0.2, 1.0);
    pub const GREY: Vec4 = Vec4::new(0.45, 0.45, 0.45, 1.0);
}

/// Clamped linear interpolation (t is clamped to [0, 1])
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t.clamp(0.0, 1.0)
}

/// Clamped color interpolation
#[inline]
pub fn lerp_color(a: Vec4, b: Vec4, t: f32) -> Vec4 {
    a.lerp(b, t.clamp(0.0, 1.0))
}

/// Move `current` toward `target` by at most `max_delta` without overshooting
#[inline]
pub fn move_towards(current: Vec3, target: Vec3, max_delta: f32) -> Vec3 {
    let delta = target - current;
    let dist = delta.length();
    if dist <= max_delta || dist <= f32::EPSILON {
        target
    } else {
        current + delta / dist * max_delta
    }
}

/// Ratio of `value` to `max`, treating a non-positive max as empty
#[inline]
pub fn fraction(value: f32, max: f32) -> f32 {
    if max > 0.0 {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    }
}
