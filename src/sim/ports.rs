//! Capabilities the simulation consumes
//!
//! The eye tracker and the collision world are injected, never compiled in:
//! the simulation only sees gaze booleans, the last gaze point, the last eye
//! state, overlap queries and raycasts.

use std::collections::HashSet;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Handle of a gaze-aware object in the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Collider tag used to tell targets from scenery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tag {
    Number,
    Spike,
    Disk,
}

/// Which eyes the tracker currently sees open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EyeState {
    pub left: bool,
    pub right: bool,
}

impl EyeState {
    pub const OPEN: Self = Self {
        left: true,
        right: true,
    };
    pub const CLOSED: Self = Self {
        left: false,
        right: false,
    };

    pub fn new(left: bool, right: bool) -> Self {
        Self { left, right }
    }
}

/// Last gaze sample, already unprojected into world space by the driver
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GazePoint {
    pub world: Vec3,
    pub valid: bool,
}

impl GazePoint {
    pub fn at(world: Vec3) -> Self {
        Self { world, valid: true }
    }

    pub fn invalid() -> Self {
        Self::default()
    }
}

/// Eye tracker capability
pub trait GazeSource {
    /// Whether the player's gaze currently rests on `id`
    fn has_gaze(&self, id: ObjectId) -> bool;

    /// Last known gaze point
    fn last_gaze_point(&self) -> GazePoint;

    /// Last known eye-open state (an eye the tracker lost counts as closed)
    fn eye_state(&self) -> EyeState;

    /// Pointer direction from the camera, used when gaze data is invalid
    fn pointer_direction(&self) -> Option<Vec3> {
        None
    }
}

/// Gaze source that never sees anything (eyes closed, no gaze point)
#[derive(Debug, Clone, Copy, Default)]
pub struct Blind;

impl GazeSource for Blind {
    fn has_gaze(&self, _id: ObjectId) -> bool {
        false
    }

    fn last_gaze_point(&self) -> GazePoint {
        GazePoint::invalid()
    }

    fn eye_state(&self) -> EyeState {
        EyeState::CLOSED
    }
}

/// Result of a raycast
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub id: ObjectId,
    pub tag: Tag,
    pub distance: f32,
}

/// Collision world capability used for placement and gaze rays
pub trait SpatialQuery {
    /// Whether any collider intersects the sphere at `point`
    fn has_overlap(&self, point: Vec3, radius: f32) -> bool;

    /// Nearest collider hit by the ray, if any
    fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<RayHit>;
}

/// Scripted gaze source for tests and the autopilot
#[derive(Debug, Clone, Default)]
pub struct SyntheticGaze {
    pub eyes: EyeState,
    pub gazed: HashSet<ObjectId>,
    pub point: GazePoint,
    pub pointer: Option<Vec3>,
}

impl SyntheticGaze {
    /// Both eyes open, looking at nothing
    pub fn idle() -> Self {
        Self {
            eyes: EyeState::OPEN,
            ..Default::default()
        }
    }

    pub fn with_eyes(mut self, eyes: EyeState) -> Self {
        self.eyes = eyes;
        self
    }

    /// Fixate an object (gaze-aware flag plus a valid gaze point on it)
    pub fn looking_at(mut self, id: ObjectId, world: Vec3) -> Self {
        self.gazed.insert(id);
        self.point = GazePoint::at(world);
        self
    }

    pub fn with_point(mut self, point: GazePoint) -> Self {
        self.point = point;
        self
    }

    pub fn with_pointer(mut self, direction: Vec3) -> Self {
        self.pointer = Some(direction);
        self
    }
}

impl GazeSource for SyntheticGaze {
    fn has_gaze(&self, id: ObjectId) -> bool {
        self.gazed.contains(&id)
    }

    fn last_gaze_point(&self) -> GazePoint {
        self.point
    }

    fn eye_state(&self) -> EyeState {
        self.eyes
    }

    fn pointer_direction(&self) -> Option<Vec3> {
        self.pointer
    }
}
