//! Data-driven game balance
//!
//! Every wall parameter, the starting lives and the wall layout live here so a
//! run can be rebalanced from a JSON file without touching the simulation.

use std::fs;
use std::path::Path;

use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::palette;

/// Errors raised while loading a tuning file
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse tuning file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning: {0}")]
    Invalid(String),
}

/// Which gaze policy a wall in the layout runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WallType {
    Blink,
    Code,
    Spikes,
    Track,
}

impl WallType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WallType::Blink => "blink",
            WallType::Code => "code",
            WallType::Spikes => "spikes",
            WallType::Track => "track",
        }
    }
}

/// Placement of one wall in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WallSpec {
    pub kind: WallType,
    /// World-space center of the wall's box
    pub center: Vec3,
    /// Full extent of the wall's box
    pub size: Vec3,
    /// Per-axis inset applied when sampling spawn points
    #[serde(default = "default_margin")]
    pub margin: Vec3,
}

fn default_margin() -> Vec3 {
    Vec3::ONE
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlinkTuning {
    /// Seconds before the wall fails
    pub max_time: f32,
    /// Seconds a pattern must be held
    pub charge_time: f32,
    /// Discharge rate relative to the charge rate
    pub discharge_modifier: f32,
}

impl Default for BlinkTuning {
    fn default() -> Self {
        Self {
            max_time: 10.0,
            charge_time: 0.5,
            discharge_modifier: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CodeTuning {
    pub max_time: f32,
    /// Minimum clearance between numbers
    pub gap: f32,
    /// Seconds a number must be fixated
    pub charge_time: f32,
    /// Depth of a number prop (numbers sit half a prop in front of the wall)
    pub number_size: f32,
    /// Collider radius of a number
    pub number_radius: f32,
    pub color_active: Vec4,
    pub color_inactive: Vec4,
}

impl Default for CodeTuning {
    fn default() -> Self {
        Self {
            max_time: 15.0,
            gap: 1.0,
            charge_time: 0.5,
            number_size: 1.0,
            number_radius: 0.5,
            color_active: palette::AMBER,
            color_inactive: palette::GREY,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpikeTuning {
    /// Seconds the player has to survive
    pub max_time: f32,
    pub gap: f32,
    /// Range of the raw speed weights before normalization
    pub min_speed: f32,
    pub max_speed: f32,
    /// Distance from the wall at which a spike reaches the player
    pub fail_distance: f32,
    /// Retreat speed multiplier while a spike is fixated
    pub fixated_modifier: f32,
    /// Length of a spike prop
    pub spike_length: f32,
    pub spike_radius: f32,
}

impl Default for SpikeTuning {
    fn default() -> Self {
        Self {
            max_time: 10.0,
            gap: 2.0,
            min_speed: 0.1,
            max_speed: 1.0,
            fail_distance: 10.0,
            fixated_modifier: 3.0,
            spike_length: 1.5,
            spike_radius: 0.5,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackTuning {
    /// Seconds the player has to keep up
    pub max_time: f32,
    /// Distance at which the disk counts as arrived
    pub reach_distance: f32,
    /// Distance below which the hum fades out
    pub end_sound_distance: f32,
    /// Disk speed at level 0
    pub min_speed: f32,
    /// Seconds of looking away tolerated at level 0
    pub focus_time: f32,
    /// Dash probability at level 0
    pub start_teleport_probability: f32,
    /// Speed multiplier during a dash
    pub teleport_speed: f32,
    pub disk_radius: f32,
    pub color_safe: Vec4,
    pub color_fail: Vec4,
}

impl Default for TrackTuning {
    fn default() -> Self {
        Self {
            max_time: 15.0,
            reach_distance: 2.0,
            end_sound_distance: 3.0,
            min_speed: 2.0,
            focus_time: 3.0,
            start_teleport_probability: 0.1,
            teleport_speed: 10.0,
            disk_radius: 0.75,
            color_safe: palette::WHITE,
            color_fail: palette::RED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LightTuning {
    pub position: Vec3,
    pub base_intensity: f32,
    /// Damping speed when focusing a point
    pub damp_speed: f32,
    /// Minimum angle (degrees) before a focus request moves the light
    pub threshold_degrees: f32,
}

impl Default for LightTuning {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 5.0, 0.0),
            base_intensity: 2.0,
            damp_speed: 7.0,
            threshold_degrees: 2.5,
        }
    }
}

/// Complete game balance
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Lives at the start of a run
    pub lives: u8,
    /// Camera rotation speed between walls
    pub camera_speed: f32,
    /// Point the camera turns to once the run is over
    pub game_over_target: Vec3,
    pub light: LightTuning,
    pub blink: BlinkTuning,
    pub code: CodeTuning,
    pub spikes: SpikeTuning,
    pub track: TrackTuning,
    /// Walls in play order
    pub layout: Vec<WallSpec>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            lives: 3,
            camera_speed: 3.0,
            game_over_target: Vec3::new(0.0, 3.0, 20.0),
            light: LightTuning::default(),
            blink: BlinkTuning::default(),
            code: CodeTuning::default(),
            spikes: SpikeTuning::default(),
            track: TrackTuning::default(),
            layout: default_layout(),
        }
    }
}

/// Four walls in a ring around the origin, each facing the camera
pub fn default_layout() -> Vec<WallSpec> {
    vec![
        WallSpec {
            kind: WallType::Blink,
            center: Vec3::new(12.0, 0.0, 0.0),
            size: Vec3::new(2.0, 6.0, 10.0),
            margin: Vec3::ONE,
        },
        WallSpec {
            kind: WallType::Code,
            center: Vec3::new(-12.0, 0.0, 0.0),
            size: Vec3::new(2.0, 6.0, 10.0),
            margin: Vec3::ONE,
        },
        WallSpec {
            kind: WallType::Spikes,
            center: Vec3::new(0.0, 0.0, 12.0),
            size: Vec3::new(10.0, 6.0, 2.0),
            margin: Vec3::ONE,
        },
        WallSpec {
            kind: WallType::Track,
            center: Vec3::new(0.0, 0.0, -12.0),
            size: Vec3::new(10.0, 6.0, 2.0),
            margin: Vec3::ONE,
        },
    ]
}

impl Tuning {
    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load a tuning file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TuningError> {
        let json = fs::read_to_string(path.as_ref())?;
        let tuning = Self::from_json(&json)?;
        log::info!(
            "Loaded tuning from {} ({} walls)",
            path.as_ref().display(),
            tuning.layout.len()
        );
        Ok(tuning)
    }

    /// Load a tuning file, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Using default tuning ({}): {}", path.as_ref().display(), e);
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.layout.is_empty() {
            return Err(TuningError::Invalid("layout has no walls".into()));
        }
        if self.lives == 0 {
            return Err(TuningError::Invalid("lives must be at least 1".into()));
        }
        let charge_times = [
            ("blink.charge_time", self.blink.charge_time),
            ("code.charge_time", self.code.charge_time),
            ("track.focus_time", self.track.focus_time),
        ];
        for (name, value) in charge_times {
            if value <= 0.0 {
                return Err(TuningError::Invalid(format!("{name} must be positive")));
            }
        }
        if self.spikes.min_speed <= 0.0 || self.spikes.max_speed < self.spikes.min_speed {
            return Err(TuningError::Invalid(
                "spikes speed range must be positive and ordered".into(),
            ));
        }
        Ok(())
    }
}
