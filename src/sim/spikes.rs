//! Spike wall: stare spikes back into the wall
//!
//! Spikes creep toward the player. A spike the player is looking at retreats
//! toward its spawn point, faster than it advances. The wall is cleared by
//! surviving `max_time`; any spike reaching `fail_distance` fails it.

use glam::Vec3;
use rand::Rng;

use super::geom::WallBox;
use super::placement::place;
use super::ports::{ObjectId, Tag};
use super::state::{GameEvent, Prop, Sound, SoundCue};
use super::wall::{WallBehavior, WallContext, WallFrame};
use crate::consts::{SPIKE_LEVELS_PER_UNIT_SPEED, SPIKE_OFFSET};
use crate::tuning::SpikeTuning;

/// Spikes travel along -Z, out of the wall toward the ring center
const SPIKE_FORWARD: Vec3 = Vec3::NEG_Z;

/// A single gaze-repelled spike
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spike {
    pub id: ObjectId,
    pub spawn: Vec3,
    pub forward: Vec3,
    /// Displacement from `spawn` along `forward`
    pub distance: f32,
    pub speed: f32,
    pub fixated_modifier: f32,
}

impl Spike {
    pub fn new(id: ObjectId, spawn: Vec3, speed: f32, fixated_modifier: f32) -> Self {
        Self {
            id,
            spawn,
            forward: SPIKE_FORWARD,
            distance: 0.0,
            speed,
            fixated_modifier,
        }
    }

    /// Retreat while gazed (never past the spawn point), advance otherwise
    pub fn advance(&mut self, gazed: bool, dt: f32) {
        if gazed && self.distance > 0.0 {
            self.distance = (self.distance - self.speed * self.fixated_modifier * dt).max(0.0);
        } else {
            self.distance += self.speed * dt;
        }
    }

    pub fn position(&self) -> Vec3 {
        self.spawn + self.forward * self.distance
    }
}

#[derive(Debug, Clone)]
pub struct SpikeWall {
    tuning: SpikeTuning,
    spike_z: f32,
    /// Depth of the wall face the hole decals are projected on
    face_z: f32,
    spikes: Vec<Spike>,
    projectors: Vec<ObjectId>,
    total_speed: f32,
}

impl SpikeWall {
    pub fn new(tuning: SpikeTuning, wall_box: &WallBox) -> Self {
        let face_z = wall_box.center.z - wall_box.size.z / 2.0;
        let spike_z = face_z + tuning.spike_length - SPIKE_OFFSET;
        Self {
            tuning,
            spike_z,
            face_z,
            spikes: Vec::new(),
            projectors: Vec::new(),
            total_speed: 0.0,
        }
    }

    pub fn spikes(&self) -> &[Spike] {
        &self.spikes
    }

    pub fn total_speed(&self) -> f32 {
        self.total_speed
    }

    /// The spike closest to breaking through, if any
    pub fn leading_spike(&self) -> Option<&Spike> {
        self.spikes
            .iter()
            .max_by(|a, b| a.distance.total_cmp(&b.distance))
    }

    fn draw_weight(&self, rng: &mut impl Rng) -> f64 {
        let (lo, hi) = (self.tuning.min_speed as f64, self.tuning.max_speed as f64);
        if hi > lo { rng.random_range(lo..hi) } else { lo }
    }

    /// Random weights scaled so they sum to `level / 3`
    fn draw_speeds(&self, rng: &mut impl Rng, level: u32) -> Vec<f32> {
        let count = level as usize;
        let weights: Vec<f64> = (0..count).map(|_| self.draw_weight(rng)).collect();
        let sum: f64 = weights.iter().sum();
        let total = level as f64 / SPIKE_LEVELS_PER_UNIT_SPEED as f64;
        if sum <= 0.0 {
            return vec![(total / count as f64) as f32; count];
        }
        weights.iter().map(|w| (w / sum * total) as f32).collect()
    }
}

impl WallBehavior for SpikeWall {
    fn on_activate(&mut self, frame: &WallFrame, ctx: &mut WallContext<'_>) {
        self.spikes.clear();
        self.projectors.clear();
        self.total_speed = frame.level as f32 / SPIKE_LEVELS_PER_UNIT_SPEED;

        let speeds = self.draw_speeds(ctx.rng, frame.level);
        let bounds = frame.bounds;
        let spike_z = self.spike_z;

        for speed in speeds {
            let spawn = place(&*ctx.scene, ctx.rng, self.tuning.gap, |rng| {
                bounds.random_xy(rng, spike_z)
            });
            let id = ctx.scene.spawn(Tag::Spike, spawn, self.tuning.spike_radius);
            ctx.emit(GameEvent::PropSpawned {
                id,
                prop: Prop::Spike,
                position: spawn,
            });

            let projector = ctx.scene.allocate_id();
            let roll_degrees = ctx.rng.random_range(0.0..360.0);
            ctx.emit(GameEvent::PropSpawned {
                id: projector,
                prop: Prop::HoleProjector { roll_degrees },
                position: Vec3::new(spawn.x, spawn.y, self.face_z),
            });
            self.projectors.push(projector);

            let cue = SoundCue {
                pitch: ctx.rng.random_range(0.5..1.5),
                delay: ctx.rng.random_range(0.0..0.5),
                ..SoundCue::from_source(Sound::SpikeRumble, id)
            };
            ctx.emit(GameEvent::Sound(cue));

            self.spikes
                .push(Spike::new(id, spawn, speed, self.tuning.fixated_modifier));
        }
    }

    fn on_reset(&mut self, ctx: &mut WallContext<'_>) {
        for spike in self.spikes.drain(..) {
            ctx.scene.despawn(spike.id);
            ctx.emit(GameEvent::StopSound { source: spike.id });
            ctx.emit(GameEvent::PropDespawned { id: spike.id });
        }
        for id in self.projectors.drain(..) {
            ctx.emit(GameEvent::PropDespawned { id });
        }
    }

    fn on_update(&mut self, _frame: &WallFrame, dt: f32, ctx: &mut WallContext<'_>) {
        for spike in &mut self.spikes {
            spike.advance(ctx.gaze.has_gaze(spike.id), dt);
            let position = spike.position();
            ctx.scene.set_position(spike.id, position);
            ctx.events.push(GameEvent::PropMoved {
                id: spike.id,
                position,
            });
        }
    }

    fn check_fail(&self, _frame: &WallFrame) -> bool {
        self.spikes
            .iter()
            .any(|s| s.distance >= self.tuning.fail_distance)
    }

    fn check_finish(&self, frame: &WallFrame) -> bool {
        frame.elapsed > self.tuning.max_time
    }
}
