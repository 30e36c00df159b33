//! Track wall: keep a wandering disk in view
//!
//! The disk roams between random destinations on the wall face, occasionally
//! dashing. Watching it charges the wall, looking away drains it; running dry
//! fails the wall, surviving `max_time` clears it. Higher levels mean less
//! charge, a faster disk and more dashes.

use glam::Vec3;
use rand::Rng;

use super::geom::WallBox;
use super::ports::{ObjectId, Tag};
use super::state::{GameEvent, Prop, Sound, SoundCue, TintTarget};
use super::wall::{WallBehavior, WallContext, WallFrame};
use crate::consts::{TRACK_CHARGE_DECAY, TRACK_EASE_DISTANCE, TRACK_SPEED_GROWTH, TRACK_TELEPORT_STEP};
use crate::tuning::TrackTuning;
use crate::{fraction, lerp, lerp_color, move_towards};

#[derive(Debug, Clone)]
pub struct TrackWall {
    tuning: TrackTuning,
    disk_z: f32,
    disk: Option<ObjectId>,
    position: Vec3,
    destination: Vec3,
    charge: f32,
    max_charge: f32,
    speed: f32,
    speed_modifier: f32,
    teleport_probability: f32,
    /// Hum volume in [0, 1]
    volume: f32,
}

impl TrackWall {
    pub fn new(tuning: TrackTuning, wall_box: &WallBox) -> Self {
        Self {
            disk_z: wall_box.center.z + wall_box.size.z / 2.0,
            tuning,
            disk: None,
            position: Vec3::ZERO,
            destination: Vec3::ZERO,
            charge: 0.0,
            max_charge: 0.0,
            speed: 0.0,
            speed_modifier: 1.0,
            teleport_probability: 0.0,
            volume: 0.0,
        }
    }

    pub fn disk(&self) -> Option<ObjectId> {
        self.disk
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn destination(&self) -> Vec3 {
        self.destination
    }

    pub fn charge(&self) -> f32 {
        self.charge
    }

    pub fn max_charge(&self) -> f32 {
        self.max_charge
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    pub fn speed_modifier(&self) -> f32 {
        self.speed_modifier
    }

    pub fn teleport_probability(&self) -> f32 {
        self.teleport_probability
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    fn move_disk(&mut self, id: ObjectId, frame: &WallFrame, dt: f32, ctx: &mut WallContext<'_>) {
        let distance = self.destination.distance(self.position);

        if distance <= self.tuning.reach_distance {
            self.speed_modifier = 1.0;
            ctx.emit(GameEvent::StopSound { source: id });
            self.destination = frame.bounds.random_xy(ctx.rng, self.disk_z);
            // random_bool would panic once the level pushes p past 1
            if ctx.rng.random::<f32>() < self.teleport_probability {
                self.speed_modifier = self.tuning.teleport_speed;
                log::debug!("Track disk dashing toward {:?}", self.destination);
            }
            ctx.emit(GameEvent::Sound(SoundCue::from_source(Sound::DiskHum, id)));
        } else if distance <= self.tuning.end_sound_distance {
            self.volume -= dt;
        } else {
            self.volume += dt;
        }
        self.volume = self.volume.clamp(0.0, 1.0);
        ctx.emit(GameEvent::Volume {
            source: id,
            volume: self.volume,
        });

        // Ease out over the last few units
        let step = lerp(
            0.0,
            self.speed * self.speed_modifier,
            distance / TRACK_EASE_DISTANCE,
        ) * dt;
        self.position = move_towards(self.position, self.destination, step);
        ctx.scene.set_position(id, self.position);
        ctx.emit(GameEvent::PropMoved {
            id,
            position: self.position,
        });
    }

    fn check_gaze(&mut self, id: ObjectId, dt: f32, ctx: &mut WallContext<'_>) {
        if ctx.gaze.has_gaze(id) {
            self.charge += dt;
        } else {
            self.charge -= dt;
        }
        self.charge = self.charge.clamp(0.0, self.max_charge);

        let t = fraction(self.charge, self.max_charge);
        ctx.emit(GameEvent::Tint {
            target: TintTarget::Prop(id),
            color: lerp_color(self.tuning.color_fail, self.tuning.color_safe, t),
        });
        ctx.spotlight.set_intensity(t);
    }
}

impl WallBehavior for TrackWall {
    fn on_activate(&mut self, frame: &WallFrame, ctx: &mut WallContext<'_>) {
        let level = frame.level as f32;
        self.max_charge = self.tuning.focus_time * TRACK_CHARGE_DECAY.powf(level);
        self.speed = self.tuning.min_speed * TRACK_SPEED_GROWTH.powf(level);
        self.teleport_probability =
            self.tuning.start_teleport_probability + level * TRACK_TELEPORT_STEP;
        self.charge = self.max_charge;
        self.speed_modifier = 1.0;
        self.volume = 0.0;

        self.destination = frame.bounds.random_xy(ctx.rng, self.disk_z);
        self.position = frame.bounds.random_xy(ctx.rng, self.disk_z);

        let id = ctx
            .scene
            .spawn(Tag::Disk, self.position, self.tuning.disk_radius);
        ctx.emit(GameEvent::PropSpawned {
            id,
            prop: Prop::Disk,
            position: self.position,
        });
        ctx.emit(GameEvent::Sound(SoundCue::from_source(Sound::DiskHum, id)));
        ctx.spotlight.follow(id);
        self.disk = Some(id);

        log::debug!(
            "Track wall: max charge {:.2}, speed {:.2}, dash chance {:.3}",
            self.max_charge,
            self.speed,
            self.teleport_probability
        );
    }

    fn on_reset(&mut self, ctx: &mut WallContext<'_>) {
        if let Some(id) = self.disk.take() {
            ctx.scene.despawn(id);
            ctx.emit(GameEvent::StopSound { source: id });
            ctx.emit(GameEvent::PropDespawned { id });
        }
        ctx.spotlight.release();
    }

    fn on_update(&mut self, frame: &WallFrame, dt: f32, ctx: &mut WallContext<'_>) {
        let Some(id) = self.disk else {
            return;
        };
        self.move_disk(id, frame, dt, ctx);
        self.check_gaze(id, dt, ctx);
    }

    fn check_fail(&self, _frame: &WallFrame) -> bool {
        self.charge <= 0.0
    }

    fn check_finish(&self, frame: &WallFrame) -> bool {
        frame.elapsed > self.tuning.max_time
    }
}
