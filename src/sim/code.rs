//! Code wall: fixate numbers in ascending order
//!
//! `level` numbers are scattered over the wall face. Fixating the next number
//! charges it; once charged it lights up and the following number is due.
//! Looking at a higher number than the one due breaks the code and restarts it
//! from 1.

use glam::Vec3;

use super::geom::WallBox;
use super::placement::place;
use super::ports::{ObjectId, SpatialQuery, Tag};
use super::state::{GameEvent, Prop, Sound, SoundCue, TintTarget};
use super::wall::{WallBehavior, WallContext, WallFrame};
use crate::tuning::CodeTuning;
use crate::{fraction, lerp_color};

#[derive(Debug, Clone)]
pub struct CodeWall {
    tuning: CodeTuning,
    /// Depth of the plane the numbers sit on
    code_x: f32,
    /// Number colliders, index `i` is labelled `i + 1`
    numbers: Vec<ObjectId>,
    current_number: usize,
    charging_time: f32,
}

impl CodeWall {
    pub fn new(tuning: CodeTuning, wall_box: &WallBox) -> Self {
        let code_x = wall_box.center.x + wall_box.size.x / 2.0 + tuning.number_size / 2.0;
        Self {
            tuning,
            code_x,
            numbers: Vec::new(),
            current_number: 0,
            charging_time: 0.0,
        }
    }

    pub fn numbers(&self) -> &[ObjectId] {
        &self.numbers
    }

    /// Index of the number that must be fixated next
    pub fn current_number(&self) -> usize {
        self.current_number
    }

    /// Collider of the number that must be fixated next
    pub fn current_target(&self) -> Option<ObjectId> {
        self.numbers.get(self.current_number).copied()
    }

    pub fn charging_time(&self) -> f32 {
        self.charging_time
    }

    pub fn code_x(&self) -> f32 {
        self.code_x
    }

    fn index_of(&self, id: ObjectId) -> Option<usize> {
        self.numbers.iter().position(|&n| n == id)
    }

    fn tint(&self, ctx: &mut WallContext<'_>, index: usize, t: f32) {
        if let Some(&id) = self.numbers.get(index) {
            ctx.emit(GameEvent::Tint {
                target: TintTarget::Prop(id),
                color: lerp_color(self.tuning.color_inactive, self.tuning.color_active, t),
            });
        }
    }

    /// Ray from the camera through the gaze point, or the pointer as fallback
    fn gaze_direction(&self, ctx: &mut WallContext<'_>) -> Option<Vec3> {
        let point = ctx.gaze.last_gaze_point();
        if point.valid {
            ctx.spotlight.focus(point.world);
            Some(point.world - ctx.eye)
        } else {
            ctx.gaze.pointer_direction()
        }
    }
}

impl WallBehavior for CodeWall {
    fn on_activate(&mut self, frame: &WallFrame, ctx: &mut WallContext<'_>) {
        self.charging_time = 0.0;
        self.current_number = 0;
        self.numbers.clear();

        let bounds = frame.bounds;
        let code_x = self.code_x;
        for label in 1..=frame.level {
            let position = place(&*ctx.scene, ctx.rng, self.tuning.gap, |rng| {
                bounds.random_yz(rng, code_x)
            });
            let id = ctx
                .scene
                .spawn(Tag::Number, position, self.tuning.number_radius);
            ctx.emit(GameEvent::PropSpawned {
                id,
                prop: Prop::Number(label),
                position,
            });
            self.numbers.push(id);
            self.tint(ctx, self.numbers.len() - 1, 0.0);
        }
    }

    fn on_reset(&mut self, ctx: &mut WallContext<'_>) {
        for id in self.numbers.drain(..) {
            ctx.scene.despawn(id);
            ctx.emit(GameEvent::PropDespawned { id });
        }
    }

    fn on_update(&mut self, _frame: &WallFrame, dt: f32, ctx: &mut WallContext<'_>) {
        let hit = self
            .gaze_direction(ctx)
            .and_then(|dir| ctx.scene.raycast(ctx.eye, dir))
            .filter(|hit| hit.tag == Tag::Number)
            .and_then(|hit| self.index_of(hit.id));

        match hit {
            Some(index) if index == self.current_number => {
                self.charging_time = (self.charging_time + dt).min(self.tuning.charge_time);
                if self.charging_time >= self.tuning.charge_time {
                    ctx.emit(GameEvent::Sound(SoundCue::plain(Sound::NumberActivated)));
                    self.tint(ctx, index, 1.0);
                    self.charging_time = 0.0;
                    self.current_number += 1;
                }
            }
            Some(index) if index > self.current_number => {
                // Wrong order: every number lit so far goes dark again
                let lit = self.current_number.min(self.numbers.len() - 1);
                for i in 0..=lit {
                    self.tint(ctx, i, 0.0);
                }
                self.current_number = 0;
                self.charging_time = 0.0;
            }
            // Already activated numbers neither charge nor drain
            Some(_) => {}
            None => self.charging_time -= dt,
        }

        self.charging_time = self.charging_time.clamp(0.0, self.tuning.charge_time);
        self.tint(
            ctx,
            self.current_number,
            fraction(self.charging_time, self.tuning.charge_time),
        );
    }

    fn check_fail(&self, frame: &WallFrame) -> bool {
        frame.elapsed > self.tuning.max_time
    }

    fn check_finish(&self, _frame: &WallFrame) -> bool {
        self.current_number >= self.numbers.len()
    }
}
