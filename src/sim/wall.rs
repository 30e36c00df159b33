//! Wall lifecycle state machine
//!
//! `Inactive -> Active -> (Finished | Failed) -> Inactive`. The lifecycle is
//! shared; what a wall asks of the player is supplied by a `WallBehavior`.
//! Hooks only ever run while the wall is active.

use glam::Vec3;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::blink::BlinkWall;
use super::code::CodeWall;
use super::geom::{Bounds, WallBox};
use super::ports::GazeSource;
use super::rig::Spotlight;
use super::scene::Scene;
use super::spikes::SpikeWall;
use super::state::GameEvent;
use super::track::TrackWall;
use crate::tuning::{Tuning, WallSpec, WallType};

/// How an activation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallOutcome {
    Finished,
    Failed,
}

/// Shared per-wall data the hooks read
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallFrame {
    /// Position in the play order
    pub index: usize,
    /// Incremented on every activation
    pub level: u32,
    /// Seconds since the current activation
    pub elapsed: f32,
    pub wall_box: WallBox,
    pub bounds: Bounds,
}

/// Everything a hook may touch besides its own state
pub struct WallContext<'a> {
    pub gaze: &'a dyn GazeSource,
    pub scene: &'a mut Scene,
    pub rng: &'a mut Pcg32,
    pub spotlight: &'a mut Spotlight,
    pub events: &'a mut Vec<GameEvent>,
    /// Camera position, origin of gaze rays
    pub eye: Vec3,
}

impl WallContext<'_> {
    #[inline]
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }
}

/// The five hooks every wall kind supplies
pub trait WallBehavior {
    /// Set up a fresh activation (`frame.level` is already incremented)
    fn on_activate(&mut self, frame: &WallFrame, ctx: &mut WallContext<'_>);

    /// Tear down whatever the activation spawned
    fn on_reset(&mut self, ctx: &mut WallContext<'_>);

    /// Per-tick gaze evaluation
    fn on_update(&mut self, frame: &WallFrame, dt: f32, ctx: &mut WallContext<'_>);

    fn check_fail(&self, frame: &WallFrame) -> bool;

    fn check_finish(&self, frame: &WallFrame) -> bool;
}

/// A wall in the ring
#[derive(Debug, Clone)]
pub struct Wall<B = WallKind> {
    frame: WallFrame,
    active: bool,
    behavior: B,
}

impl<B: WallBehavior> Wall<B> {
    pub fn new(index: usize, wall_box: WallBox, margin: Vec3, behavior: B) -> Self {
        Self {
            frame: WallFrame {
                index,
                level: 0,
                elapsed: 0.0,
                wall_box,
                bounds: Bounds::from_box(&wall_box, margin),
            },
            active: false,
            behavior,
        }
    }

    /// Start the level counter at `level`; the next activation plays `level + 1`
    pub fn with_level(mut self, level: u32) -> Self {
        assert!(!self.active, "cannot rewrite the level of an active wall");
        self.frame.level = level;
        self
    }

    /// Begin a new activation
    ///
    /// # Panics
    /// If the wall is already active.
    pub fn activate(&mut self, ctx: &mut WallContext<'_>) {
        assert!(
            !self.active,
            "wall {} activated while already active",
            self.frame.index
        );
        self.frame.level += 1;
        self.frame.elapsed = 0.0;
        ctx.emit(GameEvent::WallLights {
            wall: self.frame.index,
            on: true,
        });
        self.behavior.on_activate(&self.frame, ctx);
        self.active = true;
    }

    /// Run one tick; returns the outcome on the tick the wall finishes or fails
    pub fn advance(&mut self, dt: f32, ctx: &mut WallContext<'_>) -> Option<WallOutcome> {
        if !self.active {
            return None;
        }

        self.behavior.on_update(&self.frame, dt, ctx);

        // Finish wins a tie with fail
        let outcome = if self.behavior.check_finish(&self.frame) {
            Some(WallOutcome::Finished)
        } else if self.behavior.check_fail(&self.frame) {
            Some(WallOutcome::Failed)
        } else {
            None
        };

        match outcome {
            Some(outcome) => {
                self.reset(ctx);
                Some(outcome)
            }
            None => {
                self.frame.elapsed += dt;
                None
            }
        }
    }

    fn reset(&mut self, ctx: &mut WallContext<'_>) {
        self.active = false;
        ctx.emit(GameEvent::WallLights {
            wall: self.frame.index,
            on: false,
        });
        self.behavior.on_reset(ctx);
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn level(&self) -> u32 {
        self.frame.level
    }

    pub fn elapsed(&self) -> f32 {
        self.frame.elapsed
    }

    pub fn index(&self) -> usize {
        self.frame.index
    }

    pub fn center(&self) -> Vec3 {
        self.frame.wall_box.center
    }

    pub fn frame(&self) -> &WallFrame {
        &self.frame
    }

    pub fn behavior(&self) -> &B {
        &self.behavior
    }
}

/// The closed set of wall kinds
#[derive(Debug, Clone)]
pub enum WallKind {
    Blink(BlinkWall),
    Code(CodeWall),
    Spikes(SpikeWall),
    Track(TrackWall),
}

impl WallKind {
    pub fn build(kind: WallType, wall_box: &WallBox, tuning: &Tuning) -> Self {
        match kind {
            WallType::Blink => WallKind::Blink(BlinkWall::new(tuning.blink.clone())),
            WallType::Code => WallKind::Code(CodeWall::new(tuning.code.clone(), wall_box)),
            WallType::Spikes => WallKind::Spikes(SpikeWall::new(tuning.spikes.clone(), wall_box)),
            WallType::Track => WallKind::Track(TrackWall::new(tuning.track.clone(), wall_box)),
        }
    }

    pub fn wall_type(&self) -> WallType {
        match self {
            WallKind::Blink(_) => WallType::Blink,
            WallKind::Code(_) => WallType::Code,
            WallKind::Spikes(_) => WallType::Spikes,
            WallKind::Track(_) => WallType::Track,
        }
    }

    pub fn as_blink(&self) -> Option<&BlinkWall> {
        match self {
            WallKind::Blink(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_code(&self) -> Option<&CodeWall> {
        match self {
            WallKind::Code(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_spikes(&self) -> Option<&SpikeWall> {
        match self {
            WallKind::Spikes(w) => Some(w),
            _ => None,
        }
    }

    pub fn as_track(&self) -> Option<&TrackWall> {
        match self {
            WallKind::Track(w) => Some(w),
            _ => None,
        }
    }
}

impl Wall<WallKind> {
    /// Build a wall from its layout entry
    pub fn from_spec(index: usize, spec: &WallSpec, tuning: &Tuning) -> Self {
        let wall_box = WallBox::new(spec.center, spec.size);
        let kind = WallKind::build(spec.kind, &wall_box, tuning);
        Wall::new(index, wall_box, spec.margin, kind)
    }

    pub fn wall_type(&self) -> WallType {
        self.behavior.wall_type()
    }
}

impl WallBehavior for WallKind {
    fn on_activate(&mut self, frame: &WallFrame, ctx: &mut WallContext<'_>) {
        match self {
            WallKind::Blink(w) => w.on_activate(frame, ctx),
            WallKind::Code(w) => w.on_activate(frame, ctx),
            WallKind::Spikes(w) => w.on_activate(frame, ctx),
            WallKind::Track(w) => w.on_activate(frame, ctx),
        }
    }

    fn on_reset(&mut self, ctx: &mut WallContext<'_>) {
        match self {
            WallKind::Blink(w) => w.on_reset(ctx),
            WallKind::Code(w) => w.on_reset(ctx),
            WallKind::Spikes(w) => w.on_reset(ctx),
            WallKind::Track(w) => w.on_reset(ctx),
        }
    }

    fn on_update(&mut self, frame: &WallFrame, dt: f32, ctx: &mut WallContext<'_>) {
        match self {
            WallKind::Blink(w) => w.on_update(frame, dt, ctx),
            WallKind::Code(w) => w.on_update(frame, dt, ctx),
            WallKind::Spikes(w) => w.on_update(frame, dt, ctx),
            WallKind::Track(w) => w.on_update(frame, dt, ctx),
        }
    }

    fn check_fail(&self, frame: &WallFrame) -> bool {
        match self {
            WallKind::Blink(w) => w.check_fail(frame),
            WallKind::Code(w) => w.check_fail(frame),
            WallKind::Spikes(w) => w.check_fail(frame),
            WallKind::Track(w) => w.check_fail(frame),
        }
    }

    fn check_finish(&self, frame: &WallFrame) -> bool {
        match self {
            WallKind::Blink(w) => w.check_finish(frame),
            WallKind::Code(w) => w.check_finish(frame),
            WallKind::Spikes(w) => w.check_finish(frame),
            WallKind::Track(w) => w.check_finish(frame),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::harness::Harness;
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::ports::SyntheticGaze;

    /// Behavior that records hook calls and obeys scripted checks
    #[derive(Debug, Default)]
    struct Probe {
        activations: u32,
        resets: u32,
        updates: u32,
        active: bool,
        finish: bool,
        fail: bool,
        checked_while_inactive: std::cell::Cell<bool>,
    }

    impl WallBehavior for Probe {
        fn on_activate(&mut self, _frame: &WallFrame, _ctx: &mut WallContext<'_>) {
            self.activations += 1;
            self.active = true;
        }

        fn on_reset(&mut self, _ctx: &mut WallContext<'_>) {
            self.resets += 1;
            self.active = false;
        }

        fn on_update(&mut self, _frame: &WallFrame, _dt: f32, _ctx: &mut WallContext<'_>) {
            assert!(self.active, "on_update while inactive");
            self.updates += 1;
        }

        fn check_fail(&self, _frame: &WallFrame) -> bool {
            if !self.active {
                self.checked_while_inactive.set(true);
            }
            self.fail
        }

        fn check_finish(&self, _frame: &WallFrame) -> bool {
            if !self.active {
                self.checked_while_inactive.set(true);
            }
            self.finish
        }
    }

    fn probe_wall() -> Wall<Probe> {
        let wall_box = WallBox::new(Vec3::ZERO, Vec3::new(10.0, 6.0, 2.0));
        Wall::new(0, wall_box, Vec3::ONE, Probe::default())
    }

    #[test]
    fn test_activate_increments_level_and_resets_elapsed() {
        let mut h = Harness::new(1);
        let gaze = SyntheticGaze::idle();
        let mut wall = probe_wall();
        wall.activate(&mut h.ctx(&gaze));
        assert_eq!(wall.level(), 1);
        for _ in 0..10 {
            wall.advance(SIM_DT, &mut h.ctx(&gaze));
        }
        assert!(wall.elapsed() > 0.0);

        wall.behavior.fail = true;
        assert_eq!(wall.advance(SIM_DT, &mut h.ctx(&gaze)), Some(WallOutcome::Failed));
        wall.behavior.fail = false;

        wall.activate(&mut h.ctx(&gaze));
        assert_eq!(wall.level(), 2);
        assert_eq!(wall.elapsed(), 0.0);
    }

    #[test]
    #[should_panic(expected = "already active")]
    fn test_double_activation_panics() {
        let mut h = Harness::new(1);
        let gaze = SyntheticGaze::idle();
        let mut wall = probe_wall();
        wall.activate(&mut h.ctx(&gaze));
        wall.activate(&mut h.ctx(&gaze));
    }

    #[test]
    fn test_hooks_never_run_while_inactive() {
        let mut h = Harness::new(1);
        let gaze = SyntheticGaze::idle();
        let mut wall = probe_wall();

        // Not yet activated
        for _ in 0..5 {
            assert_eq!(wall.advance(SIM_DT, &mut h.ctx(&gaze)), None);
        }
        assert_eq!(wall.behavior.updates, 0);

        wall.activate(&mut h.ctx(&gaze));
        wall.behavior.finish = true;
        assert_eq!(wall.advance(SIM_DT, &mut h.ctx(&gaze)), Some(WallOutcome::Finished));
        assert!(!wall.is_active());

        // Finished walls stay quiet until reactivated
        for _ in 0..5 {
            assert_eq!(wall.advance(SIM_DT, &mut h.ctx(&gaze)), None);
        }
        assert_eq!(wall.behavior.updates, 1);
        assert_eq!(wall.behavior.resets, 1);
        assert!(!wall.behavior.checked_while_inactive.get());
    }

    #[test]
    fn test_finish_wins_tie_and_skips_elapsed() {
        let mut h = Harness::new(1);
        let gaze = SyntheticGaze::idle();
        let mut wall = probe_wall();
        wall.activate(&mut h.ctx(&gaze));
        wall.advance(SIM_DT, &mut h.ctx(&gaze));
        let before = wall.elapsed();

        wall.behavior.finish = true;
        wall.behavior.fail = true;
        assert_eq!(wall.advance(SIM_DT, &mut h.ctx(&gaze)), Some(WallOutcome::Finished));
        assert_eq!(wall.elapsed(), before);
    }

    #[test]
    fn test_torch_lights_follow_lifecycle() {
        let mut h = Harness::new(1);
        let gaze = SyntheticGaze::idle();
        let mut wall = probe_wall();
        wall.activate(&mut h.ctx(&gaze));
        wall.behavior.fail = true;
        wall.advance(SIM_DT, &mut h.ctx(&gaze));
        let lights: Vec<_> = h
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::WallLights { on, .. } => Some(*on),
                _ => None,
            })
            .collect();
        assert_eq!(lights, vec![true, false]);
    }

    #[test]
    fn test_with_level_offsets_next_activation() {
        let mut h = Harness::new(1);
        let gaze = SyntheticGaze::idle();
        let mut wall = probe_wall().with_level(4);
        wall.activate(&mut h.ctx(&gaze));
        assert_eq!(wall.level(), 5);
    }
}
