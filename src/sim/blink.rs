//! Blink wall: hold a sequence of open/closed eye patterns
//!
//! One pattern per level. Holding the shown pattern charges it; anything else
//! drains the charge at `discharge_modifier` times the charge rate. A full
//! charge clears the pattern and shows the next one.

use super::pattern::{self, Pattern};
use super::state::{GameEvent, Sound, SoundCue, TintTarget};
use super::wall::{WallBehavior, WallContext, WallFrame};
use crate::palette::{GREEN, RED};
use crate::tuning::BlinkTuning;
use crate::{fraction, lerp_color};

#[derive(Debug, Clone)]
pub struct BlinkWall {
    tuning: BlinkTuning,
    patterns: Vec<Pattern>,
    current_index: usize,
    charge: f32,
}

impl BlinkWall {
    pub fn new(tuning: BlinkTuning) -> Self {
        Self {
            tuning,
            patterns: Vec::new(),
            current_index: 0,
            charge: 0.0,
        }
    }

    pub fn patterns(&self) -> &[Pattern] {
        &self.patterns
    }

    /// The pattern the player must perform, if any remain
    pub fn current_pattern(&self) -> Option<&Pattern> {
        self.patterns.get(self.current_index)
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn charge(&self) -> f32 {
        self.charge
    }

    fn show_current(&self, ctx: &mut WallContext<'_>) {
        if let Some(p) = self.current_pattern() {
            ctx.emit(GameEvent::ShowPattern {
                left: p.left(),
                right: p.right(),
            });
        }
    }
}

impl WallBehavior for BlinkWall {
    fn on_activate(&mut self, frame: &WallFrame, ctx: &mut WallContext<'_>) {
        self.charge = 0.0;
        self.current_index = 0;
        self.patterns = pattern::generate(ctx.rng, frame.level as usize);
        log::debug!("Blink wall: {} patterns", self.patterns.len());
        self.show_current(ctx);
    }

    fn on_reset(&mut self, ctx: &mut WallContext<'_>) {
        ctx.emit(GameEvent::HidePattern);
    }

    fn on_update(&mut self, _frame: &WallFrame, dt: f32, ctx: &mut WallContext<'_>) {
        let Some(current) = self.current_pattern().copied() else {
            return;
        };

        if current.matches(ctx.gaze.eye_state()) {
            self.charge += dt;
        } else {
            self.charge -= dt * self.tuning.discharge_modifier;
        }
        self.charge = self.charge.clamp(0.0, self.tuning.charge_time);

        ctx.emit(GameEvent::Tint {
            target: TintTarget::Eyebrow,
            color: lerp_color(RED, GREEN, fraction(self.charge, self.tuning.charge_time)),
        });

        if self.charge >= self.tuning.charge_time {
            ctx.emit(GameEvent::Sound(SoundCue::plain(Sound::PatternMatched)));
            self.charge = 0.0;
            self.current_index += 1;
            self.show_current(ctx);
        }
    }

    fn check_fail(&self, frame: &WallFrame) -> bool {
        frame.elapsed > self.tuning.max_time
    }

    fn check_finish(&self, _frame: &WallFrame) -> bool {
        self.current_index >= self.patterns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::geom::WallBox;
    use crate::sim::ports::{EyeState, SyntheticGaze};
    use crate::sim::wall::harness::Harness;
    use crate::sim::wall::{Wall, WallOutcome};
    use glam::Vec3;

    fn blink_wall(start_level: u32) -> Wall<BlinkWall> {
        let wall_box = WallBox::new(Vec3::new(12.0, 0.0, 0.0), Vec3::new(2.0, 6.0, 10.0));
        Wall::new(0, wall_box, Vec3::ONE, BlinkWall::new(BlinkTuning::default())).with_level(start_level)
    }

    /// Eyes performing the current pattern (or its exact opposite)
    fn gaze_for(wall: &Wall<BlinkWall>, agree: bool) -> SyntheticGaze {
        let eyes = wall
            .behavior()
            .current_pattern()
            .map(|p| {
                if agree {
                    p.as_eyes()
                } else {
                    EyeState::new(!p.left(), !p.right())
                }
            })
            .unwrap_or(EyeState::OPEN);
        SyntheticGaze::idle().with_eyes(eyes)
    }

    #[test]
    fn test_level_three_generates_three_patterns() {
        let mut h = Harness::new(9);
        let mut wall = blink_wall(2);
        wall.activate(&mut h.ctx(&SyntheticGaze::idle()));
        assert_eq!(wall.level(), 3);
        assert_eq!(wall.behavior().patterns().len(), 3);
        assert_eq!(wall.behavior().current_index(), 0);
        assert!(h.events.iter().any(|e| matches!(e, GameEvent::ShowPattern { .. })));
    }

    #[test]
    fn test_matching_gaze_finishes() {
        let mut h = Harness::new(9);
        let mut wall = blink_wall(2);
        wall.activate(&mut h.ctx(&SyntheticGaze::idle()));

        let mut outcome = None;
        let mut ticks = 0;
        while outcome.is_none() && ticks < 1000 {
            let gaze = gaze_for(&wall, true);
            outcome = wall.advance(SIM_DT, &mut h.ctx(&gaze));
            ticks += 1;
        }
        assert_eq!(outcome, Some(WallOutcome::Finished));
        // Three patterns at roughly 0.5 s each
        assert!(ticks <= 3 * 32, "took {ticks} ticks");
        let matched = h
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::Sound(c) if c.sound == Sound::PatternMatched))
            .count();
        assert_eq!(matched, 3);
        assert_eq!(h.events.last(), Some(&GameEvent::HidePattern));
    }

    #[test]
    fn test_mismatch_fails_exactly_after_max_time() {
        let mut h = Harness::new(9);
        let mut wall = blink_wall(2);
        wall.activate(&mut h.ctx(&SyntheticGaze::idle()));
        let max_time = BlinkTuning::default().max_time;

        loop {
            let before = wall.elapsed();
            let gaze = gaze_for(&wall, false);
            match wall.advance(SIM_DT, &mut h.ctx(&gaze)) {
                Some(outcome) => {
                    assert_eq!(outcome, WallOutcome::Failed);
                    assert!(before > max_time);
                    break;
                }
                None => {
                    assert!(before <= max_time, "still running at {before}");
                    assert_eq!(wall.behavior().current_index(), 0);
                }
            }
        }
    }

    #[test]
    fn test_discharge_is_slower_than_charge() {
        let mut h = Harness::new(9);
        let mut wall = blink_wall(0);
        wall.activate(&mut h.ctx(&SyntheticGaze::idle()));

        for _ in 0..12 {
            let gaze = gaze_for(&wall, true);
            wall.advance(SIM_DT, &mut h.ctx(&gaze));
        }
        let charged = wall.behavior().charge();
        assert!((charged - 12.0 * SIM_DT).abs() < 1e-4);

        for _ in 0..6 {
            let gaze = gaze_for(&wall, false);
            wall.advance(SIM_DT, &mut h.ctx(&gaze));
        }
        let drained = charged - wall.behavior().charge();
        assert!((drained - 6.0 * SIM_DT * 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_charge_never_negative() {
        let mut h = Harness::new(9);
        let mut wall = blink_wall(0);
        wall.activate(&mut h.ctx(&SyntheticGaze::idle()));
        for _ in 0..30 {
            let gaze = gaze_for(&wall, false);
            wall.advance(SIM_DT, &mut h.ctx(&gaze));
            assert!(wall.behavior().charge() >= 0.0);
        }
    }
}
