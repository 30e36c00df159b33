//! Camera and spotlight animation
//!
//! Both rigs are small state machines stepped by the simulation tick. A new
//! target always replaces the running animation; a cancelled animation is
//! dropped and never resumes.

use glam::{Quat, Vec3};

use super::geom::look_rotation;
use super::ports::ObjectId;
use super::scene::Scene;
use crate::consts::CAMERA_SETTLE_DEGREES;
use crate::tuning::LightTuning;

/// Player camera: turns from wall to wall
#[derive(Debug, Clone)]
pub struct CameraRig {
    pub position: Vec3,
    pub rotation: Quat,
    /// Rotation being slerped toward, if an animation is running
    target: Option<Quat>,
    speed: f32,
    /// Color saturation of the final image (1 = full color)
    pub saturation: f32,
    desaturating: bool,
}

impl CameraRig {
    pub fn new(position: Vec3, speed: f32) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
            target: None,
            speed,
            saturation: 1.0,
            desaturating: false,
        }
    }

    /// Face `point` immediately
    pub fn look_at(&mut self, point: Vec3) {
        self.target = None;
        self.rotation = look_rotation(point - self.position);
    }

    /// Start turning toward `point`, replacing any running animation
    pub fn retarget(&mut self, point: Vec3) {
        self.target = Some(look_rotation(point - self.position));
    }

    /// Drop the running animation where it is
    pub fn cancel(&mut self) {
        self.target = None;
    }

    /// Cancel and jump to face `point` unless already within a degree of it
    pub fn snap_to(&mut self, point: Vec3) {
        self.cancel();
        let target = look_rotation(point - self.position);
        if self.rotation.angle_between(target) > CAMERA_SETTLE_DEGREES.to_radians() {
            self.rotation = target;
        }
    }

    pub fn is_animating(&self) -> bool {
        self.target.is_some()
    }

    /// Fade the image to black and white (game over)
    pub fn begin_desaturate(&mut self) {
        self.desaturating = true;
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    pub fn advance(&mut self, dt: f32) {
        if let Some(target) = self.target {
            // Ease out: a fixed fraction of the remaining angle per second
            self.rotation = self.rotation.slerp(target, (dt * self.speed).min(1.0));
            if self.rotation.angle_between(target) <= CAMERA_SETTLE_DEGREES.to_radians() {
                self.target = None;
            }
        }
        if self.desaturating {
            self.saturation = (self.saturation - dt).max(0.0);
        }
    }
}

/// What the spotlight is pointed at
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightAim {
    Idle,
    /// Track a scene object every tick
    Follow(ObjectId),
    /// Damp toward a fixed point
    Focus(Vec3),
}

/// Spotlight that follows the track disk and the player's gaze
#[derive(Debug, Clone)]
pub struct Spotlight {
    pub position: Vec3,
    pub rotation: Quat,
    aim: LightAim,
    base_intensity: f32,
    intensity: f32,
    damp_speed: f32,
    threshold: f32,
}

impl Spotlight {
    pub fn new(tuning: &LightTuning) -> Self {
        Self {
            position: tuning.position,
            rotation: Quat::IDENTITY,
            aim: LightAim::Idle,
            base_intensity: tuning.base_intensity,
            intensity: tuning.base_intensity,
            damp_speed: tuning.damp_speed,
            threshold: tuning.threshold_degrees.to_radians(),
        }
    }

    /// Follow an object; restores full intensity
    pub fn follow(&mut self, id: ObjectId) {
        self.intensity = self.base_intensity;
        self.aim = LightAim::Follow(id);
    }

    /// Damp toward a point; restores full intensity
    pub fn focus(&mut self, point: Vec3) {
        self.intensity = self.base_intensity;
        self.aim = LightAim::Focus(point);
    }

    /// Stop aiming and restore full intensity
    pub fn release(&mut self) {
        self.intensity = self.base_intensity;
        self.aim = LightAim::Idle;
    }

    /// Scale the intensity by `fraction` of the base
    pub fn set_intensity(&mut self, fraction: f32) {
        self.intensity = fraction.clamp(0.0, 1.0) * self.base_intensity;
    }

    pub fn intensity(&self) -> f32 {
        self.intensity
    }

    pub fn aim(&self) -> LightAim {
        self.aim
    }

    pub fn advance(&mut self, dt: f32, scene: &Scene) {
        match self.aim {
            LightAim::Idle => {}
            LightAim::Follow(id) => {
                if let Some(target) = scene.position(id) {
                    self.rotation = look_rotation(target - self.position);
                }
            }
            LightAim::Focus(point) => {
                let target = look_rotation(point - self.position);
                // Small gaze jitter does not move the light
                if self.rotation.angle_between(target) >= self.threshold {
                    self.rotation = self.rotation.slerp(target, (dt * self.damp_speed).min(1.0));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::ports::Tag;

    #[test]
    fn test_camera_retarget_settles() {
        let mut camera = CameraRig::new(Vec3::ZERO, 3.0);
        camera.look_at(Vec3::new(0.0, 0.0, 10.0));
        camera.retarget(Vec3::new(10.0, 0.0, 0.0));
        assert!(camera.is_animating());
        for _ in 0..600 {
            camera.advance(SIM_DT);
        }
        assert!(!camera.is_animating());
        assert!(camera.forward().dot(Vec3::X) > 0.99);
    }

    #[test]
    fn test_new_target_supersedes_running_animation() {
        let mut camera = CameraRig::new(Vec3::ZERO, 3.0);
        camera.look_at(Vec3::Z);
        camera.retarget(Vec3::X);
        camera.advance(SIM_DT);
        camera.retarget(Vec3::NEG_X);
        for _ in 0..600 {
            camera.advance(SIM_DT);
        }
        assert!(camera.forward().dot(Vec3::NEG_X) > 0.99);
    }

    #[test]
    fn test_cancel_freezes_rotation() {
        let mut camera = CameraRig::new(Vec3::ZERO, 3.0);
        camera.look_at(Vec3::Z);
        camera.retarget(Vec3::X);
        camera.advance(SIM_DT);
        camera.cancel();
        let frozen = camera.rotation;
        for _ in 0..60 {
            camera.advance(SIM_DT);
        }
        assert_eq!(camera.rotation, frozen);
    }

    #[test]
    fn test_snap_to_jumps_and_cancels() {
        let mut camera = CameraRig::new(Vec3::ZERO, 3.0);
        camera.look_at(Vec3::Z);
        camera.retarget(Vec3::NEG_Z);
        camera.snap_to(Vec3::X);
        assert!(!camera.is_animating());
        assert!(camera.forward().dot(Vec3::X) > 0.999);
    }

    #[test]
    fn test_desaturate_reaches_zero() {
        let mut camera = CameraRig::new(Vec3::ZERO, 3.0);
        camera.begin_desaturate();
        for _ in 0..120 {
            camera.advance(SIM_DT);
        }
        assert_eq!(camera.saturation, 0.0);
    }

    #[test]
    fn test_spotlight_follows_object() {
        let mut scene = Scene::new();
        let id = scene.spawn(Tag::Disk, Vec3::new(0.0, 0.0, -10.0), 1.0);
        let mut light = Spotlight::new(&LightTuning {
            position: Vec3::ZERO,
            ..LightTuning::default()
        });
        light.follow(id);
        light.advance(SIM_DT, &scene);
        assert!((light.rotation * Vec3::Z).dot(Vec3::NEG_Z) > 0.999);

        scene.set_position(id, Vec3::new(10.0, 0.0, 0.0));
        light.advance(SIM_DT, &scene);
        assert!((light.rotation * Vec3::Z).dot(Vec3::X) > 0.999);
    }

    #[test]
    fn test_spotlight_focus_ignores_small_offsets() {
        let scene = Scene::new();
        let mut light = Spotlight::new(&LightTuning {
            position: Vec3::ZERO,
            ..LightTuning::default()
        });
        // One degree off the current heading (+Z), below the threshold
        let near = Vec3::new(1.0f32.to_radians().tan(), 0.0, 1.0);
        light.focus(near);
        light.advance(SIM_DT, &scene);
        assert_eq!(light.rotation, Quat::IDENTITY);

        light.focus(Vec3::X);
        light.advance(SIM_DT, &scene);
        assert_ne!(light.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_spotlight_intensity() {
        let tuning = LightTuning::default();
        let mut light = Spotlight::new(&tuning);
        light.set_intensity(0.25);
        assert_eq!(light.intensity(), 0.25 * tuning.base_intensity);
        light.set_intensity(3.0);
        assert_eq!(light.intensity(), tuning.base_intensity);
        light.set_intensity(0.0);
        light.release();
        assert_eq!(light.intensity(), tuning.base_intensity);
        assert_eq!(light.aim(), LightAim::Idle);
    }
}
