//! Wall boxes, spawn bounds and look rotations
//!
//! A wall is an axis-aligned box. Its spawn bounds are the box shrunk by a
//! per-axis margin; walls sample random interior points from them.

use glam::{Mat3, Quat, Vec3};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// World-space box of a wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallBox {
    pub center: Vec3,
    pub size: Vec3,
}

impl WallBox {
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self { center, size }
    }

    #[inline]
    pub fn min(&self) -> Vec3 {
        self.center - self.size / 2.0
    }

    #[inline]
    pub fn max(&self) -> Vec3 {
        self.center + self.size / 2.0
    }
}

/// Spawn bounds (`x/y/z min/max`), computed once per wall
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: Vec3,
    pub max: Vec3,
}

impl Bounds {
    /// Shrink a wall box by `margin` on every side
    pub fn from_box(wall: &WallBox, margin: Vec3) -> Self {
        Self {
            min: wall.min() + margin,
            max: wall.max() - margin,
        }
    }

    pub fn random_x(&self, rng: &mut impl Rng) -> f32 {
        sample_axis(rng, self.min.x, self.max.x)
    }

    pub fn random_y(&self, rng: &mut impl Rng) -> f32 {
        sample_axis(rng, self.min.y, self.max.y)
    }

    pub fn random_z(&self, rng: &mut impl Rng) -> f32 {
        sample_axis(rng, self.min.z, self.max.z)
    }

    /// Random point in the XY face at a fixed depth
    pub fn random_xy(&self, rng: &mut impl Rng, z: f32) -> Vec3 {
        Vec3::new(self.random_x(rng), self.random_y(rng), z)
    }

    /// Random point in the YZ face at a fixed x
    pub fn random_yz(&self, rng: &mut impl Rng, x: f32) -> Vec3 {
        Vec3::new(x, self.random_y(rng), self.random_z(rng))
    }
}

/// Uniform sample in `[lo, hi)`; a collapsed axis yields `lo`
fn sample_axis(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

/// Rotation whose +Z axis points along `forward`, keeping `Y` up
pub fn look_rotation(forward: Vec3) -> Quat {
    let f = forward.normalize_or_zero();
    if f == Vec3::ZERO {
        return Quat::IDENTITY;
    }
    // Looking straight up or down: borrow +Z as the up reference
    let up = if f.cross(Vec3::Y).length_squared() < 1e-6 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    let right = up.cross(f).normalize();
    let true_up = f.cross(right);
    Quat::from_mat3(&Mat3::from_cols(right, true_up, f))
}

/// Ray from an origin along a direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }

    /// Distance along the ray to the first intersection with a sphere
    pub fn hit_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let dir = self.direction.normalize_or_zero();
        if dir == Vec3::ZERO {
            return None;
        }
        let oc = self.origin - center;
        let b = oc.dot(dir);
        let c = oc.length_squared() - radius * radius;
        let disc = b * b - c;
        if disc < 0.0 {
            return None;
        }
        let sqrt = disc.sqrt();
        let near = -b - sqrt;
        let far = -b + sqrt;
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            // Origin is inside the sphere
            Some(0.0)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_bounds_from_box_applies_margin() {
        let wall = WallBox::new(Vec3::new(0.0, 0.0, 12.0), Vec3::new(10.0, 6.0, 2.0));
        let bounds = Bounds::from_box(&wall, Vec3::ONE);
        assert_eq!(bounds.min, Vec3::new(-4.0, -2.0, 12.0));
        assert_eq!(bounds.max, Vec3::new(4.0, 2.0, 12.0));
    }

    #[test]
    fn test_random_points_stay_inside() {
        let wall = WallBox::new(Vec3::ZERO, Vec3::new(10.0, 6.0, 2.0));
        let bounds = Bounds::from_box(&wall, Vec3::ONE);
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..200 {
            let p = bounds.random_xy(&mut rng, 1.0);
            assert!(p.x >= bounds.min.x && p.x <= bounds.max.x);
            assert!(p.y >= bounds.min.y && p.y <= bounds.max.y);
            assert_eq!(p.z, 1.0);
        }
    }

    #[test]
    fn test_collapsed_axis_does_not_panic() {
        // The z margin swallows the whole depth
        let wall = WallBox::new(Vec3::ZERO, Vec3::new(10.0, 6.0, 2.0));
        let bounds = Bounds::from_box(&wall, Vec3::new(1.0, 1.0, 3.0));
        let mut rng = Pcg32::seed_from_u64(1);
        assert_eq!(bounds.random_z(&mut rng), bounds.min.z);
    }

    #[test]
    fn test_look_rotation_points_forward() {
        let dir = Vec3::new(1.0, 0.0, 1.0).normalize();
        let rot = look_rotation(dir);
        let forward = rot * Vec3::Z;
        assert!((forward - dir).length() < 1e-5);
        // Straight up does not produce NaN
        let up = look_rotation(Vec3::Y);
        assert!(up.is_finite());
    }

    #[test]
    fn test_ray_hits_sphere_in_front_only() {
        let ray = Ray::new(Vec3::ZERO, Vec3::NEG_X);
        let hit = ray.hit_sphere(Vec3::new(-10.0, 0.0, 0.0), 0.5);
        assert!((hit.unwrap() - 9.5).abs() < 1e-4);
        assert!(ray.hit_sphere(Vec3::new(10.0, 0.0, 0.0), 0.5).is_none());
        assert!(ray.hit_sphere(Vec3::new(-10.0, 2.0, 0.0), 0.5).is_none());
    }
}
