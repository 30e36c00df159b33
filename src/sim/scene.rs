//! Sphere-collider registry for everything walls spawn
//!
//! Numbers, spikes and the track disk register a collider here so placement
//! can reject crowded spots and gaze rays can find what the player looks at.

use glam::Vec3;

use super::geom::Ray;
use super::ports::{ObjectId, RayHit, SpatialQuery, Tag};

/// A spherical collider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collider {
    pub id: ObjectId,
    pub tag: Tag,
    pub center: Vec3,
    pub radius: f32,
}

/// Collider registry (sorted by id for deterministic queries)
#[derive(Debug, Clone)]
pub struct Scene {
    colliders: Vec<Collider>,
    next_id: u32,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            colliders: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate an id without a collider (decals, visual-only props)
    pub fn allocate_id(&mut self) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Register a collider and return its id
    pub fn spawn(&mut self, tag: Tag, center: Vec3, radius: f32) -> ObjectId {
        let id = self.allocate_id();
        self.colliders.push(Collider {
            id,
            tag,
            center,
            radius,
        });
        id
    }

    /// Remove a collider; unknown ids are ignored
    pub fn despawn(&mut self, id: ObjectId) {
        self.colliders.retain(|c| c.id != id);
    }

    pub fn set_position(&mut self, id: ObjectId, center: Vec3) {
        if let Some(c) = self.colliders.iter_mut().find(|c| c.id == id) {
            c.center = center;
        }
    }

    pub fn position(&self, id: ObjectId) -> Option<Vec3> {
        self.get(id).map(|c| c.center)
    }

    pub fn get(&self, id: ObjectId) -> Option<&Collider> {
        self.colliders.iter().find(|c| c.id == id)
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn colliders(&self) -> &[Collider] {
        &self.colliders
    }
}

impl SpatialQuery for Scene {
    fn has_overlap(&self, point: Vec3, radius: f32) -> bool {
        self.colliders
            .iter()
            .any(|c| c.center.distance(point) < c.radius + radius)
    }

    fn raycast(&self, origin: Vec3, direction: Vec3) -> Option<RayHit> {
        let ray = Ray::new(origin, direction);
        self.colliders
            .iter()
            .filter_map(|c| {
                ray.hit_sphere(c.center, c.radius).map(|distance| RayHit {
                    id: c.id,
                    tag: c.tag,
                    distance,
                })
            })
            .min_by(|a, b| {
                a.distance
                    .partial_cmp(&b.distance)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    }
}
