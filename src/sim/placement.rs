//! Rejection-sampled spawn placement
//!
//! Draw a point, reject it while it overlaps an existing collider. After
//! `MAX_PLACEMENT_ATTEMPTS` rejections the last sample is accepted anyway, so a
//! crowded wall degrades into overlapping props instead of a stalled frame.

use glam::Vec3;
use rand::Rng;

use super::ports::SpatialQuery;
use crate::consts::MAX_PLACEMENT_ATTEMPTS;

/// Find a spot at least `gap` away from every collider in `query`
pub fn place<Q, R>(query: &Q, rng: &mut R, gap: f32, mut sample: impl FnMut(&mut R) -> Vec3) -> Vec3
where
    Q: SpatialQuery + ?Sized,
    R: Rng,
{
    let mut position = sample(rng);
    let mut rejected = 0;
    while query.has_overlap(position, gap) {
        if rejected >= MAX_PLACEMENT_ATTEMPTS {
            log::debug!(
                "Placement gave up after {} attempts, accepting overlap at {:?}",
                rejected,
                position
            );
            return position;
        }
        rejected += 1;
        position = sample(rng);
    }
    position
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ports::{ObjectId, RayHit, Tag};
    use crate::sim::scene::Scene;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    struct Crowded;

    impl SpatialQuery for Crowded {
        fn has_overlap(&self, _point: Vec3, _radius: f32) -> bool {
            true
        }

        fn raycast(&self, _origin: Vec3, _direction: Vec3) -> Option<RayHit> {
            Some(RayHit {
                id: ObjectId(0),
                tag: Tag::Spike,
                distance: 0.0,
            })
        }
    }

    #[test]
    fn test_empty_scene_accepts_first_sample() {
        let scene = Scene::new();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut calls = 0;
        let placement = place(&scene, &mut rng, 1.0, |_| {
            calls += 1;
            Vec3::X
        });
        assert_eq!(calls, 1);
        assert_eq!(placement, Vec3::X);
    }

    #[test]
    fn test_retry_cap_accepts_overlap() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut calls = 0u32;
        let placement = place(&Crowded, &mut rng, 1.0, |_| {
            calls += 1;
            Vec3::splat(calls as f32)
        });
        // First draw plus one redraw per rejection, then the overlap is kept
        assert_eq!(calls, MAX_PLACEMENT_ATTEMPTS + 1);
        assert_eq!(placement, Vec3::splat(calls as f32));
    }

    #[test]
    fn test_rejects_overlapping_sample() {
        let mut scene = Scene::new();
        scene.spawn(Tag::Number, Vec3::ZERO, 0.5);
        let mut rng = Pcg32::seed_from_u64(3);
        let mut samples = vec![Vec3::new(10.0, 0.0, 0.0), Vec3::ZERO].into_iter().rev();
        let placement = place(&scene, &mut rng, 1.0, |_| samples.next().unwrap());
        assert_eq!(placement, Vec3::new(10.0, 0.0, 0.0));
    }
}
