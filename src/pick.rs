//! Pointer ray construction and nearest-hit selection.
//!
//! Picking is done on the CPU: a ray is cast from the camera through the
//! pointer's normalized device coordinates and tested against the
//! world-space bounding sphere of every entity in the scene group. Entities
//! are tested as whole units — there is no sub-mesh traversal — and the hit
//! with the lowest ray parameter wins. This first-hit-wins policy is
//! deliberate: it gives the cheap "paint wireframe state by hover and click"
//! interaction without per-triangle tests.
//!
//! If nothing is hit, no entity is touched that frame; previously toggled
//! entities keep their last state until they are picked again.

use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3};

use crate::scene::{Animated, SceneGroup};

#[derive(Clone, Copy, Debug)]
pub struct Ray {
    pub origin: Point3<f32>,
    pub direction: Vector3<f32>,
}

/// Nearest intersected entity for one frame. Transient; recomputed per tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PickHit {
    pub entity: usize,
    pub distance: f32,
}

impl Ray {
    /// Ray/sphere intersection returning the smallest positive ray
    /// parameter, or `None` when the sphere is missed or lies behind the
    /// origin. `direction` is assumed normalized.
    pub fn intersect_sphere(&self, center: Vector3<f32>, radius: f32) -> Option<f32> {
        let oc = self.origin.to_vec() - center;
        let b = oc.dot(self.direction);
        let c = oc.magnitude2() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();
        let near = -b - sqrt_d;
        if near > 1e-4 {
            return Some(near);
        }
        let far = -b + sqrt_d;
        (far > 1e-4).then_some(far)
    }
}

/// Find the nearest entity along `ray`, honoring the group spin that the
/// renderer also applies.
pub fn pick_nearest(ray: &Ray, scene: &SceneGroup) -> Option<PickHit> {
    let mut nearest: Option<PickHit> = None;
    for (index, entity) in scene.entities.iter().enumerate() {
        let center = scene.world_center(index);
        if let Some(distance) = ray.intersect_sphere(center, entity.bounding_radius) {
            if nearest.map_or(true, |hit| distance < hit.distance) {
                nearest = Some(PickHit {
                    entity: index,
                    distance,
                });
            }
        }
    }
    nearest
}

/// The per-frame pick-and-toggle pass: apply the held flag to the nearest
/// intersected entity, if any.
pub fn pick_and_toggle(ray: &Ray, scene: &mut SceneGroup, held: bool) -> Option<PickHit> {
    let hit = pick_nearest(ray, scene);
    if let Some(hit) = hit {
        scene.entities[hit.entity].toggle(held);
    }
    hit
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Motion, ShowcaseMesh};

    fn ray_along_negative_z() -> Ray {
        Ray {
            origin: Point3::new(0.0, 0.0, 5.0),
            direction: Vector3::new(0.0, 0.0, -1.0),
        }
    }

    #[test]
    fn sphere_hit_returns_the_near_root() {
        let ray = ray_along_negative_z();
        let t = ray.intersect_sphere(Vector3::new(0.0, 0.0, 0.0), 1.0);
        assert!((t.unwrap() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn sphere_behind_the_origin_is_not_hit() {
        let ray = ray_along_negative_z();
        assert_eq!(ray.intersect_sphere(Vector3::new(0.0, 0.0, 10.0), 1.0), None);
    }

    #[test]
    fn offset_sphere_is_missed() {
        let ray = ray_along_negative_z();
        assert_eq!(ray.intersect_sphere(Vector3::new(3.0, 0.0, 0.0), 1.0), None);
    }

    #[test]
    fn nearest_of_two_overlapping_entities_wins() {
        let scene = SceneGroup::new(vec![
            ShowcaseMesh::new(Motion::Anchored, -2.0, 1.0),
            ShowcaseMesh::new(Motion::Anchored, 2.0, 1.0),
        ]);
        let hit = pick_nearest(&ray_along_negative_z(), &scene).unwrap();
        assert_eq!(hit.entity, 1);
        assert!((hit.distance - 2.0).abs() < 1e-5);
    }

    #[test]
    fn toggle_reaches_only_the_picked_entity() {
        let mut scene = SceneGroup::new(vec![
            ShowcaseMesh::new(Motion::Anchored, 0.0, 1.0),
            ShowcaseMesh::new(Motion::Orbit { offset: 0.0 }, 0.0, 0.5),
        ]);
        scene.update(0.0);
        // Orbiter sits at (2, 0, 0); the ray down the z axis only sees entity 0.
        let hit = pick_and_toggle(&ray_along_negative_z(), &mut scene, true).unwrap();
        assert_eq!(hit.entity, 0);
        assert!(scene.entities[0].wireframe);
        assert!(!scene.entities[1].wireframe);
    }

    #[test]
    fn missed_frames_keep_previous_toggle_state() {
        let mut scene = SceneGroup::new(vec![ShowcaseMesh::new(Motion::Anchored, 0.0, 1.0)]);
        pick_and_toggle(&ray_along_negative_z(), &mut scene, true);
        assert!(scene.entities[0].wireframe);

        let miss = Ray {
            origin: Point3::new(0.0, 0.0, 5.0),
            direction: Vector3::new(0.0, 1.0, 0.0),
        };
        assert_eq!(pick_and_toggle(&miss, &mut scene, false), None);
        assert!(scene.entities[0].wireframe);
    }
}
