//! The animated entity core of the carousel.
//!
//! Everything in this module is plain CPU state so the animation and
//! interaction logic can be exercised without a window or a GPU. The
//! matching GPU resources (models, instance buffers) live in
//! [`crate::showcase`] and are kept index-aligned with the entities here.

use cgmath::{Rad, Vector3};

use crate::data_structures::instance::Instance;

/// Distance of the orbiting entities from the carousel centre.
pub const ORBIT_RADIUS: f32 = 2.0;

/// Angular rate in radians per millisecond. Shared by the per-entity orbits
/// and the aggregate group spin.
pub const SPIN_RATE: f32 = 0.0005;

/// How an entity moves over time.
///
/// Orbiters circle the carousel centre in the xy-plane; anchored entities
/// keep whatever transform they were constructed with (typically a fixed
/// z offset in front of or behind the ring).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Motion {
    Orbit { offset: f32 },
    Anchored,
}

/// Per-frame behavior shared by every showcase entity.
///
/// `update` receives the global timestamp in milliseconds since the first
/// frame. `toggle` switches the entity between solid and wireframe
/// rendering.
pub trait Animated {
    fn update(&mut self, t: f32);
    fn toggle(&mut self, active: bool);
}

/// One drawable entity of the carousel.
///
/// Holds the local transform, the motion kind, the bounding-sphere radius
/// captured from its geometry at build time, and the render-mode flags the
/// pipelines consult when batching.
#[derive(Clone, Debug)]
pub struct ShowcaseMesh {
    pub motion: Motion,
    pub instance: Instance,
    pub bounding_radius: f32,
    pub wireframe: bool,
    pub transparent: bool,
}

impl ShowcaseMesh {
    pub fn new(motion: Motion, z: f32, bounding_radius: f32) -> Self {
        let mut instance = Instance::new();
        instance.position.z = z;
        Self {
            motion,
            instance,
            bounding_radius,
            wireframe: false,
            transparent: false,
        }
    }
}

impl Animated for ShowcaseMesh {
    fn update(&mut self, t: f32) {
        if let Motion::Orbit { offset } = self.motion {
            let angle = t * SPIN_RATE + offset;
            self.instance.position.x = angle.cos() * ORBIT_RADIUS;
            self.instance.position.y = angle.sin() * ORBIT_RADIUS;
        }
    }

    fn toggle(&mut self, active: bool) {
        self.wireframe = active;
    }
}

/// The ordered set of showcase entities plus the aggregate spin.
///
/// The group rotation is a pure function of the timestamp: children are
/// updated first, then the rotation is recomputed, so a frame rendered at
/// time `t` always shows `rotation = t * rate` regardless of call history.
pub struct SceneGroup {
    pub entities: Vec<ShowcaseMesh>,
    pub rotation: Rad<f32>,
    rate: f32,
}

impl SceneGroup {
    pub fn new(entities: Vec<ShowcaseMesh>) -> Self {
        Self {
            entities,
            rotation: Rad(0.0),
            rate: SPIN_RATE,
        }
    }

    pub fn update(&mut self, t: f32) {
        for entity in self.entities.iter_mut() {
            entity.update(t);
        }
        self.rotation = Rad(t * self.rate);
    }

    /// World-space centre of the entity at `idx`, as seen by the pick ray.
    pub fn world_center(&self, idx: usize) -> Vector3<f32> {
        let local = self.entities[idx].instance.position;
        let (sin, cos) = self.rotation.0.sin_cos();
        Vector3::new(
            local.x * cos + local.z * sin,
            local.y,
            -local.x * sin + local.z * cos,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orbiter(offset: f32) -> ShowcaseMesh {
        ShowcaseMesh::new(Motion::Orbit { offset }, 0.0, 1.0)
    }

    #[test]
    fn orbiters_stay_on_the_ring() {
        let mut mesh = orbiter(std::f32::consts::FRAC_PI_2);
        for t in [0.0, 250.0, 1000.0, 12345.0] {
            mesh.update(t);
            let p = mesh.instance.position;
            let r2 = p.x * p.x + p.y * p.y;
            assert!(
                (r2 - ORBIT_RADIUS * ORBIT_RADIUS).abs() < 1e-3,
                "off the ring at t={t}: {r2}"
            );
        }
    }

    #[test]
    fn orbit_position_at_t_1000() {
        let mut mesh = orbiter(0.0);
        mesh.update(1000.0);
        let p = mesh.instance.position;
        assert!((p.x - (0.5f32).cos() * 2.0).abs() < 1e-4);
        assert!((p.y - (0.5f32).sin() * 2.0).abs() < 1e-4);
        assert!((p.x - 1.755).abs() < 1e-3);
        assert!((p.y - 0.959).abs() < 1e-3);
    }

    #[test]
    fn anchored_entities_never_move() {
        let mut mesh = ShowcaseMesh::new(Motion::Anchored, -2.0, 1.0);
        for t in [0.0, 500.0, 99999.0] {
            mesh.update(t);
            assert_eq!(mesh.instance.position.x, 0.0);
            assert_eq!(mesh.instance.position.y, 0.0);
            assert_eq!(mesh.instance.position.z, -2.0);
        }
    }

    #[test]
    fn group_rotation_is_pure_in_t() {
        let mut group = SceneGroup::new(vec![orbiter(0.0)]);
        group.update(4000.0);
        group.update(1000.0);
        assert_eq!(group.rotation, Rad(1000.0 * SPIN_RATE));
        group.update(1000.0);
        assert_eq!(group.rotation, Rad(1000.0 * SPIN_RATE));
    }

    #[test]
    fn toggle_sets_the_wireframe_flag() {
        let mut mesh = orbiter(0.0);
        assert!(!mesh.wireframe);
        mesh.toggle(true);
        assert!(mesh.wireframe);
        mesh.toggle(false);
        assert!(!mesh.wireframe);
    }

    #[test]
    fn world_center_applies_the_group_spin() {
        let mut group = SceneGroup::new(vec![ShowcaseMesh::new(Motion::Anchored, 2.0, 1.0)]);
        // Half a turn: π / SPIN_RATE milliseconds.
        group.update(std::f32::consts::PI / SPIN_RATE);
        let center = group.world_center(0);
        assert!(center.x.abs() < 1e-3);
        assert!((center.z + 2.0).abs() < 1e-3);
    }
}
