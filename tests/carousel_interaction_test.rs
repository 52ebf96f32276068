//! Headless end-to-end exercise of the animation and interaction core:
//! pointer events drive the pick pass against a scene laid out like the
//! real carousel, without a window or a GPU.

use cgmath::{Deg, InnerSpace, Vector2};
use mesh_carousel::{
    camera::{Camera, Projection},
    context::PointerState,
    pick,
    scene::{Animated, Motion, SceneGroup, ShowcaseMesh},
    showcase::{ANGULAR_OFFSETS, ORBITER_COUNT, Z_POSITIONS},
};
use winit::dpi::PhysicalPosition;

/// The carousel layout with representative bounding radii, minus the GPU.
fn carousel_scene() -> SceneGroup {
    let radii = [0.95, 0.87, 0.75, 0.8, 0.75, 0.85];
    let entities = (0..6)
        .map(|index| {
            let motion = if index < ORBITER_COUNT {
                Motion::Orbit {
                    offset: ANGULAR_OFFSETS[index],
                }
            } else {
                Motion::Anchored
            };
            ShowcaseMesh::new(motion, Z_POSITIONS[index], radii[index])
        })
        .collect();
    SceneGroup::new(entities)
}

fn showcase_camera() -> (Camera, Projection) {
    let camera = Camera::new([0.0, 0.0, 5.0], [0.0, 0.0, 0.0]);
    let projection = Projection::new(1280, 720, Deg(75.0), 0.1, 1000.0);
    (camera, projection)
}

#[test]
fn initial_pointer_hits_nothing() {
    let mut scene = carousel_scene();
    scene.update(0.0);
    let (camera, projection) = showcase_camera();
    let pointer = PointerState::new();

    // The pointer starts far off-screen; the first frames must not toggle
    // anything.
    let ray = camera.cast_ray(pointer.ndc, &projection);
    assert_eq!(pick::pick_and_toggle(&ray, &mut scene, pointer.held), None);
    assert!(scene.entities.iter().all(|e| !e.wireframe));
}

#[test]
fn center_click_paints_the_front_anchored_entity() {
    let mut scene = carousel_scene();
    scene.update(0.0);
    let (camera, projection) = showcase_camera();
    let mut pointer = PointerState::new();

    // Move to the middle of an 800x600 window, then press once.
    pointer.set_from_screen(PhysicalPosition::new(400.0, 300.0), 800, 600);
    pointer.flip();
    assert!(pointer.held);

    let ray = camera.cast_ray(pointer.ndc, &projection);
    let hit = pick::pick_and_toggle(&ray, &mut scene, pointer.held).unwrap();

    // At t=0 the orbiters sit on the ring; only the two anchored entities
    // line up with the view axis, and the nearer one (z = 2) must win.
    assert_eq!(hit.entity, 4);
    assert!(scene.entities[4].wireframe);
    for (index, entity) in scene.entities.iter().enumerate() {
        if index != 4 {
            assert!(!entity.wireframe, "entity {index} was toggled");
        }
    }
}

#[test]
fn second_press_restores_the_solid_state() {
    let mut scene = carousel_scene();
    scene.update(0.0);
    let (camera, projection) = showcase_camera();
    let mut pointer = PointerState::new();
    pointer.set_from_screen(PhysicalPosition::new(512.0, 384.0), 1024, 768);

    let ray = camera.cast_ray(pointer.ndc, &projection);

    pointer.flip();
    pick::pick_and_toggle(&ray, &mut scene, pointer.held);
    assert!(scene.entities[4].wireframe);

    pointer.flip();
    assert!(!pointer.held);
    pick::pick_and_toggle(&ray, &mut scene, pointer.held);
    assert!(!scene.entities[4].wireframe);
}

#[test]
fn toggled_state_survives_frames_that_miss() {
    let mut scene = carousel_scene();
    scene.update(0.0);
    let (camera, projection) = showcase_camera();
    let mut pointer = PointerState::new();

    pointer.set_from_screen(PhysicalPosition::new(400.0, 300.0), 800, 600);
    pointer.flip();
    let ray = camera.cast_ray(pointer.ndc, &projection);
    pick::pick_and_toggle(&ray, &mut scene, pointer.held);
    assert!(scene.entities[4].wireframe);

    // Pointer wanders to a corner; subsequent frames hit nothing but the
    // painted state stays.
    pointer.set_from_screen(PhysicalPosition::new(1.0, 1.0), 800, 600);
    for frame in 1..10 {
        scene.update(frame as f32 * 16.0);
        let ray = camera.cast_ray(pointer.ndc, &projection);
        pick::pick_and_toggle(&ray, &mut scene, pointer.held);
    }
    assert!(scene.entities[4].wireframe);
}

#[test]
fn orbiters_follow_their_table_offsets() {
    let mut scene = carousel_scene();
    let t = 4000.0;
    scene.update(t);

    for index in 0..ORBITER_COUNT {
        let expected_angle = t * mesh_carousel::scene::SPIN_RATE + ANGULAR_OFFSETS[index];
        let p = scene.entities[index].instance.position;
        assert!((p.x - expected_angle.cos() * 2.0).abs() < 1e-4);
        assert!((p.y - expected_angle.sin() * 2.0).abs() < 1e-4);
        assert_eq!(p.z, Z_POSITIONS[index]);
    }
    for index in ORBITER_COUNT..6 {
        let p = scene.entities[index].instance.position;
        assert_eq!((p.x, p.y, p.z), (0.0, 0.0, Z_POSITIONS[index]));
    }
}

#[test]
fn pick_tracks_the_group_spin() {
    let mut scene = carousel_scene();
    // A quarter turn: the rear anchored entity (z = -2) swings onto the
    // +x axis while the front one moves off it.
    let quarter_turn = std::f32::consts::FRAC_PI_2 / mesh_carousel::scene::SPIN_RATE;
    scene.update(quarter_turn);

    let rear = scene.world_center(5);
    assert!((rear.x - -2.0).abs() < 1e-2 || (rear.x - 2.0).abs() < 1e-2);
    assert!(rear.z.abs() < 1e-2);

    // A ray straight down the z axis no longer hits either anchored entity.
    let (camera, projection) = showcase_camera();
    let ray = camera.cast_ray(Vector2::new(0.0, 0.0), &projection);
    let hit = pick::pick_nearest(&ray, &scene);
    if let Some(hit) = hit {
        assert!(hit.entity != 4 && hit.entity != 5);
    }
}

#[test]
fn toggle_is_per_entity_not_global() {
    let mut scene = carousel_scene();
    scene.update(0.0);
    scene.entities[1].toggle(true);
    scene.entities[3].toggle(true);
    scene.entities[1].toggle(false);
    assert!(!scene.entities[1].wireframe);
    assert!(scene.entities[3].wireframe);
}

#[test]
fn center_ray_is_resolution_independent() {
    let (camera, projection) = showcase_camera();
    let mut pointer = PointerState::new();
    let mut directions = Vec::new();
    for (w, h) in [(640u32, 480u32), (1920, 1080), (333, 911)] {
        pointer.set_from_screen(PhysicalPosition::new(w as f64 / 2.0, h as f64 / 2.0), w, h);
        directions.push(camera.cast_ray(pointer.ndc, &projection).direction);
    }
    for pair in directions.windows(2) {
        assert!((pair[0] - pair[1]).magnitude() < 1e-6);
    }
}
