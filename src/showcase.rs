//! Assembly of the carousel: geometry and material tables, asset loading
//! and the GPU-side visuals kept index-aligned with the scene entities.
//!
//! The first four entities orbit the centre; the remaining two are anchored
//! decorations in front of and behind the ring. The model asset is awaited
//! here, before any entity exists, so the frame loop never observes a
//! half-constructed entity.

use cgmath::Matrix4;
use wgpu::util::DeviceExt;

use crate::{
    data_structures::model::{Material, MaterialParams, Model},
    resources::{
        load_gltf_primitive, primitives,
        texture::{load_texture_or, material_layout},
    },
    scene::{Motion, SceneGroup, ShowcaseMesh},
};

use crate::data_structures::texture::Texture;

/// Start angle of each entity on the ring. Entries past the orbiter count
/// are unused but keep the tables parallel.
pub const ANGULAR_OFFSETS: [f32; 6] = [
    0.0,
    std::f32::consts::PI * 0.5,
    std::f32::consts::PI,
    std::f32::consts::PI * 1.5,
    std::f32::consts::TAU,
    0.0,
];

/// Fixed depth of each entity; only meaningful for the anchored ones.
pub const Z_POSITIONS: [f32; 6] = [0.0, 0.0, 0.0, 0.0, 2.0, -2.0];

/// Entities below this index orbit; the rest stay anchored.
pub const ORBITER_COUNT: usize = 4;

const MODEL_FILE: &str = "duck.glb";

/// GPU resources for one entity: its model and the single-instance buffer
/// re-written every frame.
pub struct MeshVisual {
    pub model: Model,
    pub instance_buffer: wgpu::Buffer,
}

/// The whole carousel: the animation core plus one visual per entity.
pub struct Showcase {
    pub scene: SceneGroup,
    pub visuals: Vec<MeshVisual>,
}

impl Showcase {
    pub async fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let layout = material_layout(device);

        let white = || Texture::create_solid_color([255, 255, 255, 255], device, queue);
        let flat_normal = || Texture::create_default_normal_map(1, 1, device, queue);

        // Wood texture trio; failures degrade to flat colours.
        let (wood_base, wood_roughness, wood_normal) = futures::join!(
            load_texture_or("wood/baseColor.png", false, [130, 90, 50, 255], device, queue),
            load_texture_or("wood/roughness.png", false, [255, 255, 255, 255], device, queue),
            load_texture_or("wood/normal.png", true, [127, 127, 255, 255], device, queue),
        );

        // The model load is awaited before the entity tables are built.
        let (duck_geometry, duck_texture) = match load_gltf_primitive(MODEL_FILE, device, queue)
            .await
        {
            Ok(mut duck) => {
                duck.geometry.scale(0.01);
                (duck.geometry, duck.base_color)
            }
            Err(e) => {
                // A missing model must not take the whole scene down; stand
                // in with a plain sphere.
                log::error!("Failed to load {MODEL_FILE}: {e}. Substituting a placeholder.");
                (primitives::icosphere(0.75, 1), None)
            }
        };
        let duck_base = duck_texture.unwrap_or_else(|| {
            Texture::create_solid_color([230, 190, 60, 255], device, queue)
        });

        let chrome = Material::new(
            device,
            "chrome",
            MaterialParams {
                metallic: 1.0,
                roughness: 0.0,
                ..Default::default()
            },
            white(),
            white(),
            flat_normal(),
            &layout,
        );
        let wood = Material::new(
            device,
            "wood",
            MaterialParams {
                normal_scale: [6.0, 6.0],
                roughness: 1.0,
                ..Default::default()
            },
            wood_base,
            wood_roughness,
            wood_normal,
            &layout,
        );
        let glass = Material::new(
            device,
            "glass",
            MaterialParams {
                transmission: 1.0,
                roughness: 0.0,
                ..Default::default()
            },
            white(),
            white(),
            flat_normal(),
            &layout,
        );
        let duck_material = Material::new(
            device,
            "duck",
            MaterialParams::default(),
            duck_base,
            white(),
            flat_normal(),
            &layout,
        );
        let cyan_lines = Material::new(
            device,
            "cyan lines",
            MaterialParams {
                base_color: [0x44 as f32 / 255.0, 0xcc as f32 / 255.0, 1.0, 1.0],
                ..Default::default()
            },
            white(),
            white(),
            flat_normal(),
            &layout,
        );
        let blue_chrome = Material::new(
            device,
            "blue chrome",
            MaterialParams {
                base_color: [0.0, 0x99 as f32 / 255.0, 1.0, 1.0],
                metallic: 1.0,
                roughness: 0.0,
                ..Default::default()
            },
            white(),
            white(),
            flat_normal(),
            &layout,
        );

        let geometries = vec![
            ("torus knot", primitives::torus_knot(0.5, 0.2, 128, 32, 2, 3)),
            ("rounded box", primitives::rounded_box([1.0, 1.0, 1.0], 4, 0.02)),
            ("icosphere", primitives::icosphere(0.75, 2)),
            ("duck", duck_geometry),
            ("sphere", primitives::uv_sphere(0.75, 16, 16)),
            ("torus", primitives::torus(0.6, 0.25, 16, 48)),
        ];
        let materials = vec![chrome, wood, glass, duck_material, cyan_lines, blue_chrome];

        let mut entities = Vec::with_capacity(geometries.len());
        let mut visuals = Vec::with_capacity(geometries.len());
        for (index, ((name, geometry), material)) in
            geometries.into_iter().zip(materials).enumerate()
        {
            let motion = if index < ORBITER_COUNT {
                Motion::Orbit {
                    offset: ANGULAR_OFFSETS[index],
                }
            } else {
                Motion::Anchored
            };
            let mut entity =
                ShowcaseMesh::new(motion, Z_POSITIONS[index], geometry.bounding_radius());
            // The line material renders edge-only from the start; the glass
            // entity goes through the blended pass.
            entity.wireframe = material.name == "cyan lines";
            entity.transparent = material.name == "glass";

            let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Instance Buffer"),
                contents: bytemuck::cast_slice(&[entity.instance.to_raw()]),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
            let mesh = geometry.into_mesh(device, name, 0);
            visuals.push(MeshVisual {
                model: Model {
                    meshes: vec![mesh],
                    materials: vec![material],
                },
                instance_buffer,
            });
            entities.push(entity);
        }

        Self {
            scene: SceneGroup::new(entities),
            visuals,
        }
    }

    /// Upload the world matrices (group spin on top of the local transforms)
    /// for the current frame.
    pub fn write_to_buffers(&self, queue: &wgpu::Queue) {
        let parent = Matrix4::from_angle_y(self.scene.rotation);
        for (entity, visual) in self.scene.entities.iter().zip(&self.visuals) {
            let raw = entity.instance.to_raw_with_parent(parent);
            queue.write_buffer(&visual.instance_buffer, 0, bytemuck::cast_slice(&[raw]));
        }
    }
}
