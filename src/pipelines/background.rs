use crate::{
    data_structures::{
        model::{Mesh, ModelVertex, Vertex},
        texture::Texture,
    },
    pipelines::basic::mk_render_pipeline,
    resources::{primitives, texture::environment_layout},
};

/// Radius of the backdrop sphere. Far inside the projection far plane and
/// far outside the carousel.
const BACKDROP_RADIUS: f32 = 40.0;

/// The environment map and the inward-facing sphere it is drawn on.
///
/// The same bind group is reused by the reflective materials, so a single
/// equirectangular image serves as both backdrop and reflection source.
pub struct EnvironmentResources {
    pub texture: Texture,
    pub backdrop: Mesh,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl EnvironmentResources {
    /// Load the equirectangular reflection map and build the backdrop mesh.
    ///
    /// A missing or unreadable image degrades to a flat grey environment;
    /// the scene still renders, just without reflections worth looking at.
    pub async fn load(
        file_name: &str,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Self {
        let texture = crate::resources::texture::load_texture_or(
            file_name,
            false,
            [90, 90, 100, 255],
            device,
            queue,
        )
        .await;

        let mut sphere = primitives::uv_sphere(BACKDROP_RADIUS, 32, 16);
        sphere.invert();
        let backdrop = sphere.into_mesh(device, "backdrop sphere", 0);

        let sampler = texture.sampler.clone().unwrap_or_else(|| {
            crate::data_structures::texture::create_default_sampler(device)
        });
        let bind_group_layout = environment_layout(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&texture.view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&sampler),
                },
            ],
            label: Some("environment_bind_group"),
        });

        Self {
            texture,
            backdrop,
            bind_group,
            bind_group_layout,
        }
    }
}

/// Pipeline for the backdrop sphere: sampled by direction, drawn without
/// depth writes so every entity renders in front of it.
pub fn mk_background_pipeline(
    device: &wgpu::Device,
    config: &wgpu::SurfaceConfiguration,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    environment_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Background Pipeline Layout"),
        bind_group_layouts: &[environment_bind_group_layout, camera_bind_group_layout],
        push_constant_ranges: &[],
    });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Background Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("background_shader.wgsl").into()),
    };

    mk_render_pipeline(
        device,
        &layout,
        config.format,
        Some(wgpu::BlendState {
            alpha: wgpu::BlendComponent::REPLACE,
            color: wgpu::BlendComponent::REPLACE,
        }),
        Some(Texture::DEPTH_FORMAT),
        false,
        &[ModelVertex::desc()],
        crate::pipelines::basic::fill_primitive(None),
        shader,
    )
}
