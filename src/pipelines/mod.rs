//! Render pipeline definitions for the showcase passes.
//!
//! - `basic` builds the solid shaded pipeline and the shared pipeline helper
//! - `transparent` is the alpha-blended variant used by transmissive materials
//! - `wireframe` renders edge-only geometry for toggled entities
//! - `background` draws the environment backdrop sphere and owns its resources

pub mod background;
pub mod basic;
pub mod transparent;
pub mod wireframe;

/// All pipelines of a frame, created once and reused.
pub struct Pipelines {
    pub solid: wgpu::RenderPipeline,
    pub transparent: wgpu::RenderPipeline,
    pub wireframe: wgpu::RenderPipeline,
    pub background: wgpu::RenderPipeline,
}

impl Pipelines {
    pub fn new(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        camera_bind_group_layout: &wgpu::BindGroupLayout,
        environment_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        Self {
            solid: basic::mk_solid_pipeline(
                device,
                config,
                camera_bind_group_layout,
                environment_bind_group_layout,
            ),
            transparent: transparent::mk_transparent_pipeline(
                device,
                config,
                camera_bind_group_layout,
                environment_bind_group_layout,
            ),
            wireframe: wireframe::mk_wireframe_pipeline(
                device,
                config,
                camera_bind_group_layout,
                environment_bind_group_layout,
            ),
            background: background::mk_background_pipeline(
                device,
                config,
                camera_bind_group_layout,
                environment_bind_group_layout,
            ),
        }
    }
}
