//! Per-frame render pass composition.
//!
//! A frame draws, in order: the environment backdrop, the opaque entities,
//! the transmissive ones (blended, depth read-only) and finally the
//! wireframe-toggled ones. Entities move between the solid and wireframe
//! batches as they are picked; the batching is recomputed every frame from
//! the scene flags so a toggle applied this frame is visible this frame.

use crate::{context::Context, data_structures::model::DrawModel, showcase::{MeshVisual, Showcase}};

pub fn draw_showcase<'a, 'pass>(
    render_pass: &mut wgpu::RenderPass<'pass>,
    ctx: &'a Context,
    showcase: &'a Showcase,
) where
    'a: 'pass,
{
    draw_backdrop(render_pass, ctx);

    let mut solids: Vec<&MeshVisual> = Vec::new();
    let mut transparents: Vec<&MeshVisual> = Vec::new();
    let mut wireframes: Vec<&MeshVisual> = Vec::new();
    for (entity, visual) in showcase.scene.entities.iter().zip(&showcase.visuals) {
        if entity.wireframe {
            wireframes.push(visual);
        } else if entity.transparent {
            transparents.push(visual);
        } else {
            solids.push(visual);
        }
    }

    render_pass.set_pipeline(&ctx.pipelines.solid);
    draw_batch(render_pass, ctx, &solids);

    render_pass.set_pipeline(&ctx.pipelines.transparent);
    draw_batch(render_pass, ctx, &transparents);

    render_pass.set_pipeline(&ctx.pipelines.wireframe);
    draw_batch(render_pass, ctx, &wireframes);
}

fn draw_batch<'a, 'pass>(
    render_pass: &mut wgpu::RenderPass<'pass>,
    ctx: &'a Context,
    visuals: &[&'a MeshVisual],
) where
    'a: 'pass,
{
    for visual in visuals {
        render_pass.set_vertex_buffer(1, visual.instance_buffer.slice(..));
        render_pass.draw_model_instanced(
            &visual.model,
            0..1,
            &ctx.camera.bind_group,
            &ctx.environment.bind_group,
        );
    }
}

fn draw_backdrop<'a, 'pass>(render_pass: &mut wgpu::RenderPass<'pass>, ctx: &'a Context)
where
    'a: 'pass,
{
    let backdrop = &ctx.environment.backdrop;
    render_pass.set_pipeline(&ctx.pipelines.background);
    render_pass.set_bind_group(0, &ctx.environment.bind_group, &[]);
    render_pass.set_bind_group(1, &ctx.camera.bind_group, &[]);
    render_pass.set_vertex_buffer(0, backdrop.vertex_buffer.slice(..));
    render_pass.set_index_buffer(backdrop.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
    render_pass.draw_indexed(0..backdrop.num_elements, 0, 0..1);
}
