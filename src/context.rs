use std::sync::Arc;

use cgmath::Vector2;
use winit::{dpi::PhysicalPosition, window::Window};

use crate::{
    camera::{self, CameraResources, Projection},
    data_structures::texture,
    pipelines::{Pipelines, background::EnvironmentResources},
};

/// Equirectangular reflection map, loaded at startup.
const ENVIRONMENT_MAP: &str = "envs/san_giuseppe_bridge_2k.jpg";

/// Last known pointer position in normalized device coordinates, plus the
/// held flag.
///
/// The flag is a toggle, not a press-and-hold latch: every press inverts it.
/// Input callbacks write this state, the frame driver reads it once per
/// tick; both run on the render thread so no synchronization is needed.
#[derive(Clone, Debug)]
pub struct PointerState {
    pub ndc: Vector2<f32>,
    pub held: bool,
}

impl PointerState {
    pub fn new() -> Self {
        Self {
            // Starts far off-screen so nothing is picked before the first
            // pointer event arrives.
            ndc: Vector2::new(100.0, 100.0),
            held: false,
        }
    }

    /// Map a window-space cursor position to normalized device coordinates
    /// (x, y in [-1, 1], y up).
    pub fn set_from_screen(&mut self, position: PhysicalPosition<f64>, width: u32, height: u32) {
        self.ndc.x = (position.x / width as f64 * 2.0 - 1.0) as f32;
        self.ndc.y = (-(position.y / height as f64) * 2.0 + 1.0) as f32;
    }

    pub fn flip(&mut self) {
        self.held = !self.held;
    }
}

impl Default for PointerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Central GPU and window context.
///
/// Owns the surface, device/queue, pipelines, camera and environment
/// resources and the pointer state. Everything the frame driver touches
/// hangs off this struct.
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
    pub camera: CameraResources,
    pub projection: Projection,
    pub environment: EnvironmentResources,
    pub pipelines: Pipelines,
    pub pointer: PointerState,
    pub clear_colour: wgpu::Color,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // The instance is a handle to our GPU
        // BackendBit::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance.create_surface(window.clone())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        // Line polygon mode drives the wireframe toggle; take it only where
        // the adapter offers it (WebGL does not).
        let required_features = adapter.features() & wgpu::Features::POLYGON_MODE_LINE;
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features,
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                memory_hints: Default::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_caps = surface.get_capabilities(&adapter);
        // The shaders assume an sRGB surface texture; using a different one
        // would come out darker.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .unwrap_or(surface_caps.formats[0]);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width,
            height: size.height,
            present_mode: surface_caps.present_modes[0],
            alpha_mode: surface_caps.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        // The carousel is viewed from just outside the ring, straight down
        // the z axis.
        let camera = camera::Camera::new([0.0, 0.0, 5.0], [0.0, 0.0, 0.0]);
        let projection =
            camera::Projection::new(config.width, config.height, cgmath::Deg(75.0), 0.1, 1000.0);
        let camera = CameraResources::new(&device, camera, &projection);

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        let environment = EnvironmentResources::load(ENVIRONMENT_MAP, &device, &queue).await;

        let pipelines = Pipelines::new(
            &device,
            &config,
            &camera.bind_group_layout,
            &environment.bind_group_layout,
        );

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
            camera,
            projection,
            environment,
            pipelines,
            pointer: PointerState::new(),
            clear_colour: wgpu::Color::BLACK,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_center_maps_to_ndc_origin() {
        let mut pointer = PointerState::new();
        for (w, h) in [(200u32, 100u32), (1920, 1080), (333, 777)] {
            pointer.set_from_screen(
                PhysicalPosition::new(w as f64 / 2.0, h as f64 / 2.0),
                w,
                h,
            );
            assert!(pointer.ndc.x.abs() < 1e-6);
            assert!(pointer.ndc.y.abs() < 1e-6);
        }
    }

    #[test]
    fn ndc_mapping_is_idempotent_and_oriented() {
        let mut pointer = PointerState::new();
        pointer.set_from_screen(PhysicalPosition::new(0.0, 0.0), 800, 600);
        let first = pointer.ndc;
        pointer.set_from_screen(PhysicalPosition::new(0.0, 0.0), 800, 600);
        assert_eq!(pointer.ndc, first);
        // Top-left of the window is (-1, 1): x right, y up.
        assert_eq!(first, Vector2::new(-1.0, 1.0));

        pointer.set_from_screen(PhysicalPosition::new(800.0, 600.0), 800, 600);
        assert_eq!(pointer.ndc, Vector2::new(1.0, -1.0));
    }

    #[test]
    fn two_presses_restore_the_held_flag() {
        let mut pointer = PointerState::new();
        assert!(!pointer.held);
        pointer.flip();
        assert!(pointer.held);
        pointer.flip();
        assert!(!pointer.held);
    }
}
