//! Camera types, orbit controller and view/projection uniforms.
//!
//! The camera circles a fixed target. Pointer drags feed angular velocity
//! into the [`OrbitController`], which decays it every frame for an
//! inertial feel; the wheel changes the orbit distance. The controller only
//! ever writes the camera position, so the view matrix stays a plain
//! look-at.

use cgmath::{EuclideanSpace, InnerSpace, Matrix4, Point3, Rad, Vector2, Vector3, perspective};
use instant::Duration;
use wgpu::util::DeviceExt;
use winit::event::{MouseScrollDelta, WindowEvent};

use crate::pick::Ray;

/// wgpu clip space spans z in [0, 1] while cgmath produces OpenGL-style
/// [-1, 1]; this matrix converts between the two.
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>>(position: P, target: P) -> Self {
        Self {
            position: position.into(),
            target: target.into(),
            up: Vector3::unit_y(),
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    /// Cast a ray from the camera through a point given in normalized device
    /// coordinates (x, y in [-1, 1], y up).
    pub fn cast_ray(&self, ndc: Vector2<f32>, projection: &Projection) -> Ray {
        let forward = (self.target - self.position).normalize();
        let right = forward.cross(self.up).normalize();
        let up = right.cross(forward);
        let half_height = (projection.fovy / 2.0).0.tan();
        let half_width = half_height * projection.aspect;
        let direction =
            (forward + right * (ndc.x * half_width) + up * (ndc.y * half_height)).normalize();
        Ray {
            origin: self.position,
            direction,
        }
    }
}

pub struct Projection {
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Orbit-style camera control with inertial damping.
///
/// Velocities accumulate from input events and decay exponentially in
/// [`update`](Self::update); pitch is clamped short of the poles and the
/// distance to a positive range so the camera can neither flip over nor
/// pass through its target.
pub struct OrbitController {
    pub yaw: Rad<f32>,
    pub pitch: Rad<f32>,
    pub distance: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    zoom_velocity: f32,
    sensitivity: f32,
    damping: f32,
}

const MIN_DISTANCE: f32 = 1.0;
const MAX_DISTANCE: f32 = 50.0;
const MAX_PITCH: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

impl OrbitController {
    pub fn new(distance: f32, sensitivity: f32) -> Self {
        Self {
            yaw: Rad(0.0),
            pitch: Rad(0.0),
            distance,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            zoom_velocity: 0.0,
            sensitivity,
            damping: 0.05,
        }
    }

    /// Feed a pointer drag delta (pixels) into the orbit velocities.
    pub fn handle_mouse(&mut self, dx: f64, dy: f64) {
        self.yaw_velocity += dx as f32 * self.sensitivity;
        self.pitch_velocity += dy as f32 * self.sensitivity;
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        if let WindowEvent::MouseWheel { delta, .. } = event {
            let amount = match delta {
                MouseScrollDelta::LineDelta(_, scroll) => -scroll * 0.5,
                MouseScrollDelta::PixelDelta(pos) => -pos.y as f32 * 0.01,
            };
            self.zoom_velocity += amount;
        }
    }

    /// Advance the damping/inertia state and reposition the camera on its
    /// orbit sphere.
    pub fn update(&mut self, camera: &mut Camera, dt: Duration) {
        let dt = dt.as_secs_f32();

        self.yaw += Rad(self.yaw_velocity * dt);
        self.pitch += Rad(self.pitch_velocity * dt);
        self.pitch.0 = self.pitch.0.clamp(-MAX_PITCH, MAX_PITCH);
        self.distance =
            (self.distance + self.zoom_velocity * self.distance * dt).clamp(MIN_DISTANCE, MAX_DISTANCE);

        // Frame-rate independent exponential decay.
        let decay = self.damping.powf(dt);
        self.yaw_velocity *= decay;
        self.pitch_velocity *= decay;
        self.zoom_velocity *= decay;

        let (sin_yaw, cos_yaw) = self.yaw.0.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.0.sin_cos();
        let offset = Vector3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw);
        camera.position = camera.target + offset * self.distance;
    }
}

/// Camera state plus the GPU resources derived from it.
pub struct CameraResources {
    pub camera: Camera,
    pub controller: OrbitController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(device: &wgpu::Device, camera: Camera, projection: &Projection) -> Self {
        let controller = OrbitController::new(
            (camera.position - camera.target).magnitude(),
            0.5,
        );
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera, projection);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("camera_bind_group_layout"),
            });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            camera,
            controller,
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn showcase_camera() -> (Camera, Projection) {
        let camera = Camera::new([0.0, 0.0, 5.0], [0.0, 0.0, 0.0]);
        let projection = Projection::new(1280, 720, cgmath::Deg(75.0), 0.1, 1000.0);
        (camera, projection)
    }

    #[test]
    fn center_ray_points_at_the_target() {
        let (camera, projection) = showcase_camera();
        let ray = camera.cast_ray(Vector2::new(0.0, 0.0), &projection);
        assert!((ray.direction - Vector3::new(0.0, 0.0, -1.0)).magnitude() < 1e-5);
    }

    #[test]
    fn damping_decays_velocity_without_input() {
        let (mut camera, _) = showcase_camera();
        let mut controller = OrbitController::new(5.0, 0.5);
        controller.handle_mouse(100.0, 0.0);
        let dt = Duration::from_millis(16);

        let mut previous = f32::MAX;
        for _ in 0..20 {
            controller.update(&mut camera, dt);
            assert!(controller.yaw_velocity.abs() < previous);
            previous = controller.yaw_velocity.abs();
        }
        assert!(previous < 50.0 * 0.5);
    }

    #[test]
    fn pitch_and_distance_stay_clamped() {
        let (mut camera, _) = showcase_camera();
        let mut controller = OrbitController::new(5.0, 0.5);
        controller.handle_mouse(0.0, 1e6);
        controller.zoom_velocity = -1e6;
        for _ in 0..10 {
            controller.update(&mut camera, Duration::from_millis(16));
        }
        assert!(controller.pitch.0 <= MAX_PITCH);
        assert!(controller.distance >= MIN_DISTANCE);
        // The camera sits on the orbit sphere after clamping.
        assert!(
            ((camera.position - camera.target).magnitude() - controller.distance).abs() < 1e-4
        );
    }

    #[test]
    fn controller_keeps_the_initial_pose() {
        let (mut camera, _) = showcase_camera();
        let mut controller = OrbitController::new(5.0, 0.5);
        controller.update(&mut camera, Duration::from_millis(16));
        assert!((camera.position - Point3::new(0.0, 0.0, 5.0)).magnitude() < 1e-4);
    }
}
