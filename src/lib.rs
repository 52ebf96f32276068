//! mesh-carousel
//!
//! An interactive 3D showcase: a rotating carousel of primitive meshes with
//! varied materials, a reflective environment backdrop, pointer-driven
//! wireframe toggling and an orbit-style camera. Runs natively and on the
//! web through wgpu/winit. The crate is split into a small animation and
//! interaction core that is testable without a GPU, and the surrounding GPU
//! plumbing that draws it.
//!
//! High-level modules
//! - `camera`: camera, projection, orbit controller and view uniforms
//! - `context`: central GPU and window context (device/queue/pipelines/pointer)
//! - `data_structures`: meshes, materials, instances and textures
//! - `flow`: application event loop and the per-frame driver
//! - `pick`: pointer ray construction and nearest-hit selection
//! - `pipelines`: render pipelines (solid, transparent, wireframe, backdrop)
//! - `resources`: asset loading and procedural primitive generation
//! - `render`: per-frame render pass composition
//! - `scene`: the animated entity core (orbit motion, wireframe toggling)
//! - `showcase`: assembly of the carousel scene from geometry/material tables
//!

pub mod camera;
pub mod context;
pub mod data_structures;
pub mod flow;
pub mod pick;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod scene;
pub mod showcase;

// Re-exports commonly used types for convenience in downstream code.
pub use winit::dpi::PhysicalPosition;
pub use cgmath::*;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;
pub use wgpu::*;
