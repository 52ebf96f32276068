//! Data structures for the showcase scene: models, instances, and textures.
//!
//! - `model` contains mesh and material definitions, GPU resources for 3D models
//! - `texture` contains GPU texture wrapper and creation utilities
//! - `instance` holds per-entity transformation data

pub mod instance;
pub mod model;
pub mod texture;
