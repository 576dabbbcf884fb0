//! # Scene Management Module
//!
//! The scene graph: objects built from procedural meshes, the light rig,
//! shared materials, and the camera. The scene is an explicit value — tests
//! and tools can construct isolated instances instead of reaching for
//! globals.

pub mod light;
pub mod object;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use light::{AmbientLight, DirectionalLight, LightRig, PointLight};
pub use object::{DrawObject, Object};
pub use scene::Scene;
pub use vertex::Vertex3D;
