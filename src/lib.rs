// src/lib.rs
//! Lightbox
//!
//! An interactive lighting playground built on wgpu and winit: a fixed
//! stage of primitives under an ambient/directional/point light rig, with
//! an ImGui panel whose sliders write straight into the scene.

pub mod app;
pub mod gfx;
pub mod stage;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::LightboxApp;

/// Creates a default Lightbox application instance
pub fn default() -> LightboxApp {
    pollster::block_on(LightboxApp::new())
}
