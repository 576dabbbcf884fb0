//! # User Interface Module
//!
//! Dear ImGui-based UI: [`UiManager`] handles ImGui integration with winit
//! and wgpu (input capture, frame timing, overlay rendering), and [`panel`]
//! provides the lighting control panel.
//!
//! Panel widgets hold `&mut` borrows into the scene, so moving a slider
//! writes the value straight into the light or material it controls — the
//! next frame renders the new state with no event plumbing in between.
//!
//! When the UI is focused, input capture keeps drags from also driving the
//! orbit camera.

pub mod manager;
pub mod panel;

// Re-export main types
pub use manager::UiManager;
pub use panel::lighting_panel;
