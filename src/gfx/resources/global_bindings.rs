//! Global uniform bindings for camera and lighting data
//!
//! Manages the uniform buffer and bind group for per-frame global state:
//! camera matrices plus the whole light rig, including the view-projection
//! matrices the shadow maps were rendered with.

use crate::{
    gfx::camera::camera_utils::CameraUniform,
    gfx::scene::light::LightRig,
    wgpu_utils::{
        binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder, BindGroupLayoutWithDesc},
        binding_types,
        uniform_buffer::UniformBuffer,
    },
};

/// Global uniform buffer content structure
///
/// MUST match the `Globals` struct in the shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalUBOContent {
    // Camera data (matches CameraUniform)
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],

    // Light rig. Intensities are the *effective* values: a hidden light
    // contributes 0.0 here while keeping its stored intensity on the CPU.
    ambient_color: [f32; 3],
    ambient_intensity: f32,
    sun_position: [f32; 3],
    sun_intensity: f32,
    sun_color: [f32; 3],
    _padding0: f32,
    point_position: [f32; 3],
    point_intensity: f32,
    point_color: [f32; 3],
    point_range: f32,

    // Shadow matrices
    sun_view_proj: [[f32; 4]; 4],
    point_view_proj: [[f32; 4]; 4],
}

/// Type alias for the global uniform buffer
pub type GlobalUBO = UniformBuffer<GlobalUBOContent>;

/// Updates the global uniform buffer with camera and light rig data
///
/// Should be called each frame so shading and shadow sampling stay in sync
/// with the panel-driven light state.
pub fn update_global_ubo(
    ubo: &mut GlobalUBO,
    queue: &wgpu::Queue,
    camera: CameraUniform,
    lights: &LightRig,
) {
    let content = GlobalUBOContent {
        view_position: camera.view_position,
        view_proj: camera.view_proj,

        ambient_color: lights.ambient.color,
        ambient_intensity: lights.ambient.effective_intensity(),
        sun_position: lights.directional.position.into(),
        sun_intensity: lights.directional.effective_intensity(),
        sun_color: lights.directional.color,
        _padding0: 0.0,
        point_position: lights.point.position.into(),
        point_intensity: lights.point.effective_intensity(),
        point_color: lights.point.color,
        point_range: lights.point.range,

        sun_view_proj: lights.directional.view_proj().into(),
        point_view_proj: lights.point.view_proj().into(),
    };

    ubo.update_content(queue, content);
}

/// Manages bind group layouts and bind groups for global uniforms
///
/// Bound to slot 0 in all render pipelines.
pub struct GlobalBindings {
    bind_group_layout: BindGroupLayoutWithDesc,
    bind_group: Option<wgpu::BindGroup>,
}

impl GlobalBindings {
    /// Creates a new global bindings manager
    ///
    /// Sets up the bind group layout for global uniforms but doesn't
    /// create the actual bind group until `create_bind_group()` is called.
    pub fn new(device: &wgpu::Device) -> Self {
        let bind_group_layout = BindGroupLayoutBuilder::new()
            .next_binding_rendering(binding_types::uniform()) // camera + lights
            .create(device, "Globals Bind Group Layout");

        GlobalBindings {
            bind_group_layout,
            bind_group: None,
        }
    }

    /// Creates the bind group with the provided uniform buffer
    ///
    /// Must be called after the uniform buffer is created and before
    /// any rendering operations that need global uniforms.
    pub fn create_bind_group(&mut self, device: &wgpu::Device, ubo: &GlobalUBO) {
        self.bind_group = Some(
            BindGroupBuilder::new(&self.bind_group_layout)
                .resource(ubo.binding_resource())
                .create(device, "Global Bind Group"),
        );
    }

    /// Returns the bind group layout
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout.layout
    }

    /// Returns the bind group for rendering
    ///
    /// # Panics
    /// Panics if `create_bind_group()` hasn't been called yet
    pub fn bind_group(&self) -> &wgpu::BindGroup {
        self.bind_group
            .as_ref()
            .expect("Bind group has not been created yet!")
    }
}
