//! WGPU-based rendering engine
//!
//! Renders the scene in three stages each frame: one depth-only shadow pass
//! per shadow-casting light, a forward PBR pass over the visible objects,
//! and an optional UI overlay drawn by the caller.

use std::sync::Arc;
use thiserror::Error;
use wgpu::{Device, TextureFormat};

use crate::gfx::{
    camera::camera_utils::CameraUniform,
    resources::{
        global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO},
        texture_resource::TextureResource,
    },
    scene::light::LightRig,
    scene::object::{DrawObject, Object},
    scene::scene::Scene,
};
use crate::wgpu_utils::{
    binding_builder::{BindGroupBuilder, BindGroupLayoutBuilder},
    binding_types,
    uniform_buffer::UniformBuffer,
};

use super::pipeline_manager::{PipelineConfig, PipelineManager};

const SHADOW_MAP_SIZE: u32 = 2048;

/// Errors that can occur while bringing up the GPU context.
///
/// Everything after initialization is infallible by construction or handled
/// in place (lost surfaces are reconfigured, skipped frames are logged).
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to create rendering surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable graphics adapter: {0}")]
    RequestAdapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to acquire graphics device: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),
}

/// Per-shadow-pass uniform. Must match the `ShadowCaster` struct in
/// `shadow_pass.wgsl`.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
struct ShadowCasterUniform {
    view_proj: [[f32; 4]; 4],
}

type ShadowCasterUBO = UniformBuffer<ShadowCasterUniform>;

/// Core rendering engine managing GPU resources and draw calls
pub struct RenderEngine {
    surface: wgpu::Surface<'static>,
    device: Arc<wgpu::Device>,
    queue: Arc<wgpu::Queue>,
    config: wgpu::SurfaceConfiguration,
    depth_texture: TextureResource,
    format: TextureFormat,
    pub pipeline_manager: PipelineManager,
    global_ubo: GlobalUBO,
    global_bindings: GlobalBindings,

    // Shadow mapping resources, one map per shadow-casting light
    sun_shadow_map: TextureResource,
    point_shadow_map: TextureResource,
    shadow_bind_group: wgpu::BindGroup, // both maps + comparison sampler, for the main pass

    sun_caster_ubo: ShadowCasterUBO,
    point_caster_ubo: ShadowCasterUBO,
    sun_caster_bind_group: wgpu::BindGroup,
    point_caster_bind_group: wgpu::BindGroup,
}

impl RenderEngine {
    /// Creates a new render engine for the given window
    ///
    /// Initializes wgpu, creates depth and shadow buffers, and sets up the
    /// shadow and PBR pipelines.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<RenderEngine, RenderError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("WGPU Device"),
                required_features: wgpu::Features::default(),
                required_limits: wgpu::Limits {
                    max_texture_dimension_2d: 4096,
                    ..wgpu::Limits::downlevel_defaults()
                },
                memory_hints: wgpu::MemoryHints::default(),
                trace: wgpu::Trace::Off,
            })
            .await?;

        let surface_capabilities = surface.get_capabilities(&adapter);
        let format = surface_capabilities
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .unwrap_or(surface_capabilities.formats[0]);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width,
            height,
            // One frame per display refresh
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode: surface_capabilities.alpha_modes[0],
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        // Depth texture for the main pass
        let depth_texture =
            TextureResource::create_depth_texture(&device, &config, "depth_texture");

        // One shadow map per shadow-casting light
        let sun_shadow_map =
            TextureResource::create_shadow_map(&device, SHADOW_MAP_SIZE, "Sun Shadow Map");
        let point_shadow_map =
            TextureResource::create_shadow_map(&device, SHADOW_MAP_SIZE, "Point Shadow Map");

        // Shadow maps as seen by the main pass fragment shader
        let shadow_layout = BindGroupLayoutBuilder::new()
            .next_binding_fragment(binding_types::texture_depth_2d())
            .next_binding_fragment(binding_types::texture_depth_2d())
            .next_binding_fragment(binding_types::sampler(wgpu::SamplerBindingType::Comparison))
            .create(&device, "Shadow Bind Group Layout");

        let shadow_bind_group = BindGroupBuilder::new(&shadow_layout)
            .resource(wgpu::BindingResource::TextureView(&sun_shadow_map.view))
            .resource(wgpu::BindingResource::TextureView(&point_shadow_map.view))
            .resource(wgpu::BindingResource::Sampler(&sun_shadow_map.sampler))
            .create(&device, "Shadow Bind Group");

        // Per-caster view-projection uniforms for the shadow passes
        let caster_layout = BindGroupLayoutBuilder::new()
            .next_binding_vertex(binding_types::uniform())
            .create(&device, "Shadow Caster Bind Group Layout");

        let sun_caster_ubo = ShadowCasterUBO::new(&device);
        let point_caster_ubo = ShadowCasterUBO::new(&device);

        let sun_caster_bind_group = BindGroupBuilder::new(&caster_layout)
            .resource(sun_caster_ubo.binding_resource())
            .create(&device, "Sun Caster Bind Group");
        let point_caster_bind_group = BindGroupBuilder::new(&caster_layout)
            .resource(point_caster_ubo.binding_resource())
            .create(&device, "Point Caster Bind Group");

        // Global uniform bindings for camera and the light rig
        let global_ubo = GlobalUBO::new(&device);
        let mut global_bindings = GlobalBindings::new(&device);
        global_bindings.create_bind_group(&device, &global_ubo);

        let object_bind_group_layout = Object::bind_group_layout(&device);

        // Borrow the material layout from a throwaway bindings instance; all
        // materials share it.
        let temp_material_bindings =
            crate::gfx::resources::material::MaterialBindings::new(&device);
        let material_bind_group_layout = temp_material_bindings.bind_group_layout().clone();

        // Wrap device and queue in Arc for the pipeline manager
        let device_handle: Arc<Device> = device.into();
        let queue_handle: Arc<wgpu::Queue> = queue.into();
        let mut pipeline_manager = PipelineManager::new(device_handle.clone());

        pipeline_manager.load_shader("pbr", include_str!("pbr.wgsl"));
        pipeline_manager.load_shader("shadow", include_str!("shadow_pass.wgsl"));

        // Depth-only shadow pass - no culling, to avoid light leaks
        pipeline_manager.register_pipeline(
            "Shadow",
            PipelineConfig::default()
                .with_label("SHADOW")
                .with_shader("shadow")
                .with_depth_stencil(sun_shadow_map.texture.clone())
                .with_cull_mode(None)
                .with_vertex_only()
                .with_bind_group_layouts(vec![
                    caster_layout.layout.clone(),
                    object_bind_group_layout.clone(),
                ])
                .with_color_targets(vec![]),
        );

        // Main PBR pass; culling stays off so the ground reads from both sides
        pipeline_manager.register_pipeline(
            "PBR",
            PipelineConfig::default()
                .with_label("PBR")
                .with_shader("pbr")
                .with_depth_stencil(depth_texture.texture.clone())
                .with_cull_mode(None)
                .with_bind_group_layouts(vec![
                    global_bindings.bind_group_layout().clone(),
                    object_bind_group_layout,
                    material_bind_group_layout,
                    shadow_layout.layout.clone(),
                ])
                .with_color_targets(vec![Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })]),
        );

        if let Err(errors) = pipeline_manager.create_all_pipelines() {
            for error in errors {
                log::error!("{error}");
            }
        }

        Ok(RenderEngine {
            surface,
            device: device_handle,
            queue: queue_handle,
            config,
            depth_texture,
            format,
            pipeline_manager,
            global_ubo,
            global_bindings,
            sun_shadow_map,
            point_shadow_map,
            shadow_bind_group,
            sun_caster_ubo,
            point_caster_ubo,
            sun_caster_bind_group,
            point_caster_bind_group,
        })
    }

    /// Updates camera and light uniform buffers
    ///
    /// Should be called each frame, after panel edits and before
    /// [`RenderEngine::render_frame`].
    pub fn update(&mut self, camera_uniform: CameraUniform, lights: &LightRig) {
        update_global_ubo(&mut self.global_ubo, &self.queue, camera_uniform, lights);

        self.sun_caster_ubo.update_content(
            &self.queue,
            ShadowCasterUniform {
                view_proj: lights.directional.view_proj().into(),
            },
        );
        self.point_caster_ubo.update_content(
            &self.queue,
            ShadowCasterUniform {
                view_proj: lights.point.view_proj().into(),
            },
        );
    }

    /// Renders one frame: shadow passes, main pass, optional UI overlay.
    ///
    /// A shadow map is cleared even when its light does not currently cast
    /// (hidden, or casting disabled), so the main pass always samples a
    /// fully-lit map for that light.
    pub fn render_frame<F>(&mut self, scene: &Scene, ui_callback: Option<F>)
    where
        F: FnOnce(&wgpu::Device, &wgpu::Queue, &mut wgpu::CommandEncoder, &wgpu::TextureView),
    {
        let surface_texture = match self.surface.get_current_texture() {
            Ok(texture) => texture,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return;
            }
            Err(err) => {
                log::warn!("skipping frame: {err}");
                return;
            }
        };

        let surface_texture_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        // PASS 1: sun shadow map
        {
            let sun = &scene.lights.directional;
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Sun Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.sun_shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if sun.visible && sun.cast_shadow {
                if let Some(shadow_pipeline) = self.pipeline_manager.get_pipeline("Shadow") {
                    shadow_pass.set_pipeline(shadow_pipeline);
                    shadow_pass.set_bind_group(0, &self.sun_caster_bind_group, &[]);
                    draw_shadow_casters(&mut shadow_pass, scene);
                }
            }
        }

        // PASS 2: point-light shadow map
        {
            let point = &scene.lights.point;
            let mut shadow_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Point Shadow Pass"),
                color_attachments: &[],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.point_shadow_map.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            if point.visible && point.cast_shadow {
                if let Some(shadow_pipeline) = self.pipeline_manager.get_pipeline("Shadow") {
                    shadow_pass.set_pipeline(shadow_pipeline);
                    shadow_pass.set_bind_group(0, &self.point_caster_bind_group, &[]);
                    draw_shadow_casters(&mut shadow_pass, scene);
                }
            }
        }

        // PASS 3: main rendering with shadows
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Main Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &surface_texture_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, self.global_bindings.bind_group(), &[]);
            render_pass.set_bind_group(3, &self.shadow_bind_group, &[]);

            if let Some(pipeline) = self.pipeline_manager.get_pipeline("PBR") {
                render_pass.set_pipeline(pipeline);

                for object in scene.objects.iter() {
                    if !object.visible {
                        continue;
                    }

                    let material = scene.get_material_for_object(object);
                    let (Some(material_bind_group), Some(object_bind_group)) =
                        (material.get_bind_group(), object.bind_group())
                    else {
                        log::debug!("skipping '{}' - GPU resources not initialized", object.name);
                        continue;
                    };

                    render_pass.set_bind_group(1, object_bind_group, &[]);
                    render_pass.set_bind_group(2, material_bind_group, &[]);
                    render_pass.draw_object(object);
                }
            }
        }

        // PASS 4: UI overlay (if provided)
        if let Some(ui_callback) = ui_callback {
            ui_callback(
                &self.device,
                &self.queue,
                &mut encoder,
                &surface_texture_view,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        surface_texture.present();
    }

    /// Resizes the render engine surface and recreates the depth buffer
    ///
    /// Validates dimensions to prevent crashes on zero-sized surfaces.
    /// Shadow maps keep their fixed resolution.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.config.width = width;
        self.config.height = height;

        self.surface.configure(&self.device, &self.config);

        // Recreate depth texture to match the new surface size
        self.depth_texture =
            TextureResource::create_depth_texture(&self.device, &self.config, "depth_texture");
    }

    /// Returns reference to the wgpu device
    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    /// Returns reference to the wgpu command queue
    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Returns the surface texture format
    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.format
    }
}

fn draw_shadow_casters<'a>(shadow_pass: &mut wgpu::RenderPass<'a>, scene: &'a Scene) {
    for object in scene.objects.iter() {
        if !object.visible || !object.cast_shadow {
            continue;
        }
        if let Some(object_bind_group) = object.bind_group() {
            shadow_pass.set_bind_group(1, object_bind_group, &[]);
            shadow_pass.draw_object(object);
        }
    }
}
