use std::ops::Range;

use cgmath::{Deg, Matrix4, SquareMatrix, Vector3};
use wgpu::Device;

use super::vertex::Vertex3D;

/// Per-object uniform data. Must match the `ObjectUniform` struct in the
/// shaders exactly.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub receive_shadow: u32,
    pub _padding: [u32; 3],
}

/// A single mesh with CPU-side vertex data and lazily created GPU buffers.
pub struct Mesh {
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    index_count: u32,
}

impl Mesh {
    pub fn new(vertices: Vec<Vertex3D>, indices: Vec<u32>) -> Self {
        let index_count = indices.len() as u32;
        Self {
            vertices,
            indices,
            vertex_buffer: None,
            index_buffer: None,
            index_count,
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.len() as u32
    }

    pub fn index_count(&self) -> u32 {
        self.index_count
    }
}

// GPU resources struct to hold the object's uniform buffer and bind group
pub struct ObjectGpuResources {
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

/// A renderable object: meshes plus transform, material reference, and
/// shadow flags. Objects are created at startup and live for the whole
/// session.
pub struct Object {
    pub name: String,
    pub meshes: Vec<Mesh>,
    pub transform: Matrix4<f32>,
    pub visible: bool,
    /// Object is drawn into the shadow maps.
    pub cast_shadow: bool,
    /// Shadow maps are sampled when shading this object.
    pub receive_shadow: bool,
    material_id: Option<String>,
    pub gpu_resources: Option<ObjectGpuResources>,
}

impl Object {
    /// Create a new object with an identity transform.
    pub fn new(name: &str, meshes: Vec<Mesh>) -> Self {
        Self {
            name: name.to_string(),
            meshes,
            transform: Matrix4::identity(),
            visible: true,
            cast_shadow: false,
            receive_shadow: false,
            material_id: None,
            gpu_resources: None,
        }
    }

    /// Set translation
    pub fn set_translation(&mut self, translation: Vector3<f32>) {
        self.transform = Matrix4::from_translation(translation);
    }

    /// Set rotation around X axis
    pub fn set_rotation_x(&mut self, angle: Deg<f32>) {
        self.transform = Matrix4::from_angle_x(angle);
    }

    /// Create a complete transform from translation, rotation, and scale
    pub fn set_transform_trs(
        &mut self,
        translation: Vector3<f32>,
        rotation_y: Deg<f32>,
        scale: f32,
    ) {
        let t = Matrix4::from_translation(translation);
        let r = Matrix4::from_angle_y(rotation_y);
        let s = Matrix4::from_scale(scale);
        self.transform = t * r * s; // Order matters: T * R * S
    }

    /// Assign a material by ID; resolution happens at render time through
    /// the material manager.
    pub fn set_material(&mut self, material_id: &str) {
        self.material_id = Some(material_id.to_string());
    }

    pub fn material_id(&self) -> Option<&str> {
        self.material_id.as_deref()
    }

    fn uniform_content(&self) -> ObjectUniform {
        // cgmath matrices are column-major, which is what the GPU expects
        ObjectUniform {
            model: self.transform.into(),
            receive_shadow: self.receive_shadow as u32,
            _padding: [0; 3],
        }
    }

    /// Syncs the object uniform to the GPU if resources exist.
    pub fn update_uniform(&self, queue: &wgpu::Queue) {
        if let Some(gpu_resources) = &self.gpu_resources {
            queue.write_buffer(
                &gpu_resources.uniform_buffer,
                0,
                bytemuck::bytes_of(&self.uniform_content()),
            );
        }
    }

    /// Get the object's bind group for rendering
    pub fn bind_group(&self) -> Option<&wgpu::BindGroup> {
        self.gpu_resources.as_ref().map(|res| &res.bind_group)
    }

    pub fn init_gpu_resources(&mut self, device: &Device) {
        // Upload mesh buffers
        for mesh in self.meshes.iter_mut() {
            let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
                device,
                &wgpu::util::BufferInitDescriptor {
                    label: Some("Vertex Buffer"),
                    contents: bytemuck::cast_slice(&mesh.vertices),
                    usage: wgpu::BufferUsages::VERTEX,
                },
            );

            let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
                device,
                &wgpu::util::BufferInitDescriptor {
                    label: Some("Index Buffer"),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                },
            );

            mesh.vertex_buffer = Some(vertex_buffer);
            mesh.index_buffer = Some(index_buffer);
        }

        // Create the per-object uniform buffer and bind group
        let uniform_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Object Uniform Buffer"),
                contents: bytemuck::bytes_of(&self.uniform_content()),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );

        let bind_group_layout = Self::bind_group_layout(device);
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object Bind Group"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        self.gpu_resources = Some(ObjectGpuResources {
            uniform_buffer,
            bind_group,
        });
    }

    /// Layout of the per-object bind group (slot 1 in the render pipelines).
    /// The fragment stage reads the shadow flag, so it is visible to both.
    pub fn bind_group_layout(device: &Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        })
    }
}

pub trait DrawObject<'a> {
    fn draw_mesh(&mut self, mesh: &'a Mesh);
    fn draw_mesh_instanced(&mut self, mesh: &'a Mesh, instances: Range<u32>);
    fn draw_object(&mut self, object: &'a Object);
    fn draw_object_instanced(&mut self, object: &'a Object, instances: Range<u32>);
}

impl<'a, 'b> DrawObject<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_mesh(&mut self, mesh: &'b Mesh) {
        self.draw_mesh_instanced(mesh, 0..1);
    }

    fn draw_mesh_instanced(&mut self, mesh: &'b Mesh, instances: Range<u32>) {
        let vertex_buffer = match &mesh.vertex_buffer {
            Some(buffer) => buffer,
            None => return, // Skip drawing if not uploaded
        };
        let index_buffer = match &mesh.index_buffer {
            Some(buffer) => buffer,
            None => return,
        };

        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..mesh.index_count, 0, instances);
    }

    fn draw_object(&mut self, object: &'b Object) {
        self.draw_object_instanced(object, 0..1);
    }

    fn draw_object_instanced(&mut self, object: &'b Object, instances: Range<u32>) {
        for mesh in &object.meshes {
            self.draw_mesh_instanced(mesh, instances.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        let vertices = vec![
            Vertex3D { position: [0.0, 0.0, 0.0], normal: [0.0, 0.0, 1.0] },
            Vertex3D { position: [1.0, 0.0, 0.0], normal: [0.0, 0.0, 1.0] },
            Vertex3D { position: [1.0, 1.0, 0.0], normal: [0.0, 0.0, 1.0] },
            Vertex3D { position: [0.0, 1.0, 0.0], normal: [0.0, 0.0, 1.0] },
        ];
        Mesh::new(vertices, vec![0, 1, 2, 2, 3, 0])
    }

    #[test]
    fn new_object_defaults_to_no_shadow_participation() {
        let object = Object::new("thing", vec![quad()]);
        assert!(object.visible);
        assert!(!object.cast_shadow);
        assert!(!object.receive_shadow);
        assert!(object.material_id().is_none());
        assert_eq!(object.meshes[0].vertex_count(), 4);
        assert_eq!(object.meshes[0].index_count(), 6);
    }

    #[test]
    fn uniform_reflects_receive_shadow_flag() {
        let mut object = Object::new("thing", vec![quad()]);
        assert_eq!(object.uniform_content().receive_shadow, 0);
        object.receive_shadow = true;
        assert_eq!(object.uniform_content().receive_shadow, 1);
    }

    #[test]
    fn translation_lands_in_the_model_matrix(){
        let mut object = Object::new("thing", vec![quad()]);
        object.set_translation(Vector3::new(-3.0, 1.0, 0.0));
        let model = object.uniform_content().model;
        assert_eq!(model[3][0], -3.0);
        assert_eq!(model[3][1], 1.0);
        assert_eq!(model[3][2], 0.0);
    }
}
