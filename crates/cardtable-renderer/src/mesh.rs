//! GPU Meshes
//!
//! One vertex buffer, index buffer, uniform buffer and bind group per object,
//! created once at start-up.

use cardtable_core::CuboidMesh;
use wgpu::util::DeviceExt;

use crate::texture::Texture;
use crate::uniforms::ShaderUniforms;

/// A cuboid uploaded to the GPU
#[derive(Debug)]
pub struct GpuMesh {
    pub label: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub index_count: u32,
}

/// Upload a mesh and bind it with its texture
pub fn upload_mesh(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    mesh: &CuboidMesh,
    texture: &Texture,
    label: &str,
) -> GpuMesh {
    let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} vertices", label)),
        contents: mesh.vertex_bytes(),
        usage: wgpu::BufferUsages::VERTEX,
    });

    let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{} indices", label)),
        contents: mesh.index_bytes(),
        usage: wgpu::BufferUsages::INDEX,
    });

    let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(&format!("{} uniforms", label)),
        size: ShaderUniforms::SIZE,
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(&format!("{} bind group", label)),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::TextureView(&texture.view),
            },
            wgpu::BindGroupEntry {
                binding: 2,
                resource: wgpu::BindingResource::Sampler(&texture.sampler),
            },
        ],
    });

    log::debug!(
        "Uploaded {}: {} vertices, {} indices",
        label,
        mesh.vertices().len(),
        mesh.indices().len()
    );

    GpuMesh {
        label: label.to_string(),
        vertex_buffer,
        index_buffer,
        uniform_buffer,
        bind_group,
        index_count: mesh.indices().len() as u32,
    }
}

impl GpuMesh {
    /// Replace the uniform block for the next draw
    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &ShaderUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::bytes_of(uniforms));
    }

    /// Record one indexed strip draw; the pipeline must already be set
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..1);
    }

    /// Triangles the strip produces, degenerate ones included
    pub fn strip_triangles(&self) -> u32 {
        self.index_count.saturating_sub(2)
    }
}
