//! Scene Objects
//!
//! GPU-resident versions of the object descriptions built in core.

use cardtable_core::{Material, SceneObjectDesc};

use crate::mesh::{upload_mesh, GpuMesh};
use crate::texture::Texture;

/// A drawable object
#[derive(Debug)]
pub struct SceneObject {
    pub name: String,
    pub mesh: GpuMesh,
    pub material: Material,
    pub texture: Texture,
}

/// Build, texture and upload every described object, in order
pub fn upload_scene(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    layout: &wgpu::BindGroupLayout,
    descs: &[SceneObjectDesc],
) -> Vec<SceneObject> {
    descs
        .iter()
        .map(|desc| {
            let texture = Texture::load_or_placeholder(device, queue, desc.texture.as_deref());
            let mesh = upload_mesh(device, layout, &desc.mesh(), &texture, &desc.name);
            SceneObject {
                name: desc.name.clone(),
                mesh,
                material: desc.material,
                texture,
            }
        })
        .collect()
}
