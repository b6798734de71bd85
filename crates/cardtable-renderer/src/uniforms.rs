//! Uniform Block
//!
//! CPU-side mirror of the `Uniforms` struct in the shaders.

use bytemuck::{Pod, Zeroable};
use cardtable_core::{LightSource, Material};
use glam::Mat4;

/// Per-object uniform block, binding 0 of group 0.
///
/// Field order and padding match the WGSL struct exactly.
#[repr(C, align(16))]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct ShaderUniforms {
    pub projection: [[f32; 4]; 4],
    pub model_view: [[f32; 4]; 4],
    pub light_position: [f32; 4],
    pub light_ambient: [f32; 4],
    pub light_diffuse: [f32; 4],
    pub light_specular: [f32; 4],
    pub material_emission: [f32; 4],
    pub material_ambient: [f32; 4],
    pub material_diffuse: [f32; 4],
    pub material_specular: [f32; 4],
    pub shininess: f32,
    pub _padding: [f32; 3],
}

impl ShaderUniforms {
    /// Size in bytes, as seen by the shader
    pub const SIZE: u64 = std::mem::size_of::<Self>() as u64;

    pub fn new(projection: Mat4, model_view: Mat4, light: &LightSource, material: &Material) -> Self {
        Self {
            projection: projection.to_cols_array_2d(),
            model_view: model_view.to_cols_array_2d(),
            light_position: light.position.to_array(),
            light_ambient: light.ambient.to_array(),
            light_diffuse: light.diffuse.to_array(),
            light_specular: light.specular.to_array(),
            material_emission: material.emission.to_array(),
            material_ambient: material.ambient.to_array(),
            material_diffuse: material.diffuse.to_array(),
            material_specular: material.specular.to_array(),
            shininess: material.shininess,
            _padding: [0.0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::offset_of;

    #[test]
    fn test_uniform_layout() {
        assert_eq!(ShaderUniforms::SIZE, 272);
        assert_eq!(offset_of!(ShaderUniforms, model_view), 64);
        assert_eq!(offset_of!(ShaderUniforms, light_position), 128);
        assert_eq!(offset_of!(ShaderUniforms, material_emission), 192);
        assert_eq!(offset_of!(ShaderUniforms, shininess), 256);
    }

    #[test]
    fn test_uniform_packing() {
        let light = LightSource::default();
        let material = Material::default();
        let model_view = Mat4::from_translation(glam::Vec3::new(1.0, 2.0, 3.0));
        let uniforms = ShaderUniforms::new(Mat4::IDENTITY, model_view, &light, &material);

        assert_eq!(uniforms.model_view[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(uniforms.light_position, [0.0, 3.0, 3.0, 1.0]);
        assert_eq!(uniforms.shininess, 200.0);

        let bytes: &[u8] = bytemuck::bytes_of(&uniforms);
        let shininess = f32::from_ne_bytes([bytes[256], bytes[257], bytes[258], bytes[259]]);
        assert_eq!(shininess, 200.0);
    }
}
