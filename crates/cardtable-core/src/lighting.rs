//! Light and Material Records
//!
//! Plain parameter bundles for the Blinn-Phong shading model.

use glam::Vec4;
use serde::{Deserialize, Serialize};

/// Point light source
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightSource {
    /// Homogeneous position (w = 1 for a point light)
    pub position: Vec4,
    /// Ambient color
    pub ambient: Vec4,
    /// Diffuse color
    pub diffuse: Vec4,
    /// Specular color
    pub specular: Vec4,
}

impl LightSource {
    /// Create a light source
    pub fn new(position: Vec4, ambient: Vec4, diffuse: Vec4, specular: Vec4) -> Self {
        Self {
            position,
            ambient,
            diffuse,
            specular,
        }
    }

    /// White point light at the given position
    pub fn white(position: Vec4) -> Self {
        Self::new(position, Vec4::ONE, Vec4::ONE, Vec4::ONE)
    }
}

impl Default for LightSource {
    fn default() -> Self {
        Self::white(Vec4::new(0.0, 3.0, 3.0, 1.0))
    }
}

/// Surface material
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Emitted color
    pub emission: Vec4,
    /// Ambient reflectance
    pub ambient: Vec4,
    /// Diffuse reflectance
    pub diffuse: Vec4,
    /// Specular reflectance
    pub specular: Vec4,
    /// Specular exponent
    pub shininess: f32,
}

impl Material {
    /// Create a material
    pub fn new(emission: Vec4, ambient: Vec4, diffuse: Vec4, specular: Vec4, shininess: f32) -> Self {
        Self {
            emission,
            ambient,
            diffuse,
            specular,
            shininess,
        }
    }
}

impl Default for Material {
    fn default() -> Self {
        Self {
            emission: Vec4::new(0.0, 0.0, 0.0, 1.0),
            ambient: Vec4::new(0.2, 0.2, 0.2, 1.0),
            diffuse: Vec4::new(0.5, 0.5, 0.5, 1.0),
            specular: Vec4::new(0.7, 0.7, 0.7, 1.0),
            shininess: 200.0,
        }
    }
}
