//! Scene Geometry
//!
//! Corner sets for the table top, its four legs and the playing card, and the
//! object list the renderer uploads at start-up.

use std::path::PathBuf;

use crate::config::SceneConfig;
use crate::lighting::Material;
use crate::math::{Color3, Corners, Vec3};
use crate::mesh::{build_cuboid_mesh, CuboidMesh};

/// Color used for the table top and legs
pub const TABLE_COLOR: Color3 = Vec3::new(0.5, 0.5, 0.5);

/// Color used for the card
pub const CARD_COLOR: Color3 = Vec3::new(0.0, 0.0, 0.0);

/// Box centered on the origin with the given half extents
pub fn table_top_corners(half_width: f32, half_height: f32, half_depth: f32) -> Corners {
    let (w, h, d) = (half_width, half_height, half_depth);
    [
        Vec3::new(w, h, d),
        Vec3::new(w, -h, d),
        Vec3::new(-w, -h, d),
        Vec3::new(-w, h, d),
        Vec3::new(w, h, -d),
        Vec3::new(w, -h, -d),
        Vec3::new(-w, -h, -d),
        Vec3::new(-w, h, -d),
    ]
}

const LEG_TOP: f32 = -0.05;
const LEG_BOTTOM: f32 = -0.6;

/// Leg corners: four at the top (p0..p3) then the same four at the bottom.
fn leg_corners(x_outer: f32, x_inner: f32, z_a: f32, z_b: f32) -> Corners {
    [
        Vec3::new(x_outer, LEG_TOP, z_a),
        Vec3::new(x_inner, LEG_TOP, z_a),
        Vec3::new(x_inner, LEG_TOP, z_b),
        Vec3::new(x_outer, LEG_TOP, z_b),
        Vec3::new(x_outer, LEG_BOTTOM, z_a),
        Vec3::new(x_inner, LEG_BOTTOM, z_a),
        Vec3::new(x_inner, LEG_BOTTOM, z_b),
        Vec3::new(x_outer, LEG_BOTTOM, z_b),
    ]
}

pub fn front_right_leg_corners() -> Corners {
    leg_corners(0.75, 0.7, 0.55, 0.5)
}

pub fn front_left_leg_corners() -> Corners {
    leg_corners(-0.7, -0.75, 0.55, 0.5)
}

pub fn back_left_leg_corners() -> Corners {
    leg_corners(-0.7, -0.75, -0.5, -0.55)
}

pub fn back_right_leg_corners() -> Corners {
    leg_corners(0.75, 0.7, -0.5, -0.55)
}

/// A thin card lying on the table top
pub fn card_corners() -> Corners {
    const TOP: f32 = 0.055;
    const BOTTOM: f32 = 0.05;
    [
        Vec3::new(0.4, TOP, 0.1),
        Vec3::new(0.3, TOP, 0.1),
        Vec3::new(0.3, TOP, -0.1),
        Vec3::new(0.4, TOP, -0.1),
        Vec3::new(0.4, BOTTOM, 0.1),
        Vec3::new(0.3, BOTTOM, 0.1),
        Vec3::new(0.3, BOTTOM, -0.1),
        Vec3::new(0.4, BOTTOM, -0.1),
    ]
}

/// Description of one drawable object
#[derive(Debug, Clone)]
pub struct SceneObjectDesc {
    /// Debug label
    pub name: String,
    /// Corner set fed to the mesh builder
    pub corners: Corners,
    /// Uniform vertex color
    pub color: Color3,
    /// Surface material
    pub material: Material,
    /// Optional texture image
    pub texture: Option<PathBuf>,
}

impl SceneObjectDesc {
    /// Create an untextured object with the default material
    pub fn new(name: impl Into<String>, corners: Corners, color: Color3) -> Self {
        Self {
            name: name.into(),
            corners,
            color,
            material: Material::default(),
            texture: None,
        }
    }

    /// Attach a texture
    pub fn with_texture(mut self, path: impl Into<PathBuf>) -> Self {
        self.texture = Some(path.into());
        self
    }

    /// Build the mesh for this object
    pub fn mesh(&self) -> CuboidMesh {
        build_cuboid_mesh(&self.corners, self.color)
    }
}

/// The table, its legs and the card, in draw order
pub fn card_table_scene(config: &SceneConfig) -> Vec<SceneObjectDesc> {
    let [w, h, d] = config.table_half_extents;

    let mut table = SceneObjectDesc::new("table top", table_top_corners(w, h, d), TABLE_COLOR);
    if let Some(path) = &config.table_texture {
        table = table.with_texture(path);
    }

    let mut card = SceneObjectDesc::new("card", card_corners(), CARD_COLOR);
    if let Some(path) = &config.card_texture {
        card = card.with_texture(path);
    }

    let mut objects = vec![
        table,
        SceneObjectDesc::new("leg front right", front_right_leg_corners(), TABLE_COLOR),
        SceneObjectDesc::new("leg front left", front_left_leg_corners(), TABLE_COLOR),
        SceneObjectDesc::new("leg back left", back_left_leg_corners(), TABLE_COLOR),
        SceneObjectDesc::new("leg back right", back_right_leg_corners(), TABLE_COLOR),
        card,
    ];
    for object in &mut objects {
        object.material = config.material;
    }
    objects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Aabb;

    #[test]
    fn test_table_top_extents() {
        let bounds = Aabb::from_points(table_top_corners(0.8, 0.05, 0.6));
        assert_eq!(bounds.min, Vec3::new(-0.8, -0.05, -0.6));
        assert_eq!(bounds.max, Vec3::new(0.8, 0.05, 0.6));
    }

    #[test]
    fn test_legs_sit_under_table() {
        let table = Aabb::from_points(table_top_corners(0.8, 0.05, 0.6));
        for corners in [
            front_right_leg_corners(),
            front_left_leg_corners(),
            back_left_leg_corners(),
            back_right_leg_corners(),
        ] {
            let leg = Aabb::from_points(corners);
            assert_eq!(leg.max.y, table.min.y);
            assert!((leg.size().x - 0.05).abs() < 1e-6);
            assert!((leg.size().z - 0.05).abs() < 1e-6);
            assert!(leg.min.x >= table.min.x && leg.max.x <= table.max.x);
            assert!(leg.min.z >= table.min.z && leg.max.z <= table.max.z);
        }
    }

    #[test]
    fn test_card_rests_on_table() {
        let table = Aabb::from_points(table_top_corners(0.8, 0.05, 0.6));
        let card = Aabb::from_points(card_corners());
        assert_eq!(card.min.y, table.max.y);
        assert!(card.max.y > card.min.y);
    }

    #[test]
    fn test_scene_order_and_texture() {
        let scene = card_table_scene(&SceneConfig::default());
        let names: Vec<_> = scene.iter().map(|o| o.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["table top", "leg front right", "leg front left", "leg back left", "leg back right", "card"]
        );
        assert!(scene[0].texture.is_some());
        assert!(scene[1..5].iter().all(|o| o.texture.is_none()));
        assert_eq!(scene[5].color, CARD_COLOR);
    }
}
