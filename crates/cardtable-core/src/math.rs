//! Math utilities
//!
//! Re-exports from glam plus the small set of value types the scene is built from.

pub use glam::{Mat4, Vec2, Vec3, Vec4};

/// A position in model space
pub type Point3 = Vec3;

/// An RGB color with components in `[0, 1]`
pub type Color3 = Vec3;

/// A texture coordinate
pub type Uv2 = Vec2;

/// The eight corners of a hexahedron.
///
/// Conventional order: p0 front-top-right, p1 front-bottom-right,
/// p2 front-bottom-left, p3 front-top-left, p4 back-top-right,
/// p5 back-bottom-right, p6 back-bottom-left, p7 back-top-left.
pub type Corners = [Point3; 8];

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vec3,
    /// Maximum corner
    pub max: Vec3,
}

impl Aabb {
    /// Create an empty AABB
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Smallest AABB containing every point
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut aabb = Self::EMPTY;
        for point in points {
            aabb.expand_to_include(point);
        }
        aabb
    }

    /// Get the full size of the AABB
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Expand the AABB to include a point
    pub fn expand_to_include(&mut self, point: Vec3) {
        self.min = self.min.min(point);
        self.max = self.max.max(point);
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Scale every corner about the origin
pub fn scale_corners(corners: &Corners, factor: f32) -> Corners {
    corners.map(|corner| corner * factor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aabb_from_points() {
        let aabb = Aabb::from_points([
            Vec3::new(1.0, -2.0, 0.5),
            Vec3::new(-1.0, 3.0, 0.0),
            Vec3::new(0.0, 0.0, -4.0),
        ]);
        assert_eq!(aabb.min, Vec3::new(-1.0, -2.0, -4.0));
        assert_eq!(aabb.max, Vec3::new(1.0, 3.0, 0.5));
        assert_eq!(aabb.size(), Vec3::new(2.0, 5.0, 4.5));
    }

    #[test]
    fn test_aabb_of_no_points_is_empty() {
        assert_eq!(Aabb::from_points([]), Aabb::EMPTY);
        let point = Aabb::from_points([Vec3::ONE]);
        assert_eq!(point.size(), Vec3::ZERO);
    }

    #[test]
    fn test_scale_corners() {
        let corners = [Vec3::new(1.0, 2.0, 3.0); 8];
        let scaled = scale_corners(&corners, 2.0);
        assert!(scaled.iter().all(|c| *c == Vec3::new(2.0, 4.0, 6.0)));
    }
}
