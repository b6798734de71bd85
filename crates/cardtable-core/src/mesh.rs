//! Cuboid Meshes
//!
//! Builds the interleaved vertex data and the fixed triangle-strip index list
//! used for every box in the scene.
//!
//! Each face owns four vertices of its own so that it can carry a flat normal
//! and an independent UV origin; the 24 vertices are never shared between
//! faces. The 28 indices form a single strip with zero-area triangles joining
//! neighbouring faces, which means back-face culling must stay disabled when
//! the strip is drawn.

use bytemuck::{Pod, Zeroable};

use crate::math::{Aabb, Color3, Corners, Point3, Uv2, Vec2, Vec3};

/// Vertices per cuboid
pub const VERTEX_COUNT: usize = 24;

/// Indices per cuboid strip
pub const INDEX_COUNT: usize = 28;

/// Scalars per interleaved vertex (3 position + 3 color + 3 normal + 2 uv)
pub const FLOATS_PER_VERTEX: usize = 11;

/// Byte stride of one interleaved vertex
pub const VERTEX_STRIDE: usize = FLOATS_PER_VERTEX * size_of::<f32>();

/// Byte offset of the position attribute
pub const POSITION_OFFSET: usize = 0;
/// Byte offset of the color attribute
pub const COLOR_OFFSET: usize = 3 * size_of::<f32>();
/// Byte offset of the normal attribute
pub const NORMAL_OFFSET: usize = 6 * size_of::<f32>();
/// Byte offset of the texture coordinate attribute
pub const TEXCOORD_OFFSET: usize = 9 * size_of::<f32>();

/// Canonical texture coordinates
pub const UV00: Uv2 = Vec2::new(0.0, 0.0);
pub const UV01: Uv2 = Vec2::new(0.0, 1.0);
pub const UV10: Uv2 = Vec2::new(1.0, 0.0);
pub const UV11: Uv2 = Vec2::new(1.0, 1.0);

/// Triangle strip over all six faces: bottom, front, right, back, left, top.
#[rustfmt::skip]
pub const STRIP_INDICES: [u32; INDEX_COUNT] = [
    21, 23, 20, 22,             // bottom
    1, 3, 0, 2, 2, 3,           // front
    12, 13, 14, 15,             // right
    4, 5, 6, 7,                 // back
    8, 9, 10, 11, 10, 10,       // left
    16, 17, 18, 19,             // top
];

/// One face of a cuboid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Face {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

impl Face {
    /// All faces in vertex buffer order
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Back,
        Face::Left,
        Face::Right,
        Face::Top,
        Face::Bottom,
    ];

    /// Position of this face's first vertex divided by four
    pub fn index(self) -> usize {
        match self {
            Face::Front => 0,
            Face::Back => 1,
            Face::Left => 2,
            Face::Right => 3,
            Face::Top => 4,
            Face::Bottom => 5,
        }
    }

    /// The unit normal shared by all four vertices of the face
    pub fn normal(self) -> Vec3 {
        match self {
            Face::Front => Vec3::Z,
            Face::Back => Vec3::NEG_Z,
            Face::Left => Vec3::NEG_X,
            Face::Right => Vec3::X,
            Face::Top => Vec3::Y,
            Face::Bottom => Vec3::NEG_Y,
        }
    }

    /// Which of the eight corners feed this face, in vertex order
    pub fn corner_indices(self) -> [usize; 4] {
        match self {
            Face::Front => [0, 3, 1, 2],
            Face::Back => [5, 6, 4, 7],
            Face::Left => [4, 7, 0, 3],
            Face::Right => [1, 2, 5, 6],
            Face::Top => [4, 0, 5, 1],
            Face::Bottom => [3, 7, 2, 6],
        }
    }

    /// Texture coordinates in vertex order.
    ///
    /// The bottom face is seen from below, so its assignment is mirrored to
    /// keep `(0, 0)` on the drawn bottom-left texel.
    pub fn uvs(self) -> [Uv2; 4] {
        match self {
            Face::Bottom => [UV10, UV11, UV00, UV01],
            _ => [UV01, UV00, UV11, UV10],
        }
    }
}

/// Interleaved vertex: position, color, normal, texcoord.
///
/// Field order is part of the GPU layout contract (offsets 0, 12, 24, 36).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
    pub normal: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    /// Create a vertex from its attributes
    pub fn new(position: Point3, color: Color3, normal: Vec3, tex_coord: Uv2) -> Self {
        Self {
            position: position.to_array(),
            color: color.to_array(),
            normal: normal.to_array(),
            tex_coord: tex_coord.to_array(),
        }
    }

    /// Position as a vector
    pub fn position(&self) -> Point3 {
        Vec3::from_array(self.position)
    }

    /// Normal as a vector
    pub fn normal(&self) -> Vec3 {
        Vec3::from_array(self.normal)
    }
}

/// Mesh data for one cuboid, immutable once built
#[derive(Debug, Clone, PartialEq)]
pub struct CuboidMesh {
    vertices: [Vertex; VERTEX_COUNT],
}

impl CuboidMesh {
    /// All 24 vertices, four per face in [`Face::ALL`] order
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// The strip index list
    pub fn indices(&self) -> &[u32] {
        &STRIP_INDICES
    }

    /// The four vertices of one face
    pub fn face_vertices(&self, face: Face) -> &[Vertex] {
        let start = face.index() * 4;
        &self.vertices[start..start + 4]
    }

    /// Flat interleaved scalar view (24 × 11 floats)
    pub fn as_floats(&self) -> &[f32] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Vertex data as bytes, ready for upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Index data as bytes, ready for upload
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&STRIP_INDICES)
    }

    /// Bounding box of all vertex positions
    pub fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(Vertex::position))
    }
}

/// Build the 24-vertex / 28-index mesh for a hexahedron.
///
/// The corners are taken as given; no geometric checks are made, so
/// degenerate or inverted input produces a degenerate or inverted mesh.
pub fn build_cuboid_mesh(corners: &Corners, color: Color3) -> CuboidMesh {
    let mut vertices = [Vertex::zeroed(); VERTEX_COUNT];

    for face in Face::ALL {
        let normal = face.normal();
        let uvs = face.uvs();
        for (slot, (&corner, uv)) in face.corner_indices().iter().zip(uvs).enumerate() {
            vertices[face.index() * 4 + slot] = Vertex::new(corners[corner], color, normal, uv);
        }
    }

    CuboidMesh { vertices }
}
