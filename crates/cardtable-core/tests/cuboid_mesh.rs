//! Properties of the cuboid mesh builder that hold for any input corners

use std::collections::HashSet;

use cardtable_core::geometry::{card_corners, table_top_corners};
use cardtable_core::math::{scale_corners, Corners, Vec3};
use cardtable_core::mesh::{build_cuboid_mesh, Face, INDEX_COUNT, STRIP_INDICES, VERTEX_COUNT};

/// Deterministic pseudo-random corner sets
fn sample_corners(count: usize) -> Vec<Corners> {
    let mut seed: u32 = 0x2545_f491;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        (seed as f32 / u32::MAX as f32) * 20.0 - 10.0
    };
    (0..count)
        .map(|_| std::array::from_fn(|_| Vec3::new(next(), next(), next())))
        .collect()
}

fn cube(half: f32) -> Corners {
    table_top_corners(half, half, half)
}

#[test]
fn counts_are_fixed_for_any_input() {
    for corners in sample_corners(64) {
        let mesh = build_cuboid_mesh(&corners, Vec3::new(0.3, 0.6, 0.9));
        assert_eq!(mesh.vertices().len(), VERTEX_COUNT);
        assert_eq!(mesh.indices().len(), INDEX_COUNT);
    }
}

#[test]
fn indices_are_in_range_and_reach_every_vertex() {
    let mesh = build_cuboid_mesh(&cube(1.0), Vec3::ONE);
    assert!(mesh.indices().iter().all(|&i| (i as usize) < VERTEX_COUNT));

    let referenced: HashSet<u32> = mesh.indices().iter().copied().collect();
    assert_eq!(referenced.len(), VERTEX_COUNT);
}

#[test]
fn each_face_has_one_canonical_normal() {
    let mesh = build_cuboid_mesh(&sample_corners(1)[0], Vec3::ZERO);
    let mut seen = Vec::new();
    for face in Face::ALL {
        let vertices = mesh.face_vertices(face);
        let normal = vertices[0].normal();
        assert!(vertices.iter().all(|v| v.normal() == normal));
        assert_eq!(normal, face.normal());
        assert_eq!(normal.abs().max_element(), 1.0);
        assert_eq!(normal.abs().element_sum(), 1.0);
        assert!(!seen.contains(&normal));
        seen.push(normal);
    }
}

#[test]
fn builder_is_pure() {
    let corners = sample_corners(1)[0];
    let color = Vec3::new(0.25, 0.5, 0.75);
    let first = build_cuboid_mesh(&corners, color);
    let second = build_cuboid_mesh(&corners, color);
    assert_eq!(first.vertex_bytes(), second.vertex_bytes());
    assert_eq!(first.index_bytes(), second.index_bytes());
}

#[test]
fn scaling_corners_scales_only_positions() {
    let corners = card_corners();
    let color = Vec3::new(0.1, 0.2, 0.3);
    let k = 2.5;

    let base = build_cuboid_mesh(&corners, color);
    let scaled = build_cuboid_mesh(&scale_corners(&corners, k), color);

    for (a, b) in base.vertices().iter().zip(scaled.vertices()) {
        assert!((a.position() * k).abs_diff_eq(b.position(), 1e-6));
        assert_eq!(a.color, b.color);
        assert_eq!(a.normal, b.normal);
        assert_eq!(a.tex_coord, b.tex_coord);
    }
}

#[test]
fn all_identical_corners_still_build() {
    let mesh = build_cuboid_mesh(&[Vec3::ZERO; 8], Vec3::splat(0.5));
    assert_eq!(mesh.vertices().len(), VERTEX_COUNT);
    assert_eq!(mesh.indices().len(), INDEX_COUNT);
    assert!(mesh.vertices().iter().all(|v| v.position() == Vec3::ZERO));
}

#[test]
fn strip_stitches_faces_with_zero_area_triangles() {
    let mesh = build_cuboid_mesh(&cube(1.0), Vec3::ONE);
    let positions: Vec<Vec3> = mesh.vertices().iter().map(|v| v.position()).collect();

    let mut face_triangles = 0;
    for window in STRIP_INDICES.windows(3) {
        let [a, b, c] = [window[0], window[1], window[2]].map(|i| positions[i as usize]);
        let area = (b - a).cross(c - a).length() * 0.5;
        if area > 1e-6 {
            // Visible triangles never straddle two faces.
            let face = window[0] / 4;
            assert!(window.iter().all(|&i| i / 4 == face), "triangle {:?} spans faces", window);
            face_triangles += 1;
        }
    }
    assert_eq!(face_triangles, 12);
}

#[test]
fn strip_visits_faces_in_fixed_order() {
    let mut order = Vec::new();
    for &index in &STRIP_INDICES {
        let face = Face::ALL[index as usize / 4];
        if order.last() != Some(&face) {
            order.push(face);
        }
    }
    assert_eq!(
        order,
        vec![Face::Bottom, Face::Front, Face::Right, Face::Back, Face::Left, Face::Top]
    );
}

/// Eight corners that differ from each other, so a swapped corner shows up
fn distinct_corners() -> Corners {
    std::array::from_fn(|i| Vec3::new(i as f32, 10.0 + i as f32 * 2.0, -(i as f32) * 3.0))
}

#[test]
fn every_face_takes_its_fixed_corners() {
    let corners = distinct_corners();
    let mesh = build_cuboid_mesh(&corners, Vec3::ONE);

    let expected: [(Face, [usize; 4]); 6] = [
        (Face::Front, [0, 3, 1, 2]),
        (Face::Back, [5, 6, 4, 7]),
        (Face::Left, [4, 7, 0, 3]),
        (Face::Right, [1, 2, 5, 6]),
        (Face::Top, [4, 0, 5, 1]),
        (Face::Bottom, [3, 7, 2, 6]),
    ];
    for (face, indices) in expected {
        let positions: Vec<Vec3> = mesh.face_vertices(face).iter().map(|v| v.position()).collect();
        let wanted: Vec<Vec3> = indices.iter().map(|&i| corners[i]).collect();
        assert_eq!(positions, wanted, "{:?} face corners", face);
    }
}

#[test]
fn side_faces_share_the_front_uv_layout() {
    let mesh = build_cuboid_mesh(&distinct_corners(), Vec3::ONE);
    let standard = [[0.0, 1.0], [0.0, 0.0], [1.0, 1.0], [1.0, 0.0]];

    for face in [Face::Front, Face::Back, Face::Left, Face::Right, Face::Top] {
        let uvs: Vec<[f32; 2]> = mesh.face_vertices(face).iter().map(|v| v.tex_coord).collect();
        assert_eq!(uvs, standard, "{:?} face uvs", face);
    }

    let bottom: Vec<[f32; 2]> = mesh.face_vertices(Face::Bottom).iter().map(|v| v.tex_coord).collect();
    assert_eq!(bottom, [[1.0, 0.0], [1.0, 1.0], [0.0, 0.0], [0.0, 1.0]]);
}
