//! # Card Table Core
//!
//! Renderer-independent data for the card table viewer.
//!
//! This crate provides:
//! - **Mesh**: the fixed-topology cuboid builder (24 vertices, 28 strip indices)
//! - **Geometry**: corner sets for the table top, the four legs and the card
//! - **Camera**: camera state, view/projection math and the action queue input feeds
//! - **Lighting**: light source and material records for Blinn-Phong shading
//! - **Config**: scene settings and JSON loading

pub mod camera;
pub mod config;
pub mod geometry;
pub mod lighting;
pub mod math;
pub mod mesh;

pub use camera::{camera_channel, CameraAction, CameraQueue, CameraSender, CameraState};
pub use config::{load_json, SceneConfig};
pub use geometry::{card_table_scene, SceneObjectDesc};
pub use lighting::{LightSource, Material};
pub use math::{Color3, Corners, Point3, Uv2};
pub use mesh::{build_cuboid_mesh, CuboidMesh, Face, Vertex, INDEX_COUNT, VERTEX_COUNT};

use std::path::PathBuf;

use thiserror::Error;

/// Core errors
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;
