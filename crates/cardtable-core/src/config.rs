//! Scene Configuration
//!
//! Settings that shape what is drawn, plus a small JSON loader shared by the
//! other crates' configuration sections.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::camera::DEFAULT_EYE_DISTANCE;
use crate::lighting::{LightSource, Material};
use crate::{CoreError, CoreResult};

/// Scene settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Half width, half height and half depth of the table top
    pub table_half_extents: [f32; 3],
    /// Texture applied to the table top
    pub table_texture: Option<PathBuf>,
    /// Texture applied to the card
    pub card_texture: Option<PathBuf>,
    /// Material shared by every object
    pub material: Material,
    /// The scene's single light
    pub light: LightSource,
    /// Starting eye distance
    pub eye_distance: f32,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            table_half_extents: [0.8, 0.05, 0.6],
            table_texture: Some(PathBuf::from("resources/textures/table.png")),
            card_texture: None,
            material: Material::default(),
            light: LightSource::default(),
            eye_distance: DEFAULT_EYE_DISTANCE,
        }
    }
}

/// Read and parse a JSON file
pub fn load_json<T: DeserializeOwned>(path: &Path) -> CoreResult<T> {
    let text = std::fs::read_to_string(path).map_err(|source| CoreError::ConfigRead {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&text).map_err(|source| CoreError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SceneConfig = serde_json::from_str(r#"{ "card_texture": "card.png" }"#).unwrap();
        assert_eq!(config.card_texture, Some(PathBuf::from("card.png")));
        assert_eq!(config.table_half_extents, [0.8, 0.05, 0.6]);
        assert_eq!(config.eye_distance, DEFAULT_EYE_DISTANCE);
    }

    #[test]
    fn test_null_texture_disables_it() {
        let config: SceneConfig = serde_json::from_str(r#"{ "table_texture": null }"#).unwrap();
        assert!(config.table_texture.is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_json::<SceneConfig>(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, CoreError::ConfigRead { .. }));
    }

    #[test]
    fn test_load_malformed_file() {
        let path = std::env::temp_dir().join(format!("cardtable-scene-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let err = load_json::<SceneConfig>(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, CoreError::ConfigParse { .. }));
    }
}
