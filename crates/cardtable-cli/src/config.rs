//! Application Configuration
//!
//! Every section defaults to the stock scene, so a config file only needs the
//! values it changes.

use std::path::Path;

use cardtable_core::{load_json, CoreResult, SceneConfig};
use cardtable_platform::WindowConfig;
use cardtable_renderer::{RendererConfig, ShaderConfig};
use serde::{Deserialize, Serialize};

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub renderer: RendererConfig,
    pub shaders: ShaderConfig,
    pub scene: SceneConfig,
}

impl AppConfig {
    /// Load from a JSON file
    pub fn load(path: &Path) -> CoreResult<Self> {
        let config = load_json(path)?;
        log::info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}
