//! Shader Program
//!
//! Loads the vertex and fragment stages from disk once, falls back to the
//! copies bundled into the binary, and compiles both under a validation
//! error scope.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{RendererError, RendererResult};

/// File name of the bundled vertex stage
pub const DEFAULT_VERTEX_SHADER: &str = "blinn_phong_tex.vert.wgsl";

/// File name of the bundled fragment stage
pub const DEFAULT_FRAGMENT_SHADER: &str = "blinn_phong_tex.frag.wgsl";

/// Vertex stage entry point
pub const VERTEX_ENTRY: &str = "vs_main";

/// Fragment stage entry point
pub const FRAGMENT_ENTRY: &str = "fs_main";

const BUNDLED_VERTEX: &str = include_str!("../../../resources/shaders/blinn_phong_tex.vert.wgsl");
const BUNDLED_FRAGMENT: &str = include_str!("../../../resources/shaders/blinn_phong_tex.frag.wgsl");

/// Where the shader files live
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShaderConfig {
    /// Directory holding both stages
    pub dir: PathBuf,
    /// Vertex stage file name
    pub vertex: String,
    /// Fragment stage file name
    pub fragment: String,
}

impl Default for ShaderConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("resources/shaders"),
            vertex: DEFAULT_VERTEX_SHADER.to_string(),
            fragment: DEFAULT_FRAGMENT_SHADER.to_string(),
        }
    }
}

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Where a stage's source text came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOrigin {
    File(PathBuf),
    Bundled,
}

impl fmt::Display for SourceOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceOrigin::File(path) => write!(f, "{}", path.display()),
            SourceOrigin::Bundled => write!(f, "<bundled>"),
        }
    }
}

/// WGSL text for one stage
#[derive(Debug, Clone)]
pub struct StageSource {
    pub stage: ShaderStage,
    pub code: String,
    pub origin: SourceOrigin,
}

impl StageSource {
    fn read(dir: &Path, file: &str, stage: ShaderStage, bundled: &str) -> Self {
        let path = dir.join(file);
        match std::fs::read_to_string(&path) {
            Ok(code) => {
                log::debug!("Loaded {} shader from {}", stage, path.display());
                Self {
                    stage,
                    code,
                    origin: SourceOrigin::File(path),
                }
            }
            Err(err) => {
                log::error!(
                    "Failed to read {} shader {}: {}; using bundled copy",
                    stage,
                    path.display(),
                    err
                );
                Self::bundled(stage, bundled)
            }
        }
    }

    fn bundled(stage: ShaderStage, code: &str) -> Self {
        Self {
            stage,
            code: code.to_string(),
            origin: SourceOrigin::Bundled,
        }
    }
}

/// Source text for both stages
#[derive(Debug, Clone)]
pub struct ShaderSources {
    pub vertex: StageSource,
    pub fragment: StageSource,
}

impl ShaderSources {
    /// Read both stages from `config.dir`
    pub fn load(config: &ShaderConfig) -> Self {
        Self {
            vertex: StageSource::read(&config.dir, &config.vertex, ShaderStage::Vertex, BUNDLED_VERTEX),
            fragment: StageSource::read(
                &config.dir,
                &config.fragment,
                ShaderStage::Fragment,
                BUNDLED_FRAGMENT,
            ),
        }
    }

    /// The copies compiled into the binary
    pub fn bundled() -> Self {
        Self {
            vertex: StageSource::bundled(ShaderStage::Vertex, BUNDLED_VERTEX),
            fragment: StageSource::bundled(ShaderStage::Fragment, BUNDLED_FRAGMENT),
        }
    }
}

/// Compiled vertex and fragment modules, shared by every object
#[derive(Debug)]
pub struct ShaderProgram {
    pub vertex: wgpu::ShaderModule,
    pub fragment: wgpu::ShaderModule,
}

impl ShaderProgram {
    /// Load from disk (with bundled fallback) and compile
    pub async fn load(device: &wgpu::Device, config: &ShaderConfig) -> RendererResult<Arc<Self>> {
        let sources = ShaderSources::load(config);
        Ok(Arc::new(Self::compile(device, &sources).await?))
    }

    /// Compile both stages; a validation error in either is fatal
    pub async fn compile(device: &wgpu::Device, sources: &ShaderSources) -> RendererResult<Self> {
        Ok(Self {
            vertex: compile_stage(device, &sources.vertex).await?,
            fragment: compile_stage(device, &sources.fragment).await?,
        })
    }
}

async fn compile_stage(device: &wgpu::Device, source: &StageSource) -> RendererResult<wgpu::ShaderModule> {
    let label = format!("{} shader", source.stage);

    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&label),
        source: wgpu::ShaderSource::Wgsl(source.code.as_str().into()),
    });
    if let Some(error) = device.pop_error_scope().await {
        return Err(RendererError::ShaderCompilation(format!(
            "{} ({}): {}",
            label, source.origin, error
        )));
    }

    log::info!("Compiled {} from {}", label, source.origin);
    Ok(module)
}
