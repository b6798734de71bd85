//! # Card Table Renderer
//!
//! Draws the card table scene with `wgpu`.
//!
//! ## Features
//! - One shared Blinn-Phong shader program, loaded from disk with a bundled fallback
//! - Per-object vertex, index and uniform buffers created once at start-up
//! - Indexed triangle-strip draws with depth testing
//! - Texture loading with a placeholder for missing images

pub mod mesh;
pub mod pipeline;
pub mod scene;
pub mod shader;
pub mod texture;
pub mod uniforms;

pub use mesh::{upload_mesh, GpuMesh};
pub use pipeline::{PipelineState, ScenePipeline};
pub use scene::{upload_scene, SceneObject};
pub use shader::{ShaderConfig, ShaderProgram, ShaderSources};
pub use texture::{DepthTexture, Texture, TextureImage};
pub use uniforms::ShaderUniforms;

use std::path::PathBuf;
use std::sync::Arc;

use cardtable_core::{card_table_scene, CameraState, LightSource, SceneConfig};
use cardtable_platform::ScopedTimer;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use winit::window::Window;

/// Renderer errors
#[derive(Error, Debug)]
pub enum RendererError {
    #[error("No suitable GPU adapter found")]
    AdapterNotFound,

    #[error("GPU device creation failed: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),

    #[error("Surface creation failed: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    #[error("Surface is not supported by the adapter")]
    SurfaceUnsupported,

    #[error("Surface texture unavailable: {0}")]
    SurfaceAcquire(wgpu::SurfaceError),

    #[error("Shader compilation failed: {0}")]
    ShaderCompilation(String),

    #[error("Pipeline creation failed: {0}")]
    PipelineCreation(String),

    #[error("Failed to load texture {path}: {source}")]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Texture {path} is {width}x{height}, the device allows at most {max}x{max}")]
    TextureTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max: u32,
    },

    #[error("Out of GPU memory")]
    OutOfMemory,
}

/// Result type for renderer operations
pub type RendererResult<T> = Result<T, RendererError>;

/// Presentation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentMode {
    #[default]
    AutoVsync,
    AutoNoVsync,
    Fifo,
    Mailbox,
    Immediate,
}

impl From<PresentMode> for wgpu::PresentMode {
    fn from(mode: PresentMode) -> Self {
        match mode {
            PresentMode::AutoVsync => wgpu::PresentMode::AutoVsync,
            PresentMode::AutoNoVsync => wgpu::PresentMode::AutoNoVsync,
            PresentMode::Fifo => wgpu::PresentMode::Fifo,
            PresentMode::Mailbox => wgpu::PresentMode::Mailbox,
            PresentMode::Immediate => wgpu::PresentMode::Immediate,
        }
    }
}

/// Adapter preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PowerPreference {
    LowPower,
    #[default]
    HighPerformance,
}

impl From<PowerPreference> for wgpu::PowerPreference {
    fn from(preference: PowerPreference) -> Self {
        match preference {
            PowerPreference::LowPower => wgpu::PowerPreference::LowPower,
            PowerPreference::HighPerformance => wgpu::PowerPreference::HighPerformance,
        }
    }
}

/// Renderer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Present mode
    pub present_mode: PresentMode,
    /// Adapter preference
    pub power_preference: PowerPreference,
    /// Enable backend validation layers
    pub validation: bool,
    /// Background color (RGBA)
    pub clear_color: [f64; 4],
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            present_mode: PresentMode::default(),
            power_preference: PowerPreference::default(),
            validation: cfg!(debug_assertions),
            clear_color: [0.2, 0.2, 0.2, 1.0],
        }
    }
}

impl RendererConfig {
    fn wgpu_clear_color(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_color;
        wgpu::Color { r, g, b, a }
    }
}

/// Renderer statistics
#[derive(Debug, Clone, Default)]
pub struct RendererStats {
    /// Draw calls this frame
    pub draw_calls: u32,
    /// Strip triangles submitted, degenerate ones included
    pub triangles: u32,
    /// Frames presented so far
    pub frames_presented: u64,
    /// Frames skipped because the surface was unavailable
    pub frames_skipped: u64,
}

/// Main renderer instance
pub struct Renderer {
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface_config: wgpu::SurfaceConfiguration,
    adapter_info: wgpu::AdapterInfo,
    pipeline: ScenePipeline,
    depth: DepthTexture,
    objects: Vec<SceneObject>,
    light: LightSource,
    clear_color: wgpu::Color,
    stats: RendererStats,
}

impl Renderer {
    /// Create the device, compile the shaders once and upload the scene
    pub async fn new(
        window: Arc<Window>,
        config: &RendererConfig,
        shaders: &ShaderConfig,
        scene: &SceneConfig,
    ) -> RendererResult<Self> {
        let _timer = ScopedTimer::traced("renderer_init");
        let size = window.inner_size();

        let mut flags = wgpu::InstanceFlags::from_build_config();
        if config.validation {
            flags |= wgpu::InstanceFlags::VALIDATION;
        }
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            flags,
            ..Default::default()
        });

        let surface = instance.create_surface(window)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: config.power_preference.into(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(RendererError::AdapterNotFound)?;

        let adapter_info = adapter.get_info();
        log::info!("GPU adapter: {} ({:?})", adapter_info.name, adapter_info.backend);
        log::info!("GPU vendor: {:#06x}, type {:?}", adapter_info.vendor, adapter_info.device_type);
        log::info!("GPU driver: {} {}", adapter_info.driver, adapter_info.driver_info);

        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    label: Some("Card Table Device"),
                    ..Default::default()
                },
                None,
            )
            .await?;
        device.on_uncaptured_error(Box::new(|error: wgpu::Error| {
            log::error!("Uncaptured GPU error: {}", error);
        }));

        let capabilities = surface.get_capabilities(&adapter);
        let format = capabilities
            .formats
            .iter()
            .copied()
            .find(|format| format.is_srgb())
            .or_else(|| capabilities.formats.first().copied())
            .ok_or(RendererError::SurfaceUnsupported)?;

        let requested: wgpu::PresentMode = config.present_mode.into();
        let present_mode = if capabilities.present_modes.contains(&requested)
            || matches!(requested, wgpu::PresentMode::AutoVsync | wgpu::PresentMode::AutoNoVsync)
        {
            requested
        } else {
            log::warn!("Present mode {:?} unsupported, using Fifo", requested);
            wgpu::PresentMode::Fifo
        };

        let surface_config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode: capabilities
                .alpha_modes
                .first()
                .copied()
                .unwrap_or(wgpu::CompositeAlphaMode::Auto),
            desired_maximum_frame_latency: 2,
            view_formats: vec![],
        };
        surface.configure(&device, &surface_config);
        log::info!(
            "Surface configured: {}x{} {:?} {:?}",
            surface_config.width,
            surface_config.height,
            format,
            present_mode
        );

        let program = ShaderProgram::load(&device, shaders).await?;
        let pipeline = ScenePipeline::new(&device, &program, format, &PipelineState::default()).await?;
        let depth = DepthTexture::new(&device, surface_config.width, surface_config.height);

        let objects = upload_scene(&device, &queue, &pipeline.bind_group_layout, &card_table_scene(scene));
        log::info!("Uploaded {} scene objects", objects.len());

        Ok(Self {
            surface,
            device,
            queue,
            surface_config,
            adapter_info,
            pipeline,
            depth,
            objects,
            light: scene.light,
            clear_color: config.wgpu_clear_color(),
            stats: RendererStats::default(),
        })
    }

    /// Reconfigure the surface and depth buffer; zero sizes are ignored
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.surface_config.width = width;
        self.surface_config.height = height;
        self.surface.configure(&self.device, &self.surface_config);
        self.depth = DepthTexture::new(&self.device, width, height);
        log::debug!("Resized surface to {}x{}", width, height);
    }

    /// Surface aspect ratio
    pub fn aspect_ratio(&self) -> f32 {
        self.surface_config.width as f32 / self.surface_config.height.max(1) as f32
    }

    /// Draw every object with the given camera
    pub fn render(&mut self, camera: &CameraState) -> RendererResult<()> {
        let _timer = ScopedTimer::traced("render_frame");

        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.surface_config);
                self.stats.frames_skipped += 1;
                return Ok(());
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::warn!("Timed out acquiring surface texture");
                self.stats.frames_skipped += 1;
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RendererError::OutOfMemory),
            Err(err) => return Err(RendererError::SurfaceAcquire(err)),
        };
        let view = frame.texture.create_view(&wgpu::TextureViewDescriptor::default());

        let projection = CameraState::projection_matrix(self.aspect_ratio());
        let model_view = camera.view_matrix();
        for object in &self.objects {
            let uniforms = ShaderUniforms::new(projection, model_view, &self.light, &object.material);
            object.mesh.write_uniforms(&self.queue, &uniforms);
        }

        let mut encoder = self.device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Frame Encoder"),
        });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline.pipeline);
            for object in &self.objects {
                object.mesh.draw(&mut pass);
            }
        }

        self.queue.submit(Some(encoder.finish()));
        frame.present();

        self.stats.draw_calls = self.objects.len() as u32;
        self.stats.triangles = self.objects.iter().map(|o| o.mesh.strip_triangles()).sum();
        self.stats.frames_presented += 1;
        Ok(())
    }

    /// Get renderer statistics
    pub fn stats(&self) -> &RendererStats {
        &self.stats
    }

    /// Adapter the device was created on
    pub fn adapter_info(&self) -> &wgpu::AdapterInfo {
        &self.adapter_info
    }

    /// Objects in draw order
    pub fn objects(&self) -> &[SceneObject] {
        &self.objects
    }
}
