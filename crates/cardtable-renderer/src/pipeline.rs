//! Render Pipeline
//!
//! Fixed-function state, the vertex/bind group layouts shared by every
//! object, and pipeline creation.

use std::num::NonZeroU64;

use cardtable_core::mesh::VERTEX_STRIDE;

use crate::shader::{ShaderProgram, FRAGMENT_ENTRY, VERTEX_ENTRY};
use crate::uniforms::ShaderUniforms;
use crate::{RendererError, RendererResult};

/// Depth buffer format
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Vertex attributes: position, color, normal, texcoord
pub const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
    0 => Float32x3,
    1 => Float32x3,
    2 => Float32x3,
    3 => Float32x2
];

/// Pipeline state
#[derive(Debug, Clone, Default)]
pub struct PipelineState {
    /// Depth state
    pub depth: DepthState,
    /// Rasterizer state
    pub rasterizer: RasterizerState,
}

/// Depth state
#[derive(Debug, Clone)]
pub struct DepthState {
    pub test: bool,
    pub write: bool,
    pub compare: CompareFunction,
}

impl Default for DepthState {
    fn default() -> Self {
        Self {
            test: true,
            write: true,
            compare: CompareFunction::Less,
        }
    }
}

/// Compare function
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompareFunction {
    Never,
    #[default]
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

impl From<CompareFunction> for wgpu::CompareFunction {
    fn from(compare: CompareFunction) -> Self {
        match compare {
            CompareFunction::Never => wgpu::CompareFunction::Never,
            CompareFunction::Less => wgpu::CompareFunction::Less,
            CompareFunction::Equal => wgpu::CompareFunction::Equal,
            CompareFunction::LessEqual => wgpu::CompareFunction::LessEqual,
            CompareFunction::Greater => wgpu::CompareFunction::Greater,
            CompareFunction::NotEqual => wgpu::CompareFunction::NotEqual,
            CompareFunction::GreaterEqual => wgpu::CompareFunction::GreaterEqual,
            CompareFunction::Always => wgpu::CompareFunction::Always,
        }
    }
}

/// Rasterizer state.
///
/// Culling defaults to off: the stitched strip contains degenerate triangles
/// and the face windings are not consistent.
#[derive(Debug, Clone, Default)]
pub struct RasterizerState {
    pub cull_mode: CullMode,
    pub front_face: FrontFace,
}

/// Cull mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CullMode {
    #[default]
    None,
    Front,
    Back,
}

impl From<CullMode> for Option<wgpu::Face> {
    fn from(cull: CullMode) -> Self {
        match cull {
            CullMode::None => None,
            CullMode::Front => Some(wgpu::Face::Front),
            CullMode::Back => Some(wgpu::Face::Back),
        }
    }
}

/// Front face winding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrontFace {
    Clockwise,
    #[default]
    CounterClockwise,
}

impl From<FrontFace> for wgpu::FrontFace {
    fn from(front: FrontFace) -> Self {
        match front {
            FrontFace::Clockwise => wgpu::FrontFace::Cw,
            FrontFace::CounterClockwise => wgpu::FrontFace::Ccw,
        }
    }
}

impl PipelineState {
    /// Indexed triangle strips with 32-bit indices
    pub fn primitive_state(&self) -> wgpu::PrimitiveState {
        wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleStrip,
            strip_index_format: Some(wgpu::IndexFormat::Uint32),
            front_face: self.rasterizer.front_face.into(),
            cull_mode: self.rasterizer.cull_mode.into(),
            ..Default::default()
        }
    }

    /// Depth attachment state; `None` when depth testing is off
    pub fn depth_stencil_state(&self) -> Option<wgpu::DepthStencilState> {
        self.depth.test.then(|| wgpu::DepthStencilState {
            format: DEPTH_FORMAT,
            depth_write_enabled: self.depth.write,
            depth_compare: self.depth.compare.into(),
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        })
    }
}

/// Interleaved vertex buffer layout (stride 44)
pub fn vertex_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: VERTEX_STRIDE as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

/// Group 0: uniform block, texture, sampler
pub fn bind_group_layout_entries() -> [wgpu::BindGroupLayoutEntry; 3] {
    [
        wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(ShaderUniforms::SIZE),
            },
            count: None,
        },
        wgpu::BindGroupLayoutEntry {
            binding: 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        },
        wgpu::BindGroupLayoutEntry {
            binding: 2,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        },
    ]
}

/// The render pipeline and the bind group layout objects are created against
#[derive(Debug)]
pub struct ScenePipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl ScenePipeline {
    /// Create the pipeline. Mismatches between the shaders and the layouts
    /// surface here as validation errors.
    pub async fn new(
        device: &wgpu::Device,
        program: &ShaderProgram,
        surface_format: wgpu::TextureFormat,
        state: &PipelineState,
    ) -> RendererResult<Self> {
        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &bind_group_layout_entries(),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Scene Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &program.vertex,
                entry_point: Some(VERTEX_ENTRY),
                buffers: &[vertex_buffer_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &program.fragment,
                entry_point: Some(FRAGMENT_ENTRY),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: state.primitive_state(),
            depth_stencil: state.depth_stencil_state(),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        if let Some(error) = device.pop_error_scope().await {
            return Err(RendererError::PipelineCreation(error.to_string()));
        }

        Ok(Self {
            pipeline,
            bind_group_layout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardtable_core::mesh::{COLOR_OFFSET, NORMAL_OFFSET, POSITION_OFFSET, TEXCOORD_OFFSET};

    #[test]
    fn test_pipeline_state_default() {
        let state = PipelineState::default();
        assert!(state.depth.test);
        assert_eq!(state.depth.compare, CompareFunction::Less);
        assert_eq!(state.rasterizer.cull_mode, CullMode::None);
    }

    #[test]
    fn test_primitive_state() {
        let primitive = PipelineState::default().primitive_state();
        assert_eq!(primitive.topology, wgpu::PrimitiveTopology::TriangleStrip);
        assert_eq!(primitive.strip_index_format, Some(wgpu::IndexFormat::Uint32));
        assert_eq!(primitive.cull_mode, None);
    }

    #[test]
    fn test_depth_state() {
        let depth = PipelineState::default().depth_stencil_state().unwrap();
        assert_eq!(depth.depth_compare, wgpu::CompareFunction::Less);
        assert!(depth.depth_write_enabled);

        let mut state = PipelineState::default();
        state.depth.test = false;
        assert!(state.depth_stencil_state().is_none());
    }

    #[test]
    fn test_vertex_layout_matches_mesh() {
        let layout = vertex_buffer_layout();
        assert_eq!(layout.array_stride, 44);

        let offsets: Vec<_> = layout.attributes.iter().map(|a| a.offset as usize).collect();
        assert_eq!(offsets, vec![POSITION_OFFSET, COLOR_OFFSET, NORMAL_OFFSET, TEXCOORD_OFFSET]);

        let locations: Vec<_> = layout.attributes.iter().map(|a| a.shader_location).collect();
        assert_eq!(locations, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_bind_group_slots() {
        let entries = bind_group_layout_entries();
        let bindings: Vec<_> = entries.iter().map(|e| e.binding).collect();
        assert_eq!(bindings, vec![0, 1, 2]);
        assert!(matches!(entries[0].ty, wgpu::BindingType::Buffer { .. }));
        assert!(matches!(entries[2].ty, wgpu::BindingType::Sampler(_)));
    }
}
