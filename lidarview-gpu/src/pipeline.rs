//! Render pipeline construction for the frame pass.

/// Depth buffer format shared by every pipeline in the frame pass.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

const VERTEX_ENTRY: &str = "vs_main";
const FRAGMENT_ENTRY: &str = "fs_main";

#[derive(Debug, thiserror::Error)]
pub enum PipelineBuildError {
    #[error("Shader module is required")]
    MissingShader,
    #[error("Color target format is required")]
    MissingColorTarget,
}

/// Builder for pipelines drawn into the single frame pass.
///
/// One WGSL module provides both `vs_main` and `fs_main`. The pass always has
/// one alpha-blended color target and a [`DEPTH_FORMAT`] depth attachment.
pub struct RenderPipelineBuilder<'a> {
    device: &'a wgpu::Device,
    label: Option<String>,
    shader: Option<&'a wgpu::ShaderModule>,
    bind_group_layouts: Vec<&'a wgpu::BindGroupLayout>,
    vertex_buffers: Vec<wgpu::VertexBufferLayout<'static>>,
    topology: wgpu::PrimitiveTopology,
    depth_compare: wgpu::CompareFunction,
    depth_write: bool,
    color_format: Option<wgpu::TextureFormat>,
}

impl<'a> RenderPipelineBuilder<'a> {
    pub fn new(device: &'a wgpu::Device) -> Self {
        Self {
            device,
            label: None,
            shader: None,
            bind_group_layouts: Vec::new(),
            vertex_buffers: Vec::new(),
            topology: wgpu::PrimitiveTopology::TriangleList,
            depth_compare: wgpu::CompareFunction::Less,
            depth_write: true,
            color_format: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_shader(mut self, module: &'a wgpu::ShaderModule) -> Self {
        self.shader = Some(module);
        self
    }

    pub fn with_bind_group_layout(mut self, layout: &'a wgpu::BindGroupLayout) -> Self {
        self.bind_group_layouts.push(layout);
        self
    }

    pub fn with_vertex_buffer(mut self, buffer: wgpu::VertexBufferLayout<'static>) -> Self {
        self.vertex_buffers.push(buffer);
        self
    }

    pub fn with_topology(mut self, topology: wgpu::PrimitiveTopology) -> Self {
        self.topology = topology;
        self
    }

    /// Depth test and write. Screen-space overlays use `Always` without writes.
    pub fn with_depth(mut self, compare: wgpu::CompareFunction, write: bool) -> Self {
        self.depth_compare = compare;
        self.depth_write = write;
        self
    }

    pub fn with_color_target(mut self, format: wgpu::TextureFormat) -> Self {
        self.color_format = Some(format);
        self
    }

    pub fn build(self) -> Result<wgpu::RenderPipeline, PipelineBuildError> {
        let module = self.shader.ok_or(PipelineBuildError::MissingShader)?;
        let format = self
            .color_format
            .ok_or(PipelineBuildError::MissingColorTarget)?;

        let layout_label = self.label.as_deref().map(|l| format!("{l} Layout"));
        let pipeline_layout = self
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: layout_label.as_deref(),
                bind_group_layouts: &self.bind_group_layouts,
                push_constant_ranges: &[],
            });

        let targets = [Some(wgpu::ColorTargetState {
            format,
            blend: Some(wgpu::BlendState::ALPHA_BLENDING),
            write_mask: wgpu::ColorWrites::ALL,
        })];

        Ok(self
            .device
            .create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: self.label.as_deref(),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module,
                    entry_point: Some(VERTEX_ENTRY),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    buffers: &self.vertex_buffers,
                },
                primitive: wgpu::PrimitiveState {
                    topology: self.topology,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: self.depth_write,
                    depth_compare: self.depth_compare,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                fragment: Some(wgpu::FragmentState {
                    module,
                    entry_point: Some(FRAGMENT_ENTRY),
                    compilation_options: wgpu::PipelineCompilationOptions::default(),
                    targets: &targets,
                }),
                multiview: None,
                cache: None,
            }))
    }
}
