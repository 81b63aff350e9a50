//! Vehicle path renderable.

use crate::Renderer;
use crate::buffer::GrowableBuffer;
use crate::builder::BufferUsage;
use crate::renderable::{FrameCamera, Renderable, RenderableError, enable_or_log};
use crate::shader::{ShaderLibrary, validated};
use crate::types::{CameraUniforms, LineVertex, ModelUniforms, line_vertices};
use glam::{Mat4, Vec3};

const LABEL: &str = "TrajectoryRenderable";

/// Amber.
pub const TRAJECTORY_COLOR: [f32; 4] = [1.0, 0.8, 0.0, 1.0];

struct TrajectoryPipeline {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    // Held for the lifetime of the bind group.
    _model_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl TrajectoryPipeline {
    fn new(
        renderer: &Renderer,
        shaders: &ShaderLibrary,
        format: wgpu::TextureFormat,
    ) -> Result<Self, RenderableError> {
        let device = renderer.device();
        let module = shaders.compile(device, "trajectory")?;

        let camera_buffer = renderer
            .create_buffer()
            .label("Trajectory Camera Buffer")
            .size(std::mem::size_of::<CameraUniforms>() as u64)
            .usage(BufferUsage::Uniform)
            .build()?;
        let model = ModelUniforms::new(Mat4::IDENTITY, TRAJECTORY_COLOR);
        let model_buffer = renderer
            .create_buffer()
            .label("Trajectory Model Buffer")
            .with_pod_data(std::slice::from_ref(&model))
            .usage(BufferUsage::Uniform)
            .build()?;
        let (layout, bind_group) = renderer
            .create_bind_group()
            .label("Trajectory Bind Group")
            .uniform(&camera_buffer)
            .uniform(&model_buffer)
            .build()?;

        let pipeline = validated(device, LABEL, || {
            renderer
                .create_render_pipeline()
                .with_label("Trajectory Pipeline")
                .with_shader(&module)
                .with_bind_group_layout(&layout)
                .with_vertex_buffer(LineVertex::layout())
                .with_topology(wgpu::PrimitiveTopology::LineStrip)
                .with_color_target(format)
                .build()
        })??;

        Ok(Self {
            pipeline,
            camera_buffer,
            _model_buffer: model_buffer,
            bind_group,
        })
    }
}

/// Draws every visited position as one connected line strip.
pub struct TrajectoryRenderable {
    state: Option<TrajectoryPipeline>,
    vertices: GrowableBuffer,
}

impl TrajectoryRenderable {
    pub fn new(renderer: &Renderer, shaders: &ShaderLibrary, format: wgpu::TextureFormat) -> Self {
        Self {
            state: enable_or_log(LABEL, TrajectoryPipeline::new(renderer, shaders, format)),
            vertices: GrowableBuffer::new("Trajectory Buffer", BufferUsage::Vertex),
        }
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertices.count()
    }
}

impl Renderable for TrajectoryRenderable {
    type Input<'a> = &'a [Vec3];

    fn label(&self) -> &'static str {
        LABEL
    }

    fn is_enabled(&self) -> bool {
        self.state.is_some()
    }

    fn upload(&mut self, renderer: &Renderer, path: Self::Input<'_>) {
        if self.state.is_none() {
            return;
        }
        self.vertices
            .upload(renderer.device(), renderer.queue(), &line_vertices(path));
    }

    fn prepare(&mut self, queue: &wgpu::Queue, camera: &FrameCamera) {
        let Some(state) = &self.state else {
            return;
        };
        let uniforms =
            CameraUniforms::from_matrices(camera.view, camera.proj, camera.viewport, 0.0);
        queue.write_buffer(&state.camera_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(state) = &self.state else {
            return;
        };
        // A strip needs two vertices before it has a segment.
        if self.vertices.count() < 2 {
            return;
        }
        pass.set_pipeline(&state.pipeline);
        pass.set_bind_group(0, &state.bind_group, &[]);
        if let Some(count) = self.vertices.bind(pass, 0) {
            pass.draw(0..count, 0..1);
        }
    }
}
