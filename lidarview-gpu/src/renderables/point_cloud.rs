//! LiDAR point cloud renderable.

use crate::Renderer;
use crate::buffer::GrowableBuffer;
use crate::builder::BufferUsage;
use crate::renderable::{FrameCamera, Renderable, RenderableError, enable_or_log};
use crate::shader::{ShaderLibrary, validated};
use crate::types::{CameraUniforms, PointVertex, point_vertices};
use lidarview_data::PointCloud;
use tracing::debug;

const LABEL: &str = "PointCloudRenderable";

/// Corners of the billboard quad drawn per point.
const QUAD_VERTICES: u32 = 6;

struct PointPipeline {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

impl PointPipeline {
    fn new(
        renderer: &Renderer,
        shaders: &ShaderLibrary,
        format: wgpu::TextureFormat,
    ) -> Result<Self, RenderableError> {
        let device = renderer.device();
        let module = shaders.compile(device, "points")?;

        let camera_buffer = renderer
            .create_buffer()
            .label("Point Camera Buffer")
            .size(std::mem::size_of::<CameraUniforms>() as u64)
            .usage(BufferUsage::Uniform)
            .build()?;
        let (layout, bind_group) = renderer
            .create_bind_group()
            .label("Point Bind Group")
            .uniform(&camera_buffer)
            .build()?;

        let pipeline = validated(device, LABEL, || {
            renderer
                .create_render_pipeline()
                .with_label("Point Pipeline")
                .with_shader(&module)
                .with_bind_group_layout(&layout)
                .with_vertex_buffer(PointVertex::layout())
                .with_color_target(format)
                .build()
        })??;

        Ok(Self {
            pipeline,
            camera_buffer,
            bind_group,
        })
    }
}

/// Draws the current sweep as fixed-size screen-facing points.
pub struct PointCloudRenderable {
    state: Option<PointPipeline>,
    points: GrowableBuffer,
    point_size: f32,
}

impl PointCloudRenderable {
    pub fn new(
        renderer: &Renderer,
        shaders: &ShaderLibrary,
        format: wgpu::TextureFormat,
        point_size: f32,
    ) -> Self {
        Self {
            state: enable_or_log(LABEL, PointPipeline::new(renderer, shaders, format)),
            points: GrowableBuffer::new("Point Buffer", BufferUsage::Vertex),
            point_size,
        }
    }

    pub fn point_count(&self) -> u32 {
        self.points.count()
    }

    pub fn buffer(&self) -> &GrowableBuffer {
        &self.points
    }
}

impl Renderable for PointCloudRenderable {
    type Input<'a> = &'a PointCloud;

    fn label(&self) -> &'static str {
        LABEL
    }

    fn is_enabled(&self) -> bool {
        self.state.is_some()
    }

    fn upload(&mut self, renderer: &Renderer, cloud: Self::Input<'_>) {
        if self.state.is_none() {
            return;
        }
        let vertices = point_vertices(cloud);
        let plan = self
            .points
            .upload(renderer.device(), renderer.queue(), &vertices);
        debug!(points = vertices.len(), ?plan, "Uploaded point cloud");
    }

    fn prepare(&mut self, queue: &wgpu::Queue, camera: &FrameCamera) {
        let Some(state) = &self.state else {
            return;
        };
        let uniforms =
            CameraUniforms::from_matrices(camera.view, camera.proj, camera.viewport, self.point_size);
        queue.write_buffer(&state.camera_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(state) = &self.state else {
            return;
        };
        pass.set_pipeline(&state.pipeline);
        pass.set_bind_group(0, &state.bind_group, &[]);
        if let Some(count) = self.points.bind(pass, 0) {
            pass.draw(0..QUAD_VERTICES, 0..count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::try_renderer;
    use lidarview_data::Point;

    const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

    fn cloud(len: usize) -> PointCloud {
        (0..len)
            .map(|i| Point::new(i as f32, 0.0, 0.0, 0.5))
            .collect::<Vec<_>>()
            .into()
    }

    #[test]
    fn test_upload_grows_only_for_new_maxima() {
        let Some(renderer) = try_renderer() else {
            return;
        };
        let mut points =
            PointCloudRenderable::new(&renderer, &ShaderLibrary::embedded(), FORMAT, 2.0);
        assert!(points.is_enabled());

        for len in [3, 0, 100, 50, 100] {
            points.upload(&renderer, &cloud(len));
            assert_eq!(points.point_count(), len as u32);
        }
        assert_eq!(points.buffer().reallocations(), 2);
        assert_eq!(points.buffer().capacity(), 1600);
    }

    #[test]
    fn test_missing_shader_disables() {
        let Some(renderer) = try_renderer() else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let mut points =
            PointCloudRenderable::new(&renderer, &ShaderLibrary::from_dir(dir.path()), FORMAT, 2.0);
        assert!(!points.is_enabled());

        points.upload(&renderer, &cloud(10));
        assert_eq!(points.point_count(), 0);
    }

    #[test]
    fn test_invalid_shader_disables() {
        let Some(renderer) = try_renderer() else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("points.wgsl"), "@vertex fn vs_main( {").unwrap();
        let points =
            PointCloudRenderable::new(&renderer, &ShaderLibrary::from_dir(dir.path()), FORMAT, 2.0);
        assert!(!points.is_enabled());
    }
}
