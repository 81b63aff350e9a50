//! Steering indicator: a wheel-like ring pinned to the lower right of the view.

use crate::Renderer;
use crate::builder::BufferUsage;
use crate::renderable::{FrameCamera, Renderable, RenderableError, enable_or_log};
use crate::shader::{ShaderLibrary, validated};
use crate::types::{CameraUniforms, ModelUniforms, RingVertex};
use glam::{Mat4, Vec3, Vec4};
use std::f32::consts::TAU;

const LABEL: &str = "SteeringIndicatorRenderable";

pub const RING_SEGMENTS: usize = 64;
pub const RING_OUTER_RADIUS: f32 = 0.5;
pub const RING_INNER_RADIUS: f32 = 0.35;
const RING_SCALE: f32 = 0.8;

/// Offset from the eye in camera space: right, up, forward.
pub const INDICATOR_OFFSET: Vec3 = Vec3::new(2.0, -1.2, 2.5);

pub const INDICATOR_COLOR: [f32; 4] = [0.85, 0.85, 0.85, 1.0];

/// Line-list geometry for the wheel, in its local XY plane.
///
/// Two concentric closed rings, one outer and one inner arc per segment. A
/// final spoke from the hub to 12 o'clock makes the rotation visible.
pub fn ring_geometry() -> Vec<RingVertex> {
    let point = |radius: f32, angle: f32| RingVertex {
        position: [radius * angle.cos(), radius * angle.sin()],
    };

    let mut vertices = Vec::with_capacity(RING_SEGMENTS * 4 + 2);
    for i in 0..RING_SEGMENTS {
        let t0 = TAU * i as f32 / RING_SEGMENTS as f32;
        let t1 = TAU * (i + 1) as f32 / RING_SEGMENTS as f32;
        vertices.extend([
            point(RING_OUTER_RADIUS, t0),
            point(RING_OUTER_RADIUS, t1),
            point(RING_INNER_RADIUS, t0),
            point(RING_INNER_RADIUS, t1),
        ]);
    }
    vertices.push(RingVertex { position: [0.0, 0.0] });
    vertices.push(RingVertex {
        position: [0.0, RING_INNER_RADIUS],
    });
    vertices
}

/// Model matrix that keeps the ring at [`INDICATOR_OFFSET`] in front of the
/// camera, facing it, turned by `heading` radians about the view axis.
pub fn indicator_model(camera: &FrameCamera, heading: f32) -> Mat4 {
    let center = camera.eye
        + camera.right * INDICATOR_OFFSET.x
        + camera.up * INDICATOR_OFFSET.y
        + camera.front * INDICATOR_OFFSET.z;
    let facing = Mat4::from_cols(
        camera.right.extend(0.0),
        camera.up.extend(0.0),
        (-camera.front).extend(0.0),
        Vec4::W,
    );
    Mat4::from_translation(center)
        * facing
        * Mat4::from_scale(Vec3::splat(RING_SCALE))
        * Mat4::from_rotation_z(heading)
}

struct IndicatorPipeline {
    pipeline: wgpu::RenderPipeline,
    camera_buffer: wgpu::Buffer,
    model_buffer: wgpu::Buffer,
    geometry: wgpu::Buffer,
    vertex_count: u32,
    bind_group: wgpu::BindGroup,
}

impl IndicatorPipeline {
    fn new(
        renderer: &Renderer,
        shaders: &ShaderLibrary,
        format: wgpu::TextureFormat,
    ) -> Result<Self, RenderableError> {
        let device = renderer.device();
        let module = shaders.compile(device, "indicator")?;

        let camera_buffer = renderer
            .create_buffer()
            .label("Indicator Camera Buffer")
            .size(std::mem::size_of::<CameraUniforms>() as u64)
            .usage(BufferUsage::Uniform)
            .build()?;
        let model_buffer = renderer
            .create_buffer()
            .label("Indicator Model Buffer")
            .size(std::mem::size_of::<ModelUniforms>() as u64)
            .usage(BufferUsage::Uniform)
            .build()?;
        let vertices = ring_geometry();
        let geometry = renderer
            .create_buffer()
            .label("Indicator Geometry")
            .with_pod_data(&vertices)
            .usage(BufferUsage::Vertex)
            .build()?;
        let (layout, bind_group) = renderer
            .create_bind_group()
            .label("Indicator Bind Group")
            .uniform(&camera_buffer)
            .uniform(&model_buffer)
            .build()?;

        let pipeline = validated(device, LABEL, || {
            renderer
                .create_render_pipeline()
                .with_label("Indicator Pipeline")
                .with_shader(&module)
                .with_bind_group_layout(&layout)
                .with_vertex_buffer(RingVertex::layout())
                .with_topology(wgpu::PrimitiveTopology::LineList)
                .with_depth(wgpu::CompareFunction::Always, false)
                .with_color_target(format)
                .build()
        })??;

        Ok(Self {
            pipeline,
            camera_buffer,
            model_buffer,
            geometry,
            vertex_count: vertices.len() as u32,
            bind_group,
        })
    }
}

/// Turns with the vehicle heading. Drawn last and never depth tested.
pub struct SteeringIndicatorRenderable {
    state: Option<IndicatorPipeline>,
    heading: f32,
}

impl SteeringIndicatorRenderable {
    pub fn new(renderer: &Renderer, shaders: &ShaderLibrary, format: wgpu::TextureFormat) -> Self {
        Self {
            state: enable_or_log(LABEL, IndicatorPipeline::new(renderer, shaders, format)),
            heading: 0.0,
        }
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }
}

impl Renderable for SteeringIndicatorRenderable {
    type Input<'a> = f32;

    fn label(&self) -> &'static str {
        LABEL
    }

    fn is_enabled(&self) -> bool {
        self.state.is_some()
    }

    fn upload(&mut self, _renderer: &Renderer, heading: Self::Input<'_>) {
        if self.state.is_some() {
            self.heading = heading;
        }
    }

    fn prepare(&mut self, queue: &wgpu::Queue, camera: &FrameCamera) {
        let Some(state) = &self.state else {
            return;
        };
        let uniforms =
            CameraUniforms::from_matrices(camera.view, camera.proj, camera.viewport, 0.0);
        let model = ModelUniforms::new(indicator_model(camera, self.heading), INDICATOR_COLOR);
        queue.write_buffer(&state.camera_buffer, 0, bytemuck::bytes_of(&uniforms));
        queue.write_buffer(&state.model_buffer, 0, bytemuck::bytes_of(&model));
    }

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(state) = &self.state else {
            return;
        };
        pass.set_pipeline(&state.pipeline);
        pass.set_bind_group(0, &state.bind_group, &[]);
        pass.set_vertex_buffer(0, state.geometry.slice(..));
        pass.draw(0..state.vertex_count, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn camera() -> FrameCamera {
        FrameCamera::look_to(
            Vec3::new(0.0, 5.0, 15.0),
            Vec3::NEG_Z,
            Vec3::Y,
            45.0,
            Vec2::new(1280.0, 720.0),
        )
    }

    #[test]
    fn test_ring_geometry_shape() {
        let vertices = ring_geometry();
        assert_eq!(vertices.len(), RING_SEGMENTS * 4 + 2);
        assert_eq!(vertices.len() % 2, 0);
        for v in &vertices[..RING_SEGMENTS * 4] {
            let r = Vec2::from(v.position).length();
            assert!(
                (r - RING_OUTER_RADIUS).abs() < 1e-5 || (r - RING_INNER_RADIUS).abs() < 1e-5
            );
        }
    }

    #[test]
    fn test_ring_segments_stay_on_one_ring() {
        // Every line of the rings joins two points of the same radius, so no
        // segment crosses between them.
        let vertices = ring_geometry();
        for pair in vertices[..RING_SEGMENTS * 4].chunks_exact(2) {
            let a = Vec2::from(pair[0].position).length();
            let b = Vec2::from(pair[1].position).length();
            assert!((a - b).abs() < 1e-5);
        }
        let spoke = &vertices[RING_SEGMENTS * 4..];
        assert_eq!(spoke[0].position, [0.0, 0.0]);
        assert_eq!(spoke[1].position, [0.0, RING_INNER_RADIUS]);
    }

    #[test]
    fn test_model_sits_at_camera_offset() {
        let camera = camera();
        let model = indicator_model(&camera, 0.7);
        let center = model.transform_point3(Vec3::ZERO);
        assert!(center.abs_diff_eq(Vec3::new(2.0, 3.8, 12.5), 1e-5));

        let in_view = camera.view.transform_point3(center);
        assert!(in_view.abs_diff_eq(Vec3::new(2.0, -1.2, -2.5), 1e-5));
    }

    #[test]
    fn test_heading_rotates_about_view_axis() {
        let camera = camera();
        let spoke = Vec3::new(0.0, RING_INNER_RADIUS, 0.0);
        let straight = indicator_model(&camera, 0.0).transform_vector3(spoke);
        let turned = indicator_model(&camera, std::f32::consts::FRAC_PI_2).transform_vector3(spoke);

        assert!(straight.abs_diff_eq(camera.up * RING_INNER_RADIUS * RING_SCALE, 1e-5));
        assert!(turned.abs_diff_eq(-camera.right * RING_INNER_RADIUS * RING_SCALE, 1e-5));
        assert!(turned.dot(camera.front).abs() < 1e-5);
    }
}
