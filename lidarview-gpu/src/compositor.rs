//! Per-frame upload and draw ordering.

use crate::Renderer;
use crate::pipeline::DEPTH_FORMAT;
use crate::renderable::{FrameCamera, Renderable};
use crate::renderables::{
    ImageRenderable, PointCloudRenderable, SteeringIndicatorRenderable, TrajectoryRenderable,
};
use crate::shader::ShaderLibrary;
use glam::Vec3;
use lidarview_data::FrameData;
use tracing::{debug, info, warn};

pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.05,
    g: 0.05,
    b: 0.07,
    a: 1.0,
};

struct DepthTarget {
    _texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: (u32, u32),
}

impl DepthTarget {
    fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            _texture: texture,
            view,
            size: (width, height),
        }
    }
}

/// Owns the four renderables and draws them in a fixed order:
/// points, image overlay, trajectory, steering indicator.
pub struct FrameCompositor {
    points: PointCloudRenderable,
    image: ImageRenderable,
    trajectory: TrajectoryRenderable,
    indicator: SteeringIndicatorRenderable,
    depth: DepthTarget,
}

impl FrameCompositor {
    pub fn new(
        renderer: &Renderer,
        shaders: &ShaderLibrary,
        format: wgpu::TextureFormat,
        point_size: f32,
        width: u32,
        height: u32,
    ) -> Self {
        let compositor = Self {
            points: PointCloudRenderable::new(renderer, shaders, format, point_size),
            image: ImageRenderable::new(renderer, shaders, format),
            trajectory: TrajectoryRenderable::new(renderer, shaders, format),
            indicator: SteeringIndicatorRenderable::new(renderer, shaders, format),
            depth: DepthTarget::new(renderer.device(), width, height),
        };
        let states = compositor.renderable_states();
        for (label, _) in states.iter().filter(|(_, enabled)| !enabled) {
            warn!("{label} is disabled and will not be drawn");
        }
        info!(
            "Compositor ready ({} of {} renderables enabled)",
            states.iter().filter(|(_, enabled)| *enabled).count(),
            states.len()
        );
        compositor
    }

    /// Label and enabled flag of each renderable, in draw order.
    pub fn renderable_states(&self) -> [(&'static str, bool); 4] {
        [
            (self.points.label(), self.points.is_enabled()),
            (self.image.label(), self.image.is_enabled()),
            (self.trajectory.label(), self.trajectory.is_enabled()),
            (self.indicator.label(), self.indicator.is_enabled()),
        ]
    }

    /// Sizes beyond the device texture limit keep the current depth target.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let limit = device.limits().max_texture_dimension_2d;
        if width > limit || height > limit {
            warn!("Ignoring {width}x{height} resize, larger than the {limit} texel texture limit");
            return;
        }
        if self.depth.size != (width.max(1), height.max(1)) {
            self.depth = DepthTarget::new(device, width, height);
        }
    }

    /// Push a newly resolved frame and the path recorded so far to the GPU.
    ///
    /// A frame without an image keeps showing the previous one.
    #[tracing::instrument(skip_all, fields(frame = frame.index))]
    pub fn upload_frame(&mut self, renderer: &Renderer, frame: &FrameData, path: &[Vec3]) {
        self.points.upload(renderer, &frame.points);
        if let Some(image) = &frame.image {
            self.image.upload(renderer, image);
        }
        self.trajectory.upload(renderer, path);
        self.indicator.upload(renderer, frame.heading);
        debug!(
            points = self.points.point_count(),
            path = path.len(),
            heading = frame.heading,
            "Frame uploaded"
        );
    }

    /// Clear `target` and draw every renderable with one shared camera.
    pub fn render(&mut self, renderer: &Renderer, target: &wgpu::TextureView, camera: &FrameCamera) {
        let queue = renderer.queue();
        self.points.prepare(queue, camera);
        self.image.prepare(queue, camera);
        self.trajectory.prepare(queue, camera);
        self.indicator.prepare(queue, camera);

        let mut encoder = renderer
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            self.points.draw(&mut pass);
            self.image.draw(&mut pass);
            self.trajectory.draw(&mut pass);
            self.indicator.draw(&mut pass);
        }
        queue.submit(Some(encoder.finish()));
    }

    pub fn points(&self) -> &PointCloudRenderable {
        &self.points
    }

    pub fn image(&self) -> &ImageRenderable {
        &self.image
    }

    pub fn trajectory(&self) -> &TrajectoryRenderable {
        &self.trajectory
    }

    pub fn indicator(&self) -> &SteeringIndicatorRenderable {
        &self.indicator
    }
}
