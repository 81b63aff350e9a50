//! Camera image overlay.

use crate::Renderer;
use crate::builder::BufferUsage;
use crate::renderable::{FrameCamera, Renderable, RenderableError, enable_or_log};
use crate::shader::{ShaderLibrary, validated};
use crate::types::{CameraUniforms, QuadVertex, rgba_pixels};
use glam::{Mat4, Vec2};
use lidarview_data::FrameImage;
use tracing::{debug, warn};

const LABEL: &str = "ImageRenderable";
const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

/// Band across the top of the screen in NDC, two triangles.
pub const IMAGE_QUAD: [QuadVertex; 6] = [
    QuadVertex {
        position: [-1.0, 1.0],
        uv: [0.0, 0.0],
    },
    QuadVertex {
        position: [-1.0, 0.45],
        uv: [0.0, 1.0],
    },
    QuadVertex {
        position: [1.0, 0.45],
        uv: [1.0, 1.0],
    },
    QuadVertex {
        position: [-1.0, 1.0],
        uv: [0.0, 0.0],
    },
    QuadVertex {
        position: [1.0, 0.45],
        uv: [1.0, 1.0],
    },
    QuadVertex {
        position: [1.0, 1.0],
        uv: [1.0, 0.0],
    },
];

struct ImageTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl ImageTexture {
    fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Image Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            texture,
            view,
            width,
            height,
        }
    }

    fn write(&self, queue: &wgpu::Queue, rgba: &[u8]) {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * self.width),
                rows_per_image: Some(self.height),
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
    }
}

struct ImagePipeline {
    pipeline: wgpu::RenderPipeline,
    layout: wgpu::BindGroupLayout,
    camera_buffer: wgpu::Buffer,
    sampler: wgpu::Sampler,
    quad: wgpu::Buffer,
    texture: ImageTexture,
    bind_group: wgpu::BindGroup,
}

impl ImagePipeline {
    fn new(
        renderer: &Renderer,
        shaders: &ShaderLibrary,
        format: wgpu::TextureFormat,
    ) -> Result<Self, RenderableError> {
        let device = renderer.device();
        let module = shaders.compile(device, "image")?;

        // The overlay lives in screen space: identity view and projection.
        let identity = CameraUniforms::from_matrices(Mat4::IDENTITY, Mat4::IDENTITY, Vec2::ONE, 0.0);
        let camera_buffer = renderer
            .create_buffer()
            .label("Image Camera Buffer")
            .with_pod_data(std::slice::from_ref(&identity))
            .usage(BufferUsage::Uniform)
            .build()?;
        let quad = renderer
            .create_buffer()
            .label("Image Quad")
            .with_pod_data(&IMAGE_QUAD)
            .usage(BufferUsage::Vertex)
            .build()?;
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("Image Sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let texture = ImageTexture::new(device, 1, 1);
        texture.write(renderer.queue(), &[u8::MAX; 4]);

        let (layout, bind_group) = renderer
            .create_bind_group()
            .label("Image Bind Group")
            .uniform(&camera_buffer)
            .texture(&texture.view)
            .sampler(&sampler)
            .build()?;

        let pipeline = validated(device, LABEL, || {
            renderer
                .create_render_pipeline()
                .with_label("Image Pipeline")
                .with_shader(&module)
                .with_bind_group_layout(&layout)
                .with_vertex_buffer(QuadVertex::layout())
                .with_depth(wgpu::CompareFunction::Always, false)
                .with_color_target(format)
                .build()
        })??;

        Ok(Self {
            pipeline,
            layout,
            camera_buffer,
            sampler,
            quad,
            texture,
            bind_group,
        })
    }

    fn replace_texture(
        &mut self,
        renderer: &Renderer,
        width: u32,
        height: u32,
    ) -> Result<(), RenderableError> {
        let texture = ImageTexture::new(renderer.device(), width, height);
        let bind_group = renderer
            .create_bind_group()
            .label("Image Bind Group")
            .uniform(&self.camera_buffer)
            .texture(&texture.view)
            .sampler(&self.sampler)
            .build_for(&self.layout)?;
        self.texture = texture;
        self.bind_group = bind_group;
        Ok(())
    }
}

/// Shows the most recent camera image in a fixed band at the top of the view.
///
/// Until an image arrives a white 1x1 placeholder is shown.
pub struct ImageRenderable {
    state: Option<ImagePipeline>,
    texture_reallocations: usize,
}

impl ImageRenderable {
    pub fn new(renderer: &Renderer, shaders: &ShaderLibrary, format: wgpu::TextureFormat) -> Self {
        Self {
            state: enable_or_log(LABEL, ImagePipeline::new(renderer, shaders, format)),
            texture_reallocations: 0,
        }
    }

    /// Size of the texture currently bound.
    pub fn texture_size(&self) -> Option<(u32, u32)> {
        self.state
            .as_ref()
            .map(|s| (s.texture.width, s.texture.height))
    }

    pub fn texture_reallocations(&self) -> usize {
        self.texture_reallocations
    }
}

impl Renderable for ImageRenderable {
    type Input<'a> = &'a FrameImage;

    fn label(&self) -> &'static str {
        LABEL
    }

    fn is_enabled(&self) -> bool {
        self.state.is_some()
    }

    fn upload(&mut self, renderer: &Renderer, image: Self::Input<'_>) {
        let Some(state) = &mut self.state else {
            return;
        };
        let limit = renderer.device().limits().max_texture_dimension_2d;
        if image.width > limit || image.height > limit {
            warn!(
                "Ignoring {}x{} image, larger than the {limit} texel texture limit",
                image.width, image.height
            );
            return;
        }
        let Some(rgba) = rgba_pixels(image) else {
            warn!(
                "Ignoring {}x{} image with {} bytes",
                image.width,
                image.height,
                image.pixels.len()
            );
            return;
        };

        if (state.texture.width, state.texture.height) != (image.width, image.height) {
            if let Err(err) = state.replace_texture(renderer, image.width, image.height) {
                warn!("{LABEL}: {err}");
                return;
            }
            self.texture_reallocations += 1;
            debug!("Image texture resized to {}x{}", image.width, image.height);
        }
        state.texture.write(renderer.queue(), &rgba);
    }

    fn prepare(&mut self, _queue: &wgpu::Queue, _camera: &FrameCamera) {}

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        let Some(state) = &self.state else {
            return;
        };
        pass.set_pipeline(&state.pipeline);
        pass.set_bind_group(0, &state.bind_group, &[]);
        pass.set_vertex_buffer(0, state.quad.slice(..));
        pass.draw(0..IMAGE_QUAD.len() as u32, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::try_renderer;

    #[test]
    fn test_quad_covers_top_band() {
        for vertex in IMAGE_QUAD {
            assert!(vertex.position[1] > 0.0);
            assert!((0.0..=1.0).contains(&vertex.uv[0]));
        }
        let top = IMAGE_QUAD.iter().find(|v| v.position == [-1.0, 1.0]).unwrap();
        assert_eq!(top.uv, [0.0, 0.0]);
    }

    #[test]
    fn test_texture_reallocated_only_on_size_change() {
        let Some(renderer) = try_renderer() else {
            return;
        };
        let mut overlay = ImageRenderable::new(
            &renderer,
            &ShaderLibrary::embedded(),
            wgpu::TextureFormat::Rgba8UnormSrgb,
        );
        assert_eq!(overlay.texture_size(), Some((1, 1)));

        let a = FrameImage::new(4, 2, vec![10; 24]);
        let b = FrameImage::new(4, 2, vec![20; 24]);
        let c = FrameImage::new(2, 2, vec![30; 12]);
        overlay.upload(&renderer, &a);
        overlay.upload(&renderer, &b);
        assert_eq!(overlay.texture_reallocations(), 1);
        overlay.upload(&renderer, &c);
        assert_eq!(overlay.texture_reallocations(), 2);
        assert_eq!(overlay.texture_size(), Some((2, 2)));

        overlay.upload(&renderer, &FrameImage::new(3, 3, vec![0; 5]));
        assert_eq!(overlay.texture_size(), Some((2, 2)));
    }

    #[test]
    fn test_image_over_texture_limit_keeps_previous() {
        let Some(renderer) = try_renderer() else {
            return;
        };
        let mut overlay = ImageRenderable::new(
            &renderer,
            &ShaderLibrary::embedded(),
            wgpu::TextureFormat::Rgba8UnormSrgb,
        );
        overlay.upload(&renderer, &FrameImage::new(4, 2, vec![10; 24]));

        let wide = renderer.device().limits().max_texture_dimension_2d + 1;
        let oversized = FrameImage::new(wide, 1, vec![0; wide as usize * 3]);
        overlay.upload(&renderer, &oversized);
        assert_eq!(overlay.texture_size(), Some((4, 2)));
        assert_eq!(overlay.texture_reallocations(), 1);

        let tall = FrameImage::new(1, wide, vec![0; wide as usize * 3]);
        overlay.upload(&renderer, &tall);
        assert_eq!(overlay.texture_size(), Some((4, 2)));
    }
}
