//! Lidarview GPU Crate
//!
//! wgpu context, resource builders and the renderables that draw one frame of
//! a recording sequence.

pub mod buffer;
pub mod builder;
pub mod compositor;
pub mod pipeline;
pub mod renderable;
pub mod renderables;
pub mod shader;
pub mod shaders;
pub mod surface;
pub mod types;

pub use buffer::{GrowableBuffer, UploadPlan, plan_upload};
pub use builder::{BindGroupBuilder, BufferBuilder, BufferUsage};
pub use compositor::{CLEAR_COLOR, FrameCompositor};
pub use pipeline::{DEPTH_FORMAT, RenderPipelineBuilder};
pub use renderable::{FrameCamera, Renderable, RenderableError};
pub use renderables::{
    ImageRenderable, PointCloudRenderable, SteeringIndicatorRenderable, TrajectoryRenderable,
};
pub use shader::ShaderLibrary;
pub use surface::SurfaceWrapper;
pub use types::CameraUniforms;

pub use wgpu;

use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum RendererError {
    #[error("Request Adapter Error: {0}")]
    RequestAdapterError(#[from] wgpu::RequestAdapterError),
    #[error("Request Device Error: {0}")]
    RequestDeviceError(#[from] wgpu::RequestDeviceError),
    #[error("Surface Error: {0}")]
    RequestSurfaceError(#[from] wgpu::SurfaceError),
    #[error("Create surface error: {0}")]
    CreateSurfaceError(#[from] wgpu::CreateSurfaceError),
    #[error("Surface is not supported by the selected adapter")]
    UnsupportedSurface,
}

/// Device and queue shared by every renderable.
pub struct Renderer {
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl Renderer {
    /// Headless renderer with no presentation surface.
    pub async fn new() -> Result<Self, RendererError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::from_env_or_default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions::default())
            .await?;
        Self::from_adapter(&adapter).await
    }

    /// Renderer plus a configured surface for `target`.
    pub async fn new_with_surface(
        target: impl Into<wgpu::SurfaceTarget<'static>>,
        width: u32,
        height: u32,
    ) -> Result<(Self, SurfaceWrapper), RendererError> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::from_env_or_default());
        let surface = instance.create_surface(target)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await?;
        let renderer = Self::from_adapter(&adapter).await?;

        let surface = SurfaceWrapper::configure(surface, &adapter, &renderer.device, width, height)?;
        Ok((renderer, surface))
    }

    async fn from_adapter(adapter: &wgpu::Adapter) -> Result<Self, RendererError> {
        let adapter_info = adapter.get_info();
        info!("Using adapter {} ({:?})", adapter_info.name, adapter_info.backend);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Renderer"),
                ..Default::default()
            })
            .await?;
        Ok(Self { device, queue })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn create_buffer(&self) -> BufferBuilder<'_> {
        BufferBuilder::new(&self.device)
    }

    pub fn create_bind_group(&self) -> BindGroupBuilder<'_> {
        BindGroupBuilder::new(&self.device)
    }

    pub fn create_render_pipeline(&self) -> RenderPipelineBuilder<'_> {
        RenderPipelineBuilder::new(&self.device)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::Renderer;
    use pollster::FutureExt;

    /// Headless renderer, or `None` on machines without a usable adapter.
    pub fn try_renderer() -> Option<Renderer> {
        match Renderer::new().block_on() {
            Ok(renderer) => Some(renderer),
            Err(err) => {
                eprintln!("skipping GPU test: {err}");
                None
            }
        }
    }
}
