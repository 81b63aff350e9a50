//! The capability shared by everything drawn in a frame.

use crate::Renderer;
use crate::builder::{BindGroupBuildError, BufferBuildError};
use crate::pipeline::PipelineBuildError;
use glam::{Mat4, Vec2, Vec3};
use std::path::PathBuf;
use tracing::{error, info};

/// Errors raised while a renderable sets up its GPU resources.
///
/// These never escape the renderable: it logs them and disables itself.
#[derive(Debug, thiserror::Error)]
pub enum RenderableError {
    #[error("shader file {path} is unavailable: {source}")]
    ShaderUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("no embedded shader named {0}")]
    UnknownShader(String),
    #[error("{label} failed validation: {message}")]
    Validation { label: String, message: String },
    #[error(transparent)]
    Buffer(#[from] BufferBuildError),
    #[error(transparent)]
    BindGroup(#[from] BindGroupBuildError),
    #[error(transparent)]
    Pipeline(#[from] PipelineBuildError),
}

pub const NEAR_PLANE: f32 = 0.1;
pub const FAR_PLANE: f32 = 500.0;

/// View state shared by every scene-space renderable for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameCamera {
    pub view: Mat4,
    pub proj: Mat4,
    pub eye: Vec3,
    pub front: Vec3,
    pub right: Vec3,
    pub up: Vec3,
    /// Target size in pixels.
    pub viewport: Vec2,
}

impl FrameCamera {
    /// Camera at `eye` looking along `front`, with a right-handed perspective.
    pub fn look_to(eye: Vec3, front: Vec3, world_up: Vec3, fov_y_deg: f32, viewport: Vec2) -> Self {
        let front = front.normalize();
        let right = front.cross(world_up).normalize();
        let up = right.cross(front).normalize();
        let aspect = viewport.x.max(1.0) / viewport.y.max(1.0);
        Self {
            view: Mat4::look_to_rh(eye, front, up),
            proj: Mat4::perspective_rh(fov_y_deg.to_radians(), aspect, NEAR_PLANE, FAR_PLANE),
            eye,
            front,
            right,
            up,
            viewport,
        }
    }
}

/// Something the compositor can upload to and draw.
///
/// A renderable owns all of its GPU resources. If setup fails it stays alive
/// but disabled, and `upload`, `prepare` and `draw` do nothing.
pub trait Renderable {
    /// Per-frame data this renderable consumes.
    type Input<'a>;

    fn label(&self) -> &'static str;

    fn is_enabled(&self) -> bool;

    fn upload(&mut self, renderer: &Renderer, input: Self::Input<'_>);

    /// Write camera-dependent uniforms before the pass begins.
    fn prepare(&mut self, queue: &wgpu::Queue, camera: &FrameCamera);

    fn draw(&self, pass: &mut wgpu::RenderPass<'_>);
}

/// Turn a setup result into the enabled/disabled state of a renderable.
pub(crate) fn enable_or_log<T>(label: &str, result: Result<T, RenderableError>) -> Option<T> {
    match result {
        Ok(state) => {
            info!("{label} initialized");
            Some(state)
        }
        Err(err) => {
            error!("{label} disabled: {err}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_look_to_builds_orthonormal_basis() {
        let camera = FrameCamera::look_to(
            Vec3::new(0.0, 5.0, 15.0),
            Vec3::new(0.0, -5.0, -15.0),
            Vec3::Y,
            45.0,
            Vec2::new(1280.0, 720.0),
        );
        assert!(camera.front.is_normalized());
        assert!(camera.right.dot(camera.front).abs() < 1e-6);
        assert!(camera.up.dot(camera.front).abs() < 1e-6);
        assert!(camera.right.x > 0.99);

        let origin = camera.proj * camera.view * glam::Vec4::new(0.0, 0.0, 0.0, 1.0);
        let ndc = origin.truncate() / origin.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..1.0).contains(&ndc.z));
    }
}
