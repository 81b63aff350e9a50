use crate::camera::{FlyCamera, MOVE_SPEED};
use crate::config::ViewerConfig;
use crate::controls::{Controls, Intent};
use glam::Vec2;
use lidarview_data::{DataError, FrameData, FrameSession, Navigation, PointCloud};
use lidarview_gpu::{FrameCompositor, Renderer, RendererError, ShaderLibrary, SurfaceWrapper};
use std::sync::Arc;
use tracing::{debug, error, info};
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowId};

#[derive(Debug, thiserror::Error)]
pub enum ViewerError {
    #[error("Failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("Failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("Failed to initialize renderer: {0}")]
    Renderer(#[from] RendererError),
    #[error(transparent)]
    Data(#[from] DataError),
}

/// Open a window and show `session` until the user quits.
pub fn run(config: ViewerConfig, session: FrameSession) -> Result<(), ViewerError> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, session);
    let run_result = event_loop.run_app(&mut app);
    let app_result = app.finish();
    run_result?;
    app_result
}

struct App {
    config: ViewerConfig,
    session: Option<FrameSession>,
    state: Option<ViewerState>,
    error: Option<ViewerError>,
}

impl App {
    fn new(config: ViewerConfig, session: FrameSession) -> Self {
        Self {
            config,
            session: Some(session),
            state: None,
            error: None,
        }
    }

    fn finish(self) -> Result<(), ViewerError> {
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() || self.error.is_some() {
            return;
        }
        let Some(session) = self.session.take() else {
            return;
        };

        match ViewerState::new(event_loop, &self.config, session) {
            Ok(state) => self.state = Some(state),
            Err(err) => {
                error!("Failed to initialize viewer: {err}");
                self.error = Some(err);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Some(state) = self.state.as_mut() else {
            return;
        };
        if state.window.id() != window_id {
            return;
        }

        state.controls.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::Resized(size) => state.resize(size),
            WindowEvent::RedrawRequested => {
                let _frame_span = tracing::info_span!("frame").entered();
                if !state.update() {
                    event_loop.exit();
                    return;
                }
                match state.render() {
                    Ok(()) => {}
                    Err(lidarview_gpu::wgpu::SurfaceError::Lost | lidarview_gpu::wgpu::SurfaceError::Outdated) => {
                        state.surface.reconfigure(state.renderer.device());
                    }
                    Err(lidarview_gpu::wgpu::SurfaceError::OutOfMemory) => {
                        error!("GPU Out of Memory - exiting");
                        event_loop.exit();
                    }
                    Err(e) => error!("Render error: {:?}", e),
                }
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = self.state.as_ref() {
            state.window.request_redraw();
        }
    }
}

struct ViewerState {
    window: Arc<Window>,
    renderer: Renderer,
    surface: SurfaceWrapper,
    compositor: FrameCompositor,
    session: FrameSession,
    camera: FlyCamera,
    controls: Controls,
}

impl ViewerState {
    fn new(
        event_loop: &ActiveEventLoop,
        config: &ViewerConfig,
        mut session: FrameSession,
    ) -> Result<Self, ViewerError> {
        let window_attributes = Window::default_attributes()
            .with_title(config.title.as_str())
            .with_inner_size(PhysicalSize::new(config.width, config.height));
        let window = Arc::new(event_loop.create_window(window_attributes)?);

        let size = window.inner_size();
        let (renderer, surface) = pollster::block_on(Renderer::new_with_surface(
            window.clone(),
            size.width.max(1),
            size.height.max(1),
        ))?;

        let shaders = match &config.shader_dir {
            Some(dir) => ShaderLibrary::from_dir(dir),
            None => ShaderLibrary::embedded(),
        };
        let mut compositor = FrameCompositor::new(
            &renderer,
            &shaders,
            surface.format(),
            config.point_size,
            surface.width(),
            surface.height(),
        );

        let frame = session.start();
        info!("Frame {}: {}", frame.index, cloud_extent(&frame.points));
        compositor.upload_frame(&renderer, &frame, session.trajectory().path());

        Ok(Self {
            window,
            renderer,
            surface,
            compositor,
            session,
            camera: FlyCamera::default(),
            controls: Controls::new(),
        })
    }

    fn resize(&mut self, size: PhysicalSize<u32>) {
        if self
            .surface
            .resize(self.renderer.device(), size.width, size.height)
        {
            self.compositor
                .resize(self.renderer.device(), size.width, size.height);
        }
    }

    /// Apply this tick's intents. Returns `false` when the viewer should exit.
    fn update(&mut self) -> bool {
        let mut resolved: Option<FrameData> = None;
        for intent in self.controls.take_intents() {
            match intent {
                Intent::Move(direction) => self.camera.translate(direction, MOVE_SPEED),
                Intent::Look { dx, dy } => self.camera.look(dx, dy),
                Intent::Zoom(amount) => self.camera.zoom_by(amount),
                Intent::NextFrame => {
                    resolved = self.session.apply(Navigation::Next).or(resolved);
                }
                Intent::PrevFrame => {
                    resolved = self.session.apply(Navigation::Prev).or(resolved);
                }
                Intent::Reload => resolved = Some(self.session.reload()),
                Intent::Exit => {
                    info!("Exit requested");
                    return false;
                }
            }
        }

        if let Some(frame) = resolved {
            debug!(
                frame = frame.index,
                total = self.session.cursor().total(),
                position = ?self.session.trajectory().last_point(),
                "Showing frame"
            );
            self.compositor
                .upload_frame(&self.renderer, &frame, self.session.trajectory().path());
        }
        true
    }

    fn render(&mut self) -> Result<(), lidarview_gpu::wgpu::SurfaceError> {
        let viewport = Vec2::new(self.surface.width() as f32, self.surface.height() as f32);
        let camera = self.camera.frame_camera(viewport);

        let surface_texture = self.surface.get_current_texture()?;
        let surface_view = surface_texture
            .texture
            .create_view(&lidarview_gpu::wgpu::TextureViewDescriptor::default());

        self.compositor
            .render(&self.renderer, &surface_view, &camera);
        surface_texture.present();
        Ok(())
    }
}

/// Where a sweep lies, for the startup log.
fn cloud_extent(cloud: &PointCloud) -> String {
    match cloud.bounds() {
        Some((min, max)) => format!(
            "{} points around {} within {min}..{max}",
            cloud.len(),
            cloud.centroid()
        ),
        None => "no points".to_string(),
    }
}
