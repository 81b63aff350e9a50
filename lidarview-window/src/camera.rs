use glam::{Vec2, Vec3};
use lidarview_gpu::FrameCamera;

/// Degrees of rotation per pixel of mouse travel.
pub const LOOK_SENSITIVITY: f32 = 0.1;
/// World units moved per tick while a movement key is held.
pub const MOVE_SPEED: f32 = 0.3;
pub const DEFAULT_ZOOM: f32 = 45.0;
pub const MIN_ZOOM: f32 = 10.0;
pub const MAX_ZOOM: f32 = 90.0;
pub const PITCH_LIMIT: f32 = 89.0;

pub const INITIAL_POSITION: Vec3 = Vec3::new(0.0, 5.0, 15.0);
pub const INITIAL_TARGET: Vec3 = Vec3::ZERO;

/// Direction of a fly-camera move, relative to where the camera looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Forward,
    Back,
    Left,
    Right,
    Down,
    Up,
}

/// Free-flying camera driven by yaw/pitch in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlyCamera {
    position: Vec3,
    yaw: f32,
    pitch: f32,
    /// Vertical field of view in degrees.
    zoom: f32,
    front: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Default for FlyCamera {
    fn default() -> Self {
        Self::new(INITIAL_POSITION, INITIAL_TARGET)
    }
}

impl FlyCamera {
    /// Camera at `position` facing `target`.
    pub fn new(position: Vec3, target: Vec3) -> Self {
        let forward = (target - position).normalize_or(Vec3::NEG_Z);
        let yaw = forward.z.atan2(forward.x).to_degrees();
        let pitch = forward
            .y
            .clamp(-1.0, 1.0)
            .asin()
            .to_degrees()
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        let mut camera = Self {
            position,
            yaw,
            pitch,
            zoom: DEFAULT_ZOOM,
            front: forward,
            right: Vec3::X,
            up: Vec3::Y,
        };
        camera.update_vectors();
        camera
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn front(&self) -> Vec3 {
        self.front
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn translate(&mut self, direction: Direction, distance: f32) {
        let offset = match direction {
            Direction::Forward => self.front,
            Direction::Back => -self.front,
            Direction::Right => self.right,
            Direction::Left => -self.right,
            Direction::Up => self.up,
            Direction::Down => -self.up,
        };
        self.position += offset * distance;
    }

    /// Rotate by a mouse offset in pixels; positive `dy` looks up.
    pub fn look(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * LOOK_SENSITIVITY;
        self.pitch = (self.pitch + dy * LOOK_SENSITIVITY).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.update_vectors();
    }

    /// Narrow the field of view for positive `amount`.
    pub fn zoom_by(&mut self, amount: f32) {
        self.zoom = (self.zoom - amount).clamp(MIN_ZOOM, MAX_ZOOM);
    }

    /// View and projection for a target of `viewport` pixels.
    pub fn frame_camera(&self, viewport: Vec2) -> FrameCamera {
        FrameCamera::look_to(self.position, self.front, Vec3::Y, self.zoom, viewport)
    }

    fn update_vectors(&mut self) {
        let (yaw, pitch) = (self.yaw.to_radians(), self.pitch.to_radians());
        self.front = Vec3::new(yaw.cos() * pitch.cos(), pitch.sin(), yaw.sin() * pitch.cos())
            .normalize();
        self.right = self.front.cross(Vec3::Y).normalize();
        self.up = self.right.cross(self.front).normalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_looks_at_origin() {
        let camera = FlyCamera::default();
        assert_eq!(camera.position(), INITIAL_POSITION);
        assert!((camera.yaw() + 90.0).abs() < 1e-4);
        assert!(camera.pitch() < 0.0);

        let to_origin = (INITIAL_TARGET - INITIAL_POSITION).normalize();
        assert!(camera.front().abs_diff_eq(to_origin, 1e-5));
        assert!(camera.right().abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn test_pitch_clamped() {
        let mut camera = FlyCamera::default();
        camera.look(0.0, 10_000.0);
        assert_eq!(camera.pitch(), PITCH_LIMIT);
        camera.look(0.0, -100_000.0);
        assert_eq!(camera.pitch(), -PITCH_LIMIT);
        assert!(camera.front().is_finite());
    }

    #[test]
    fn test_zoom_clamped() {
        let mut camera = FlyCamera::default();
        camera.zoom_by(5.0);
        assert_eq!(camera.zoom(), 40.0);
        camera.zoom_by(100.0);
        assert_eq!(camera.zoom(), MIN_ZOOM);
        camera.zoom_by(-200.0);
        assert_eq!(camera.zoom(), MAX_ZOOM);
    }

    #[test]
    fn test_look_uses_sensitivity() {
        let mut camera = FlyCamera::default();
        let yaw = camera.yaw();
        camera.look(50.0, 0.0);
        assert!((camera.yaw() - (yaw + 5.0)).abs() < 1e-4);
    }

    #[test]
    fn test_translate_follows_basis() {
        let mut camera = FlyCamera::new(Vec3::ZERO, Vec3::NEG_Z);
        camera.translate(Direction::Forward, MOVE_SPEED);
        assert!(camera.position().abs_diff_eq(Vec3::new(0.0, 0.0, -0.3), 1e-5));
        camera.translate(Direction::Right, 1.0);
        camera.translate(Direction::Up, 2.0);
        assert!(camera.position().abs_diff_eq(Vec3::new(1.0, 2.0, -0.3), 1e-5));
        camera.translate(Direction::Back, 0.3);
        camera.translate(Direction::Left, 1.0);
        camera.translate(Direction::Down, 2.0);
        assert!(camera.position().abs_diff_eq(Vec3::ZERO, 1e-5));
    }

    #[test]
    fn test_frame_camera_shares_basis() {
        let camera = FlyCamera::default();
        let frame = camera.frame_camera(Vec2::new(1280.0, 720.0));
        assert_eq!(frame.eye, camera.position());
        assert!(frame.front.abs_diff_eq(camera.front(), 1e-5));
        let origin = frame.view.transform_point3(Vec3::ZERO);
        assert!(origin.x.abs() < 1e-4 && origin.y.abs() < 1e-4 && origin.z < 0.0);
    }
}
