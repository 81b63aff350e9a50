//! Shader source code embedded at compile time.
//!
//! Each renderable looks its shader up by name, so a directory of overrides
//! can replace any of these at startup (see [`crate::ShaderLibrary`]).

/// LiDAR points as camera-facing billboards.
pub const POINTS: &str = include_str!("../shaders/points.wgsl");

/// Textured screen-space quad for the camera image.
pub const IMAGE: &str = include_str!("../shaders/image.wgsl");

/// Flat-colored line strip for the vehicle path.
pub const TRAJECTORY: &str = include_str!("../shaders/trajectory.wgsl");

/// Flat-colored ring geometry for the steering indicator.
pub const INDICATOR: &str = include_str!("../shaders/indicator.wgsl");

/// Look up an embedded shader by file stem.
pub fn embedded(name: &str) -> Option<&'static str> {
    match name {
        "points" => Some(POINTS),
        "image" => Some(IMAGE),
        "trajectory" => Some(TRAJECTORY),
        "indicator" => Some(INDICATOR),
        _ => None,
    }
}
