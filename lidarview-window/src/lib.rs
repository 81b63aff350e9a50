//! Lidarview Window Crate
//!
//! winit event loop, fly camera and input handling around the frame
//! compositor.

mod app;
mod camera;
mod config;
mod controls;

pub use app::{ViewerError, run};
pub use camera::{Direction, FlyCamera, LOOK_SENSITIVITY, MOVE_SPEED};
pub use config::ViewerConfig;
pub use controls::{Controls, InputState, Intent, intents};
