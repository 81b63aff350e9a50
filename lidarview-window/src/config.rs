use lidarview_data::Settings;
use std::path::PathBuf;

pub const DEFAULT_WIDTH: u32 = 1280;
pub const DEFAULT_HEIGHT: u32 = 720;
pub const DEFAULT_TITLE: &str = "KITTI Visualizer";
pub const DEFAULT_POINT_SIZE: f32 = 2.0;

/// Window and renderer options for one viewer run.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Point diameter in pixels.
    pub point_size: f32,
    /// Load WGSL from this directory instead of the embedded sources.
    pub shader_dir: Option<PathBuf>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            title: DEFAULT_TITLE.to_string(),
            point_size: DEFAULT_POINT_SIZE,
            shader_dir: None,
        }
    }
}

impl ViewerConfig {
    /// Read `window_width`, `window_height`, `window_title`, `point_size` and
    /// `shader_dir`, falling back to the defaults.
    pub fn from_settings(settings: &Settings) -> Self {
        let dimension = |key: &str, default: u32| {
            u32::try_from(settings.get_int(key, i64::from(default)))
                .ok()
                .filter(|v| *v > 0)
                .unwrap_or(default)
        };
        let point_size = settings.get_float("point_size", DEFAULT_POINT_SIZE);
        Self {
            width: dimension("window_width", DEFAULT_WIDTH),
            height: dimension("window_height", DEFAULT_HEIGHT),
            title: settings.get_string("window_title", DEFAULT_TITLE),
            point_size: if point_size > 0.0 {
                point_size
            } else {
                DEFAULT_POINT_SIZE
            },
            shader_dir: settings
                .get("shader_dir")
                .filter(|dir| !dir.is_empty())
                .map(PathBuf::from),
        }
    }
}
