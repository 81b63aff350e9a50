//! Lidarview Data Crate
//!
//! Decoding of KITTI-style recording sequences: LiDAR scans, ground-truth poses
//! and camera images, plus the frame navigation state built on top of them.
//! This crate is GPU-agnostic.

mod error;
mod images;
pub mod kitti;
mod session;
mod settings;
mod source;
mod trajectory;
mod types;

pub use error::DataError;
pub use images::decode_image;
pub use kitti::{DatasetLayout, PoseTable, decode_points, heading, read_point_cloud, translation};
pub use session::{FrameCursor, FrameData, FrameSession, Navigation};
pub use settings::Settings;
pub use source::FrameSource;
pub use trajectory::Trajectory;
pub use types::{FrameImage, Point, PointCloud};
