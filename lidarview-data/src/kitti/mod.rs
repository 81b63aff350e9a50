//! KITTI odometry sequence formats

mod layout;
mod points;
mod poses;

pub use layout::{DatasetLayout, FRAME_NAME_WIDTH, frame_stem};
pub use points::{POINT_RECORD_SIZE, decode_points, read_point_cloud, try_read_point_cloud};
pub use poses::{POSE_FIELDS, PoseTable, heading, parse_pose_line, translation};
