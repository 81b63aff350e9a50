//! The closed set of things drawn each frame.

mod image_overlay;
mod indicator;
mod point_cloud;
mod trajectory;

pub use image_overlay::{IMAGE_QUAD, ImageRenderable};
pub use indicator::{
    INDICATOR_COLOR, INDICATOR_OFFSET, RING_INNER_RADIUS, RING_OUTER_RADIUS, RING_SEGMENTS,
    SteeringIndicatorRenderable, indicator_model, ring_geometry,
};
pub use point_cloud::PointCloudRenderable;
pub use trajectory::{TRAJECTORY_COLOR, TrajectoryRenderable};
