//! Core per-frame data types.
//!
//! These are CPU-side representations; GPU vertex layouts with bytemuck
//! derives live in lidarview-gpu.

use glam::Vec3;

/// A single LiDAR return.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Reflectance, nominally in [0, 1]. Not validated.
    pub intensity: f32,
}

impl Point {
    pub fn new(x: f32, y: f32, z: f32, intensity: f32) -> Self {
        Self { x, y, z, intensity }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(self.x, self.y, self.z)
    }
}

/// All returns of one sweep, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    points: Vec<Point>,
}

impl PointCloud {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Mean position, or the origin for an empty cloud.
    pub fn centroid(&self) -> Vec3 {
        if self.points.is_empty() {
            return Vec3::ZERO;
        }
        let sum: Vec3 = self.points.iter().map(Point::position).sum();
        sum / self.points.len() as f32
    }

    /// Axis-aligned bounds as `(min, max)`, or `None` for an empty cloud.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = self.points.first()?.position();
        Some(self.points.iter().fold((first, first), |(min, max), p| {
            (min.min(p.position()), max.max(p.position()))
        }))
    }
}

impl From<Vec<Point>> for PointCloud {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

/// A decoded camera frame, tightly packed RGB8 rows.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl FrameImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Whether the pixel buffer matches the declared dimensions.
    pub fn is_consistent(&self) -> bool {
        self.width > 0
            && self.height > 0
            && self.pixels.len() == self.width as usize * self.height as usize * 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centroid_of_empty_cloud_is_origin() {
        assert_eq!(PointCloud::empty().centroid(), Vec3::ZERO);
        assert!(PointCloud::empty().bounds().is_none());
    }

    #[test]
    fn test_centroid_and_bounds() {
        let cloud = PointCloud::new(vec![
            Point::new(0.0, 0.0, 0.0, 0.1),
            Point::new(2.0, -4.0, 6.0, 0.9),
        ]);
        assert_eq!(cloud.centroid(), Vec3::new(1.0, -2.0, 3.0));
        let (min, max) = cloud.bounds().unwrap();
        assert_eq!(min, Vec3::new(0.0, -4.0, 0.0));
        assert_eq!(max, Vec3::new(2.0, 0.0, 6.0));
    }

    #[test]
    fn test_frame_image_consistency() {
        assert!(FrameImage::new(2, 1, vec![0; 6]).is_consistent());
        assert!(!FrameImage::new(2, 1, vec![0; 5]).is_consistent());
        assert!(!FrameImage::new(0, 1, Vec::new()).is_consistent());
    }
}
