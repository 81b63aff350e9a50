//! Frame-indexed access to a recording sequence.

use crate::error::DataError;
use crate::images::decode_image;
use crate::kitti::{DatasetLayout, PoseTable, read_point_cloud};
use crate::types::{FrameImage, PointCloud};
use glam::Mat4;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

/// Resolves a frame index to its point cloud, image and pose.
///
/// The frame count is taken once at open time from the number of scan files.
/// Every per-frame accessor degrades instead of failing: an unreadable scan is
/// empty, a missing image is `None`, a missing pose is identity.
#[derive(Debug)]
pub struct FrameSource {
    root: PathBuf,
    layout: DatasetLayout,
    total_frames: usize,
    poses: PoseTable,
    images_available: bool,
}

impl FrameSource {
    /// Open a sequence directory.
    ///
    /// Fails only when the sequence root or its scan directory is missing.
    pub fn open(root: impl Into<PathBuf>, layout: DatasetLayout) -> Result<Self, DataError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(DataError::MissingSequence(root));
        }
        info!("Opening sequence at {}", root.display());

        let total_frames = count_frames(&layout.point_cloud_dir(&root), &layout.point_cloud_extension)?;
        info!(
            "Found {} LiDAR frames in {}",
            total_frames,
            layout.point_cloud_dir(&root).display()
        );

        let poses_path = layout.poses_path(&root);
        let poses = if poses_path.is_file() {
            PoseTable::load(&poses_path).unwrap_or_else(|err| {
                warn!("{err}");
                PoseTable::default()
            })
        } else {
            warn!("No pose file at {}", poses_path.display());
            PoseTable::default()
        };
        if !poses.is_empty() && poses.len() != total_frames {
            warn!(
                "Pose count {} does not match frame count {}",
                poses.len(),
                total_frames
            );
        }

        let images_available = layout.image_dir(&root).is_dir();
        if !images_available {
            warn!(
                "Image directory not found: {}",
                layout.image_dir(&root).display()
            );
        }

        Ok(Self {
            root,
            layout,
            total_frames,
            poses,
            images_available,
        })
    }

    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn layout(&self) -> &DatasetLayout {
        &self.layout
    }

    pub fn poses(&self) -> &PoseTable {
        &self.poses
    }

    pub fn point_cloud(&self, index: usize) -> PointCloud {
        if index >= self.total_frames {
            error!("Invalid frame index {index} (total {})", self.total_frames);
            return PointCloud::empty();
        }
        read_point_cloud(&self.layout.point_cloud_path(&self.root, index))
    }

    pub fn image(&self, index: usize) -> Option<FrameImage> {
        if !self.images_available {
            debug!("Skipping image for frame {index}: no image directory");
            return None;
        }
        match decode_image(&self.layout.image_path(&self.root, index)) {
            Ok(image) => Some(image),
            Err(err) => {
                warn!("{err}");
                None
            }
        }
    }

    pub fn pose(&self, index: usize) -> Mat4 {
        self.poses
            .lookup(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

fn count_frames(dir: &Path, extension: &str) -> Result<usize, DataError> {
    if !dir.is_dir() {
        return Err(DataError::MissingDirectory {
            kind: "point cloud",
            path: dir.to_path_buf(),
        });
    }
    let entries = std::fs::read_dir(dir).map_err(|e| DataError::io(dir, e))?;
    Ok(entries
        .filter_map(Result::ok)
        .filter(|entry| entry.path().extension().is_some_and(|ext| ext == extension))
        .count())
}
