//! On-disk naming of a recording sequence.

use std::path::{Path, PathBuf};

/// Width of the zero-padded frame number in file names.
pub const FRAME_NAME_WIDTH: usize = 6;

/// Relative locations of the per-frame resources inside a sequence directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetLayout {
    pub point_cloud_dir: String,
    pub point_cloud_extension: String,
    pub image_dir: String,
    pub image_extension: String,
    pub poses_file: String,
}

impl Default for DatasetLayout {
    fn default() -> Self {
        Self {
            point_cloud_dir: "velodyne".to_string(),
            point_cloud_extension: "bin".to_string(),
            image_dir: "image_2".to_string(),
            image_extension: "png".to_string(),
            poses_file: "poses.txt".to_string(),
        }
    }
}

/// `000042`-style stem for a frame.
pub fn frame_stem(index: usize) -> String {
    format!("{index:0width$}", width = FRAME_NAME_WIDTH)
}

impl DatasetLayout {
    pub fn point_cloud_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.point_cloud_dir)
    }

    pub fn image_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.image_dir)
    }

    pub fn poses_path(&self, root: &Path) -> PathBuf {
        root.join(&self.poses_file)
    }

    pub fn point_cloud_path(&self, root: &Path, index: usize) -> PathBuf {
        self.point_cloud_dir(root)
            .join(format!("{}.{}", frame_stem(index), self.point_cloud_extension))
    }

    pub fn image_path(&self, root: &Path, index: usize) -> PathBuf {
        self.image_dir(root)
            .join(format!("{}.{}", frame_stem(index), self.image_extension))
    }
}
