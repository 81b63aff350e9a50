//! Frame navigation state.

use crate::kitti::{heading, translation};
use crate::source::FrameSource;
use crate::trajectory::Trajectory;
use crate::types::{FrameImage, PointCloud};
use glam::{Mat4, Vec3};
use tracing::{debug, info};

/// Index of the displayed frame, clamped to `[0, total)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCursor {
    current: usize,
    total: usize,
}

impl FrameCursor {
    pub fn new(total: usize) -> Self {
        Self { current: 0, total }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Step forward. Returns `false` at the last frame.
    pub fn next(&mut self) -> bool {
        if self.current + 1 < self.total {
            self.current += 1;
            true
        } else {
            false
        }
    }

    /// Step back. Returns `false` at frame 0.
    pub fn prev(&mut self) -> bool {
        if self.current > 0 {
            self.current -= 1;
            true
        } else {
            false
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Next,
    Prev,
}

/// Everything decoded for one frame.
#[derive(Debug, Clone)]
pub struct FrameData {
    pub index: usize,
    pub pose: Mat4,
    pub position: Vec3,
    pub heading: f32,
    pub points: PointCloud,
    pub image: Option<FrameImage>,
}

/// Drives a [`FrameSource`] through navigation requests and records the path.
#[derive(Debug)]
pub struct FrameSession {
    source: FrameSource,
    cursor: FrameCursor,
    trajectory: Trajectory,
}

impl FrameSession {
    pub fn new(source: FrameSource) -> Self {
        let cursor = FrameCursor::new(source.total_frames());
        Self {
            source,
            cursor,
            trajectory: Trajectory::new(),
        }
    }

    /// Resolve the first frame.
    pub fn start(&mut self) -> FrameData {
        info!("Starting at frame 0 of {}", self.cursor.total());
        self.resolve()
    }

    /// Move the cursor; returns the new frame only when the index changed.
    pub fn apply(&mut self, navigation: Navigation) -> Option<FrameData> {
        let moved = match navigation {
            Navigation::Next => self.cursor.next(),
            Navigation::Prev => self.cursor.prev(),
        };
        if !moved {
            debug!(?navigation, frame = self.cursor.current(), "Already at sequence edge");
            return None;
        }
        Some(self.resolve())
    }

    /// Drop the recorded path and decode the current frame again.
    pub fn reload(&mut self) -> FrameData {
        info!("Reloading frame {}", self.cursor.current());
        self.trajectory.clear();
        self.resolve()
    }

    pub fn cursor(&self) -> FrameCursor {
        self.cursor
    }

    pub fn trajectory(&self) -> &Trajectory {
        &self.trajectory
    }

    pub fn source(&self) -> &FrameSource {
        &self.source
    }

    fn resolve(&mut self) -> FrameData {
        let index = self.cursor.current();
        let pose = self.source.pose(index);
        let position = translation(&pose);
        self.trajectory.add_point(position);

        let points = self.source.point_cloud(index);
        let image = self.source.image(index);
        debug!(
            frame = index,
            points = points.len(),
            has_image = image.is_some(),
            "Resolved frame"
        );

        FrameData {
            index,
            pose,
            position,
            heading: heading(&pose),
            points,
            image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kitti::DatasetLayout;
    use crate::source::tests::{POSE_LINES, write_sequence};

    fn session(point_counts: &[usize], pose_lines: &[&str]) -> (tempfile::TempDir, FrameSession) {
        let dir = tempfile::tempdir().unwrap();
        write_sequence(dir.path(), point_counts, pose_lines);
        let source = FrameSource::open(dir.path(), DatasetLayout::default()).unwrap();
        (dir, FrameSession::new(source))
    }

    #[test]
    fn test_cursor_stays_in_range() {
        let mut cursor = FrameCursor::new(3);
        assert!(!cursor.prev());
        assert_eq!(cursor.current(), 0);
        assert!(cursor.next());
        assert!(cursor.next());
        assert!(!cursor.next());
        assert_eq!(cursor.current(), 2);

        let mut empty = FrameCursor::new(0);
        assert!(!empty.next());
        assert!(!empty.prev());
        assert_eq!(empty.current(), 0);
    }

    #[test]
    fn test_two_steps_forward() {
        let (_dir, mut session) = session(&[3, 0, 100], &POSE_LINES);
        assert_eq!(session.source().total_frames(), 3);

        let first = session.start();
        assert_eq!(first.points.len(), 3);

        let second = session.apply(Navigation::Next).unwrap();
        assert_eq!(second.index, 1);
        assert!(second.points.is_empty());

        let third = session.apply(Navigation::Next).unwrap();
        assert_eq!(third.index, 2);
        assert_eq!(third.points.len(), 100);
        assert_eq!(third.position, Vec3::new(1.0, 0.0, 3.0));
        assert_eq!(session.trajectory().len(), 3);
    }

    #[test]
    fn test_edges_do_not_resolve() {
        let (_dir, mut session) = session(&[1, 1], &POSE_LINES[..2]);
        session.start();
        assert!(session.apply(Navigation::Prev).is_none());
        assert!(session.apply(Navigation::Next).is_some());
        assert!(session.apply(Navigation::Next).is_none());
        assert_eq!(session.cursor().current(), 1);
        assert_eq!(session.trajectory().len(), 2);
    }

    #[test]
    fn test_revisit_appends_duplicate() {
        let (_dir, mut session) = session(&[1, 1], &POSE_LINES[..2]);
        session.start();
        session.apply(Navigation::Next);
        session.apply(Navigation::Prev);
        let path = session.trajectory().path();
        assert_eq!(path.len(), 3);
        assert_eq!(path[0], path[2]);
    }

    #[test]
    fn test_missing_pose_resolves_identity() {
        let (_dir, mut session) = session(&[2, 2, 2], &POSE_LINES[..2]);
        session.start();
        session.apply(Navigation::Next);
        let last = session.apply(Navigation::Next).unwrap();
        assert_eq!(last.pose, Mat4::IDENTITY);
        assert_eq!(last.heading, 0.0);
        assert_eq!(last.points.len(), 2);
    }

    #[test]
    fn test_reload_clears_path() {
        let (_dir, mut session) = session(&[1, 1, 1], &POSE_LINES);
        session.start();
        session.apply(Navigation::Next);
        session.apply(Navigation::Next);
        let data = session.reload();
        assert_eq!(data.index, 2);
        assert_eq!(session.trajectory().len(), 1);
    }
}
