//! Vehicle path accumulated while stepping through a sequence.

use glam::Vec3;

const INITIAL_CAPACITY: usize = 20_000;

/// Append-only list of visited positions.
///
/// Revisiting a frame appends its position again; nothing is deduplicated.
#[derive(Debug, Clone)]
pub struct Trajectory {
    points: Vec<Vec3>,
}

impl Default for Trajectory {
    fn default() -> Self {
        Self::new()
    }
}

impl Trajectory {
    pub fn new() -> Self {
        Self {
            points: Vec::with_capacity(INITIAL_CAPACITY),
        }
    }

    pub fn add_point(&mut self, position: Vec3) {
        self.points.push(position);
    }

    pub fn path(&self) -> &[Vec3] {
        &self.points
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last_point(&self) -> Option<Vec3> {
        self.points.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_clear() {
        let mut trajectory = Trajectory::new();
        assert!(trajectory.is_empty());
        assert_eq!(trajectory.last_point(), None);

        for i in 0..50 {
            trajectory.add_point(Vec3::new(i as f32, 0.0, 0.0));
        }
        assert_eq!(trajectory.len(), 50);
        assert_eq!(trajectory.path().len(), 50);
        assert_eq!(trajectory.last_point(), Some(Vec3::new(49.0, 0.0, 0.0)));

        trajectory.clear();
        assert_eq!(trajectory.path().len(), 0);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut trajectory = Trajectory::default();
        trajectory.add_point(Vec3::ONE);
        trajectory.add_point(Vec3::ONE);
        assert_eq!(trajectory.path(), &[Vec3::ONE, Vec3::ONE]);
    }
}
