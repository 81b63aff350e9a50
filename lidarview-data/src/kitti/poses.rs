//! Ground-truth pose file parsing.
//!
//! Each line holds a row-major 3x4 `[R | t]` matrix as 12 floats. The bottom
//! row `[0 0 0 1]` is implied.

use crate::error::DataError;
use glam::{Mat4, Vec3, Vec4};
use std::path::Path;
use tracing::{info, warn};

/// Number of values on one pose line.
pub const POSE_FIELDS: usize = 12;

/// Parse a single pose line into a homogeneous transform.
pub fn parse_pose_line(line: &str, line_number: usize) -> Result<Mat4, DataError> {
    let mut values = [0.0f32; POSE_FIELDS];
    let mut count = 0;
    for token in line.split_whitespace() {
        if count == POSE_FIELDS {
            return Err(DataError::MalformedPose {
                line: line_number,
                reason: format!("more than {POSE_FIELDS} values"),
            });
        }
        values[count] = token.parse().map_err(|_| DataError::MalformedPose {
            line: line_number,
            reason: format!("non-numeric token {token:?}"),
        })?;
        count += 1;
    }
    if count != POSE_FIELDS {
        return Err(DataError::MalformedPose {
            line: line_number,
            reason: format!("expected {POSE_FIELDS} values, found {count}"),
        });
    }

    let [r00, r01, r02, tx, r10, r11, r12, ty, r20, r21, r22, tz] = values;
    Ok(Mat4::from_cols(
        Vec4::new(r00, r10, r20, 0.0),
        Vec4::new(r01, r11, r21, 0.0),
        Vec4::new(r02, r12, r22, 0.0),
        Vec4::new(tx, ty, tz, 1.0),
    ))
}

/// Vehicle position encoded in a pose.
pub fn translation(pose: &Mat4) -> Vec3 {
    pose.w_axis.truncate()
}

/// Heading angle in radians, `atan2(R20, R00)`.
///
/// Used as a stand-in for the steering angle, which the dataset does not record.
pub fn heading(pose: &Mat4) -> f32 {
    pose.x_axis.z.atan2(pose.x_axis.x)
}

/// Poses for a whole sequence, indexed by frame.
#[derive(Debug, Clone, Default)]
pub struct PoseTable {
    poses: Vec<Mat4>,
}

impl PoseTable {
    pub fn new(poses: Vec<Mat4>) -> Self {
        Self { poses }
    }

    /// Parse pose text. Malformed lines become identity so later frames keep
    /// their index.
    pub fn parse(text: &str) -> Self {
        let mut lines: Vec<&str> = text.lines().collect();
        while lines.last().is_some_and(|l| l.trim().is_empty()) {
            lines.pop();
        }

        let poses = lines
            .iter()
            .enumerate()
            .map(|(index, line)| {
                parse_pose_line(line, index).unwrap_or_else(|err| {
                    warn!("Pose {index} replaced by identity: {err}");
                    Mat4::IDENTITY
                })
            })
            .collect();
        Self { poses }
    }

    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, DataError> {
        let text = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
        let table = Self::parse(&text);
        info!("Loaded {} poses", table.len());
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.poses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.poses.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Mat4> {
        self.poses.get(index).copied()
    }

    /// Pose for `frame`, or identity when out of range.
    pub fn lookup(&self, frame: i64) -> Mat4 {
        usize::try_from(frame)
            .ok()
            .and_then(|index| self.get(index))
            .unwrap_or_else(|| {
                warn!("Pose not available for frame {frame}");
                Mat4::IDENTITY
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE_A: &str = "1 0 0 1.5 0 1 0 -2 0 0 1 3.25";
    const LINE_B: &str = "0.5 0 -0.8660254 10 0 1 0 0 0.8660254 0 0.5 20";

    #[test]
    fn test_fills_rows_and_fixes_bottom_row() {
        let pose = parse_pose_line(LINE_B, 0).unwrap();
        assert_eq!(pose.row(0), Vec4::new(0.5, 0.0, -0.8660254, 10.0));
        assert_eq!(pose.row(1), Vec4::new(0.0, 1.0, 0.0, 0.0));
        assert_eq!(pose.row(2), Vec4::new(0.8660254, 0.0, 0.5, 20.0));
        assert_eq!(pose.row(3), Vec4::new(0.0, 0.0, 0.0, 1.0));
    }

    #[test]
    fn test_translation_and_heading() {
        let pose = parse_pose_line(LINE_A, 0).unwrap();
        assert_eq!(translation(&pose), Vec3::new(1.5, -2.0, 3.25));
        assert_eq!(heading(&pose), 0.0);

        let turned = parse_pose_line(LINE_B, 0).unwrap();
        let expected = 0.8660254f32.atan2(0.5);
        assert!((heading(&turned) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_table_length_matches_lines() {
        let text = format!("{LINE_A}\n{LINE_B}\n{LINE_A}\n\n");
        let table = PoseTable::parse(&text);
        assert_eq!(table.len(), 3);
        for pose in (0..table.len()).filter_map(|i| table.get(i)) {
            assert_eq!(pose.row(3), Vec4::new(0.0, 0.0, 0.0, 1.0));
        }
    }

    #[test]
    fn test_lookup_out_of_range_is_identity() {
        let table = PoseTable::parse(&format!("{LINE_A}\n{LINE_B}"));
        assert_eq!(table.lookup(-1), Mat4::IDENTITY);
        assert_eq!(table.lookup(2), Mat4::IDENTITY);
        assert_eq!(table.lookup(1), parse_pose_line(LINE_B, 1).unwrap());
    }

    #[test]
    fn test_malformed_line_becomes_identity() {
        let text = format!("{LINE_A}\n1 0 0 x 0 1 0 0 0 0 1 0\n1 2 3\n{LINE_B}");
        let table = PoseTable::parse(&text);
        assert_eq!(table.len(), 4);
        assert_eq!(table.get(1), Some(Mat4::IDENTITY));
        assert_eq!(table.get(2), Some(Mat4::IDENTITY));
        assert_eq!(table.get(3), parse_pose_line(LINE_B, 3).ok());
    }

    #[test]
    fn test_field_count_errors() {
        assert!(matches!(
            parse_pose_line("1 2 3", 4),
            Err(DataError::MalformedPose { line: 4, .. })
        ));
        let too_many = format!("{LINE_A} 7");
        assert!(parse_pose_line(&too_many, 0).is_err());
        assert!(parse_pose_line("", 0).is_err());
    }

    #[test]
    fn test_load_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(PoseTable::load(&dir.path().join("poses.txt")).is_err());
    }
}
