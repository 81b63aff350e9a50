//! Velodyne scan decoding.

use crate::error::DataError;
use crate::types::{Point, PointCloud};
use std::path::Path;
use tracing::{debug, warn};

/// Size of one `(x, y, z, intensity)` record in bytes.
pub const POINT_RECORD_SIZE: usize = 16;

/// Decode packed little-endian `f32` quadruples.
///
/// A trailing partial record is ignored.
pub fn decode_points(bytes: &[u8]) -> PointCloud {
    let points = bytes
        .chunks_exact(POINT_RECORD_SIZE)
        .map(|record| {
            let field = |i: usize| {
                let start = i * 4;
                f32::from_le_bytes([
                    record[start],
                    record[start + 1],
                    record[start + 2],
                    record[start + 3],
                ])
            };
            Point::new(field(0), field(1), field(2), field(3))
        })
        .collect();
    PointCloud::new(points)
}

/// Read and decode a scan file, surfacing I/O failures.
#[tracing::instrument(skip_all, fields(path = %path.display()))]
pub fn try_read_point_cloud(path: &Path) -> Result<PointCloud, DataError> {
    let bytes = std::fs::read(path).map_err(|e| DataError::io(path, e))?;
    let remainder = bytes.len() % POINT_RECORD_SIZE;
    if remainder != 0 {
        debug!("Dropping {} trailing bytes", remainder);
    }
    let cloud = decode_points(&bytes);
    debug!("Decoded {} points", cloud.len());
    Ok(cloud)
}

/// Read a scan file, returning an empty cloud if it cannot be read.
pub fn read_point_cloud(path: &Path) -> PointCloud {
    try_read_point_cloud(path).unwrap_or_else(|err| {
        warn!("{err}");
        PointCloud::empty()
    })
}
