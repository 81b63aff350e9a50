//! Error types for dataset access.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a recording sequence.
///
/// Per-frame readers catch these and degrade to an empty or identity value;
/// only [`DataError::MissingSequence`] and [`DataError::MissingDirectory`]
/// are expected to reach the caller of [`crate::FrameSource::open`].
#[derive(Debug, Error)]
pub enum DataError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: ::image::ImageError,
    },

    #[error("malformed pose on line {line}: {reason}")]
    MalformedPose { line: usize, reason: String },

    #[error("sequence directory does not exist: {0}")]
    MissingSequence(PathBuf),

    #[error("{kind} directory not found: {path}")]
    MissingDirectory { kind: &'static str, path: PathBuf },

    #[error("setting {key} = {value:?} is not a valid {expected}")]
    InvalidSetting {
        key: String,
        value: String,
        expected: &'static str,
    },
}

impl DataError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DataError::Io {
            path: path.into(),
            source,
        }
    }
}
