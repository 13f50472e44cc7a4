use std::path::PathBuf;

use thiserror::Error;

use crate::walk::Direction;

/// Errors raised while decoding a recording into a `Trajectory`.
///
/// Both variants are fatal to the load: nothing is rendered or walked from a
/// partially decoded recording.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrajectoryError {
    /// `line` is 1-based and counts the header line.
    #[error("malformed record on line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("recording has no data records after the header")]
    EmptyTrajectory,
}

impl TrajectoryError {
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }
}

/// Per-segment walk failures. A failing segment is skipped; the others still render.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WalkError {
    #[error(
        "{direction} target {target} from anchor {anchor} exceeds remaining trajectory (stopped at index {boundary})"
    )]
    UnreachableTarget {
        direction: Direction,
        target: f64,
        anchor: usize,
        boundary: usize,
    },

    #[error("segment range {start}..={end} is invalid for a trajectory of {len} points")]
    InvalidSegmentIndex { start: usize, end: usize, len: usize },
}

#[derive(Debug, Error)]
pub enum SegmentsError {
    #[error("segment list does not match the schema: {0}")]
    Schema(#[from] serde_json::Error),

    #[error("failed to read segments from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("failed to read config from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Top-level error for the session and the binary.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Trajectory(#[from] TrajectoryError),

    #[error(transparent)]
    Segments(#[from] SegmentsError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to read recording {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no recording loaded")]
    NoTrajectory,

    #[error("no recording for profile {profile} in {dir}")]
    NoRecording { dir: PathBuf, profile: String },

    #[cfg(feature = "png-io")]
    #[error("failed to write png: {0}")]
    Image(#[from] image::ImageError),

    #[error("built without the `{0}` feature")]
    FeatureDisabled(&'static str),

    #[error("debug viewer failed: {0}")]
    Ui(String),
}
