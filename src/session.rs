//! The loaded recording and the operations run against it.
//!
//! A `Session` is owned by whoever coordinates loading and rendering (the
//! binary, or the debug viewer) and passed to them explicitly.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::desc::Segment;
use crate::error::{Error, TrajectoryError};
use crate::scene::{build_scene, Scene};
use crate::trajectory::Trajectory;
use crate::walk::{walk_segments, Analysis, WalkOptions};

/// Walk results for the current recording and the scene that shows them.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub analysis: Analysis,
    pub scene: Scene,
}

#[derive(Debug, Default)]
pub struct Session {
    trajectory: Option<Trajectory>,
    source: Option<PathBuf>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `text` completely, then replaces the current recording.
    /// On error the previous recording stays loaded.
    pub fn load_csv(&mut self, text: &str) -> Result<&Trajectory, TrajectoryError> {
        let trajectory = Trajectory::parse_csv(text)?;
        Ok(self.replace(trajectory, None))
    }

    pub fn load_csv_file<P: AsRef<Path>>(&mut self, path: P) -> Result<&Trajectory, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let trajectory = Trajectory::parse_csv(&text)?;
        Ok(self.replace(trajectory, Some(path.to_path_buf())))
    }

    fn replace(&mut self, trajectory: Trajectory, source: Option<PathBuf>) -> &Trajectory {
        let label = source
            .as_deref()
            .map_or_else(|| "<memory>".to_owned(), |p| p.display().to_string());
        info!(
            source = %label,
            points = trajectory.len(),
            clicks = trajectory.click_indices().len(),
            path_length = trajectory.path_length(),
            "recording loaded"
        );
        self.source = source;
        self.trajectory.insert(trajectory)
    }

    pub fn trajectory(&self) -> Option<&Trajectory> {
        self.trajectory.as_ref()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// Walks every segment and builds the scene for the surviving markers.
    pub fn overlay(&self, segments: &[Segment], options: WalkOptions) -> Result<Overlay, Error> {
        let trajectory = self.trajectory.as_ref().ok_or(Error::NoTrajectory)?;
        let analysis = walk_segments(trajectory.points(), segments, options);
        let scene = build_scene(trajectory, &analysis.markers);
        Ok(Overlay { analysis, scene })
    }
}
