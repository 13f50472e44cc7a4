use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SegmentsError;

/// One unit of the upstream segmentation analysis.
///
/// Input is a JSON array of these objects. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Segment {
    pub start_index: usize,
    pub end_index: usize,
    /// Distances measured from the current anchor, consumed in order.
    pub forward_targets: Vec<f64>,
    #[serde(default)]
    pub backward_target: Option<f64>,
    /// Intended movement distance, used by the pointer-speed suggestion.
    #[serde(default)]
    pub total_distance: Option<f64>,
}

impl Segment {
    pub fn new(start_index: usize, end_index: usize, forward_targets: Vec<f64>) -> Self {
        Self {
            start_index,
            end_index,
            forward_targets,
            backward_target: None,
            total_distance: None,
        }
    }

    pub fn with_backward_target(mut self, target: f64) -> Self {
        self.backward_target = Some(target);
        self
    }

    pub fn with_total_distance(mut self, distance: f64) -> Self {
        self.total_distance = Some(distance);
        self
    }
}

pub fn parse_segments_json(json_text: &str) -> Result<Vec<Segment>, SegmentsError> {
    Ok(serde_json::from_str(json_text)?)
}

pub fn load_segments<P: AsRef<Path>>(path: P) -> Result<Vec<Segment>, SegmentsError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| SegmentsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_segments_json(&text)
}
