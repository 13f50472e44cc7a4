//! Viewer configuration, loaded from an optional JSON file.
//!
//! Every field has a default, so `{}` is a complete config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::canvas::MAX_CANVAS_DIM;
use crate::error::ConfigError;
use crate::walk::WalkOptions;

pub type Rgb = [u8; 3];

/// Upper bound for `line_width` and `marker_radius`, in pixels.
pub const MAX_STROKE: f32 = 100.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub walk: WalkOptions,
    pub render: RenderConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Fixed canvas size in recording pixels. When either is unset the canvas
    /// is fitted to the trajectory bounds plus `margin`.
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub margin: u32,
    /// Largest canvas side in pixels. Fitted frames that would exceed it are
    /// scaled down; fixed sizes are cropped.
    pub max_dim: u32,
    pub line_width: f32,
    pub marker_radius: f32,
    pub background: Rgb,
    pub path_color: Rgb,
    pub start_color: Rgb,
    pub click_color: Rgb,
    pub forward_color: Rgb,
    pub backward_color: Rgb,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            margin: 20,
            max_dim: 4096,
            line_width: 1.0,
            marker_radius: 4.0,
            background: [255, 255, 255],
            path_color: [0, 0, 0],
            start_color: [40, 200, 40],
            click_color: [40, 120, 255],
            forward_color: [230, 40, 40],
            backward_color: [240, 150, 20],
        }
    }
}

impl RenderConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("line_width", self.line_width), ("marker_radius", self.marker_radius)] {
            if !(0.0..=MAX_STROKE).contains(&value) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} is outside 0..={MAX_STROKE}"),
                });
            }
        }
        if !(1..=MAX_CANVAS_DIM).contains(&self.max_dim) {
            return Err(ConfigError::Invalid {
                field: "max_dim",
                reason: format!("{} is outside 1..={MAX_CANVAS_DIM}", self.max_dim),
            });
        }
        Ok(())
    }
}

impl Config {
    pub fn from_json(json_text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json_text)?;
        config.render.validate()?;
        Ok(config)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(Config::from_json("{}").unwrap(), Config::default());
    }

    #[test]
    fn partial_override() {
        let cfg = Config::from_json(
            r#"{ "walk": { "clamp_to_segment": true }, "render": { "width": 1920, "forward_color": [1, 2, 3] } }"#,
        )
        .unwrap();
        assert!(cfg.walk.clamp_to_segment);
        assert_eq!(cfg.render.width, Some(1920));
        assert_eq!(cfg.render.height, None);
        assert_eq!(cfg.render.forward_color, [1, 2, 3]);
        assert_eq!(cfg.render.margin, RenderConfig::default().margin);
    }

    #[test]
    fn unknown_key_is_an_error() {
        assert!(matches!(
            Config::from_json(r#"{ "walk": { "clamp": true } }"#),
            Err(ConfigError::Json(_))
        ));
    }

    #[test]
    fn absurd_render_values_are_rejected() {
        for json in [
            r#"{ "render": { "marker_radius": 1e6 } }"#,
            r#"{ "render": { "marker_radius": -1 } }"#,
            r#"{ "render": { "line_width": 500 } }"#,
            r#"{ "render": { "max_dim": 0 } }"#,
            r#"{ "render": { "max_dim": 1000000 } }"#,
        ] {
            assert!(
                matches!(Config::from_json(json), Err(ConfigError::Invalid { .. })),
                "{json}"
            );
        }
        let cfg = Config::from_json(r#"{ "render": { "marker_radius": 100, "max_dim": 512 } }"#).unwrap();
        assert_eq!(cfg.render.max_dim, 512);
    }
}
