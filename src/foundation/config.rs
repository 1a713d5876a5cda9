use std::path::Path;

use anyhow::Context as _;

use crate::foundation::core::{Canvas, Rgb8};
use crate::foundation::error::StudioResult;
use crate::model::blend::BlendMode;

/// Session-wide tunables. Every field has a default, so a partial JSON file is valid.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StudioConfig {
    /// Undo depth per frame.
    pub history_capacity: usize,
    /// Shortest frame the editor and the CLI accept. Opening or loading a
    /// project raises shorter frames to it; the model itself never goes
    /// below `MIN_FRAME_DURATION_MS`.
    pub min_frame_duration_ms: u32,
    pub default_frame_duration_ms: u32,
    /// Timeline zoom used for the playhead position.
    pub pixels_per_second: f64,
    pub canvas: Canvas,
    pub fps: u32,
    pub style: StyleDefaults,
    pub bake: BakeSettings,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            history_capacity: 50,
            min_frame_duration_ms: 10,
            default_frame_duration_ms: 100,
            pixels_per_second: 100.0,
            canvas: Canvas::default(),
            fps: 12,
            style: StyleDefaults::default(),
            bake: BakeSettings::default(),
        }
    }
}

impl StudioConfig {
    /// Defaults with `FACESTUDIO_HISTORY_CAPACITY` / `FACESTUDIO_MIN_FRAME_MS` applied.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        cfg.apply_env();
        cfg
    }

    /// Reads a JSON config file, then applies environment overrides on top.
    pub fn from_path(path: &Path) -> StudioResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        let mut cfg: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse config '{}'", path.display()))?;
        cfg.apply_env();
        Ok(cfg)
    }

    fn apply_env(&mut self) {
        self.history_capacity = std::env::var("FACESTUDIO_HISTORY_CAPACITY")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(self.history_capacity);
        self.min_frame_duration_ms = std::env::var("FACESTUDIO_MIN_FRAME_MS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(self.min_frame_duration_ms);
    }

    pub fn clamp_duration(&self, duration_ms: u32) -> u32 {
        duration_ms.max(self.min_frame_duration_ms)
    }
}

/// Style applied to newly created shapes, in place of reading toolbar widgets.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct StyleDefaults {
    pub color: Rgb8,
    pub stroke_color: Rgb8,
    pub stroke_width: f64,
    pub corner_radius: f64,
    pub opacity: f64,
    pub blend_mode: BlendMode,
    pub font_size: f64,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        Self {
            color: Rgb8::new(0x00, 0xff, 0xff),
            stroke_color: Rgb8::WHITE,
            stroke_width: 0.0,
            corner_radius: 0.0,
            opacity: 1.0,
            blend_mode: BlendMode::SourceOver,
            font_size: 16.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BakeSettings {
    /// Color under every baked frame.
    pub background: Rgb8,
    /// Bytes written per line of a generated C array.
    pub bytes_per_line: usize,
}

impl Default for BakeSettings {
    fn default() -> Self {
        Self {
            background: Rgb8::BLACK,
            bytes_per_line: 24,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/config.rs"]
mod tests;
