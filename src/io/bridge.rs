use crate::codegen::sanitize_c_name;
use crate::io::project_file::{PixelRecord, ShapeRecord, sparse_pixels};
use crate::model::project::Project;

/// Name used for exported project files when none is given.
pub const DEFAULT_FILE_STEM: &str = "animation";

/// Body of `POST /save-anim` on the companion bridge.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveAnimPayload {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    pub active_state_id: String,
    pub states: Vec<PayloadState>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PayloadState {
    pub id: String,
    pub name: String,
    pub frames: Vec<PayloadFrame>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PayloadFrame {
    pub pixels: Vec<PixelRecord>,
    pub duration: u32,
    pub shapes: Vec<ShapeRecord>,
}

/// Body of `POST /delete-anim`.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeleteAnimPayload {
    pub name: String,
}

impl SaveAnimPayload {
    pub fn from_project(project: &Project, name: &str) -> Self {
        let canvas = project.canvas();
        Self {
            name: sanitize_c_name(name),
            width: canvas.width,
            height: canvas.height,
            fps: project.fps,
            active_state_id: project.active_state_id().to_string(),
            states: project
                .states()
                .iter()
                .map(|s| PayloadState {
                    id: s.id.clone(),
                    name: s.name.clone(),
                    frames: s
                        .frames()
                        .iter()
                        .map(|f| PayloadFrame {
                            pixels: sparse_pixels(f),
                            duration: f.duration_ms(),
                            shapes: f.shapes.iter().map(ShapeRecord::from_shape).collect(),
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

impl DeleteAnimPayload {
    pub fn new(name: &str) -> Self {
        Self {
            name: sanitize_c_name(name),
        }
    }
}

/// File stem for exported project JSON: characters outside `[A-Za-z0-9_-]` become `_`.
pub fn sanitize_file_stem(name: &str) -> String {
    let out: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if out.is_empty() {
        DEFAULT_FILE_STEM.to_string()
    } else {
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/io/bridge.rs"]
mod tests;
