use crate::animation::ease::{CubicBezier, Easing};
use crate::foundation::config::StyleDefaults;
use crate::foundation::core::{Bounds, Canvas, Point, Rgb8};
use crate::foundation::error::{StudioError, StudioResult};
use crate::foundation::ids::{ShapeId, ShapeIdGen};
use crate::model::blend::BlendMode;
use crate::model::frame::{DEFAULT_FRAME_DURATION_MS, Frame};
use crate::model::path::PathGeometry;
use crate::model::project::{DEFAULT_FPS, Project};
use crate::model::shape::{Interaction, Shape, ShapePayload, ShapeType};
use crate::model::state::State;

/// Format version written on export.
pub const PROJECT_FILE_VERSION: &str = "1.1";

/// Top-level project JSON.
///
/// Files without `states` but with `frames` are the legacy single-timeline
/// format and import as one `idle` state.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub fps: Option<u32>,
    #[serde(default)]
    pub easing_mode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_bezier: Option<[f64; 4]>,
    #[serde(default)]
    pub active_state_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub states: Option<Vec<StateRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frames: Option<Vec<FrameRecord>>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct StateRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub frames: Vec<FrameRecord>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FrameRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    /// Missing or zero means the default duration.
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub pixels: Vec<PixelRecord>,
    #[serde(default)]
    pub shapes: Vec<ShapeRecord>,
}

/// One set pixel: flat index `y*W + x` and its color.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PixelRecord {
    pub i: i64,
    pub c: String,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PointRecord {
    pub x: f64,
    pub y: f64,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShapeRecord {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub opacity: Option<f64>,
    #[serde(default)]
    pub blend_mode: Option<String>,
    #[serde(default)]
    pub rotation: Option<f64>,
    #[serde(default)]
    pub line_end: Option<PointRecord>,
    #[serde(default)]
    pub id: Option<ShapeId>,
    #[serde(default)]
    pub interaction: Option<Interaction>,
    #[serde(default)]
    pub stroke_width: Option<f64>,
    #[serde(default)]
    pub stroke_color: Option<String>,
    #[serde(default)]
    pub corner_radius: Option<f64>,
    #[serde(default)]
    pub path_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_mirrored: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

impl ShapeRecord {
    pub fn from_shape(shape: &Shape) -> Self {
        let style = &shape.style;
        let mut rec = Self {
            kind: shape.shape_type().as_str().to_string(),
            x: shape.x,
            y: shape.y,
            width: shape.width,
            height: shape.height,
            color: Some(style.color.to_hex()),
            opacity: Some(style.opacity),
            blend_mode: Some(style.blend_mode.as_str().to_string()),
            rotation: Some(shape.rotation),
            line_end: None,
            id: Some(shape.id.clone()),
            interaction: shape.interaction.clone(),
            stroke_width: Some(style.stroke_width),
            stroke_color: Some(style.stroke_color.to_hex()),
            corner_radius: Some(style.corner_radius),
            path_data: None,
            is_mirrored: None,
            text: None,
            font_size: None,
        };
        match &shape.payload {
            ShapePayload::Line { end } => {
                rec.line_end = Some(PointRecord { x: end.x, y: end.y });
            }
            ShapePayload::Path(geom) => {
                rec.path_data = Some(geom.data().to_string());
                rec.is_mirrored = Some(geom.mirrored);
            }
            ShapePayload::Text { text, font_size } => {
                rec.text = Some(text.clone());
                rec.font_size = Some(*font_size);
            }
            ShapePayload::Rect | ShapePayload::Ellipse | ShapePayload::Triangle => {}
        }
        rec
    }

    /// Rebuilds a shape, filling absent fields the way older files expect.
    /// Shapes without an id draw one from `ids`.
    pub fn to_shape(&self, defaults: &StyleDefaults, ids: &mut ShapeIdGen) -> StudioResult<Shape> {
        let kind = ShapeType::from_name(&self.kind)
            .ok_or_else(|| StudioError::import(format!("unknown shape type '{}'", self.kind)))?;
        let id = match &self.id {
            Some(id) => id.clone(),
            None => ids.next_id(),
        };
        let origin = Point::new(self.x, self.y);

        let mut shape = match kind {
            ShapeType::Line => {
                let end = self
                    .line_end
                    .map(|p| Point::new(p.x, p.y))
                    .unwrap_or(Point::new(self.x + self.width, self.y + self.height));
                Shape::line(id, origin, end, defaults)
            }
            _ => Shape::new(
                id,
                kind,
                Bounds::new(self.x, self.y, self.width, self.height),
                defaults,
            ),
        };
        match &mut shape.payload {
            ShapePayload::Path(geom) => {
                *geom = PathGeometry::from_data(self.path_data.clone().unwrap_or_default());
                geom.mirrored = self.is_mirrored.unwrap_or(false);
            }
            ShapePayload::Text { text, font_size } => {
                if let Some(t) = &self.text {
                    text.clone_from(t);
                }
                if let Some(size) = self.font_size.filter(|s| *s > 0.0) {
                    *font_size = size;
                }
            }
            _ => {}
        }

        let style = &mut shape.style;
        if let Some(c) = &self.color {
            style.color = parse_color(c)?;
        }
        style.opacity = self.opacity.unwrap_or(1.0).clamp(0.0, 1.0);
        style.blend_mode = match self.blend_mode.as_deref() {
            None | Some("") => BlendMode::SourceOver,
            Some(name) => BlendMode::from_name(name).unwrap_or_else(|| {
                tracing::warn!(blend_mode = name, "unknown blend mode, using source-over");
                BlendMode::SourceOver
            }),
        };
        style.stroke_width = self.stroke_width.unwrap_or(0.0).max(0.0);
        style.stroke_color = match &self.stroke_color {
            Some(c) if !c.is_empty() => parse_color(c)?,
            _ => Rgb8::WHITE,
        };
        style.corner_radius = self.corner_radius.unwrap_or(0.0).max(0.0);
        shape.rotation = self.rotation.unwrap_or(0.0);
        shape.interaction = self.interaction.clone();
        Ok(shape)
    }
}

impl FrameRecord {
    pub fn from_frame(index: usize, frame: &Frame) -> Self {
        Self {
            index: Some(index),
            duration: Some(f64::from(frame.duration_ms())),
            pixels: sparse_pixels(frame),
            shapes: frame.shapes.iter().map(ShapeRecord::from_shape).collect(),
        }
    }

    pub fn to_frame(
        &self,
        canvas: Canvas,
        defaults: &StyleDefaults,
        ids: &mut ShapeIdGen,
    ) -> StudioResult<Frame> {
        let duration = match self.duration {
            Some(d) if d.is_finite() && d > 0.0 => d.round().min(f64::from(u32::MAX)) as u32,
            _ => DEFAULT_FRAME_DURATION_MS,
        };
        let mut frame = Frame::blank(canvas, duration);
        for px in &self.pixels {
            let Ok(index) = usize::try_from(px.i) else {
                continue;
            };
            if index >= canvas.pixel_count() {
                continue;
            }
            frame.set_pixel_index(index, Some(parse_color(&px.c)?));
        }
        frame.shapes = self
            .shapes
            .iter()
            .map(|s| s.to_shape(defaults, ids))
            .collect::<StudioResult<_>>()?;
        Ok(frame)
    }
}

/// Set pixels only, in index order.
pub fn sparse_pixels(frame: &Frame) -> Vec<PixelRecord> {
    frame
        .pixels()
        .iter()
        .enumerate()
        .filter_map(|(i, c)| {
            c.map(|c| PixelRecord {
                i: i as i64,
                c: c.to_hex(),
            })
        })
        .collect()
}

fn parse_color(s: &str) -> StudioResult<Rgb8> {
    Rgb8::parse(s).map_err(|_| StudioError::import(format!("invalid color '{s}'")))
}

impl ProjectFile {
    fn frame_records(&self) -> impl Iterator<Item = &FrameRecord> {
        let states = self.states.iter().flatten().flat_map(|s| &s.frames);
        let legacy = self.frames.iter().flatten();
        states.chain(legacy)
    }

    pub fn from_project(project: &Project) -> Self {
        let canvas = project.canvas();
        Self {
            version: Some(PROJECT_FILE_VERSION.to_string()),
            width: Some(canvas.width),
            height: Some(canvas.height),
            fps: Some(project.fps),
            easing_mode: Some(project.easing.name().to_string()),
            custom_bezier: project
                .easing
                .custom_curve()
                .map(|c| [c.p1x, c.p1y, c.p2x, c.p2y]),
            active_state_id: Some(project.active_state_id().to_string()),
            states: Some(
                project
                    .states()
                    .iter()
                    .map(|s| StateRecord {
                        id: s.id.clone(),
                        name: Some(s.name.clone()),
                        frames: s
                            .frames()
                            .iter()
                            .enumerate()
                            .map(|(i, f)| FrameRecord::from_frame(i, f))
                            .collect(),
                    })
                    .collect(),
            ),
            frames: None,
        }
    }

    /// Builds a complete project; nothing is returned unless every record converts.
    pub fn to_project(&self, defaults: &StyleDefaults) -> StudioResult<Project> {
        let canvas = match (self.width, self.height) {
            (Some(w), Some(h)) => {
                Canvas::new(w, h).map_err(|e| StudioError::import(e.to_string()))?
            }
            _ => Canvas::default(),
        };
        let easing = Easing::from_name(
            self.easing_mode.as_deref().unwrap_or("linear"),
            self.custom_bezier
                .map(|[p1x, p1y, p2x, p2y]| CubicBezier::new(p1x, p1y, p2x, p2y)),
        );
        let mut ids = ShapeIdGen::default();
        for rec in self.frame_records() {
            for id in rec.shapes.iter().filter_map(|s| s.id.as_ref()) {
                ids.observe(id);
            }
        }

        let convert = |records: &[FrameRecord], ids: &mut ShapeIdGen| -> StudioResult<Vec<Frame>> {
            let mut frames = records
                .iter()
                .map(|f| f.to_frame(canvas, defaults, ids))
                .collect::<StudioResult<Vec<_>>>()?;
            if frames.is_empty() {
                frames.push(Frame::blank(canvas, DEFAULT_FRAME_DURATION_MS));
            }
            Ok(frames)
        };

        let (states, active) = match (&self.states, &self.frames) {
            (Some(records), _) => {
                let mut states = Vec::with_capacity(records.len());
                for rec in records {
                    let frames = convert(&rec.frames, &mut ids)?;
                    let name = rec.name.clone().unwrap_or_else(|| rec.id.clone());
                    states.extend(State::with_frames(rec.id.clone(), name, frames));
                }
                (states, self.active_state_id.as_deref())
            }
            (None, Some(frames)) => {
                let frames = convert(frames, &mut ids)?;
                (
                    State::with_frames("idle", "Idle", frames).into_iter().collect(),
                    Some("idle"),
                )
            }
            (None, None) => {
                return Err(StudioError::import("file has neither states nor frames"));
            }
        };
        if states.is_empty() {
            return Err(StudioError::import("file contains no states"));
        }

        Project::from_parts(
            canvas,
            self.fps.unwrap_or(DEFAULT_FPS),
            easing,
            states,
            active,
        )
        .map_err(|e| StudioError::import(e.to_string()))
    }
}

impl Project {
    /// Parses project JSON (current or legacy) with the built-in style defaults.
    #[tracing::instrument(skip(json), fields(bytes = json.len()))]
    pub fn from_json_str(json: &str) -> StudioResult<Self> {
        import_project(json, &StyleDefaults::default())
    }

    /// Pretty-printed project JSON, version 1.1.
    pub fn to_json_string(&self) -> StudioResult<String> {
        export_project(self)
    }
}

pub fn import_project(json: &str, defaults: &StyleDefaults) -> StudioResult<Project> {
    let file: ProjectFile =
        serde_json::from_str(json).map_err(|e| StudioError::import(format!("parse: {e}")))?;
    file.to_project(defaults)
}

pub fn export_project(project: &Project) -> StudioResult<String> {
    serde_json::to_string_pretty(&ProjectFile::from_project(project))
        .map_err(|e| StudioError::Other(e.into()))
}

#[cfg(test)]
#[path = "../../tests/unit/io/project_file.rs"]
mod tests;
