use kurbo::Point;

use crate::foundation::config::StyleDefaults;
use crate::foundation::core::{Bounds, Rgb8};
use crate::foundation::ids::{ShapeId, ShapeIdGen};
use crate::model::blend::BlendMode;
use crate::model::path::PathGeometry;

/// Hit tolerance around a line segment, in pixels.
pub const LINE_HIT_TOLERANCE: f64 = 5.0;

/// Box a freshly placed text shape starts with.
pub const TEXT_DEFAULT_SIZE: (f64, f64) = (100.0, 30.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    Rect,
    Ellipse,
    Triangle,
    Line,
    Path,
    Text,
}

impl ShapeType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rect => "rect",
            Self::Ellipse => "ellipse",
            Self::Triangle => "triangle",
            Self::Line => "line",
            Self::Path => "path",
            Self::Text => "text",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "rect" => Self::Rect,
            "ellipse" => Self::Ellipse,
            "triangle" => Self::Triangle,
            "line" => Self::Line,
            "path" => Self::Path,
            "text" => Self::Text,
            _ => return None,
        })
    }
}

/// Per-type data on top of the shared box and style.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapePayload {
    Rect,
    Ellipse,
    Triangle,
    /// Segment from the shape origin `(x, y)` to `end`.
    Line { end: Point },
    Path(PathGeometry),
    Text { text: String, font_size: f64 },
}

impl ShapePayload {
    pub fn shape_type(&self) -> ShapeType {
        match self {
            Self::Rect => ShapeType::Rect,
            Self::Ellipse => ShapeType::Ellipse,
            Self::Triangle => ShapeType::Triangle,
            Self::Line { .. } => ShapeType::Line,
            Self::Path(_) => ShapeType::Path,
            Self::Text { .. } => ShapeType::Text,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShapeStyle {
    pub color: Rgb8,
    pub stroke_color: Rgb8,
    pub stroke_width: f64,
    /// Only meaningful for rectangles.
    pub corner_radius: f64,
    pub opacity: f64,
    pub blend_mode: BlendMode,
}

impl ShapeStyle {
    pub fn from_defaults(defaults: &StyleDefaults) -> Self {
        Self {
            color: defaults.color,
            stroke_color: defaults.stroke_color,
            stroke_width: defaults.stroke_width,
            corner_radius: defaults.corner_radius,
            opacity: defaults.opacity.clamp(0.0, 1.0),
            blend_mode: defaults.blend_mode,
        }
    }
}

/// Declares that activating a shape on the device switches to another state.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interaction {
    pub trigger: String,
    pub target_state_id: String,
}

impl Interaction {
    pub fn click(target_state_id: impl Into<String>) -> Self {
        Self {
            trigger: "click".to_string(),
            target_state_id: target_state_id.into(),
        }
    }

    pub fn is_click(&self) -> bool {
        self.trigger == "click"
    }
}

/// A drawable primitive of a frame.
///
/// `x, y, width, height` is the axis-aligned box in canvas pixels; `rotation`
/// is in degrees around the box center. Lines keep their second endpoint in
/// the payload and derive their bounds from both endpoints.
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    pub id: ShapeId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    pub style: ShapeStyle,
    pub payload: ShapePayload,
    pub interaction: Option<Interaction>,
}

impl Shape {
    /// A shape of `kind` filling `bounds` (normalized), styled from `defaults`.
    ///
    /// Lines run from the top-left to the bottom-right corner of the box; paths
    /// start without outline data; text starts as `"Text"`.
    pub fn new(id: ShapeId, kind: ShapeType, bounds: Bounds, defaults: &StyleDefaults) -> Self {
        let b = bounds.normalized();
        let payload = match kind {
            ShapeType::Rect => ShapePayload::Rect,
            ShapeType::Ellipse => ShapePayload::Ellipse,
            ShapeType::Triangle => ShapePayload::Triangle,
            ShapeType::Line => ShapePayload::Line {
                end: Point::new(b.right(), b.bottom()),
            },
            ShapeType::Path => ShapePayload::Path(PathGeometry::default()),
            ShapeType::Text => ShapePayload::Text {
                text: "Text".to_string(),
                font_size: defaults.font_size,
            },
        };
        Self {
            id,
            x: b.x,
            y: b.y,
            width: b.width,
            height: b.height,
            rotation: 0.0,
            style: ShapeStyle::from_defaults(defaults),
            payload,
            interaction: None,
        }
    }

    pub fn line(id: ShapeId, from: Point, to: Point, defaults: &StyleDefaults) -> Self {
        let mut shape = Self::new(id, ShapeType::Line, Bounds::from_points(from, to), defaults);
        shape.x = from.x;
        shape.y = from.y;
        shape.payload = ShapePayload::Line { end: to };
        shape
    }

    pub fn text(
        id: ShapeId,
        at: Point,
        text: impl Into<String>,
        defaults: &StyleDefaults,
    ) -> Self {
        let (w, h) = TEXT_DEFAULT_SIZE;
        let mut shape = Self::new(id, ShapeType::Text, Bounds::new(at.x, at.y, w, h), defaults);
        shape.payload = ShapePayload::Text {
            text: text.into(),
            font_size: defaults.font_size,
        };
        shape
    }

    pub fn path(
        id: ShapeId,
        bounds: Bounds,
        geometry: PathGeometry,
        defaults: &StyleDefaults,
    ) -> Self {
        let mut shape = Self::new(id, ShapeType::Path, bounds, defaults);
        shape.payload = ShapePayload::Path(geometry);
        shape
    }

    pub fn shape_type(&self) -> ShapeType {
        self.payload.shape_type()
    }

    /// The stored box, as drawn and rotated.
    pub fn box_bounds(&self) -> Bounds {
        Bounds::new(self.x, self.y, self.width, self.height)
    }

    pub fn line_end(&self) -> Option<Point> {
        match self.payload {
            ShapePayload::Line { end } => Some(end),
            _ => None,
        }
    }

    /// Visual extent: the endpoint envelope for lines, the stored box otherwise.
    pub fn bounds(&self) -> Bounds {
        match self.line_end() {
            Some(end) => Bounds::from_points(Point::new(self.x, self.y), end),
            None => self.box_bounds(),
        }
    }

    /// Geometric hit test in canvas space.
    ///
    /// Paths and text use their box; rotation is not taken into account.
    pub fn contains_point(&self, px: f64, py: f64) -> bool {
        match &self.payload {
            ShapePayload::Rect | ShapePayload::Text { .. } => self.box_bounds().contains(px, py),
            ShapePayload::Path(geom) => !geom.is_empty() && self.box_bounds().contains(px, py),
            ShapePayload::Ellipse => {
                let rx = self.width / 2.0;
                let ry = self.height / 2.0;
                if rx == 0.0 || ry == 0.0 {
                    return false;
                }
                let dx = (px - (self.x + rx)) / rx;
                let dy = (py - (self.y + ry)) / ry;
                dx * dx + dy * dy <= 1.0
            }
            ShapePayload::Triangle => {
                let (x1, y1) = (self.x + self.width / 2.0, self.y);
                let (x2, y2) = (self.x, self.y + self.height);
                let (x3, y3) = (self.x + self.width, self.y + self.height);
                let area = 0.5 * (-y2 * x3 + y1 * (-x2 + x3) + x1 * (y2 - y3) + x2 * y3);
                if area == 0.0 {
                    return false;
                }
                let s = 1.0 / (2.0 * area) * (y1 * x3 - x1 * y3 + (y3 - y1) * px + (x1 - x3) * py);
                let t = 1.0 / (2.0 * area) * (x1 * y2 - y1 * x2 + (y1 - y2) * px + (x2 - x1) * py);
                s > 0.0 && t > 0.0 && (1.0 - s - t) > 0.0
            }
            ShapePayload::Line { end } => {
                let (cx, cy) = (end.x - self.x, end.y - self.y);
                let len_sq = cx * cx + cy * cy;
                let param = if len_sq != 0.0 {
                    (((px - self.x) * cx + (py - self.y) * cy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let nx = self.x + param * cx;
                let ny = self.y + param * cy;
                ((px - nx).powi(2) + (py - ny).powi(2)).sqrt() < LINE_HIT_TOLERANCE
            }
        }
    }

    /// Deep copy. Keeps the id when `preserve_id` (tween keyframes), otherwise draws a new one.
    pub fn clone_shape(&self, preserve_id: bool, ids: &mut ShapeIdGen) -> Self {
        let mut out = self.clone();
        if !preserve_id {
            out.id = ids.next_id();
        }
        out
    }

    /// Moves the shape; lines move both endpoints.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.x += dx;
        self.y += dy;
        if let ShapePayload::Line { end } = &mut self.payload {
            end.x += dx;
            end.y += dy;
        }
    }

    /// Sets the box, flipping negative extents. Lines keep their direction and
    /// are refit onto the new envelope.
    pub fn set_bounds(&mut self, bounds: Bounds) {
        let b = bounds.normalized();
        if let ShapePayload::Line { end } = &mut self.payload {
            let old = Bounds::from_points(Point::new(self.x, self.y), *end);
            let map = |v: f64, o: f64, ow: f64, n: f64, nw: f64| {
                if ow == 0.0 { n } else { n + (v - o) / ow * nw }
            };
            let start = Point::new(
                map(self.x, old.x, old.width, b.x, b.width),
                map(self.y, old.y, old.height, b.y, b.height),
            );
            *end = Point::new(
                map(end.x, old.x, old.width, b.x, b.width),
                map(end.y, old.y, old.height, b.y, b.height),
            );
            self.x = start.x;
            self.y = start.y;
            self.width = b.width;
            self.height = b.height;
            return;
        }
        self.x = b.x;
        self.y = b.y;
        self.width = b.width;
        self.height = b.height;
    }

    /// Scales the box around its top-left corner.
    pub fn scale(&mut self, factor: f64) {
        self.width *= factor;
        self.height *= factor;
        if let ShapePayload::Line { end } = &mut self.payload {
            end.x = self.x + (end.x - self.x) * factor;
            end.y = self.y + (end.y - self.y) * factor;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/shape.rs"]
mod tests;
