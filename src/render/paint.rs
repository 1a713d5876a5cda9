use kurbo::{Affine, BezPath, Point, Shape as _};

use crate::foundation::core::Rgb8;
use crate::model::shape::{Shape, ShapePayload};

/// Flattening tolerance for curved primitives, in pixels.
const CURVE_TOLERANCE: f64 = 0.1;
/// Lines are never thinner than this.
pub const MIN_LINE_WIDTH: f64 = 2.0;
pub const TEXT_FONT_FAMILY: &str = "Inter, sans-serif";

/// Backend-agnostic drawing command for one shape.
///
/// `transform` maps the op's local coordinates to canvas pixels, rotation included.
#[derive(Clone, Debug, PartialEq)]
pub enum PaintOp {
    Fill {
        path: BezPath,
        transform: Affine,
        color: Rgb8,
    },
    Stroke {
        path: BezPath,
        transform: Affine,
        width: f64,
        color: Rgb8,
    },
    /// `origin` is the left end of the baseline.
    Text {
        text: String,
        font_size: f64,
        origin: Point,
        transform: Affine,
        color: Rgb8,
    },
}

/// Rotation of `degrees` about the center of the shape's bounds.
pub fn rotation_transform(shape: &Shape) -> Affine {
    if shape.rotation == 0.0 {
        return Affine::IDENTITY;
    }
    Affine::rotate_about(shape.rotation.to_radians(), shape.bounds().center())
}

/// Lowers a shape into fill/stroke/text ops, in drawing order.
///
/// Opacity and blend mode are not part of the ops; they apply when the
/// rasterized shape is composited.
pub fn paint_ops(shape: &Shape) -> Vec<PaintOp> {
    let rot = rotation_transform(shape);
    let style = &shape.style;
    let (x, y, w, h) = (shape.x, shape.y, shape.width, shape.height);

    let fill_and_stroke = |path: BezPath, transform: Affine| {
        let mut ops = Vec::with_capacity(2);
        if style.stroke_width > 0.0 {
            ops.push(PaintOp::Fill {
                path: path.clone(),
                transform,
                color: style.color,
            });
            ops.push(PaintOp::Stroke {
                path,
                transform,
                width: style.stroke_width,
                color: style.stroke_color,
            });
        } else {
            ops.push(PaintOp::Fill {
                path,
                transform,
                color: style.color,
            });
        }
        ops
    };

    match &shape.payload {
        ShapePayload::Rect => {
            let path = if style.corner_radius > 0.0 {
                rounded_rect_path(x, y, w, h, style.corner_radius)
            } else {
                kurbo::Rect::new(x, y, x + w, y + h).to_path(CURVE_TOLERANCE)
            };
            fill_and_stroke(path, rot)
        }
        ShapePayload::Ellipse => {
            let ellipse = kurbo::Ellipse::new(
                (x + w / 2.0, y + h / 2.0),
                ((w / 2.0).abs(), (h / 2.0).abs()),
                0.0,
            );
            fill_and_stroke(ellipse.to_path(CURVE_TOLERANCE), rot)
        }
        ShapePayload::Triangle => {
            let mut path = BezPath::new();
            path.move_to((x + w / 2.0, y));
            path.line_to((x, y + h));
            path.line_to((x + w, y + h));
            path.close_path();
            fill_and_stroke(path, rot)
        }
        ShapePayload::Line { end } => {
            let mut path = BezPath::new();
            path.move_to((x, y));
            path.line_to(*end);
            vec![PaintOp::Stroke {
                path,
                transform: rot,
                width: style.stroke_width.max(MIN_LINE_WIDTH),
                color: style.color,
            }]
        }
        ShapePayload::Path(geom) => {
            if geom.is_empty() {
                return Vec::new();
            }
            let transform = rot * geom.design_to_canvas(&shape.box_bounds());
            fill_and_stroke(geom.to_bezpath(), transform)
        }
        ShapePayload::Text { text, font_size } => vec![PaintOp::Text {
            text: text.clone(),
            font_size: *font_size,
            origin: Point::new(x, y + font_size),
            transform: rot,
            color: style.color,
        }],
    }
}

/// Rectangle with quadratic corners; the radius is capped at half of each side.
pub fn rounded_rect_path(x: f64, y: f64, w: f64, h: f64, radius: f64) -> BezPath {
    let r = radius.min(w.abs() / 2.0).min(h.abs() / 2.0);
    let mut p = BezPath::new();
    p.move_to((x + r, y));
    p.line_to((x + w - r, y));
    p.quad_to((x + w, y), (x + w, y + r));
    p.line_to((x + w, y + h - r));
    p.quad_to((x + w, y + h), (x + w - r, y + h));
    p.line_to((x + r, y + h));
    p.quad_to((x, y + h), (x, y + h - r));
    p.line_to((x, y + r));
    p.quad_to((x, y), (x + r, y));
    p.close_path();
    p
}

#[cfg(test)]
#[path = "../../tests/unit/render/paint.rs"]
mod tests;
