use std::collections::HashSet;

use crate::foundation::core::lerp;
use crate::foundation::ids::ShapeId;
use crate::model::frame::Frame;
use crate::model::shape::{Shape, ShapePayload};

/// Shapes to draw between keyframe `a` and its successor `b` at eased progress `t`.
///
/// Shapes are joined by id, not by position. The result lists `a`'s shapes in
/// paint order followed by shapes that only exist in `b`:
///
/// - in both with the same type: numeric properties are lerped, everything
///   else comes from `a`;
/// - only in `a` (or in both with different types): `a`'s shape fading out
///   with `opacity * (1 - t)`;
/// - only in `b`, and `t > 0`: `b`'s shape fading in with `opacity * t`.
pub fn interpolate_shapes(a: &Frame, b: Option<&Frame>, t: f64) -> Vec<Shape> {
    let Some(b) = b.filter(|_| t != 0.0) else {
        return a.shapes.clone();
    };

    let mut out = Vec::with_capacity(a.shapes.len() + b.shapes.len());
    let mut seen: HashSet<&ShapeId> = HashSet::with_capacity(a.shapes.len());
    for s1 in &a.shapes {
        if !seen.insert(&s1.id) {
            continue;
        }
        match b.shapes.iter().find(|s| s.id == s1.id) {
            Some(s2) if s2.shape_type() == s1.shape_type() => out.push(tween(s1, s2, t)),
            other => {
                if other.is_some() {
                    tracing::warn!(id = %s1.id, "shape type changed between keyframes; not tweening");
                }
                out.push(faded(s1, 1.0 - t));
            }
        }
    }
    if t > 0.0 {
        for s2 in &b.shapes {
            if seen.insert(&s2.id) {
                out.push(faded(s2, t));
            }
        }
    }
    out
}

fn faded(shape: &Shape, factor: f64) -> Shape {
    let mut out = shape.clone();
    out.style.opacity *= factor;
    out
}

fn tween(s1: &Shape, s2: &Shape, t: f64) -> Shape {
    let mut out = s1.clone();
    out.x = lerp(s1.x, s2.x, t);
    out.y = lerp(s1.y, s2.y, t);
    out.width = lerp(s1.width, s2.width, t);
    out.height = lerp(s1.height, s2.height, t);
    out.rotation = lerp(s1.rotation, s2.rotation, t);
    out.style.stroke_width = lerp(s1.style.stroke_width, s2.style.stroke_width, t);
    out.style.corner_radius = lerp(s1.style.corner_radius, s2.style.corner_radius, t);
    out.style.opacity = lerp(s1.style.opacity, s2.style.opacity, t);
    if let (ShapePayload::Line { end }, ShapePayload::Line { end: end2 }) =
        (&mut out.payload, &s2.payload)
    {
        end.x = lerp(end.x, end2.x, t);
        end.y = lerp(end.y, end2.y, t);
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interp.rs"]
mod tests;
