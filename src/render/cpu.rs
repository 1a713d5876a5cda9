use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::core::{Affine, BezPath, Canvas, Point, Rgb8};
use crate::foundation::error::{StudioError, StudioResult};
use crate::model::frame::Frame;
use crate::model::shape::Shape;
use crate::render::composite::{blend_in_place, over, unpremultiply};
use crate::render::paint::{PaintOp, TEXT_FONT_FAMILY, paint_ops};
use crate::render::surface::Surface;

/// CPU rasterizer: vector ops through `vello_cpu`, text through `resvg`.
///
/// Every shape is rendered into its own transparent layer and then composited
/// onto the premultiplied frame buffer with the shape's opacity and blend mode.
pub struct CpuSurface {
    canvas: Canvas,
    width: u16,
    height: u16,
    data: Vec<u8>,
    fontdb: Option<Arc<usvg::fontdb::Database>>,
}

impl std::fmt::Debug for CpuSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuSurface")
            .field("canvas", &self.canvas)
            .field("fonts_loaded", &self.fontdb.is_some())
            .finish()
    }
}

impl CpuSurface {
    pub fn new(canvas: Canvas) -> StudioResult<Self> {
        let width: u16 = canvas
            .width
            .try_into()
            .map_err(|_| StudioError::render("canvas width exceeds u16"))?;
        let height: u16 = canvas
            .height
            .try_into()
            .map_err(|_| StudioError::render("canvas height exceeds u16"))?;
        Ok(Self {
            canvas,
            width,
            height,
            data: vec![0; canvas.pixel_count() * 4],
            fontdb: None,
        })
    }

    /// Uses an already loaded font database instead of scanning system fonts.
    pub fn with_fonts(mut self, fontdb: Arc<usvg::fontdb::Database>) -> Self {
        self.fontdb = Some(fontdb);
        self
    }

    /// Premultiplied RGBA8 as stored.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    fn fonts(&mut self) -> Arc<usvg::fontdb::Database> {
        self.fontdb
            .get_or_insert_with(|| {
                let mut db = usvg::fontdb::Database::new();
                db.load_system_fonts();
                tracing::debug!(faces = db.len(), "loaded system fonts");
                Arc::new(db)
            })
            .clone()
    }

    fn vector_layer(&self, ops: &[PaintOp]) -> Vec<u8> {
        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        for op in ops {
            match op {
                PaintOp::Fill {
                    path,
                    transform,
                    color,
                } => {
                    ctx.set_transform(affine_to_cpu(*transform));
                    ctx.set_paint(color_to_cpu(*color));
                    ctx.fill_path(&bezpath_to_cpu(path));
                }
                PaintOp::Stroke {
                    path,
                    transform,
                    width,
                    color,
                } => {
                    ctx.set_transform(affine_to_cpu(*transform));
                    ctx.set_paint(color_to_cpu(*color));
                    ctx.set_stroke(vello_cpu::kurbo::Stroke::new(*width));
                    ctx.stroke_path(&bezpath_to_cpu(path));
                }
                PaintOp::Text { .. } => {}
            }
        }
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        pixmap.data_as_u8_slice().to_vec()
    }

    fn text_layer(
        &mut self,
        text: &str,
        font_size: f64,
        origin: Point,
        transform: Affine,
        color: Rgb8,
    ) -> StudioResult<Vec<u8>> {
        let fontdb = self.fonts();
        if fontdb.is_empty() {
            tracing::warn!(text, "no fonts available, text shape left blank");
        }
        let svg = text_svg(self.canvas, text, font_size, origin, transform, color);
        let opts = usvg::Options {
            fontdb,
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg.as_bytes(), &opts).context("parse text svg")?;
        let mut pixmap = resvg::tiny_skia::Pixmap::new(self.canvas.width, self.canvas.height)
            .ok_or_else(|| StudioError::render("allocate text pixmap"))?;
        resvg::render(
            &tree,
            resvg::tiny_skia::Transform::identity(),
            &mut pixmap.as_mut(),
        );
        Ok(pixmap.data().to_vec())
    }
}

impl Surface for CpuSurface {
    fn canvas(&self) -> Canvas {
        self.canvas
    }

    fn clear(&mut self, color: Rgb8) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, 255]);
        }
    }

    fn draw_pixels(&mut self, frame: &Frame) -> StudioResult<()> {
        if frame.canvas() != self.canvas {
            return Err(StudioError::render(format!(
                "frame canvas {:?} does not match surface {:?}",
                frame.canvas(),
                self.canvas
            )));
        }
        for (d, s) in self.data.chunks_exact_mut(4).zip(frame.pixel_rgba().chunks_exact(4)) {
            if s[3] == 0 {
                continue;
            }
            let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], 1.0);
            d.copy_from_slice(&out);
        }
        Ok(())
    }

    fn draw_shape(&mut self, shape: &Shape) -> StudioResult<()> {
        let opacity = shape.style.opacity.clamp(0.0, 1.0) as f32;
        if opacity <= 0.0 {
            return Ok(());
        }
        let ops = paint_ops(shape);
        if ops.is_empty() {
            return Ok(());
        }
        let layer = match &ops[0] {
            PaintOp::Text {
                text,
                font_size,
                origin,
                transform,
                color,
            } => self.text_layer(text, *font_size, *origin, *transform, *color)?,
            _ => self.vector_layer(&ops),
        };
        blend_in_place(&mut self.data, &layer, shape.style.blend_mode, opacity)
    }

    fn read_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.data.len());
        for px in self.data.chunks_exact(4) {
            out.extend_from_slice(&unpremultiply([px[0], px[1], px[2], px[3]]));
        }
        out
    }
}

fn text_svg(
    canvas: Canvas,
    text: &str,
    font_size: f64,
    origin: Point,
    transform: Affine,
    color: Rgb8,
) -> String {
    let [a, b, c, d, e, f] = transform.as_coeffs();
    format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}">"#,
            r#"<text x="{x}" y="{y}" font-family="{family}" font-size="{size}" fill="{fill}" "#,
            r#"transform="matrix({a} {b} {c} {d} {e} {f})">{body}</text></svg>"#
        ),
        w = canvas.width,
        h = canvas.height,
        x = origin.x,
        y = origin.y,
        family = TEXT_FONT_FAMILY,
        size = font_size,
        fill = color.to_hex(),
        a = a,
        b = b,
        c = c,
        d = d,
        e = e,
        f = f,
        body = escape_xml(text),
    )
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn color_to_cpu(c: Rgb8) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, 255)
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3))
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
