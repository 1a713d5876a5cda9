use std::cell::OnceCell;

use crate::foundation::core::{Canvas, Rgb8};
use crate::model::shape::Shape;

/// Floor applied to every frame duration.
pub const MIN_FRAME_DURATION_MS: u32 = 10;
pub const DEFAULT_FRAME_DURATION_MS: u32 = 100;

/// One keyframe: a sparse pixel layer, shapes in paint order, and a display duration.
///
/// The pixel layer is decoded to RGBA lazily. Pixel writes drop the decoded
/// buffer and the next [`Frame::pixel_rgba`] call rebuilds it.
#[derive(Clone, Debug)]
pub struct Frame {
    canvas: Canvas,
    pixels: Vec<Option<Rgb8>>,
    /// Paint order; the last shape is drawn on top and hit first.
    pub shapes: Vec<Shape>,
    duration_ms: u32,
    raster: OnceCell<Vec<u8>>,
}

/// Structural copy of a frame's editable content.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameSnapshot {
    pub duration_ms: u32,
    pub pixels: Vec<Option<Rgb8>>,
    pub shapes: Vec<Shape>,
}

impl Frame {
    pub fn blank(canvas: Canvas, duration_ms: u32) -> Self {
        Self {
            canvas,
            pixels: vec![None; canvas.pixel_count()],
            shapes: Vec::new(),
            duration_ms: duration_ms.max(MIN_FRAME_DURATION_MS),
            raster: OnceCell::new(),
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn duration_ms(&self) -> u32 {
        self.duration_ms
    }

    pub fn set_duration_ms(&mut self, duration_ms: u32) {
        self.duration_ms = duration_ms.max(MIN_FRAME_DURATION_MS);
    }

    pub fn pixels(&self) -> &[Option<Rgb8>] {
        &self.pixels
    }

    pub fn pixel(&self, x: i64, y: i64) -> Option<Rgb8> {
        self.canvas.index(x, y).and_then(|i| self.pixels[i])
    }

    /// Writes one cell. Coordinates outside the canvas are ignored and reported as `false`.
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Option<Rgb8>) -> bool {
        match self.canvas.index(x, y) {
            Some(i) => self.set_pixel_index(i, color),
            None => false,
        }
    }

    pub fn set_pixel_index(&mut self, index: usize, color: Option<Rgb8>) -> bool {
        let Some(slot) = self.pixels.get_mut(index) else {
            return false;
        };
        *slot = color;
        self.raster.take();
        true
    }

    pub fn set_pixel_count(&self) -> usize {
        self.pixels.iter().filter(|p| p.is_some()).count()
    }

    /// Removes every pixel and shape.
    pub fn clear(&mut self) {
        self.pixels.fill(None);
        self.shapes.clear();
        self.raster.take();
    }

    pub fn invert_pixels(&mut self) {
        for p in self.pixels.iter_mut().flatten() {
            *p = p.inverted();
        }
        self.raster.take();
    }

    pub fn is_raster_cached(&self) -> bool {
        self.raster.get().is_some()
    }

    /// Straight RGBA8 of the pixel layer: set cells opaque, unset cells fully transparent.
    pub fn pixel_rgba(&self) -> &[u8] {
        self.raster.get_or_init(|| {
            let mut data = vec![0u8; self.pixels.len() * 4];
            for (px, color) in data.chunks_exact_mut(4).zip(&self.pixels) {
                if let Some(c) = color {
                    px.copy_from_slice(&[c.r, c.g, c.b, 255]);
                }
            }
            data
        })
    }

    pub fn shape_index(&self, id: &crate::foundation::ids::ShapeId) -> Option<usize> {
        self.shapes.iter().position(|s| &s.id == id)
    }

    /// Topmost shape containing the point.
    pub fn hit_test(&self, px: f64, py: f64) -> Option<usize> {
        self.shapes.iter().rposition(|s| s.contains_point(px, py))
    }

    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            duration_ms: self.duration_ms,
            pixels: self.pixels.clone(),
            shapes: self.shapes.clone(),
        }
    }

    /// Replaces content with a snapshot taken from a frame of the same canvas size.
    pub fn restore(&mut self, snapshot: FrameSnapshot) {
        let mut pixels = snapshot.pixels;
        pixels.resize(self.canvas.pixel_count(), None);
        self.pixels = pixels;
        self.shapes = snapshot.shapes;
        self.duration_ms = snapshot.duration_ms.max(MIN_FRAME_DURATION_MS);
        self.raster.take();
    }

    /// Re-lays the pixel grid for a new canvas, keeping the top-left overlap.
    pub fn resize(&mut self, canvas: Canvas) {
        let mut pixels = vec![None; canvas.pixel_count()];
        let copy_w = self.canvas.width.min(canvas.width) as usize;
        let copy_h = self.canvas.height.min(canvas.height) as usize;
        let (old_w, new_w) = (self.canvas.width as usize, canvas.width as usize);
        for y in 0..copy_h {
            pixels[y * new_w..y * new_w + copy_w]
                .copy_from_slice(&self.pixels[y * old_w..y * old_w + copy_w]);
        }
        self.canvas = canvas;
        self.pixels = pixels;
        self.raster.take();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/frame.rs"]
mod tests;
