use super::*;
use crate::foundation::config::StyleDefaults;
use crate::foundation::core::{Bounds, Canvas};
use crate::foundation::ids::ShapeId;
use crate::model::shape::{Shape, ShapeType};

#[derive(Default)]
struct Recorder {
    log: Vec<String>,
}

impl Surface for Recorder {
    fn canvas(&self) -> Canvas {
        Canvas::new(8, 8).unwrap()
    }

    fn clear(&mut self, color: Rgb8) {
        self.log.push(format!("clear {color}"));
    }

    fn draw_pixels(&mut self, frame: &Frame) -> StudioResult<()> {
        self.log.push(format!("pixels {}", frame.set_pixel_count()));
        Ok(())
    }

    fn draw_shape(&mut self, shape: &crate::model::shape::Shape) -> StudioResult<()> {
        self.log.push(format!("shape {} x={}", shape.id, shape.x));
        Ok(())
    }

    fn read_rgba(&self) -> Vec<u8> {
        Vec::new()
    }
}

fn frame_with_rect(x: f64) -> Frame {
    let canvas = Canvas::new(8, 8).unwrap();
    let mut f = Frame::blank(canvas, 100);
    f.shapes.push(Shape::new(
        ShapeId::from(1u64),
        ShapeType::Rect,
        Bounds::new(x, 0.0, 2.0, 2.0),
        &StyleDefaults::default(),
    ));
    f
}

#[test]
fn draws_background_pixels_then_shapes() {
    let mut frame = frame_with_rect(0.0);
    frame.set_pixel(1, 1, Some(Rgb8::WHITE));
    let mut rec = Recorder::default();
    render_frame(&mut rec, &frame, None, Rgb8::BLACK).unwrap();
    assert_eq!(rec.log, vec!["clear #000000", "pixels 1", "shape 1 x=0"]);
}

#[test]
fn tween_moves_shapes() {
    let a = frame_with_rect(0.0);
    let b = frame_with_rect(4.0);
    let mut rec = Recorder::default();
    render_frame(&mut rec, &a, Some((&b, 0.5)), Rgb8::BLACK).unwrap();
    assert_eq!(rec.log.last().map(String::as_str), Some("shape 1 x=2"));
}
