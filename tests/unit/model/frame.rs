use super::*;
use crate::foundation::config::StyleDefaults;
use crate::foundation::core::Bounds;
use crate::foundation::ids::ShapeId;
use crate::model::shape::ShapeType;

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas::new(w, h).unwrap()
}

fn rect(id: u64, x: f64) -> Shape {
    Shape::new(
        ShapeId::from(id),
        ShapeType::Rect,
        Bounds::new(x, 0.0, 10.0, 10.0),
        &StyleDefaults::default(),
    )
}

#[test]
fn raster_is_rebuilt_lazily_after_writes() {
    let mut f = Frame::blank(canvas(8, 8), 100);
    assert!(!f.is_raster_cached());
    f.set_pixel(1, 0, Some(Rgb8::new(10, 20, 30)));
    f.set_pixel(2, 0, Some(Rgb8::new(1, 2, 3)));
    assert!(!f.is_raster_cached());

    let rgba = f.pixel_rgba().to_vec();
    assert!(f.is_raster_cached());
    assert_eq!(&rgba[0..4], &[0, 0, 0, 0]);
    assert_eq!(&rgba[4..8], &[10, 20, 30, 255]);

    f.set_pixel(1, 0, None);
    assert!(!f.is_raster_cached());
    assert_eq!(&f.pixel_rgba()[4..8], &[0, 0, 0, 0]);
}

#[test]
fn out_of_bounds_writes_are_ignored() {
    let mut f = Frame::blank(canvas(8, 8), 100);
    assert!(!f.set_pixel(-1, 0, Some(Rgb8::WHITE)));
    assert!(!f.set_pixel(8, 3, Some(Rgb8::WHITE)));
    assert!(!f.set_pixel_index(64, Some(Rgb8::WHITE)));
    assert_eq!(f.set_pixel_count(), 0);
}

#[test]
fn duration_has_a_floor() {
    let mut f = Frame::blank(canvas(8, 8), 0);
    assert_eq!(f.duration_ms(), MIN_FRAME_DURATION_MS);
    f.set_duration_ms(250);
    assert_eq!(f.duration_ms(), 250);
}

#[test]
fn snapshot_restore_round_trips_content() {
    let mut f = Frame::blank(canvas(8, 8), 120);
    f.set_pixel(3, 3, Some(Rgb8::new(255, 0, 0)));
    f.shapes.push(rect(1, 0.0));
    let snap = f.snapshot();

    f.clear();
    f.set_duration_ms(500);
    f.restore(snap.clone());

    assert_eq!(f.snapshot(), snap);
    assert_eq!(f.pixel(3, 3), Some(Rgb8::new(255, 0, 0)));
}

#[test]
fn hit_test_prefers_topmost() {
    let mut f = Frame::blank(canvas(64, 64), 100);
    f.shapes.push(rect(1, 0.0));
    f.shapes.push(rect(2, 5.0));
    assert_eq!(f.hit_test(7.0, 5.0), Some(1));
    assert_eq!(f.hit_test(1.0, 5.0), Some(0));
    assert_eq!(f.hit_test(40.0, 40.0), None);
}

#[test]
fn shrinking_keeps_top_left_region_only() {
    let mut f = Frame::blank(canvas(100, 100), 100);
    for y in 0..100 {
        for x in 0..100 {
            let v = ((x + y) % 256) as u8;
            f.set_pixel(x, y, Some(Rgb8::new(v, 0, 0)));
        }
    }
    f.resize(canvas(50, 50));
    assert_eq!(f.pixels().len(), 2500);
    for y in 0..50i64 {
        for x in 0..50i64 {
            let v = ((x + y) % 256) as u8;
            assert_eq!(f.pixels()[(y * 50 + x) as usize], Some(Rgb8::new(v, 0, 0)));
        }
    }
}

#[test]
fn growing_leaves_new_area_empty() {
    let mut f = Frame::blank(canvas(8, 8), 100);
    f.set_pixel(7, 7, Some(Rgb8::WHITE));
    f.resize(canvas(16, 10));
    assert_eq!(f.pixel(7, 7), Some(Rgb8::WHITE));
    assert_eq!(f.pixel(8, 7), None);
    assert_eq!(f.set_pixel_count(), 1);
}

#[test]
fn invert_touches_only_set_pixels() {
    let mut f = Frame::blank(canvas(8, 8), 100);
    f.set_pixel(0, 0, Some(Rgb8::new(0, 255, 16)));
    f.invert_pixels();
    assert_eq!(f.pixel(0, 0), Some(Rgb8::new(255, 0, 239)));
    assert_eq!(f.pixel(1, 0), None);
}
