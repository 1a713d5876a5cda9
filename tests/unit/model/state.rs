use super::*;

fn state_with(durations: &[u32]) -> State {
    let canvas = Canvas::new(8, 8).unwrap();
    let frames = durations.iter().map(|&d| Frame::blank(canvas, d)).collect();
    State::with_frames("idle", "Idle", frames).unwrap()
}

#[test]
fn empty_frame_list_is_rejected() {
    assert!(State::with_frames("x", "X", Vec::new()).is_none());
}

#[test]
fn removing_last_frame_clears_in_place() {
    let mut s = state_with(&[100]);
    s.frame_mut(0).unwrap().set_pixel(1, 1, Some(crate::Rgb8::WHITE));
    assert!(s.remove_frame(0));
    assert_eq!(s.frame_count(), 1);
    assert_eq!(s.frames()[0].set_pixel_count(), 0);
    assert!(!s.remove_frame(3));
}

#[test]
fn durations_and_offsets() {
    let s = state_with(&[100, 200, 100]);
    assert_eq!(s.total_duration_ms(), 400);
    assert_eq!(s.offset_ms(0), 0);
    assert_eq!(s.offset_ms(2), 300);
    assert_eq!(s.durations_ms(), vec![100, 200, 100]);
}

#[test]
fn insert_clamps_to_end() {
    let mut s = state_with(&[100]);
    let at = s.insert_frame(9, Frame::blank(Canvas::new(8, 8).unwrap(), 50));
    assert_eq!(at, 1);
    s.reverse_frames();
    assert_eq!(s.frames()[0].duration_ms(), 50);
}

#[test]
fn slugify_collapses_separators() {
    assert_eq!(slugify("Happy Face!"), "happy-face");
    assert_eq!(slugify("  --Look  Left-- "), "look-left");
    assert_eq!(slugify("%%%"), "state");
}
