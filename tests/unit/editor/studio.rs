use super::*;
use crate::animation::ease::Easing;
use crate::playback::scheduler::ManualScheduler;

fn studio() -> Studio {
    let config = StudioConfig {
        canvas: Canvas::new(100, 100).unwrap(),
        ..StudioConfig::default()
    };
    Studio::new(config)
}

fn rect(studio: &mut Studio, x: f64, y: f64) -> ShapeId {
    studio.add_shape(ShapeType::Rect, Bounds::new(x, y, 10.0, 10.0))
}

#[test]
fn adding_a_shape_selects_it_and_is_undoable() {
    let mut s = studio();
    let id = rect(&mut s, 5.0, 5.0);
    assert_eq!(s.selected(), Some(&id));
    assert_eq!(s.current_frame().shapes.len(), 1);
    assert!(s.undo());
    assert!(s.current_frame().shapes.is_empty());
    assert_eq!(s.selected(), None);
    assert!(s.redo());
    assert_eq!(s.current_frame().shapes.len(), 1);
    assert!(!s.redo());
}

#[test]
fn shape_operations_need_a_selection() {
    let mut s = studio();
    rect(&mut s, 0.0, 0.0);
    s.deselect();
    let undo_before = s.can_undo();
    for err in [
        s.move_shape(1.0, 1.0).unwrap_err(),
        s.delete_shape().unwrap_err(),
        s.scale_shape(1.1).unwrap_err(),
        s.align_shape(Align::Left).unwrap_err(),
        s.duplicate_shape().unwrap_err(),
    ] {
        assert!(matches!(err, StudioError::Selection(_)), "{err}");
    }
    assert_eq!(s.can_undo(), undo_before);
    assert_eq!(s.current_frame().shapes[0].x, 0.0);
}

#[test]
fn duplicate_and_paste_get_new_ids_and_offsets() {
    let mut s = studio();
    let id = rect(&mut s, 5.0, 5.0);
    let dup = s.duplicate_shape().unwrap();
    assert_ne!(dup, id);
    let shape = s.selected_shape().unwrap();
    assert_eq!((shape.x, shape.y), (25.0, 25.0));

    s.select(&id).unwrap();
    s.copy_shape().unwrap();
    let pasted = s.paste_shape().unwrap();
    assert_ne!(pasted, id);
    assert_ne!(pasted, dup);
    let shape = s.selected_shape().unwrap();
    assert_eq!((shape.x, shape.y), (15.0, 15.0));
    assert_eq!(s.current_frame().shapes.len(), 3);
}

#[test]
fn select_at_prefers_topmost() {
    let mut s = studio();
    let below = rect(&mut s, 0.0, 0.0);
    let above = rect(&mut s, 5.0, 5.0);
    assert_eq!(s.select_at(7.0, 7.0), Some(above));
    assert_eq!(s.select_at(2.0, 2.0), Some(below));
    assert_eq!(s.select_at(90.0, 90.0), None);
    assert_eq!(s.selected(), None);
}

#[test]
fn resize_normalizes_negative_extents() {
    let mut s = studio();
    rect(&mut s, 0.0, 0.0);
    s.resize_shape(Bounds::new(50.0, 50.0, -20.0, -10.0)).unwrap();
    let b = s.selected_shape().unwrap().box_bounds();
    assert_eq!((b.x, b.y, b.width, b.height), (30.0, 40.0, 20.0, 10.0));
}

#[test]
fn align_and_scale() {
    let mut s = studio();
    rect(&mut s, 3.0, 4.0);
    s.align_shape(Align::Right).unwrap();
    s.align_shape(Align::CenterV).unwrap();
    let shape = s.selected_shape().unwrap();
    assert_eq!((shape.x, shape.y), (90.0, 45.0));
    s.scale_shape(2.0).unwrap();
    let shape = s.selected_shape().unwrap();
    assert_eq!((shape.x, shape.width, shape.height), (90.0, 20.0, 20.0));
}

#[test]
fn aligning_a_line_moves_both_ends() {
    let mut s = studio();
    s.add_line(Point::new(40.0, 10.0), Point::new(20.0, 30.0));
    s.align_shape(Align::Left).unwrap();
    let line = s.selected_shape().unwrap();
    assert_eq!((line.x, line.y), (20.0, 10.0));
    assert_eq!(line.line_end(), Some(Point::new(0.0, 30.0)));
}

#[test]
fn layer_order_swaps_neighbours() {
    let mut s = studio();
    let a = rect(&mut s, 0.0, 0.0);
    let b = rect(&mut s, 1.0, 1.0);
    s.select(&a).unwrap();
    assert!(s.move_layer_up().unwrap());
    assert!(!s.move_layer_up().unwrap());
    let order: Vec<&ShapeId> = s.current_frame().shapes.iter().map(|x| &x.id).collect();
    assert_eq!(order, vec![&b, &a]);
    assert!(s.move_layer_down().unwrap());
    assert!(!s.move_layer_down().unwrap());
}

#[test]
fn frame_lifecycle() {
    let mut s = studio();
    rect(&mut s, 0.0, 0.0);
    assert_eq!(s.duplicate_frame(), 1);
    assert_eq!(s.frame_count(), 2);
    assert_eq!(
        s.current_frame().shapes[0].id,
        s.project().active_state().frames()[0].shapes[0].id
    );
    assert_eq!(s.add_frame(), 2);
    assert!(s.current_frame().shapes.is_empty());

    s.delete_frame();
    assert_eq!(s.frame_count(), 2);
    assert_eq!(s.current_frame_index(), 1);
    s.delete_frame();
    s.delete_frame();
    assert_eq!(s.frame_count(), 1);
    assert!(s.current_frame().shapes.is_empty());
    assert!(s.select_frame(3).is_err());
}

#[test]
fn frame_duration_respects_minimum() {
    let mut s = studio();
    s.set_frame_duration(3);
    assert_eq!(s.current_frame().duration_ms(), 10);
    s.set_frame_duration(250);
    assert_eq!(s.current_frame().duration_ms(), 250);
    assert!(s.undo());
    assert_eq!(s.current_frame().duration_ms(), 10);
}

#[test]
fn copy_paste_frame_replaces_content() {
    let mut s = studio();
    s.set_pixel(1, 1, Rgb8::WHITE);
    s.copy_frame();
    s.add_frame();
    s.paste_frame().unwrap();
    assert_eq!(s.current_frame().pixel(1, 1), Some(Rgb8::WHITE));
    assert!(s.undo());
    assert_eq!(s.current_frame().pixel(1, 1), None);
}

#[test]
fn paste_frame_without_copy_fails() {
    let mut s = studio();
    assert!(matches!(s.paste_frame(), Err(StudioError::Selection(_))));
}

#[test]
fn reverse_keeps_current_content() {
    let mut s = studio();
    s.set_pixel(0, 0, Rgb8::WHITE);
    s.add_frame();
    s.add_frame();
    s.select_frame(0).unwrap();
    s.reverse_frames();
    assert_eq!(s.current_frame_index(), 2);
    assert_eq!(s.current_frame().pixel(0, 0), Some(Rgb8::WHITE));
}

#[test]
fn pixels_are_bounds_checked() {
    let mut s = studio();
    assert!(!s.set_pixel(-1, 0, Rgb8::WHITE));
    assert!(!s.set_pixel(100, 0, Rgb8::WHITE));
    assert!(s.paint_stroke(&[(0, 0), (1, 0), (500, 500)], Some(Rgb8::WHITE)));
    assert_eq!(s.current_frame().set_pixel_count(), 2);
    s.invert_colors();
    assert_eq!(s.current_frame().pixel(1, 0), Some(Rgb8::BLACK));
    assert!(s.erase_pixel(1, 0));
    assert_eq!(s.current_frame().set_pixel_count(), 1);
}

#[test]
fn clear_frame_removes_everything() {
    let mut s = studio();
    s.set_pixel(3, 3, Rgb8::WHITE);
    rect(&mut s, 0.0, 0.0);
    s.clear_frame();
    assert_eq!(s.current_frame().set_pixel_count(), 0);
    assert!(s.current_frame().shapes.is_empty());
    assert_eq!(s.selected(), None);
}

#[test]
fn resize_canvas_validates_range() {
    let mut s = studio();
    s.set_pixel(10, 10, Rgb8::WHITE);
    s.set_pixel(60, 60, Rgb8::WHITE);
    assert!(matches!(s.resize_canvas(4, 50), Err(StudioError::Validation(_))));
    assert_eq!(s.project().canvas(), Canvas::new(100, 100).unwrap());
    s.resize_canvas(50, 50).unwrap();
    assert_eq!(s.current_frame().pixel(10, 10), Some(Rgb8::WHITE));
    assert_eq!(s.current_frame().set_pixel_count(), 1);
    assert!(!s.can_undo());
}

#[test]
fn states_switch_and_delete() {
    let mut s = studio();
    s.add_frame();
    let happy = s.add_state("Happy");
    assert_eq!(happy, "happy");
    assert_eq!(s.add_state("Happy"), "happy-2");
    assert_eq!(s.project().active_state_id(), "idle");

    s.switch_state(&happy).unwrap();
    assert_eq!(s.current_frame_index(), 0);
    assert!(!s.can_undo());
    assert!(s.switch_state("nope").is_err());

    s.rename_state(&happy, "Joy").unwrap();
    assert_eq!(s.project().state("happy").unwrap().name, "Joy");

    s.delete_state(&happy).unwrap();
    assert_eq!(s.project().active_state_id(), "idle");
    s.delete_state("happy-2").unwrap();
    assert!(s.delete_state("idle").is_err());
}

#[test]
fn eye_preset_replaces_shapes() {
    let mut s = studio();
    rect(&mut s, 0.0, 0.0);
    s.style_defaults_mut().color = Rgb8::new(1, 2, 3);
    let [left, right] = s.apply_eye_preset(EyePreset::Evil);
    let shapes = &s.current_frame().shapes;
    assert_eq!(shapes.len(), 2);
    assert_eq!((&shapes[0].id, &shapes[1].id), (&left, &right));
    assert_eq!(shapes[0].style.color, Rgb8::new(1, 2, 3));
    assert!(s.undo());
    assert_eq!(s.current_frame().shapes.len(), 1);
}

#[test]
fn path_nodes_can_be_dragged() {
    let mut s = studio();
    s.add_path(Bounds::new(0.0, 0.0, 100.0, 60.0), "M0,0 L100,60 Z");
    s.move_path_node(1, NodeHandle::End, Point::new(50.0, 30.0)).unwrap();
    match &s.selected_shape().unwrap().payload {
        ShapePayload::Path(geom) => assert_eq!(geom.data(), "M0,0 L50,30 Z"),
        other => panic!("expected path, got {other:?}"),
    }
    assert!(s.move_path_node(2, NodeHandle::Ctrl1, Point::ORIGIN).is_err());
}

#[test]
fn style_and_interaction_updates() {
    let mut s = studio();
    rect(&mut s, 0.0, 0.0);
    s.update_style(|st| st.opacity = 3.0).unwrap();
    assert_eq!(s.selected_shape().unwrap().style.opacity, 1.0);
    s.set_interaction(Some(Interaction::click("happy"))).unwrap();
    assert!(s.selected_shape().unwrap().interaction.as_ref().unwrap().is_click());
    assert!(s.set_text("nope").is_err());
}

#[test]
fn imported_ids_are_not_reused() {
    let mut project = Project::new(Canvas::new(16, 16).unwrap());
    let f = project.active_state_mut().frame_mut(0).unwrap();
    f.shapes.push(Shape::new(
        ShapeId::from(41u64),
        ShapeType::Rect,
        Bounds::new(0.0, 0.0, 1.0, 1.0),
        &StyleDefaults::default(),
    ));
    let mut s = Studio::open(project, StudioConfig::default());
    assert_eq!(rect(&mut s, 0.0, 0.0).as_str(), "42");
}

#[test]
fn playback_publishes_interpolated_shapes() {
    let mut s = studio();
    let id = rect(&mut s, 0.0, 0.0);
    s.duplicate_frame();
    s.select(&id).unwrap();
    s.move_shape(40.0, 0.0).unwrap();
    s.select_frame(0).unwrap();
    s.set_easing(Easing::Linear);

    let mut sched = ManualScheduler::new();
    assert!(s.play(1000.0, &mut sched));
    let token = sched.fire().unwrap();
    let view = s.on_tick(token, 1050.0, &mut sched).unwrap();
    assert_eq!(view.tick.frame_index, 0);
    assert_eq!(view.shapes[0].x, 20.0);

    assert!(s.stop(&mut sched));
    assert_eq!(sched.pending_count(), 0);
    assert!(s.playback_view().is_none());
    assert!(!s.is_playing());
}

#[test]
fn once_playback_ends_on_last_frame() {
    let mut s = studio();
    s.add_frame();
    s.select_frame(0).unwrap();
    s.set_loop_mode(LoopMode::Once);
    let mut sched = ManualScheduler::new();
    s.play(0.0, &mut sched);
    let token = sched.fire().unwrap();
    assert!(s.on_tick(token, 500.0, &mut sched).is_none());
    assert_eq!(s.current_frame_index(), 1);
    assert!(!s.is_playing());
    assert_eq!(sched.pending_count(), 0);
}

fn three_frames_playing(s: &mut Studio, sched: &mut ManualScheduler) {
    s.add_frame();
    s.add_frame();
    s.select_frame(0).unwrap();
    assert!(s.play(0.0, sched));
    let token = sched.fire().unwrap();
    assert!(s.on_tick(token, 50.0, sched).is_some());
    assert_eq!(sched.pending_count(), 1);
}

#[test]
fn deleting_frames_while_playing_stops_playback() {
    let mut s = studio();
    let mut sched = ManualScheduler::new();
    three_frames_playing(&mut s, &mut sched);

    s.delete_frame();
    s.delete_frame();
    assert_eq!(s.frame_count(), 1);
    assert!(!s.is_playing());
    assert!(s.playback_view().is_none());

    let late = sched.fire().unwrap();
    assert!(s.on_tick(late, 250.0, &mut sched).is_none());
    assert_eq!(s.current_frame_index(), 0);
    assert_eq!(sched.pending_count(), 0);
}

#[test]
fn switching_state_while_playing_stops_playback() {
    let mut s = studio();
    let happy = s.add_state("Happy");
    let mut sched = ManualScheduler::new();
    three_frames_playing(&mut s, &mut sched);

    s.switch_state(&happy).unwrap();
    assert!(!s.is_playing());

    let late = sched.fire().unwrap();
    assert!(s.on_tick(late, 250.0, &mut sched).is_none());
    assert_eq!(s.frame_count(), 1);
    assert_eq!(s.current_frame_index(), 0);

    assert!(s.play(1000.0, &mut sched));
    let token = sched.fire().unwrap();
    let view = s.on_tick(token, 1250.0, &mut sched).unwrap();
    assert_eq!(view.tick.frame_index, 0);
}

#[test]
fn timeline_edits_while_playing_stop_playback() {
    let edits: [fn(&mut Studio); 4] = [
        |s| {
            s.add_frame();
        },
        |s| {
            s.duplicate_frame();
        },
        |s| s.reverse_frames(),
        |s| s.set_frame_duration(400),
    ];
    for edit in edits {
        let mut s = studio();
        let mut sched = ManualScheduler::new();
        three_frames_playing(&mut s, &mut sched);
        edit(&mut s);
        assert!(!s.is_playing());
        let late = sched.fire().unwrap();
        assert!(s.on_tick(late, 250.0, &mut sched).is_none());
    }
}

#[test]
fn configured_minimum_duration_applies_to_opened_and_new_frames() {
    let mut project = Project::new(Canvas::new(16, 16).unwrap());
    project.active_state_mut().frame_mut(0).unwrap().set_duration_ms(20);
    let config = StudioConfig {
        min_frame_duration_ms: 150,
        ..StudioConfig::default()
    };
    let mut s = Studio::open(project, config);
    assert_eq!(s.current_frame().duration_ms(), 150);

    s.add_frame();
    assert_eq!(s.current_frame().duration_ms(), 150);
    let blink = s.add_state("Blink");
    assert_eq!(s.project().state(&blink).unwrap().frames()[0].duration_ms(), 150);
    s.set_frame_duration(30);
    assert_eq!(s.current_frame().duration_ms(), 150);
}
