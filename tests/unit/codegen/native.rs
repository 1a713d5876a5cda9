use super::*;
use crate::foundation::config::StyleDefaults;
use crate::foundation::core::{Bounds, Canvas};
use crate::model::frame::Frame;
use crate::model::shape::Interaction;

fn rect(id: u64, x: f64) -> Shape {
    Shape::new(
        ShapeId::from(id),
        ShapeType::Rect,
        Bounds::new(x, 20.0, 30.0, 40.0),
        &StyleDefaults::default(),
    )
}

fn two_frame_project(a: Vec<Shape>, b: Vec<Shape>) -> Project {
    let canvas = Canvas::new(64, 64).unwrap();
    let mut f0 = Frame::blank(canvas, 200);
    f0.shapes = a;
    let mut f1 = Frame::blank(canvas, 100);
    f1.shapes = b;
    let state = State::with_frames("idle", "Idle", vec![f0, f1]).unwrap();
    Project::from_parts(canvas, 12, Easing::Linear, vec![state], Some("idle")).unwrap()
}

#[test]
fn moving_x_yields_one_animation() {
    let project = two_frame_project(vec![rect(1, 10.0)], vec![rect(1, 50.0)]);
    let program = lower_project(&project, "face").unwrap();
    let anims = &program.states[0].animations;
    assert_eq!(
        anims,
        &vec![PropertyAnimation {
            var: "obj_0".to_string(),
            property: AnimProperty::X,
            from: 10,
            to: 50,
            duration_ms: 200,
            delay_ms: 0,
        }]
    );
}

#[test]
fn animation_line_format() {
    let project = two_frame_project(vec![rect(1, 10.0)], vec![rect(1, 50.0)]);
    let art = emit_native(&project, "face").unwrap();
    assert!(art.source.contains(
        "    { lv_anim_t a; lv_anim_init(&a); lv_anim_set_var(&a, obj_0); \
         lv_anim_set_values(&a, 10, 50); lv_anim_set_time(&a, 200); lv_anim_set_delay(&a, 0); \
         lv_anim_set_exec_cb(&a, (lv_anim_exec_xcb_t)lv_obj_set_x); \
         lv_anim_set_path_cb(&a, lv_anim_path_linear); lv_anim_start(&a); }\n"
    ));
    assert_eq!(art.file_name(), "face_native.c");
}

#[test]
fn tiny_changes_are_not_animated() {
    let project = two_frame_project(vec![rect(1, 10.0)], vec![rect(1, 10.05)]);
    let program = lower_project(&project, "face").unwrap();
    assert!(program.states[0].animations.is_empty());
}

#[test]
fn scaled_properties_use_target_units() {
    let mut a = rect(1, 0.0);
    a.rotation = 0.0;
    a.style.opacity = 1.0;
    let mut b = a.clone();
    b.rotation = 4.5;
    b.style.opacity = 0.5;
    let project = two_frame_project(vec![a], vec![b]);
    let program = lower_project(&project, "face").unwrap();
    let props: Vec<(AnimProperty, i64, i64)> = program.states[0]
        .animations
        .iter()
        .map(|a| (a.property, a.from, a.to))
        .collect();
    assert_eq!(
        props,
        vec![(AnimProperty::Rotation, 0, 45), (AnimProperty::Opacity, 255, 128)]
    );
}

#[test]
fn late_shapes_are_created_hidden() {
    let project = two_frame_project(vec![rect(1, 0.0)], vec![rect(1, 0.0), rect(2, 5.0)]);
    let art = emit_native(&project, "face").unwrap();
    assert!(art.source.contains("    lv_obj_t * obj_0 = NULL;\n    lv_obj_t * obj_1 = NULL;\n"));
    assert!(art.source.contains("    lv_obj_add_flag(obj_1, LV_OBJ_FLAG_HIDDEN);\n"));
    assert!(!art.source.contains("lv_obj_add_flag(obj_0, LV_OBJ_FLAG_HIDDEN)"));
}

#[test]
fn object_style_calls() {
    let mut e = Shape::new(
        ShapeId::from(7u64),
        ShapeType::Ellipse,
        Bounds::new(1.4, 2.5, 10.0, 12.0),
        &StyleDefaults::default(),
    );
    e.style.stroke_width = 3.0;
    e.rotation = 12.0;
    e.interaction = Some(Interaction::click("happy"));
    let project = two_frame_project(vec![e], vec![]);
    let art = emit_native(&project, "face").unwrap();
    let expected = "    obj_0 = lv_obj_create(parent);\n\
                    \x20   lv_obj_set_size(obj_0, 10, 12);\n\
                    \x20   lv_obj_set_style_radius(obj_0, LV_RADIUS_CIRCLE, 0);\n\
                    \x20   lv_obj_set_style_bg_color(obj_0, lv_color_hex(0x00ffff), 0);\n\
                    \x20   lv_obj_set_style_border_width(obj_0, 3, 0);\n\
                    \x20   lv_obj_set_style_border_color(obj_0, lv_color_hex(0xffffff), 0);\n\
                    \x20   lv_obj_set_pos(obj_0, 1, 3);\n\
                    \x20   lv_obj_set_style_bg_opa(obj_0, 255, 0);\n\
                    \x20   lv_obj_set_style_transform_rotation(obj_0, 120, 0);\n\
                    \x20   lv_obj_add_flag(obj_0, LV_OBJ_FLAG_CLICKABLE);\n\
                    \x20   lv_obj_add_event_cb(obj_0, interaction_cb, LV_EVENT_CLICKED, (void*)\"happy\");\n";
    assert!(art.source.contains(expected), "{}", art.source);
}

#[test]
fn text_becomes_label() {
    let s = Shape::text(
        ShapeId::from(3u64),
        crate::foundation::core::Point::new(5.0, 6.0),
        "hi \"you\"",
        &StyleDefaults::default(),
    );
    let project = two_frame_project(vec![s], vec![]);
    let art = emit_native(&project, "face").unwrap();
    assert!(art.source.contains(
        "    obj_0 = lv_label_create(parent);\n    lv_label_set_text(obj_0, \"hi \\\"you\\\"\");\n"
    ));
}

#[test]
fn dispatcher_and_init() {
    let mut project = two_frame_project(vec![], vec![]);
    let happy = project.add_state("Happy", 100);
    project.set_active_state(&happy).unwrap();
    let art = emit_native(&project, "Robot Face").unwrap();
    assert!(art.source.contains(
        "void robot_face_switch_state(const char * state_id) {\n\
         \x20   if (!face_container) return;\n\
         \x20   lv_obj_clean(face_container);\n\
         \x20   if (strcmp(state_id, \"idle\") == 0) create_state_idle(face_container);\n\
         \x20   else if (strcmp(state_id, \"happy\") == 0) create_state_happy(face_container);\n\
         }\n"
    ));
    assert!(art.source.contains("// --- State: Happy ---\nstatic void create_state_happy(lv_obj_t * parent) {\n"));
    assert!(art.source.ends_with("    robot_face_switch_state(\"happy\");\n}\n"));
}

#[test]
fn hyphenated_state_ids_get_c_identifiers() {
    let mut project = two_frame_project(vec![], vec![]);
    let id = project.add_state("Very Happy", 100);
    assert_eq!(id, "very-happy");
    let art = emit_native(&project, "face").unwrap();
    assert!(art.source.contains(
        "else if (strcmp(state_id, \"very-happy\") == 0) create_state_very_happy(face_container);"
    ));
}

#[test]
fn colliding_identifiers_are_rejected() {
    let mut project = two_frame_project(vec![], vec![]);
    project.add_state("a b", 100);
    let canvas = project.canvas();
    let mut states = project.states().to_vec();
    states.push(State::new("a_b", "A_B", canvas, 100));
    let project = Project::from_parts(canvas, 12, Easing::Linear, states, None).unwrap();
    let err = emit_native(&project, "face").unwrap_err();
    assert!(err.to_string().starts_with("codegen error:"));
}

#[test]
fn easing_paths() {
    assert_eq!(lvgl_path(Easing::Bounce), "lv_anim_path_bounce");
    assert_eq!(lvgl_path(Easing::Spring), "lv_anim_path_linear");
}
