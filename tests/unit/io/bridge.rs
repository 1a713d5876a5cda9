use super::*;
use crate::foundation::core::{Canvas, Rgb8};

fn project() -> Project {
    let mut p = Project::new(Canvas::new(8, 8).unwrap());
    let f = p.active_state_mut().frame_mut(0).unwrap();
    f.set_pixel(1, 0, Some(Rgb8::new(0xab, 0xcd, 0xef)));
    f.set_duration_ms(120);
    p
}

#[test]
fn save_payload_shape() {
    let payload = SaveAnimPayload::from_project(&project(), "My Face!");
    let value = serde_json::to_value(&payload).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "name": "my_face_",
            "width": 8,
            "height": 8,
            "fps": 12,
            "activeStateId": "idle",
            "states": [{
                "id": "idle",
                "name": "Idle",
                "frames": [{"pixels": [{"i": 1, "c": "#abcdef"}], "duration": 120, "shapes": []}]
            }]
        })
    );
}

#[test]
fn delete_payload_is_sanitized() {
    let body = serde_json::to_string(&DeleteAnimPayload::new("Blink 2")).unwrap();
    assert_eq!(body, r#"{"name":"blink_2"}"#);
}

#[test]
fn file_stems_keep_dashes_and_case() {
    assert_eq!(sanitize_file_stem("Happy-Face v2"), "Happy-Face_v2");
    assert_eq!(sanitize_file_stem(""), DEFAULT_FILE_STEM);
}
