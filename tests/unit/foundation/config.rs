use super::*;

#[test]
fn defaults_match_editor_behaviour() {
    let cfg = StudioConfig::default();
    assert_eq!(cfg.history_capacity, 50);
    assert_eq!(cfg.min_frame_duration_ms, 10);
    assert_eq!(cfg.default_frame_duration_ms, 100);
    assert_eq!(cfg.pixels_per_second, 100.0);
    assert_eq!(cfg.bake.background, Rgb8::BLACK);
    assert_eq!(cfg.bake.bytes_per_line, 24);
}

#[test]
fn partial_json_keeps_defaults() {
    let cfg: StudioConfig =
        serde_json::from_str(r##"{"history_capacity": 5, "style": {"color": "#ff0000"}}"##)
            .unwrap();
    assert_eq!(cfg.history_capacity, 5);
    assert_eq!(cfg.style.color, Rgb8::new(255, 0, 0));
    assert_eq!(cfg.style.stroke_color, Rgb8::WHITE);
    assert_eq!(cfg.min_frame_duration_ms, 10);
}

#[test]
fn durations_clamp_to_minimum() {
    let cfg = StudioConfig::default();
    assert_eq!(cfg.clamp_duration(0), 10);
    assert_eq!(cfg.clamp_duration(9), 10);
    assert_eq!(cfg.clamp_duration(250), 250);
}

#[test]
fn canvas_outside_range_is_rejected() {
    let bad = serde_json::from_str::<StudioConfig>(r#"{"canvas":{"width":4,"height":4000}}"#);
    assert!(bad.is_err());

    let ok: StudioConfig =
        serde_json::from_str(r#"{"canvas":{"width":128,"height":64}}"#).unwrap();
    assert_eq!(ok.canvas, Canvas::new(128, 64).unwrap());
}

#[test]
fn config_file_with_bad_canvas_fails_to_load() {
    let dir = std::env::temp_dir().join("facestudio_config_canvas");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("cfg.json");
    std::fs::write(&path, r#"{"canvas":{"width":4,"height":4000}}"#).unwrap();

    let err = StudioConfig::from_path(&path).unwrap_err();
    assert!(err.to_string().contains("parse config"), "{err}");
}
