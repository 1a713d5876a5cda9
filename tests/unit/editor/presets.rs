use super::*;
use crate::model::shape::ShapePayload;

#[test]
fn pair_straddles_the_center() {
    let canvas = Canvas::new(466, 466).unwrap();
    let mut ids = ShapeIdGen::default();
    let [l, r] = eye_pair(
        EyePreset::Angry,
        canvas,
        Rgb8::new(0, 0xd2, 0xff),
        &StyleDefaults::default(),
        &mut ids,
    );
    assert_eq!((l.x, l.y, l.width, l.height), (38.0, 183.0, 120.0, 100.0));
    assert_eq!(r.x, 308.0);
    assert_eq!((l.rotation, r.rotation), (25.0, -25.0));
    assert_eq!(l.style.color, Rgb8::new(0, 0xd2, 0xff));
    assert_ne!(l.id, r.id);
    match (&l.payload, &r.payload) {
        (ShapePayload::Path(a), ShapePayload::Path(b)) => {
            assert!(!a.mirrored);
            assert!(b.mirrored);
            assert_eq!(a.data(), EyePreset::Angry.path_data());
        }
        other => panic!("expected paths, got {other:?}"),
    }
}

#[test]
fn sad_tilts_outward() {
    assert_eq!(EyePreset::Sad.rotation(false), -10.0);
    assert_eq!(EyePreset::Sad.rotation(true), 10.0);
    assert_eq!(EyePreset::Bean.rotation(true), 0.0);
}

#[test]
fn unknown_names_mean_sad() {
    assert_eq!(EyePreset::from_name("EVIL"), EyePreset::Evil);
    assert_eq!(EyePreset::from_name("sleepy"), EyePreset::Sad);
}

#[test]
fn every_preset_parses_to_a_closed_outline() {
    for p in EyePreset::ALL {
        let geom = PathGeometry::from_data(p.path_data());
        assert!(geom.nodes().len() > 2, "{}", p.as_str());
        assert_eq!(
            geom.nodes().last(),
            Some(&crate::model::path::PathNode::Close)
        );
    }
}
