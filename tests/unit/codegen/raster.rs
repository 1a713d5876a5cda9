use super::*;
use crate::foundation::core::{Canvas, Rgb8};
use crate::model::frame::Frame;
use crate::render::cpu::CpuSurface;

fn project_with_red_pixel() -> Project {
    let canvas = Canvas::new(8, 8).unwrap();
    let mut project = Project::new(canvas);
    let frame = project.active_state_mut().frame_mut(0).unwrap();
    frame.set_pixel(0, 0, Some(Rgb8::new(0xff, 0, 0)));
    project
}

fn bake(project: &Project, name: &str) -> RasterArtifacts {
    let mut surface = CpuSurface::new(project.canvas()).unwrap();
    bake_project(project, name, &BakeSettings::default(), &mut surface).unwrap()
}

#[test]
fn red_packs_to_f800_low_byte_first() {
    assert_eq!(encode_rgb565(&[0xff, 0, 0, 0xff]), vec![0x00, 0xf8]);
    assert_eq!(encode_rgb565(&[0xff, 0xff, 0xff, 0xff]), vec![0xff, 0xff]);
    assert_eq!(encode_rgb565(&[0, 0xff, 0, 0xff]), vec![0xe0, 0x07]);
}

#[test]
fn baked_red_pixel_leads_the_map() {
    let art = bake(&project_with_red_pixel(), "Red Dot");
    assert_eq!(art.name, "red_dot");
    assert!(art.source.contains(
        "const LV_ATTRIBUTE_MEM_ALIGN uint8_t red_dot_f0_map[] = {\n    0x00, 0xf8, 0x00, 0x00, "
    ));
}

#[test]
fn rows_hold_24_bytes() {
    let art = bake(&project_with_red_pixel(), "rows");
    let rows: Vec<&str> = art
        .source
        .lines()
        .filter(|l| l.starts_with("    0x"))
        .collect();
    // 8x8 pixels, 2 bytes each, 24 per row.
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0].matches("0x").count(), 24);
    assert_eq!(rows[5].matches("0x").count(), 8);
    assert!(rows[5].ends_with(", "));
}

#[test]
fn descriptor_fields_in_order() {
    let art = bake(&project_with_red_pixel(), "d");
    let expected = "const lv_img_dsc_t d_f0 = {\n\
                    \x20   .header.always_zero = 0,\n\
                    \x20   .header.w = 8,\n\
                    \x20   .header.h = 8,\n\
                    \x20   .data_size = 128,\n\
                    \x20   .header.cf = LV_IMG_CF_TRUE_COLOR,\n\
                    \x20   .data = d_f0_map,\n\
                    };\n";
    assert!(art.source.contains(expected), "{}", art.source);
    assert!(art.source.ends_with("const uint8_t d_frame_count = 1;\n"));
}

#[test]
fn frames_of_every_state_are_numbered_globally() {
    let mut project = project_with_red_pixel();
    let id = project.add_state("Happy", 100);
    let happy = project.state_mut(&id).unwrap();
    happy.insert_frame(1, Frame::blank(project_canvas(), 100));
    let art = bake(&project, "multi");
    assert_eq!(art.frame_count, 3);
    assert!(art.source.contains(
        "const lv_img_dsc_t* multi_frames[] = {\n    &multi_f0,\n    &multi_f1,\n    &multi_f2,\n};\n"
    ));
}

fn project_canvas() -> Canvas {
    Canvas::new(8, 8).unwrap()
}

#[test]
fn header_declares_frames_and_count() {
    let art = bake(&project_with_red_pixel(), "blink");
    assert!(art.header.contains("#ifndef BLINK_H\n#define BLINK_H\n"));
    assert!(art.header.contains("extern const lv_img_dsc_t* blink_frames[];\n"));
    assert!(art.header.contains("extern const uint8_t blink_frame_count;\n"));
    assert!(art.header.ends_with("#endif // BLINK_H\n"));
}

#[test]
fn mismatched_surface_is_rejected() {
    let project = project_with_red_pixel();
    let mut surface = CpuSurface::new(Canvas::new(16, 16).unwrap()).unwrap();
    let err = bake_project(&project, "x", &BakeSettings::default(), &mut surface).unwrap_err();
    assert!(err.to_string().starts_with("render error:"));
}
