use crate::codegen::sanitize_c_name;
use crate::foundation::config::BakeSettings;
use crate::foundation::error::{StudioError, StudioResult};
use crate::model::project::Project;
use crate::render::preview::render_frame;
use crate::render::surface::Surface;

/// Generated `<name>.c` / `<name>.h` pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterArtifacts {
    /// Sanitized C name; the files are `{name}.c` and `{name}.h`.
    pub name: String,
    pub source: String,
    pub header: String,
    pub frame_count: usize,
}

/// Packs straight RGBA8 into little-endian RGB565 (two bytes per pixel, alpha dropped).
pub fn encode_rgb565(rgba: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(rgba.len() / 2);
    for px in rgba.chunks_exact(4) {
        let word = (u16::from(px[0] >> 3) << 11) | (u16::from(px[1] >> 2) << 5) | u16::from(px[2] >> 3);
        out.extend_from_slice(&word.to_le_bytes());
    }
    out
}

/// Bakes every frame of every state, in state order, into LVGL image descriptors.
///
/// Frames are named `{name}_f{n}` with `n` counting across all states. Each
/// frame is composited on `surface` as background, pixel layer, then shapes.
#[tracing::instrument(skip(project, settings, surface), fields(states = project.states().len()))]
pub fn bake_project(
    project: &Project,
    name: &str,
    settings: &BakeSettings,
    surface: &mut dyn Surface,
) -> StudioResult<RasterArtifacts> {
    if surface.canvas() != project.canvas() {
        return Err(StudioError::render(format!(
            "surface {:?} does not match project canvas {:?}",
            surface.canvas(),
            project.canvas()
        )));
    }
    if settings.bytes_per_line == 0 {
        return Err(StudioError::codegen("bytes_per_line must be positive"));
    }

    let name = sanitize_c_name(name);
    let canvas = project.canvas();
    let mut source = source_prologue(&name);
    let mut descriptors = Vec::with_capacity(project.total_frame_count());

    for frame in project.states().iter().flat_map(|s| s.frames()) {
        let frame_name = format!("{name}_f{}", descriptors.len());
        render_frame(surface, frame, None, settings.background)?;
        let bytes = encode_rgb565(&surface.read_rgba());

        source.push_str(&format!(
            "const LV_ATTRIBUTE_MEM_ALIGN uint8_t {frame_name}_map[] = {{\n"
        ));
        write_byte_rows(&mut source, &bytes, settings.bytes_per_line);
        source.push_str("};\n\n");

        source.push_str(&format!("const lv_img_dsc_t {frame_name} = {{\n"));
        source.push_str("    .header.always_zero = 0,\n");
        source.push_str(&format!("    .header.w = {},\n", canvas.width));
        source.push_str(&format!("    .header.h = {},\n", canvas.height));
        source.push_str(&format!("    .data_size = {},\n", canvas.pixel_count() * 2));
        source.push_str("    .header.cf = LV_IMG_CF_TRUE_COLOR,\n");
        source.push_str(&format!("    .data = {frame_name}_map,\n"));
        source.push_str("};\n\n");

        descriptors.push(frame_name);
    }

    source.push_str(&format!("const lv_img_dsc_t* {name}_frames[] = {{\n"));
    for d in &descriptors {
        source.push_str(&format!("    &{d},\n"));
    }
    source.push_str("};\n\n");

    let frame_count = descriptors.len();
    if frame_count > usize::from(u8::MAX) {
        tracing::warn!(
            frame_count,
            "frame count does not fit the uint8_t count constant"
        );
    }
    source.push_str(&format!("const uint8_t {name}_frame_count = {frame_count};\n"));

    let header = header_file(&name);
    Ok(RasterArtifacts {
        name,
        source,
        header,
        frame_count,
    })
}

/// Writes `    0xlo, 0xhi, ...` rows of `bytes_per_line` bytes; every row keeps its trailing `, `.
fn write_byte_rows(out: &mut String, bytes: &[u8], bytes_per_line: usize) {
    for row in bytes.chunks(bytes_per_line) {
        out.push_str("    ");
        for b in row {
            out.push_str(&format!("0x{b:02x}, "));
        }
        out.push('\n');
    }
}

fn source_prologue(name: &str) -> String {
    format!(
        r#"/**
 * @file {name}.c
 * @brief Auto-generated animation from Robot Face Studio
 * Compatible with LVGL (RGB565 Format)
 */

#if defined(LV_LVGL_H_INCLUDE_SIMPLE)
#include "lvgl.h"
#else
#include "lvgl/lvgl.h"
#endif

#ifndef LV_ATTRIBUTE_MEM_ALIGN
#define LV_ATTRIBUTE_MEM_ALIGN
#endif

"#
    )
}

fn header_file(name: &str) -> String {
    let guard = name.to_ascii_uppercase();
    format!(
        r#"/**
 * @file {name}.h
 * @brief Header for {name}.c
 * Auto-generated from Robot Face Studio
 */

#ifndef {guard}_H
#define {guard}_H

#include "lvgl/lvgl.h"

extern const lv_img_dsc_t* {name}_frames[];
extern const uint8_t {name}_frame_count;

#endif // {guard}_H
"#
    )
}

#[cfg(test)]
#[path = "../../tests/unit/codegen/raster.rs"]
mod tests;
