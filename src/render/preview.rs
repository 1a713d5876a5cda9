use crate::animation::interp::interpolate_shapes;
use crate::foundation::core::Rgb8;
use crate::foundation::error::StudioResult;
use crate::model::frame::Frame;
use crate::render::surface::Surface;

/// Draws `frame` over `background`: pixel layer first, then shapes.
///
/// With `tween = Some((next, t))` the shapes are interpolated towards `next`
/// at eased progress `t`; the pixel layer always comes from `frame`.
#[tracing::instrument(skip(surface, frame, tween), fields(shapes = frame.shapes.len()))]
pub fn render_frame(
    surface: &mut dyn Surface,
    frame: &Frame,
    tween: Option<(&Frame, f64)>,
    background: Rgb8,
) -> StudioResult<()> {
    surface.clear(background);
    surface.draw_pixels(frame)?;
    let shapes = match tween {
        Some((next, t)) => interpolate_shapes(frame, Some(next), t),
        None => frame.shapes.clone(),
    };
    for shape in &shapes {
        surface.draw_shape(shape)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/preview.rs"]
mod tests;
