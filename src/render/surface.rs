use crate::foundation::core::{Canvas, Rgb8};
use crate::foundation::error::StudioResult;
use crate::model::frame::Frame;
use crate::model::shape::Shape;

/// Drawing target for previews and bakes.
///
/// Renderers, the playback preview and the raster baker only talk to this
/// trait; the concrete rasterizer is chosen by the caller.
pub trait Surface {
    fn canvas(&self) -> Canvas;

    /// Fills the whole surface with an opaque color.
    fn clear(&mut self, color: Rgb8);

    /// Draws a frame's pixel layer; unset cells leave the surface untouched.
    fn draw_pixels(&mut self, frame: &Frame) -> StudioResult<()>;

    /// Draws one shape including its rotation, opacity, blend mode and stroke.
    fn draw_shape(&mut self, shape: &Shape) -> StudioResult<()>;

    /// Straight (non-premultiplied) RGBA8, row-major.
    fn read_rgba(&self) -> Vec<u8>;
}
