mod frame;
mod null_renderer;
mod primitives;

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{Color, LinePrimitive, RectPrimitive, TextDirection, TextPrimitive};

use crate::error::PlotResult;

/// Contract implemented by any drawing backend.
///
/// Backends receive a fully materialized `RenderFrame` in canvas pixels, so
/// drawing code never sees axis ranges, ticks or decimation state.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> PlotResult<()>;
}
