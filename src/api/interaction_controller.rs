use tracing::{debug, trace};

use crate::core::{AxisId, AxisOrientation};
use crate::error::PlotResult;
use crate::interaction::{InteractionMode, PanState};
use crate::render::Renderer;

use super::PlotEngine;

impl<R: Renderer> PlotEngine<R> {
    #[must_use]
    pub fn interaction_mode(&self) -> InteractionMode {
        self.pan.mode()
    }

    #[must_use]
    pub fn pan_state(&self) -> &PanState {
        &self.pan
    }

    /// Starts dragging `axes`; layout switches to the offset-only path until
    /// [`PlotEngine::end_pan`].
    pub fn begin_pan(&mut self, axes: &[AxisId]) -> PlotResult<()> {
        for id in axes {
            self.context.axis(*id)?;
        }
        self.pan.begin(axes.iter().copied());
        debug!(axes = axes.len(), "pan started");
        Ok(())
    }

    /// Moves the dragged axes by a pointer delta in canvas pixels.
    ///
    /// Dragging right moves X ranges towards lower values; dragging down
    /// moves Y ranges towards higher values. Returns `false` when no drag
    /// is active.
    pub fn pan_by(&mut self, dx: f64, dy: f64) -> PlotResult<bool> {
        if !self.pan.record(dx, dy) {
            return Ok(false);
        }
        let axes: Vec<AxisId> = self.pan.axes().to_vec();
        for id in axes {
            let axis = self.context.axis_mut(id)?;
            let pixels = match axis.orientation() {
                AxisOrientation::Horizontal => -dx,
                AxisOrientation::Vertical => dy,
            };
            if axis.pan_pixels(pixels) {
                self.propagate_range(id);
            }
            trace!(axis = %id, pixels, "axis panned");
        }
        Ok(true)
    }

    /// Ends the drag; the next layout runs the full solver.
    pub fn end_pan(&mut self) {
        let (dx, dy) = self.pan.accumulated();
        self.pan.end();
        debug!(dx, dy, "pan finished");
    }
}
