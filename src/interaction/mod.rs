use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::AxisId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    Panning,
}

/// Which layout pass the next `layout()` call must run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutMode {
    /// Margin initialization, expansion, equal-axes and placement.
    Full,
    /// Ranges moved during a drag; only offsets and label culling update.
    OffsetOnly,
}

/// Pointer-drag state shared by the engine and its host.
///
/// While panning, axis scales and paddings stay frozen so the plot does not
/// jitter; the full layout runs once when the drag ends.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct PanState {
    mode: InteractionMode,
    axes: SmallVec<[AxisId; 4]>,
    accumulated_x: f64,
    accumulated_y: f64,
    needs_full_layout: bool,
}

impl PanState {
    #[must_use]
    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    #[must_use]
    pub fn is_panning(&self) -> bool {
        self.mode == InteractionMode::Panning
    }

    /// Axes moved by the active drag.
    #[must_use]
    pub fn axes(&self) -> &[AxisId] {
        &self.axes
    }

    /// Total pointer travel since the drag started, in canvas pixels.
    #[must_use]
    pub fn accumulated(&self) -> (f64, f64) {
        (self.accumulated_x, self.accumulated_y)
    }

    pub fn begin(&mut self, axes: impl IntoIterator<Item = AxisId>) {
        self.mode = InteractionMode::Panning;
        self.axes = axes.into_iter().collect();
        self.accumulated_x = 0.0;
        self.accumulated_y = 0.0;
    }

    /// Records pointer travel; ignored when no drag is active.
    pub fn record(&mut self, dx: f64, dy: f64) -> bool {
        if !self.is_panning() {
            return false;
        }
        self.accumulated_x += dx;
        self.accumulated_y += dy;
        true
    }

    pub fn end(&mut self) {
        if self.is_panning() {
            self.needs_full_layout = true;
        }
        self.mode = InteractionMode::Idle;
        self.axes.clear();
    }

    /// Requests a full layout on the next pass (range, style or size change).
    pub fn invalidate_layout(&mut self) {
        self.needs_full_layout = true;
    }

    /// Layout pass to run given whether a full layout has ever completed.
    #[must_use]
    pub fn layout_mode(&self, has_full_layout: bool) -> LayoutMode {
        if has_full_layout && self.is_panning() {
            LayoutMode::OffsetOnly
        } else if !has_full_layout || self.needs_full_layout {
            LayoutMode::Full
        } else {
            LayoutMode::OffsetOnly
        }
    }

    pub(crate) fn mark_layout_done(&mut self, mode: LayoutMode) {
        if mode == LayoutMode::Full {
            self.needs_full_layout = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{InteractionMode, LayoutMode, PanState};
    use crate::core::AxisId;

    #[test]
    fn drag_freezes_layout_until_release() {
        let mut state = PanState::default();
        assert_eq!(state.layout_mode(false), LayoutMode::Full);

        state.begin([AxisId(1)]);
        state.invalidate_layout();
        assert_eq!(state.mode(), InteractionMode::Panning);
        assert_eq!(state.layout_mode(true), LayoutMode::OffsetOnly);

        state.end();
        assert_eq!(state.layout_mode(true), LayoutMode::Full);
        state.mark_layout_done(LayoutMode::Full);
        assert_eq!(state.layout_mode(true), LayoutMode::OffsetOnly);
    }

    #[test]
    fn record_without_drag_is_ignored() {
        let mut state = PanState::default();
        assert!(!state.record(3.0, 4.0));
        state.begin([AxisId(1), AxisId(2)]);
        assert!(state.record(3.0, 4.0));
        assert!(state.record(1.0, -1.0));
        assert_eq!(state.accumulated(), (4.0, 3.0));
        assert_eq!(state.axes().len(), 2);
    }
}
