use crate::error::PlotResult;
use crate::render::Renderer;

use super::PlotEngine;
use super::engine_snapshot::{AxisSnapshot, CurveSnapshot, PlotSnapshot};

impl<R: Renderer> PlotEngine<R> {
    /// Builds a deterministic snapshot of axes, curves and the last layout.
    #[must_use]
    pub fn snapshot(&self) -> PlotSnapshot {
        let axes = self
            .context
            .axes()
            .map(|axis| AxisSnapshot {
                id: axis.id(),
                orientation: axis.orientation(),
                side: axis.side(),
                kind: axis.kind(),
                range: axis.range(),
                transformed_range: axis.transformed_range(),
                bound_to: axis.bound_to(),
                tick_step: axis.ticks().step,
                tick_values: axis.ticks().values(),
                tick_labels: axis
                    .ticks()
                    .ticks
                    .iter()
                    .map(|tick| tick.label.display_text())
                    .collect(),
            })
            .collect();

        let curves = self
            .curves
            .values()
            .map(|entry| {
                let mask = entry.curve.decimation();
                CurveSnapshot {
                    id: entry.id,
                    x_axis: entry.x_axis,
                    y_axis: entry.y_axis,
                    point_count: entry.curve.len(),
                    sorted_values: entry.curve.sorted_values(),
                    line_points: mask.line_point_count(),
                    markers: mask.marker_count(),
                }
            })
            .collect();

        PlotSnapshot {
            axes,
            curves,
            layout: self.last_layout.clone(),
            pan: self.pan.clone(),
            label_cache: self.label_cache.stats(),
        }
    }

    /// Serializes [`PlotEngine::snapshot`] as pretty JSON for fixture checks.
    pub fn snapshot_json_pretty(&self) -> PlotResult<String> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }
}
