use tracing::debug;

use crate::core::{
    Axis, AxisId, AxisKind, AxisOrientation, AxisSide, AxisStyle, LabelFormatter, TickOverrides,
};
use crate::error::{PlotError, PlotResult};
use crate::render::Renderer;

use super::PlotEngine;
use super::layout_config::PlotRegionConfig;
use super::layout_context::RegionId;

impl<R: Renderer> PlotEngine<R> {
    pub fn add_region(&mut self, config: PlotRegionConfig) -> PlotResult<RegionId> {
        let id = self.context.add_region(config)?;
        self.pan.invalidate_layout();
        Ok(id)
    }

    pub fn set_region_config(&mut self, id: RegionId, config: PlotRegionConfig) -> PlotResult<()> {
        self.context.set_region_config(id, config)?;
        self.pan.invalidate_layout();
        Ok(())
    }

    /// Adds an axis on one side of `region` with the given kind and style.
    pub fn add_axis(
        &mut self,
        region: RegionId,
        orientation: AxisOrientation,
        side: AxisSide,
        kind: AxisKind,
        style: AxisStyle,
    ) -> PlotResult<AxisId> {
        let id = self.context.add_axis(region, orientation, side)?;
        let axis = self.context.axis_mut(id)?;
        axis.set_kind(kind);
        axis.set_style(style);
        self.pan.invalidate_layout();
        Ok(id)
    }

    pub fn axis(&self, id: AxisId) -> PlotResult<&Axis> {
        self.context.axis(id)
    }

    /// Requests a new range for `id` and mirrors it onto every axis bound to it.
    ///
    /// Returns `Ok(false)` when the range is invalid for the axis kind; the
    /// previous range is kept in that case.
    pub fn set_axis_range(&mut self, id: AxisId, min: f64, max: f64) -> PlotResult<bool> {
        let applied = self.context.axis_mut(id)?.set_range(min, max);
        if applied {
            self.propagate_range(id);
            self.pan.invalidate_layout();
        }
        Ok(applied)
    }

    /// Copies the range of `source` to its bound axes, transitively.
    pub(super) fn propagate_range(&mut self, source: AxisId) {
        let mut pending = vec![source];
        while let Some(current) = pending.pop() {
            let Ok(range) = self.context.axis(current).map(Axis::range) else {
                continue;
            };
            let bound: Vec<AxisId> = self
                .context
                .axes()
                .filter(|axis| axis.bound_to() == Some(current))
                .map(Axis::id)
                .collect();
            for id in bound {
                if let Ok(axis) = self.context.axis_mut(id) {
                    if axis.set_range(range.min, range.max) {
                        pending.push(id);
                    } else {
                        debug!(axis = %id, source = %current, "bound axis rejected mirrored range");
                    }
                }
            }
        }
    }

    /// Makes `target` mirror the range of `source` (or stop mirroring with `None`).
    pub fn bind_axis(&mut self, target: AxisId, source: Option<AxisId>) -> PlotResult<()> {
        if let Some(source) = source {
            if self.context.axis(source)?.orientation() != self.context.axis(target)?.orientation() {
                return Err(PlotError::InvalidConfig(format!(
                    "{target} and {source} have different orientations"
                )));
            }
            let mut cursor = Some(source);
            while let Some(current) = cursor {
                if current == target {
                    return Err(PlotError::InvalidConfig(format!(
                        "binding {target} to {source} would form a cycle"
                    )));
                }
                cursor = self.context.axis(current)?.bound_to();
            }
            let range = self.context.axis(source)?.range();
            let axis = self.context.axis_mut(target)?;
            axis.bind_to(Some(source));
            axis.set_range(range.min, range.max);
            self.propagate_range(target);
        } else {
            self.context.axis_mut(target)?.bind_to(None);
        }
        self.pan.invalidate_layout();
        Ok(())
    }

    pub fn set_axis_kind(&mut self, id: AxisId, kind: AxisKind) -> PlotResult<()> {
        self.context.axis_mut(id)?.set_kind(kind);
        self.propagate_range(id);
        self.pan.invalidate_layout();
        Ok(())
    }

    pub fn set_axis_style(&mut self, id: AxisId, style: AxisStyle) -> PlotResult<()> {
        if !style.tick_length.is_finite() {
            return Err(PlotError::InvalidConfig(
                "tick length must be finite".to_owned(),
            ));
        }
        self.context.axis_mut(id)?.set_style(style);
        self.pan.invalidate_layout();
        Ok(())
    }

    pub fn set_tick_overrides(
        &mut self,
        id: AxisId,
        overrides: Option<TickOverrides>,
    ) -> PlotResult<()> {
        self.context.axis_mut(id)?.set_tick_overrides(overrides);
        self.pan.invalidate_layout();
        Ok(())
    }

    pub fn set_label_formatter(
        &mut self,
        id: AxisId,
        formatter: Option<LabelFormatter>,
    ) -> PlotResult<()> {
        self.context.axis_mut(id)?.set_label_formatter(formatter);
        self.pan.invalidate_layout();
        Ok(())
    }

    /// Forces the listed axes to share one total length and padding.
    pub fn add_aligned_group(&mut self, axes: &[AxisId]) -> PlotResult<()> {
        self.context.add_aligned_group(axes)?;
        self.pan.invalidate_layout();
        Ok(())
    }
}
