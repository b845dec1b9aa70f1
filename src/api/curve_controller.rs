use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::{AxisId, AxisKind, AxisOrientation, Curve, CurveId, Range, SortedValues};
use crate::error::{PlotError, PlotResult};
use crate::render::{Color, Renderer};

use super::PlotEngine;

/// Stroke and marker settings for one curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurveStyle {
    pub color: Color,
    pub stroke_width: f64,
    /// Marker square side in pixels; `0` disables markers.
    pub marker_size: f64,
}

impl Default for CurveStyle {
    fn default() -> Self {
        Self {
            color: Color::rgb(0.12, 0.47, 0.71),
            stroke_width: 1.5,
            marker_size: 0.0,
        }
    }
}

impl CurveStyle {
    pub fn validate(self) -> PlotResult<()> {
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(PlotError::InvalidConfig(
                "curve stroke width must be finite and > 0".to_owned(),
            ));
        }
        if !self.marker_size.is_finite() || self.marker_size < 0.0 {
            return Err(PlotError::InvalidConfig(
                "curve marker size must be finite and >= 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Curve registered with the engine together with the axes it plots against.
#[derive(Debug, Clone)]
pub struct CurveEntry {
    pub(super) id: CurveId,
    pub(super) curve: Curve,
    pub(super) x_axis: AxisId,
    pub(super) y_axis: AxisId,
    pub(super) style: CurveStyle,
    pub(super) transformed_for: Option<(AxisKind, AxisKind)>,
}

impl CurveEntry {
    #[must_use]
    pub fn id(&self) -> CurveId {
        self.id
    }

    #[must_use]
    pub fn curve(&self) -> &Curve {
        &self.curve
    }

    #[must_use]
    pub fn x_axis(&self) -> AxisId {
        self.x_axis
    }

    #[must_use]
    pub fn y_axis(&self) -> AxisId {
        self.y_axis
    }

    #[must_use]
    pub fn style(&self) -> CurveStyle {
        self.style
    }
}

impl<R: Renderer> PlotEngine<R> {
    /// Registers a curve plotted against an X and a Y axis of one region.
    ///
    /// # Errors
    /// Fails on mismatched lengths, unknown axes, wrong orientations or axes
    /// from different regions.
    pub fn add_curve(
        &mut self,
        x: Vec<f64>,
        y: Vec<f64>,
        x_axis: AxisId,
        y_axis: AxisId,
    ) -> PlotResult<CurveId> {
        let curve = Curve::new(x, y)?;
        self.validate_curve_axes(x_axis, y_axis)?;

        let id = CurveId(self.next_curve_id);
        self.next_curve_id += 1;
        debug!(curve = %id, points = curve.len(), "curve added");
        self.curves.insert(
            id,
            CurveEntry {
                id,
                curve,
                x_axis,
                y_axis,
                style: CurveStyle::default(),
                transformed_for: None,
            },
        );
        Ok(id)
    }

    fn validate_curve_axes(&self, x_axis: AxisId, y_axis: AxisId) -> PlotResult<()> {
        if self.context.axis(x_axis)?.orientation() != AxisOrientation::Horizontal {
            return Err(PlotError::InvalidConfig(format!(
                "{x_axis} is not a horizontal axis"
            )));
        }
        if self.context.axis(y_axis)?.orientation() != AxisOrientation::Vertical {
            return Err(PlotError::InvalidConfig(format!(
                "{y_axis} is not a vertical axis"
            )));
        }
        if self.context.region_of(x_axis) != self.context.region_of(y_axis) {
            return Err(PlotError::InvalidConfig(format!(
                "{x_axis} and {y_axis} belong to different regions"
            )));
        }
        Ok(())
    }

    /// Replaces a curve's data, keeping its axes and style.
    pub fn set_curve_data(&mut self, id: CurveId, x: Vec<f64>, y: Vec<f64>) -> PlotResult<()> {
        let curve = Curve::new(x, y)?;
        let entry = self.curve_entry_mut(id)?;
        entry.curve = curve;
        entry.transformed_for = None;
        Ok(())
    }

    pub fn set_curve_style(&mut self, id: CurveId, style: CurveStyle) -> PlotResult<()> {
        style.validate()?;
        self.curve_entry_mut(id)?.style = style;
        Ok(())
    }

    pub fn remove_curve(&mut self, id: CurveId) -> PlotResult<()> {
        self.curves
            .shift_remove(&id)
            .map(|_| ())
            .ok_or(PlotError::UnknownCurve(id))
    }

    pub fn curve(&self, id: CurveId) -> PlotResult<&CurveEntry> {
        self.curves.get(&id).ok_or(PlotError::UnknownCurve(id))
    }

    pub fn curves(&self) -> impl Iterator<Item = &CurveEntry> {
        self.curves.values()
    }

    fn curve_entry_mut(&mut self, id: CurveId) -> PlotResult<&mut CurveEntry> {
        self.curves.get_mut(&id).ok_or(PlotError::UnknownCurve(id))
    }

    /// Index of the point of `id` closest to raw `value` along its sorted coordinate.
    pub fn nearest_point(&mut self, id: CurveId, value: f64) -> PlotResult<Option<usize>> {
        let (x_axis, y_axis) = {
            let entry = self.curve(id)?;
            (entry.x_axis, entry.y_axis)
        };
        let kinds = (
            self.context.axis(x_axis)?.kind(),
            self.context.axis(y_axis)?.kind(),
        );
        let entry = self.curve_entry_mut(id)?;
        if entry.transformed_for != Some(kinds) {
            entry.curve.transform(kinds.0, kinds.1);
            entry.transformed_for = Some(kinds);
        }
        let kind = match entry.curve.sorted_values() {
            SortedValues::Y => kinds.1,
            SortedValues::X | SortedValues::Permuted => kinds.0,
        };
        Ok(entry.curve.nearest_index(kind.graph_transform(value)))
    }

    /// Fits `axis` to the finite data of every curve plotted against it.
    ///
    /// Returns `false` when no curve has usable data or the range is rejected.
    pub fn fit_axis_to_curves(&mut self, axis: AxisId) -> PlotResult<bool> {
        let orientation = self.context.axis(axis)?.orientation();
        let kind = self.context.axis(axis)?.kind();
        let bounds = self
            .curves
            .values()
            .filter_map(|entry| {
                let values = match orientation {
                    AxisOrientation::Horizontal if entry.x_axis == axis => entry.curve.x(),
                    AxisOrientation::Vertical if entry.y_axis == axis => entry.curve.y(),
                    _ => return None,
                };
                data_range(values, kind)
            })
            .reduce(Range::union);
        match bounds {
            Some(range) => self.set_axis_range(axis, range.min, range.max),
            None => Ok(false),
        }
    }
}

/// Finite bounds of `values` usable by an axis of `kind`.
fn data_range(values: &[f64], kind: AxisKind) -> Option<Range> {
    values
        .iter()
        .copied()
        .filter(|value| value.is_finite() && (kind != AxisKind::Log || *value > 0.0))
        .fold(None, |acc: Option<Range>, value| {
            Some(match acc {
                Some(range) => Range::new(range.min.min(value), range.max.max(value)),
                None => Range::new(value, value),
            })
        })
}
