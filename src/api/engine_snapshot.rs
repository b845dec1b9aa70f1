use serde::{Deserialize, Serialize};

use crate::core::{
    AxisId, AxisKind, AxisOrientation, AxisSide, CurveId, Range, SortedValues, TickStep,
};
use crate::interaction::PanState;

use super::axis_layout_solver::LayoutOutcome;
use super::label_size_cache::LabelSizeCacheStats;

/// Serializable state of one axis, independent of layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisSnapshot {
    pub id: AxisId,
    pub orientation: AxisOrientation,
    pub side: AxisSide,
    pub kind: AxisKind,
    pub range: Range,
    pub transformed_range: Range,
    pub bound_to: Option<AxisId>,
    pub tick_step: TickStep,
    pub tick_values: Vec<f64>,
    pub tick_labels: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSnapshot {
    pub id: CurveId,
    pub x_axis: AxisId,
    pub y_axis: AxisId,
    pub point_count: usize,
    pub sorted_values: SortedValues,
    pub line_points: usize,
    pub markers: usize,
}

/// Deterministic engine snapshot for regression tests and debugging tools.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSnapshot {
    pub axes: Vec<AxisSnapshot>,
    pub curves: Vec<CurveSnapshot>,
    pub layout: Option<LayoutOutcome>,
    pub pan: PanState,
    pub label_cache: LabelSizeCacheStats,
}
