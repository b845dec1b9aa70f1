use serde::{Deserialize, Serialize};

use crate::core::{AxisId, Margins, Size};
use crate::error::{PlotError, PlotResult};

use super::label_oracle::FontDescriptor;

/// Plot length below which a fixed length is ignored and a shrinking axis is clamped.
pub const MIN_PLOT_LENGTH_PX: f64 = 1.0;

/// Global layout tuning shared by every plot region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Gap between stacked axes on the same side.
    pub axis_spacing: f64,
    /// Lower bound for each side of a region's margins.
    pub min_axis_margin: Margins,
    /// Cap on the plot canvas; axis totals never exceed it plus padding.
    pub max_canvas_size: Size,
    /// Rescale budget for one margin expansion.
    pub max_rescales: usize,
    /// Number of full layout passes (the last one may apply equal axes).
    pub outer_iterations: usize,
    pub label_font: FontDescriptor,
    pub title_font: FontDescriptor,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            axis_spacing: 5.0,
            min_axis_margin: Margins::default(),
            max_canvas_size: Size::new(10_000.0, 10_000.0),
            max_rescales: 10,
            outer_iterations: 2,
            label_font: FontDescriptor::default(),
            title_font: FontDescriptor::new("sans-serif", 14.0),
        }
    }
}

impl LayoutConfig {
    #[must_use]
    pub fn with_axis_spacing(mut self, axis_spacing: f64) -> Self {
        self.axis_spacing = axis_spacing;
        self
    }

    #[must_use]
    pub fn with_min_axis_margin(mut self, min_axis_margin: Margins) -> Self {
        self.min_axis_margin = min_axis_margin;
        self
    }

    #[must_use]
    pub fn with_label_font(mut self, label_font: FontDescriptor) -> Self {
        self.label_font = label_font;
        self
    }

    pub fn validate(&self) -> PlotResult<()> {
        if !self.axis_spacing.is_finite() || self.axis_spacing < 0.0 {
            return Err(PlotError::InvalidConfig(
                "axis spacing must be finite and >= 0".to_owned(),
            ));
        }
        if !self.min_axis_margin.is_valid() {
            return Err(PlotError::InvalidConfig(
                "minimum axis margins must be finite and >= 0".to_owned(),
            ));
        }
        if !self.max_canvas_size.is_valid() {
            return Err(PlotError::InvalidConfig(
                "maximum canvas size must be finite and > 0".to_owned(),
            ));
        }
        if self.outer_iterations == 0 {
            return Err(PlotError::InvalidConfig(
                "layout needs at least one outer iteration".to_owned(),
            ));
        }
        if !self.label_font.is_valid() || !self.title_font.is_valid() {
            return Err(PlotError::InvalidConfig(
                "font sizes must be finite and > 0".to_owned(),
            ));
        }
        Ok(())
    }
}

/// Per-region sizing inputs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlotRegionConfig {
    /// Space available to the region, axes included.
    pub available: Size,
    /// Top-left corner of the region in the host canvas.
    pub origin_x: f64,
    pub origin_y: f64,
    /// Fixed plot-canvas width; axes around it grow the region instead.
    pub fixed_plot_width: Option<f64>,
    pub fixed_plot_height: Option<f64>,
    /// `(x, y)` pair forced to share one pixels-per-unit scale.
    pub equal_axes: Option<(AxisId, AxisId)>,
}

impl PlotRegionConfig {
    #[must_use]
    pub fn new(available: Size) -> Self {
        Self {
            available,
            origin_x: 0.0,
            origin_y: 0.0,
            fixed_plot_width: None,
            fixed_plot_height: None,
            equal_axes: None,
        }
    }

    #[must_use]
    pub fn with_origin(mut self, x: f64, y: f64) -> Self {
        self.origin_x = x;
        self.origin_y = y;
        self
    }

    #[must_use]
    pub fn with_fixed_plot_size(mut self, width: Option<f64>, height: Option<f64>) -> Self {
        self.fixed_plot_width = width;
        self.fixed_plot_height = height;
        self
    }

    #[must_use]
    pub fn with_equal_axes(mut self, x: AxisId, y: AxisId) -> Self {
        self.equal_axes = Some((x, y));
        self
    }

    pub fn validate(&self) -> PlotResult<()> {
        if !self.available.is_valid() {
            return Err(PlotError::InvalidConfig(format!(
                "region size must be finite and > 0 (got {}x{})",
                self.available.width, self.available.height
            )));
        }
        if !self.origin_x.is_finite() || !self.origin_y.is_finite() {
            return Err(PlotError::InvalidConfig(
                "region origin must be finite".to_owned(),
            ));
        }
        for fixed in [self.fixed_plot_width, self.fixed_plot_height]
            .into_iter()
            .flatten()
        {
            if !fixed.is_finite() || fixed < 0.0 {
                return Err(PlotError::InvalidConfig(
                    "fixed plot length must be finite and >= 0".to_owned(),
                ));
            }
        }
        Ok(())
    }
}
