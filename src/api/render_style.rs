use serde::{Deserialize, Serialize};

use crate::error::{PlotError, PlotResult};
use crate::render::Color;

/// Colors and stroke widths for axis decorations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RenderStyle {
    pub axis_line_color: Color,
    pub tick_color: Color,
    pub label_color: Color,
    pub axis_line_width: f64,
    pub tick_width: f64,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            axis_line_color: Color::rgb(0.2, 0.2, 0.2),
            tick_color: Color::rgb(0.2, 0.2, 0.2),
            label_color: Color::black(),
            axis_line_width: 1.0,
            tick_width: 1.0,
        }
    }
}

impl RenderStyle {
    pub fn validate(self) -> PlotResult<()> {
        for (name, width) in [
            ("axis_line_width", self.axis_line_width),
            ("tick_width", self.tick_width),
        ] {
            if !width.is_finite() || width <= 0.0 {
                return Err(PlotError::InvalidConfig(format!(
                    "render style `{name}` must be finite and > 0"
                )));
            }
        }
        self.axis_line_color.validate()?;
        self.tick_color.validate()?;
        self.label_color.validate()
    }
}
