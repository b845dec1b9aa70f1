use serde::Serialize;

use crate::core::Size;
use crate::error::{PlotError, PlotResult};
use crate::render::{LinePrimitive, RectPrimitive, TextPrimitive};

/// Backend-agnostic scene for one draw pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderFrame {
    pub size: Size,
    pub lines: Vec<LinePrimitive>,
    pub rects: Vec<RectPrimitive>,
    pub texts: Vec<TextPrimitive>,
}

impl RenderFrame {
    #[must_use]
    pub fn new(size: Size) -> Self {
        Self {
            size,
            lines: Vec::new(),
            rects: Vec::new(),
            texts: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_line(mut self, line: LinePrimitive) -> Self {
        self.lines.push(line);
        self
    }

    #[must_use]
    pub fn with_rect(mut self, rect: RectPrimitive) -> Self {
        self.rects.push(rect);
        self
    }

    pub fn validate(&self) -> PlotResult<()> {
        if !self.size.is_valid() {
            return Err(PlotError::InvalidData(format!(
                "frame size must be finite and > 0 (got {}x{})",
                self.size.width, self.size.height
            )));
        }

        for line in &self.lines {
            line.validate()?;
        }
        for rect in &self.rects {
            rect.validate()?;
        }
        for text in &self.texts {
            text.validate()?;
        }

        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty() && self.rects.is_empty() && self.texts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::RenderFrame;
    use crate::core::Size;
    use crate::render::{Color, LinePrimitive, RectPrimitive};

    #[test]
    fn empty_size_is_rejected() {
        let frame = RenderFrame::new(Size::new(0.0, 10.0));
        assert!(frame.validate().is_err());
    }

    #[test]
    fn invalid_primitives_fail_validation() {
        let base = RenderFrame::new(Size::new(100.0, 100.0));
        let black = Color::rgb(0.0, 0.0, 0.0);
        assert!(
            base.clone()
                .with_line(LinePrimitive::new(0.0, 0.0, 1.0, f64::NAN, 1.0, black))
                .validate()
                .is_err()
        );
        assert!(
            base.clone()
                .with_rect(RectPrimitive::new(0.0, 0.0, -1.0, 2.0, black))
                .validate()
                .is_err()
        );
        assert!(
            base.with_line(LinePrimitive::new(0.0, 0.0, 1.0, 1.0, 1.0, black))
                .validate()
                .is_ok()
        );
    }
}
