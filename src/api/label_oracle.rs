use serde::{Deserialize, Serialize};

use crate::core::{LabelSize, LabelText};

/// Font used to measure tick labels and titles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontDescriptor {
    pub family: String,
    pub size_px: f64,
}

impl FontDescriptor {
    #[must_use]
    pub fn new(family: impl Into<String>, size_px: f64) -> Self {
        Self {
            family: family.into(),
            size_px,
        }
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.size_px.is_finite() && self.size_px > 0.0
    }
}

impl Default for FontDescriptor {
    fn default() -> Self {
        Self::new("sans-serif", 12.0)
    }
}

/// Source of rendered label extents.
///
/// Layout never draws text; it only needs sizes, so hosts plug in whatever
/// measures text the way their backend will draw it.
pub trait LabelSizeOracle {
    fn measure(&self, label: &LabelText, font: &FontDescriptor) -> LabelSize;
}

/// Backend-independent estimate from per-character advance factors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeuristicLabelSizeOracle {
    /// Line height as a multiple of the font size.
    pub line_height_factor: f64,
}

impl Default for HeuristicLabelSizeOracle {
    fn default() -> Self {
        Self {
            line_height_factor: 1.2,
        }
    }
}

/// Exponent font size relative to the base font.
const SUPERSCRIPT_SCALE: f64 = 10.0 / 12.0;

impl LabelSizeOracle for HeuristicLabelSizeOracle {
    fn measure(&self, label: &LabelText, font: &FontDescriptor) -> LabelSize {
        let line_height = font.size_px * self.line_height_factor;
        match label {
            LabelText::Plain(text) => {
                if text.is_empty() {
                    return LabelSize::new(0.0, 0.0, line_height);
                }
                let lines = text.split('\n').count() as f64;
                let width = text
                    .split('\n')
                    .map(|line| estimate_text_width_px(line, font.size_px))
                    .fold(0.0, f64::max);
                LabelSize::new(width, lines * line_height, line_height)
            }
            LabelText::Scientific {
                coefficient,
                exponent,
            } => {
                let base = format!("{coefficient}\u{00D7}10");
                let width = estimate_text_width_px(&base, font.size_px)
                    + estimate_text_width_px(exponent, font.size_px * SUPERSCRIPT_SCALE);
                // superscript is raised by a third of a line
                LabelSize::new(width, line_height * (1.0 + 1.0 / 3.0), line_height)
            }
        }
    }
}

/// Deterministic width estimate for one line of text.
#[must_use]
pub fn estimate_text_width_px(text: &str, font_size_px: f64) -> f64 {
    if text.is_empty() {
        return 0.0;
    }
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            '.' | ',' => 0.34,
            '-' | '+' | '%' => 0.42,
            ' ' => 0.33,
            _ => 0.58,
        }
    });
    (units * font_size_px).max(font_size_px * 0.5)
}

#[cfg(test)]
mod tests {
    use super::{FontDescriptor, HeuristicLabelSizeOracle, LabelSizeOracle, estimate_text_width_px};
    use crate::core::LabelText;

    #[test]
    fn digits_are_wider_than_separators() {
        assert!(estimate_text_width_px("00", 10.0) > estimate_text_width_px("..", 10.0));
        assert_eq!(estimate_text_width_px("", 10.0), 0.0);
    }

    #[test]
    fn multi_line_labels_stack_lines() {
        let oracle = HeuristicLabelSizeOracle::default();
        let font = FontDescriptor::new("sans", 10.0);
        let single = oracle.measure(&LabelText::plain("2024-01-02"), &font);
        let double = oracle.measure(&LabelText::plain("2024-01-02\n12:00"), &font);
        assert_eq!(single.width, double.width);
        assert!((double.height - 2.0 * single.height).abs() <= 1e-12);
        assert_eq!(double.line_height, single.line_height);
    }

    #[test]
    fn scientific_labels_are_taller_than_one_line() {
        let oracle = HeuristicLabelSizeOracle::default();
        let font = FontDescriptor::default();
        let size = oracle.measure(
            &LabelText::Scientific {
                coefficient: "2.5".to_owned(),
                exponent: "6".to_owned(),
            },
            &font,
        );
        assert!(size.height > size.line_height);
        assert!(size.width > 0.0);
    }
}
