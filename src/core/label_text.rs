use serde::{Deserialize, Serialize};

use crate::core::ticks::DecomposedNumber;

/// Exponent magnitude from which numeric labels switch to scientific notation.
pub const SCIENTIFIC_EXPONENT_THRESHOLD: i32 = 4;

/// Multiplication sign used between mantissa and base in scientific labels.
pub const TIMES_TEN: &str = "\u{00D7}10";

/// Text content of one tick label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabelText {
    /// Plain text, possibly multi-line (`\n`) for date/time labels.
    Plain(String),
    /// `coefficient×10` followed by a superscript `exponent`.
    Scientific {
        coefficient: String,
        exponent: String,
    },
}

impl LabelText {
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::Plain(text.into())
    }

    /// Value-based key suitable for memoizing measurements.
    #[must_use]
    pub fn cache_key(&self) -> String {
        match self {
            Self::Plain(text) => text.clone(),
            Self::Scientific {
                coefficient,
                exponent,
            } => format!("{coefficient}{TIMES_TEN}_{exponent}"),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Plain(text) => text.is_empty(),
            Self::Scientific { .. } => false,
        }
    }

    /// Flattened single-string rendering (`^` marks the superscript).
    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            Self::Plain(text) => text.clone(),
            Self::Scientific {
                coefficient,
                exponent,
            } => format!("{coefficient}{TIMES_TEN}^{exponent}"),
        }
    }
}

impl Default for LabelText {
    fn default() -> Self {
        Self::Plain(String::new())
    }
}

/// Formats a numeric tick from its decomposition.
#[must_use]
pub fn format_numeric_label(number: DecomposedNumber, required_decimals: u32) -> LabelText {
    let exponent = number.exponent;
    if number.value == 0.0 && exponent > 0 {
        return LabelText::plain("0");
    }
    if exponent >= SCIENTIFIC_EXPONENT_THRESHOLD || exponent <= -SCIENTIFIC_EXPONENT_THRESHOLD {
        let decimals = required_decimals as usize;
        return LabelText::Scientific {
            coefficient: format!("{:.*}", decimals, normalize_zero(number.coefficient)),
            exponent: exponent.to_string(),
        };
    }

    let decimals = (required_decimals as i64 - i64::from(exponent)).max(0) as usize;
    LabelText::Plain(format!("{:.*}", decimals, normalize_zero(number.value)))
}

/// Collapses `-0.0` so it never renders as "-0".
fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 { 0.0 } else { value }
}
