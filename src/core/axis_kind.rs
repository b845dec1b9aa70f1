use serde::{Deserialize, Serialize};

use crate::core::date_ticks::{max_ole_date, min_ole_date};
use crate::core::types::Range;
use crate::error::{PlotError, PlotResult};

/// Largest accepted `|bound| / span` ratio before precision loss makes ticks meaningless.
pub const MAX_BOUND_TO_SPAN_RATIO: f64 = 1e10;

/// Mapping mode used by an axis. Drives tick generation and the graph transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AxisKind {
    /// Uniform spacing in raw units.
    #[default]
    Linear,
    /// Uniform spacing in log10 units (bounds must be > 0).
    Log,
    /// Calendar ticks over OLE Automation date values.
    Date,
    /// Linear, but larger values map to smaller canvas coordinates.
    LinearReversed,
}

impl AxisKind {
    /// Transform applied to graph values before canvas mapping.
    #[must_use]
    pub fn graph_transform(self, value: f64) -> f64 {
        match self {
            Self::Log => value.log10(),
            Self::LinearReversed => -value,
            Self::Linear | Self::Date => value,
        }
    }

    /// Inverse of [`AxisKind::graph_transform`].
    #[must_use]
    pub fn canvas_transform(self, value: f64) -> f64 {
        match self {
            Self::Log => 10f64.powf(value),
            Self::LinearReversed => -value,
            Self::Linear | Self::Date => value,
        }
    }

    /// Transformed interval covered by `range`, always ascending.
    #[must_use]
    pub fn transformed_range(self, range: Range) -> Range {
        let a = self.graph_transform(range.min);
        let b = self.graph_transform(range.max);
        Range::new(a.min(b), a.max(b))
    }

    /// Range a freshly created axis of this kind starts with.
    #[must_use]
    pub fn default_range(self) -> Range {
        match self {
            Self::Log => Range::new(1.0, 10.0),
            Self::Linear | Self::Date | Self::LinearReversed => Range::new(0.0, 10.0),
        }
    }

    /// Checks a proposed range and returns the corrected (ascending) range.
    ///
    /// Swapped bounds are corrected; every other violation is an error.
    pub fn validate_range(self, min: f64, max: f64) -> PlotResult<Range> {
        let invalid = |reason: &str| PlotError::InvalidRange {
            min,
            max,
            reason: reason.to_owned(),
        };

        if !min.is_finite() || !max.is_finite() {
            return Err(invalid("bounds must be finite"));
        }
        let range = if min > max {
            Range::new(max, min)
        } else {
            Range::new(min, max)
        };
        if range.length() <= 0.0 {
            return Err(invalid("min must be < max"));
        }

        match self {
            Self::Log if range.min <= 0.0 => {
                return Err(invalid("log axis bounds must be > 0"));
            }
            Self::Date if range.min < min_ole_date() || range.max >= max_ole_date() => {
                return Err(invalid("date axis bounds are outside the calendar"));
            }
            _ => {}
        }

        let length = range.length();
        if range.min.abs() / length > MAX_BOUND_TO_SPAN_RATIO
            || range.max.abs() / length > MAX_BOUND_TO_SPAN_RATIO
        {
            return Err(invalid("span is too small relative to bounds"));
        }

        Ok(range)
    }
}

#[cfg(test)]
mod tests {
    use super::AxisKind;

    #[test]
    fn log_transform_round_trips() {
        let transformed = AxisKind::Log.graph_transform(1000.0);
        assert!((transformed - 3.0).abs() <= 1e-12);
        assert!((AxisKind::Log.canvas_transform(transformed) - 1000.0).abs() <= 1e-9);
    }

    #[test]
    fn reversed_transformed_range_is_ascending() {
        let range = AxisKind::LinearReversed
            .transformed_range(crate::core::Range::new(0.0, 100.0));
        assert_eq!(range.min, -100.0);
        assert_eq!(range.max, 0.0);
    }

    #[test]
    fn swapped_bounds_are_corrected() {
        let range = AxisKind::Linear.validate_range(5.0, 1.0).expect("corrected");
        assert_eq!((range.min, range.max), (1.0, 5.0));
    }

    #[test]
    fn extreme_ratio_is_rejected() {
        assert!(AxisKind::Linear.validate_range(1e12, 1e12 + 1.0).is_err());
        assert!(AxisKind::Linear.validate_range(0.0, 1e-3).is_ok());
    }

    #[test]
    fn log_rejects_non_positive_bounds() {
        assert!(AxisKind::Log.validate_range(0.0, 10.0).is_err());
        assert!(AxisKind::Log.validate_range(-1.0, 10.0).is_err());
        assert!(AxisKind::Linear.validate_range(-1.0, 10.0).is_ok());
    }

    #[test]
    fn date_rejects_out_of_calendar_bounds() {
        assert!(AxisKind::Date.validate_range(-1e7, 0.0).is_err());
        assert!(AxisKind::Date.validate_range(0.0, 3e6).is_err());
        assert!(AxisKind::Date.validate_range(40_000.0, 40_100.0).is_ok());
    }
}
