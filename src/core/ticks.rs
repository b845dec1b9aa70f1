//! Nice-number tick derivation for linear, logarithmic and reversed axes.
//!
//! Ticks are produced in canvas order (ascending transformed value). Each
//! numeric tick carries a coefficient/exponent decomposition so labels can be
//! rendered in scientific notation with the right number of decimals.

use serde::{Deserialize, Serialize};

use crate::core::axis_kind::AxisKind;
use crate::core::date_ticks::{DateTickUnit, derive_date_ticks};
use crate::core::label_text::{LabelText, format_numeric_label};
use crate::core::types::Range;

/// Ticks within this fraction of an interval of a bound count as on the bound.
pub const FRACTIONAL_TOLERANCE: f64 = 1e-6;

/// Upper bound on decimals tracked for any tick.
const MAX_REQUIRED_DECIMALS: u32 = 15;

/// `value = coefficient * 10^exponent`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecomposedNumber {
    pub value: f64,
    pub coefficient: f64,
    pub exponent: i32,
}

impl DecomposedNumber {
    #[must_use]
    pub const fn new(value: f64, coefficient: f64, exponent: i32) -> Self {
        Self {
            value,
            coefficient,
            exponent,
        }
    }

    /// Decomposes `value` using its own leading power of ten.
    #[must_use]
    pub fn from_value(value: f64) -> Self {
        if value == 0.0 || !value.is_finite() {
            return Self::new(value, value, 0);
        }
        let exponent = value.abs().log10().floor() as i32;
        Self::new(value, value / 10f64.powi(exponent), exponent)
    }
}

/// One tick mark with its label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tick {
    /// Raw data value.
    pub value: f64,
    /// Value after the axis graph transform (log10, negation, identity).
    pub transformed: f64,
    /// Decomposition for numeric labels; `None` for calendar ticks.
    pub decomposition: Option<DecomposedNumber>,
    pub required_decimals: u32,
    pub label: LabelText,
}

/// Spacing rule that produced a tick set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub enum TickStep {
    #[default]
    None,
    /// Nice `1/2/5 × 10^n` interval in raw units (seconds for sub-second date ticks).
    Numeric(DecomposedNumber),
    /// Integer number of decades between log ticks.
    Decades(i64),
    /// Whole calendar units between date ticks.
    Calendar { unit: DateTickUnit, count: i64 },
    /// Ticks taken from caller-supplied positions.
    Override,
}

/// Derived, ephemeral tick set for one axis state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TickSet {
    pub ticks: Vec<Tick>,
    /// Ascending transformed range the ticks were derived for.
    pub transformed_range: Option<Range>,
    pub step: TickStep,
}

impl TickSet {
    #[must_use]
    pub fn empty(transformed_range: Option<Range>) -> Self {
        Self {
            ticks: Vec::new(),
            transformed_range,
            step: TickStep::None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    #[must_use]
    pub fn values(&self) -> Vec<f64> {
        self.ticks.iter().map(|tick| tick.value).collect()
    }

    #[must_use]
    pub fn transformed(&self) -> Vec<f64> {
        self.ticks.iter().map(|tick| tick.transformed).collect()
    }
}

/// Caller-supplied tick positions (and optional labels) with a per-index
/// decomposition cache.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickOverrides {
    values: Vec<f64>,
    labels: Option<Vec<String>>,
    cache: Vec<Option<(DecomposedNumber, u32)>>,
}

impl TickOverrides {
    #[must_use]
    pub fn new(values: Vec<f64>) -> Self {
        let cache = vec![None; values.len()];
        Self {
            values,
            labels: None,
            cache,
        }
    }

    /// Attaches label text; ignored unless it has one entry per value.
    #[must_use]
    pub fn with_labels(mut self, labels: Vec<String>) -> Self {
        self.labels = Some(labels);
        self
    }

    /// Replaces positions, keeping cached decompositions for unchanged entries.
    pub fn set_values(&mut self, values: Vec<f64>) {
        self.cache.resize(values.len(), None);
        self.values = values;
    }

    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn labels_for_values(&self) -> Option<&[String]> {
        self.labels
            .as_deref()
            .filter(|labels| labels.len() == self.values.len())
    }

    fn decomposition(&mut self, index: usize) -> (DecomposedNumber, u32) {
        let value = self.values[index];
        match self.cache[index] {
            Some(cached) if cached.0.value.to_bits() == value.to_bits() => cached,
            _ => {
                let entry = (
                    DecomposedNumber::from_value(value),
                    required_decimals_for_value(value),
                );
                self.cache[index] = Some(entry);
                entry
            }
        }
    }

    #[cfg(test)]
    fn cached_entries(&self) -> usize {
        self.cache.iter().filter(|entry| entry.is_some()).count()
    }
}

/// Derives the tick set for `range` on an axis of `kind`.
///
/// `range` holds raw data bounds; the transformed coordinates are computed
/// here. Non-empty overrides replace generated positions for linear-family
/// axes.
#[must_use]
pub fn derive_ticks(
    range: Range,
    kind: AxisKind,
    max_tick_count: usize,
    overrides: Option<&mut TickOverrides>,
) -> TickSet {
    let transformed_range = kind.transformed_range(range);
    if max_tick_count == 0 || !range.is_finite() {
        return TickSet::empty(Some(transformed_range));
    }

    let overrides = overrides.filter(|overrides| !overrides.is_empty());
    match kind {
        AxisKind::Linear => {
            let mut set = derive_linear_or_override(range, kind, max_tick_count, overrides);
            set.transformed_range = Some(transformed_range);
            set
        }
        AxisKind::Log => {
            let mut set = derive_log_ticks(transformed_range, range, max_tick_count);
            set.transformed_range = Some(transformed_range);
            set
        }
        AxisKind::Date => {
            let mut set = derive_date_ticks(range, max_tick_count);
            set.transformed_range = Some(transformed_range);
            set
        }
        AxisKind::LinearReversed => {
            let mut set = derive_linear_or_override(range, kind, max_tick_count, overrides);
            set.ticks.reverse();
            set.transformed_range = Some(transformed_range);
            set
        }
    }
}

fn derive_linear_or_override(
    range: Range,
    kind: AxisKind,
    max_tick_count: usize,
    overrides: Option<&mut TickOverrides>,
) -> TickSet {
    match overrides {
        Some(overrides) => derive_override_ticks(range, kind, overrides),
        None => derive_linear_ticks(range, kind, max_tick_count),
    }
}

/// Snaps `min_interval` up to the nearest `{1, 2, 5} × 10^e`.
#[must_use]
pub fn nice_interval(min_interval: f64) -> DecomposedNumber {
    let min_interval = if min_interval.is_finite() && min_interval > 0.0 {
        min_interval
    } else {
        1.0
    };
    let mut exponent = min_interval.log10().floor() as i32;
    let raw = (min_interval / 10f64.powi(exponent) - FRACTIONAL_TOLERANCE).ceil();
    let coefficient = if raw > 5.0 {
        exponent += 1;
        1.0
    } else if raw > 2.0 {
        5.0
    } else if raw > 1.0 {
        2.0
    } else {
        1.0
    };
    DecomposedNumber::new(coefficient * 10f64.powi(exponent), coefficient, exponent)
}

/// Integer version of [`nice_interval`], used for whole calendar units.
#[must_use]
pub fn nice_integer_interval(min_interval: i64) -> i64 {
    if min_interval <= 1 {
        return 1;
    }
    let exponent = (min_interval as f64).log10().floor() as u32;
    let mut factor = 10i64.saturating_pow(exponent);
    let coefficient = (min_interval + factor - 1) / factor;
    let coefficient: i64 = if coefficient > 5 {
        factor = factor.saturating_mul(10);
        1
    } else if coefficient > 2 {
        5
    } else if coefficient > 1 {
        2
    } else {
        1
    };
    coefficient.saturating_mul(factor)
}

/// First multiple of `interval` at or after `min` (within tolerance).
pub(crate) fn first_tick(min: f64, interval: DecomposedNumber) -> DecomposedNumber {
    let tolerance = FRACTIONAL_TOLERANCE * interval.value;
    let value = ((min - tolerance) / interval.value).ceil() * interval.value + 0.0;
    if value == 0.0 {
        return DecomposedNumber::new(0.0, 0.0, interval.exponent);
    }
    DecomposedNumber::from_value(value)
}

fn derive_linear_ticks(range: Range, kind: AxisKind, max_tick_count: usize) -> TickSet {
    let mut delta = range.length();
    if delta <= 0.0 {
        delta = 1.0;
    }
    let interval = nice_interval(delta / max_tick_count as f64);
    let first = first_tick(range.min, interval);

    let abs_tolerance = FRACTIONAL_TOLERANCE * interval.value;
    let count = ((range.max - first.value + abs_tolerance) / interval.value).floor();
    let count = if count.is_finite() && count >= 0.0 {
        count as usize + 1
    } else {
        0
    };

    let mut ticks = Vec::with_capacity(count);
    let mut coefficient = first.coefficient;
    let mut exponent = first.exponent;
    for index in 0..count {
        let value = first.value + index as f64 * interval.value;
        let required_decimals = interval.exponent.abs_diff(exponent).min(MAX_REQUIRED_DECIMALS);
        let decomposition = DecomposedNumber::new(value, coefficient, exponent);
        ticks.push(Tick {
            value,
            transformed: kind.graph_transform(value),
            decomposition: Some(decomposition),
            required_decimals,
            label: format_numeric_label(decomposition, required_decimals),
        });

        // Fold the interval into the running coefficient so labels keep
        // their significant digits without re-deriving from the float value.
        if exponent > interval.exponent {
            coefficient += interval.coefficient / 10f64.powi(exponent - interval.exponent);
        } else {
            exponent = interval.exponent;
            coefficient += interval.coefficient;
        }
        if coefficient >= 10.0 {
            coefficient /= 10.0;
            exponent += 1;
        }
        if coefficient > -1.0 && coefficient < -abs_tolerance {
            coefficient *= 10.0;
            exponent -= 1;
        }
        coefficient = round_to_decimals(coefficient, required_decimals);
    }

    TickSet {
        ticks,
        transformed_range: None,
        step: TickStep::Numeric(interval),
    }
}

fn derive_log_ticks(transformed: Range, raw: Range, max_tick_count: usize) -> TickSet {
    let range_start = (transformed.min - FRACTIONAL_TOLERANCE).ceil() as i64;
    let range_end = (transformed.max + FRACTIONAL_TOLERANCE).floor() as i64;
    let possible = range_end - range_start + 1;

    if possible < 2 {
        // Less than a decade: nice ticks over raw values, placed in log space.
        let mut set = derive_linear_ticks(raw, AxisKind::Log, max_tick_count);
        set.ticks.retain(|tick| tick.value > 0.0);
        return set;
    }

    let mut interval = 1i64;
    let mut first = range_start;
    let mut last = range_end;
    if possible > max_tick_count as i64 {
        let approx = possible as f64 / max_tick_count as f64;
        interval = nice_interval(approx).value.round().max(1.0) as i64;
        first = range_start.div_euclid(interval) * interval;
        if first < range_start {
            first += interval;
        }
        last = range_end.div_euclid(interval) * interval;
    }

    let mut ticks = Vec::new();
    let mut decade = first;
    while decade <= last {
        let exponent = decade as i32;
        let decomposition = DecomposedNumber::new(10f64.powi(exponent), 1.0, exponent);
        ticks.push(Tick {
            value: decomposition.value,
            transformed: decade as f64,
            decomposition: Some(decomposition),
            required_decimals: 0,
            label: format_numeric_label(decomposition, 0),
        });
        decade += interval;
    }

    TickSet {
        ticks,
        transformed_range: None,
        step: TickStep::Decades(interval),
    }
}

fn derive_override_ticks(range: Range, kind: AxisKind, overrides: &mut TickOverrides) -> TickSet {
    let selected: Vec<usize> = (0..overrides.values.len())
        .filter(|&index| range.contains(overrides.values[index]))
        .collect();

    let mut ticks = Vec::with_capacity(selected.len());
    for &index in &selected {
        let (decomposition, required_decimals) = overrides.decomposition(index);
        let label = match overrides.labels_for_values() {
            Some(labels) => LabelText::plain(labels[index].clone()),
            None => format_numeric_label(decomposition, required_decimals),
        };
        ticks.push(Tick {
            value: decomposition.value,
            transformed: kind.graph_transform(decomposition.value),
            decomposition: Some(decomposition),
            required_decimals,
            label,
        });
    }

    TickSet {
        ticks,
        transformed_range: None,
        step: TickStep::Override,
    }
}

/// Decimals (in the coefficient/exponent sense) needed to show `value` exactly.
fn required_decimals_for_value(value: f64) -> u32 {
    if value == 0.0 || !value.is_finite() {
        return 0;
    }
    let exponent = value.abs().log10().floor() as i64;
    let tolerance = 1e-9 * value.abs().max(1.0);
    let decimals = (0..=MAX_REQUIRED_DECIMALS)
        .find(|&decimals| (round_to_decimals(value, decimals) - value).abs() <= tolerance)
        .unwrap_or(MAX_REQUIRED_DECIMALS);
    (i64::from(decimals) + exponent).clamp(0, i64::from(MAX_REQUIRED_DECIMALS)) as u32
}

fn round_to_decimals(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals.min(MAX_REQUIRED_DECIMALS) as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::{
        TickOverrides, derive_ticks, nice_integer_interval, nice_interval,
        required_decimals_for_value,
    };
    use crate::core::label_text::LabelText;
    use crate::core::{AxisKind, Range};

    #[test]
    fn nice_interval_rounds_up_to_one_two_five() {
        assert_eq!(nice_interval(10.0).value, 10.0);
        assert_eq!(nice_interval(1.5).value, 2.0);
        assert_eq!(nice_interval(2.2).value, 5.0);
        assert_eq!(nice_interval(6.0).value, 10.0);
        assert_eq!(nice_interval(6.0).coefficient, 1.0);
        assert_eq!(nice_interval(6.0).exponent, 1);
    }

    #[test]
    fn nice_interval_ignores_float_noise_above_a_step() {
        let interval = nice_interval(0.1 + 1e-12);
        assert!((interval.value - 0.1).abs() <= 1e-15);
    }

    #[test]
    fn integer_interval_snaps_upwards() {
        assert_eq!(nice_integer_interval(1), 1);
        assert_eq!(nice_integer_interval(3), 5);
        assert_eq!(nice_integer_interval(7), 10);
        assert_eq!(nice_integer_interval(12), 20);
        assert_eq!(nice_integer_interval(140), 200);
    }

    #[test]
    fn decimal_ticks_carry_required_decimals() {
        let set = derive_ticks(Range::new(0.0, 1.0), AxisKind::Linear, 5, None);
        let labels: Vec<String> = set.ticks.iter().map(|t| t.label.display_text()).collect();
        assert_eq!(labels, vec!["0.0", "0.2", "0.4", "0.6", "0.8", "1.0"]);
    }

    #[test]
    fn negative_ticks_cross_zero_cleanly() {
        let set = derive_ticks(Range::new(-30.0, 10.0), AxisKind::Linear, 4, None);
        let labels: Vec<String> = set.ticks.iter().map(|t| t.label.display_text()).collect();
        assert_eq!(labels, vec!["-30", "-20", "-10", "0", "10"]);
    }

    #[test]
    fn large_values_switch_to_scientific_labels() {
        let set = derive_ticks(Range::new(0.0, 50_000.0), AxisKind::Linear, 5, None);
        assert_eq!(set.values(), vec![0.0, 10_000.0, 20_000.0, 30_000.0, 40_000.0, 50_000.0]);
        assert_eq!(
            set.ticks[1].label,
            LabelText::Scientific {
                coefficient: "1".to_owned(),
                exponent: "4".to_owned(),
            }
        );
        assert_eq!(set.ticks[0].label, LabelText::plain("0"));
    }

    #[test]
    fn overrides_select_in_range_values_and_cache_decompositions() {
        let mut overrides = TickOverrides::new(vec![-5.0, 0.5, 2.0, 7.25, 50.0]);
        let set = derive_ticks(
            Range::new(0.0, 10.0),
            AxisKind::Linear,
            10,
            Some(&mut overrides),
        );
        assert_eq!(set.values(), vec![0.5, 2.0, 7.25]);
        assert_eq!(overrides.cached_entries(), 3);
        assert_eq!(set.ticks[2].label, LabelText::plain("7.25"));

        overrides.set_values(vec![-5.0, 0.5, 3.0, 7.25, 50.0]);
        let set = derive_ticks(
            Range::new(0.0, 10.0),
            AxisKind::Linear,
            10,
            Some(&mut overrides),
        );
        assert_eq!(set.values(), vec![0.5, 3.0, 7.25]);
    }

    #[test]
    fn override_labels_replace_numeric_text() {
        let mut overrides = TickOverrides::new(vec![1.0, 2.0, 3.0])
            .with_labels(vec!["one".to_owned(), "two".to_owned(), "three".to_owned()]);
        let set = derive_ticks(
            Range::new(1.5, 3.5),
            AxisKind::Linear,
            10,
            Some(&mut overrides),
        );
        assert_eq!(set.ticks[0].label, LabelText::plain("two"));
        assert_eq!(set.ticks[1].label, LabelText::plain("three"));
    }

    #[test]
    fn zero_tick_count_yields_empty_set_even_with_overrides() {
        let mut overrides = TickOverrides::new(vec![1.0, 2.0]);
        let set = derive_ticks(Range::new(0.0, 10.0), AxisKind::Linear, 0, Some(&mut overrides));
        assert!(set.is_empty());
    }

    #[test]
    fn log_axis_within_one_decade_uses_linear_spacing() {
        let set = derive_ticks(Range::new(2.0, 9.0), AxisKind::Log, 10, None);
        assert_eq!(set.values(), vec![2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);
        for tick in &set.ticks {
            assert!((tick.transformed - tick.value.log10()).abs() <= 1e-12);
        }
    }

    #[test]
    fn log_axis_thins_decades_beyond_tick_limit() {
        let set = derive_ticks(Range::new(1e-10, 1e10), AxisKind::Log, 5, None);
        assert_eq!(set.transformed(), vec![-10.0, -5.0, 0.0, 5.0, 10.0]);
    }

    #[test]
    fn required_decimals_follow_value_precision() {
        assert_eq!(required_decimals_for_value(7.25), 2);
        assert_eq!(required_decimals_for_value(12_345.0), 4);
        assert_eq!(required_decimals_for_value(0.05), 0);
    }
}
