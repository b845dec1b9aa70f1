use indexmap::IndexMap;
use tracing::{trace, warn};

use crate::core::{Axis, AxisId, Thickness1D};

use super::layout_config::MIN_PLOT_LENGTH_PX;

/// Overflow tolerance when testing a label against the axis ends.
const OVERFLOW_TOLERANCE_PX: f64 = 0.1;

/// Result of growing one aligned group's margins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct ExpansionReport {
    pub rescales: usize,
    pub converged: bool,
}

/// Margin at one end of the group, set by the label that overflowed last.
#[derive(Debug, Clone, Copy)]
struct LimitingLabel {
    semi_length: f64,
    offset: f64,
    delta: f64,
}

/// Grows the padding of an aligned axis group until the outermost shown
/// labels fit, shrinking the scale to compensate.
///
/// Tick labels are examined in pairs from both ends inward. Whenever one
/// overflows, the group is rescaled so that label lands exactly on the axis
/// end and the scan restarts. All members keep one total length and one
/// padding. With `fixed_length` the plot length stays put and the total
/// grows instead.
pub(crate) fn expand_axis_margins(
    axes: &mut IndexMap<AxisId, Axis>,
    group: &[AxisId],
    fixed_length: Option<f64>,
    max_rescales: usize,
) -> ExpansionReport {
    let members: Vec<AxisId> = group
        .iter()
        .copied()
        .filter(|id| axes.contains_key(id))
        .collect();
    let Some(&first) = members.first() else {
        return ExpansionReport {
            rescales: 0,
            converged: true,
        };
    };
    let fixed_length = fixed_length.filter(|length| *length > MIN_PLOT_LENGTH_PX);

    let mut margin = Thickness1D::default();
    let mut shared_total = f64::INFINITY;
    for id in &members {
        let axis = &axes[id];
        margin.lower = margin.lower.max(axis.padding().lower);
        margin.upper = margin.upper.max(axis.padding().upper);
        shared_total = shared_total.min(axis.total_length());
    }
    let total = match fixed_length {
        Some(length) => length + margin.total(),
        None if shared_total - margin.total() < MIN_PLOT_LENGTH_PX => {
            margin.total() + MIN_PLOT_LENGTH_PX
        }
        None => shared_total,
    };
    for id in &members {
        if let Some(axis) = axes.get_mut(id) {
            axis.set_total_length(total);
            axis.reset_axis_margin(margin);
        }
    }

    let first_delta = axes[&first].delta();
    let mut lower = LimitingLabel {
        semi_length: margin.lower,
        offset: 0.0,
        delta: first_delta,
    };
    let mut upper = LimitingLabel {
        semi_length: margin.upper,
        offset: 0.0,
        delta: first_delta,
    };

    let max_tick_index = members
        .iter()
        .map(|id| axes[id].ticks().len())
        .max()
        .unwrap_or(0)
        / 2;
    let mut tick_index = 0usize;
    let mut rescales = 0usize;
    while tick_index <= max_tick_index && rescales < max_rescales {
        let overflow = members
            .iter()
            .find_map(|id| find_overflow(&axes[id], tick_index));
        let Some(overflow) = overflow else {
            tick_index += 1;
            continue;
        };

        match overflow {
            Overflow::Lower(label) => lower = label,
            Overflow::Upper(label) => upper = label,
        }
        rescales += 1;

        let upper_offset = upper.offset * lower.delta / upper.delta;
        let axis_total = axes[&first].total_length();
        let mut scale = (axis_total - lower.semi_length - upper.semi_length)
            / (lower.delta - lower.offset - upper_offset);
        let mut new_total = None;
        if let Some(length) = fixed_length {
            scale = length / lower.delta;
            new_total = Some(length);
        }
        if !scale.is_finite() || scale * lower.delta <= MIN_PLOT_LENGTH_PX {
            scale = MIN_PLOT_LENGTH_PX / lower.delta;
            new_total = Some(MIN_PLOT_LENGTH_PX);
        }
        let new_margin = Thickness1D::new(
            lower.semi_length - lower.offset * scale,
            upper.semi_length - upper_offset * scale,
        );
        trace!(
            rescale = rescales,
            scale,
            lower = new_margin.lower,
            upper = new_margin.upper,
            "expanded axis margins"
        );
        for id in &members {
            if let Some(axis) = axes.get_mut(id) {
                if let Some(length) = new_total {
                    axis.set_total_length(length + new_margin.total());
                }
                let member_scale = scale * lower.delta / axis.delta();
                axis.rescale(member_scale, new_margin);
            }
        }
        tick_index = 0;
    }

    let converged = tick_index > max_tick_index;
    if !converged {
        warn!(
            axes = members.len(),
            rescales, "margin expansion hit the rescale cap; labels may overflow"
        );
    }
    ExpansionReport {
        rescales,
        converged,
    }
}

enum Overflow {
    Lower(LimitingLabel),
    Upper(LimitingLabel),
}

/// Checks the `tick_index`-th label from each end of `axis`.
fn find_overflow(axis: &Axis, tick_index: usize) -> Option<Overflow> {
    let count = axis.ticks().len();
    if count < 2 * tick_index + 1 {
        return None;
    }
    let total = axis.total_length();
    for index in [tick_index, count - 1 - tick_index] {
        if !axis.label_participates(index) {
            continue;
        }
        let transformed = axis.ticks().ticks[index].transformed;
        let semi_length = axis.label_length(index) / 2.0;
        let coordinate = axis.axis_coordinate(transformed);
        if coordinate - semi_length < -OVERFLOW_TOLERANCE_PX {
            return Some(Overflow::Lower(LimitingLabel {
                semi_length,
                offset: transformed - axis.min_transformed(),
                delta: axis.delta(),
            }));
        }
        if coordinate + semi_length > total + OVERFLOW_TOLERANCE_PX {
            return Some(Overflow::Upper(LimitingLabel {
                semi_length,
                offset: axis.max_transformed() - transformed,
                delta: axis.delta(),
            }));
        }
    }
    None
}
