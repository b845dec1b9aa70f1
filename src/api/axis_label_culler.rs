use serde::{Deserialize, Serialize};

/// Tolerance for labels touching the ends of the axis.
const AXIS_EXTENT_TOLERANCE_PX: f64 = 0.5;

/// Along-axis extent of one label, in increasing axis coordinate.
///
/// `leading` is the edge compared against the previous label's `trailing`
/// edge; callers widen it to demand extra clearance between labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LabelExtent {
    pub leading: f64,
    pub trailing: f64,
}

impl LabelExtent {
    #[must_use]
    pub const fn new(leading: f64, trailing: f64) -> Self {
        Self { leading, trailing }
    }
}

/// Chooses which labels to show so that none overlap.
///
/// Labels are walked in axis order counting how many in a row collide with
/// the last kept one; the longest such run sets a uniform stride, so every
/// `stride + 1`-th label is shown starting from the first. Interior labels
/// lying wholly outside `[0, axis_length]` are hidden too; the first and
/// last labels only answer to the stride.
#[must_use]
pub fn cull(extents: &[LabelExtent], axis_length: f64) -> Vec<bool> {
    let mut miss_out = 0usize;
    let mut max_miss_out = 0usize;
    let mut last_trailing = f64::NEG_INFINITY;
    for extent in extents {
        if extent.leading < last_trailing {
            miss_out += 1;
        } else {
            last_trailing = extent.trailing;
            max_miss_out = max_miss_out.max(miss_out);
            miss_out = 0;
        }
    }
    max_miss_out = max_miss_out.max(miss_out);

    let low = -AXIS_EXTENT_TOLERANCE_PX;
    let high = axis_length + AXIS_EXTENT_TOLERANCE_PX;
    let last = extents.len().saturating_sub(1);
    let mut skipped = 0usize;
    extents
        .iter()
        .enumerate()
        .map(|(index, extent)| {
            if index > 0 && skipped < max_miss_out {
                skipped += 1;
                return false;
            }
            skipped = 0;
            let outside = extent.trailing.max(extent.leading) < low
                || extent.leading.min(extent.trailing) > high;
            index == 0 || index == last || !outside
        })
        .collect()
}
