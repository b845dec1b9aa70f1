use serde::{Deserialize, Serialize};

use crate::core::axis::VERTICAL_LABEL_GAP_PX;
use crate::core::{Axis, AxisOrientation, AxisSide, LabelSize, Rect};
use crate::error::PlotResult;

use super::axis_label_culler::{LabelExtent, cull};
use super::layout_context::{LayoutContext, RegionId};

/// Clearance factor between neighbouring X labels, as a multiple of label width.
const HORIZONTAL_LABEL_CLEARANCE: f64 = 1.25;

/// Line segment in axes-region pixels (origin top-left, y down).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Segment {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }
}

/// Top-left anchored label box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelPlacement {
    pub index: usize,
    pub left: f64,
    pub top: f64,
    pub size: LabelSize,
    pub shown: bool,
}

/// Everything a backend needs to draw one axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisGeometry {
    /// Only drawn for axes stacked outside the innermost one.
    pub axis_line: Option<Segment>,
    pub ticks: Vec<Segment>,
    pub labels: Vec<LabelPlacement>,
    pub title: Option<LabelPlacement>,
    /// Hit area for dragging the axis.
    pub interaction_pad: Rect,
}

/// Outer frame of a region, taken from its innermost X and Y axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionFrame {
    pub width: f64,
    pub height: f64,
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl RegionFrame {
    /// Whole region including axes.
    #[must_use]
    pub fn axes_region(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Plot canvas inside the axes.
    #[must_use]
    pub fn canvas_location(self) -> Rect {
        Rect::new(
            self.left,
            self.top,
            self.width - self.right,
            self.height - self.bottom,
        )
    }
}

pub(crate) fn region_frame(ctx: &LayoutContext, region_id: RegionId) -> PlotResult<RegionFrame> {
    let region = ctx.region(region_id)?;
    let margins = region.initial_margins();
    let (width, left, right) = match region.x_axes().first() {
        Some(id) => {
            let x0 = ctx.axis(*id)?;
            (x0.total_length(), x0.padding().lower, x0.padding().upper)
        }
        None => (region.config().available.width, margins.left, margins.right),
    };
    let (height, bottom, top) = match region.y_axes().first() {
        Some(id) => {
            let y0 = ctx.axis(*id)?;
            (y0.total_length(), y0.padding().lower, y0.padding().upper)
        }
        None => (region.config().available.height, margins.bottom, margins.top),
    };
    Ok(RegionFrame {
        width,
        height,
        left,
        right,
        top,
        bottom,
    })
}

/// Stacks each side's axes outward from the plot canvas.
pub(crate) fn place_each_axis(ctx: &mut LayoutContext, region_id: RegionId) -> PlotResult<()> {
    let frame = region_frame(ctx, region_id)?;
    let region = ctx.region(region_id)?.clone();
    let spacing = ctx.config().axis_spacing;

    let sides = [
        (AxisOrientation::Horizontal, AxisSide::Near, frame.height - frame.bottom, 1.0),
        (AxisOrientation::Horizontal, AxisSide::Far, frame.top, -1.0),
        (AxisOrientation::Vertical, AxisSide::Near, frame.left, -1.0),
        (AxisOrientation::Vertical, AxisSide::Far, frame.width - frame.right, 1.0),
    ];
    for (orientation, side, start, direction) in sides {
        let mut position = start;
        for id in ctx.axes_on(&region, orientation, side) {
            let axis = ctx.axis_mut(id)?;
            axis.set_position(position);
            position += direction * (axis.thickness() + spacing);
        }
    }
    Ok(())
}

/// Along-axis label extents in increasing axis coordinate, for culling.
#[must_use]
pub fn label_extents(axis: &Axis) -> Vec<LabelExtent> {
    axis.ticks()
        .ticks
        .iter()
        .zip(axis.labels())
        .map(|(tick, label)| {
            let coordinate = axis.axis_coordinate(tick.transformed);
            let size = label.size;
            match axis.orientation() {
                AxisOrientation::Horizontal => {
                    let trailing = coordinate + size.width / 2.0;
                    LabelExtent::new(trailing - HORIZONTAL_LABEL_CLEARANCE * size.width, trailing)
                }
                AxisOrientation::Vertical => {
                    let trailing = coordinate + size.height - size.line_height / 2.0;
                    LabelExtent::new(trailing - size.height, trailing)
                }
            }
        })
        .collect()
}

/// Hides overlapping labels on `axis` when `cull_overlapping` is set.
pub(crate) fn position_labels(axis: &mut Axis, cull_overlapping: bool) {
    if !cull_overlapping || !axis.style().labels_visible {
        return;
    }
    let mask = cull(&label_extents(axis), axis.total_length());
    axis.apply_label_mask(&mask);
}

/// Draw geometry for `axis` in axes-region pixels.
#[must_use]
pub fn axis_geometry(axis: &Axis) -> AxisGeometry {
    let position = axis.position();
    let total = axis.total_length();
    let tick_length = axis.style().effective_tick_length();
    let near = axis.side() == AxisSide::Near;
    let low = axis.axis_coordinate(axis.min_transformed());
    let high = low + (axis.scale() * axis.delta()).max(1.0);

    let coordinates: Vec<f64> = axis
        .ticks()
        .ticks
        .iter()
        .map(|tick| axis.axis_coordinate(tick.transformed))
        .collect();
    let labels_visible = axis.style().labels_visible;
    let title_size = axis.title_size();
    let max_label_thickness = if labels_visible {
        (0..axis.labels().len())
            .filter(|&index| axis.labels()[index].shown)
            .map(|index| axis.label_thickness(index))
            .fold(0.0, f64::max)
    } else {
        0.0
    };
    let title_placement = |left: f64, top: f64, size: LabelSize| {
        (title_size.height > 0.0).then_some(LabelPlacement {
            index: 0,
            left,
            top,
            size,
            shown: true,
        })
    };

    match axis.orientation() {
        AxisOrientation::Horizontal => {
            let direction = if near { 1.0 } else { -1.0 };
            let ticks = if axis.style().ticks_visible {
                coordinates
                    .iter()
                    .map(|&x| Segment::new(x, position, x, position + direction * tick_length))
                    .collect()
            } else {
                Vec::new()
            };
            let labels = placements(axis, &coordinates, |coordinate, size| {
                let top = if near {
                    position + tick_length
                } else {
                    position - tick_length - size.height
                };
                (coordinate - size.width / 2.0, top)
            });
            let centre = (low + high) / 2.0;
            let title_top = if near {
                position + tick_length + max_label_thickness
            } else {
                position - tick_length - max_label_thickness - title_size.height
            };
            AxisGeometry {
                axis_line: (!axis.is_innermost())
                    .then(|| Segment::new(low, position, high, position)),
                ticks,
                labels,
                title: title_placement(centre - title_size.width / 2.0, title_top, title_size),
                interaction_pad: Rect::new(
                    low,
                    position,
                    high,
                    position + direction * axis.thickness(),
                ),
            }
        }
        AxisOrientation::Vertical => {
            let direction = if near { -1.0 } else { 1.0 };
            let ticks = if axis.style().ticks_visible {
                coordinates
                    .iter()
                    .map(|&c| {
                        let y = total - c;
                        Segment::new(position, y, position + direction * tick_length, y)
                    })
                    .collect()
            } else {
                Vec::new()
            };
            let labels = placements(axis, &coordinates, |coordinate, size| {
                let top = total - coordinate - (size.height - size.line_height / 2.0);
                let left = if near {
                    position - size.width - tick_length - VERTICAL_LABEL_GAP_PX
                } else {
                    position + tick_length + VERTICAL_LABEL_GAP_PX
                };
                (left, top)
            });
            // title text runs along the axis, so its box is rotated
            let rotated = LabelSize::new(title_size.height, title_size.width, title_size.line_height);
            let centre = total - (low + high) / 2.0;
            let title_left = if near {
                position - tick_length - max_label_thickness - rotated.width
            } else {
                position + tick_length + max_label_thickness
            };
            AxisGeometry {
                axis_line: (!axis.is_innermost())
                    .then(|| Segment::new(position, total - low, position, total - high)),
                ticks,
                labels,
                title: title_placement(title_left, centre - rotated.height / 2.0, rotated),
                interaction_pad: Rect::new(
                    position,
                    total - high,
                    position + direction * axis.thickness(),
                    total - low,
                ),
            }
        }
    }
}

fn placements(
    axis: &Axis,
    coordinates: &[f64],
    anchor: impl Fn(f64, LabelSize) -> (f64, f64),
) -> Vec<LabelPlacement> {
    if !axis.style().labels_visible {
        return Vec::new();
    }
    coordinates
        .iter()
        .zip(axis.labels())
        .enumerate()
        .map(|(index, (&coordinate, label))| {
            let (left, top) = anchor(coordinate, label.size);
            LabelPlacement {
                index,
                left,
                top,
                size: label.size,
                shown: label.shown && axis.label_participates(index),
            }
        })
        .collect()
}
