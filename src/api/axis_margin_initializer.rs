use crate::core::{Axis, AxisOrientation, AxisSide, Margins, Thickness1D};
use crate::error::PlotResult;

use super::layout_config::LayoutConfig;
use super::layout_context::{LayoutContext, PlotRegion, RegionId};

/// Computes a region's margins from its axes' thicknesses and resets every
/// axis in the region to them.
///
/// Each side gets the summed thickness of its axes plus one spacing per gap
/// between them, floored at the configured minimum.
pub(crate) fn initialize_margins(ctx: &mut LayoutContext, region_id: RegionId) -> PlotResult<Margins> {
    let region = ctx.region(region_id)?.clone();
    let spacing = ctx.config().axis_spacing;
    let floor = ctx.config().min_axis_margin;

    let mut side_extent = |orientation: AxisOrientation, side: AxisSide| -> PlotResult<f64> {
        let ids = ctx.axes_on(&region, orientation, side);
        let mut total = 0.0;
        for id in &ids {
            total += ctx.axis_mut(*id)?.calculate_thickness();
        }
        let gaps = ids.len().saturating_sub(1) as f64;
        Ok(total + gaps * spacing)
    };

    let left = side_extent(AxisOrientation::Vertical, AxisSide::Near)?;
    let right = side_extent(AxisOrientation::Vertical, AxisSide::Far)?;
    let bottom = side_extent(AxisOrientation::Horizontal, AxisSide::Near)?;
    let top = side_extent(AxisOrientation::Horizontal, AxisSide::Far)?;

    let margins = Margins::new(
        left.max(floor.left),
        top.max(floor.top),
        right.max(floor.right),
        bottom.max(floor.bottom),
    );
    if let Some(stored) = ctx.regions_map_mut().get_mut(&region_id) {
        stored.set_initial_margins(margins);
    }

    let config = ctx.config().clone();
    for id in region.x_axes().iter().chain(region.y_axes()) {
        let axis = ctx.axis_mut(*id)?;
        reset_axis_to_margins(axis, &region, margins, &config);
    }
    Ok(margins)
}

/// Sets an axis's total length to what its region allows and applies the
/// margins along its direction.
pub(crate) fn reset_axis_to_margins(
    axis: &mut Axis,
    region: &PlotRegion,
    margins: Margins,
    config: &LayoutConfig,
) {
    let orientation = axis.orientation();
    let (margin, canvas_cap) = match orientation {
        AxisOrientation::Horizontal => (
            Thickness1D::new(margins.left, margins.right),
            config.max_canvas_size.width,
        ),
        AxisOrientation::Vertical => (
            Thickness1D::new(margins.bottom, margins.top),
            config.max_canvas_size.height,
        ),
    };
    let total = region
        .available_length(orientation)
        .min(canvas_cap + axis.padding().total());
    axis.set_total_length(total);
    axis.reset_axis_margin(margin);
}
