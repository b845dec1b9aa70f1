use tracing::debug;

use crate::core::{AxisId, AxisOrientation};
use crate::error::PlotResult;

use super::axis_margin_expander::{ExpansionReport, expand_axis_margins};
use super::axis_margin_initializer::reset_axis_to_margins;
use super::layout_context::{AlignedAxisGroup, LayoutContext, RegionId};

/// Forces the region's equal-axes pair to one pixels-per-unit scale.
///
/// The axis with the larger scale is shrunk: its whole aligned group is
/// reset to the region's initial margins and re-expanded with a fixed plot
/// length of `other.scale * own.delta`. Returns `None` when the region has
/// no equal-axes pair.
pub(crate) fn resolve_equal_axes(
    ctx: &mut LayoutContext,
    region_id: RegionId,
    groups: &[AlignedAxisGroup],
) -> PlotResult<Option<ExpansionReport>> {
    let Some((x_id, y_id)) = ctx.region(region_id)?.config().equal_axes else {
        return Ok(None);
    };
    let (x_scale, x_delta) = {
        let x = ctx.axis(x_id)?;
        (x.scale(), x.delta())
    };
    let (y_scale, y_delta) = {
        let y = ctx.axis(y_id)?;
        (y.scale(), y.delta())
    };

    let (shrunk, plot_length) = if x_scale > y_scale {
        (x_id, y_scale * x_delta)
    } else {
        (y_id, x_scale * y_delta)
    };
    debug!(axis = %shrunk, plot_length, "equalizing axis scales");

    let members = group_members(ctx, groups, shrunk)?;
    let config = ctx.config().clone();
    for id in &members {
        let Some(region_id) = ctx.region_of(*id) else {
            continue;
        };
        let region = ctx.region(region_id)?.clone();
        let axis = ctx.axis_mut(*id)?;
        reset_axis_to_margins(axis, &region, region.initial_margins(), &config);
        axis.show_all_labels();
    }

    let report = expand_axis_margins(
        ctx.axes_map_mut(),
        &members,
        Some(plot_length),
        config.max_rescales,
    );
    Ok(Some(report))
}

fn group_members(
    ctx: &LayoutContext,
    groups: &[AlignedAxisGroup],
    axis: AxisId,
) -> PlotResult<Vec<AxisId>> {
    if let Some(group) = groups.iter().find(|group| group.axes.contains(&axis)) {
        return Ok(group.axes.to_vec());
    }
    let orientation: AxisOrientation = ctx.axis(axis)?.orientation();
    debug!(axis = %axis, ?orientation, "equal-axes member has no aligned group");
    Ok(vec![axis])
}

#[cfg(test)]
mod tests {
    use super::resolve_equal_axes;
    use crate::api::axis_margin_initializer::initialize_margins;
    use crate::api::layout_config::{LayoutConfig, PlotRegionConfig};
    use crate::api::layout_context::LayoutContext;
    use crate::core::{AxisOrientation, AxisSide, AxisStyle, Size};

    #[test]
    fn larger_scale_axis_is_shrunk_to_match() {
        let mut ctx = LayoutContext::new(LayoutConfig::default()).expect("config");
        let region = ctx
            .add_region(PlotRegionConfig::new(Size::new(200.0, 50.0)))
            .expect("region");
        let bare = AxisStyle::default()
            .with_labels_visible(false)
            .with_ticks_visible(false);
        let x = ctx
            .add_axis(region, AxisOrientation::Horizontal, AxisSide::Near)
            .expect("axis");
        let y = ctx
            .add_axis(region, AxisOrientation::Vertical, AxisSide::Near)
            .expect("axis");
        ctx.axis_mut(x).expect("axis").set_style(bare.clone());
        ctx.axis_mut(y).expect("axis").set_style(bare);
        ctx.axis_mut(x).expect("axis").set_range(0.0, 100.0);
        ctx.axis_mut(y).expect("axis").set_range(0.0, 10.0);
        ctx.set_region_config(
            region,
            PlotRegionConfig::new(Size::new(200.0, 50.0)).with_equal_axes(x, y),
        )
        .expect("region config");

        initialize_margins(&mut ctx, region).expect("margins");
        assert_eq!(ctx.axis(x).expect("axis").scale(), 2.0);
        assert_eq!(ctx.axis(y).expect("axis").scale(), 5.0);

        let groups = ctx.resolved_groups();
        let report = resolve_equal_axes(&mut ctx, region, &groups)
            .expect("resolve")
            .expect("pair");
        assert!(report.converged);
        let (x_axis, y_axis) = (ctx.axis(x).expect("axis"), ctx.axis(y).expect("axis"));
        assert!((x_axis.scale() - y_axis.scale()).abs() <= 1e-9);
        assert!((y_axis.total_length() - 20.0).abs() <= 1e-9);
    }
}
