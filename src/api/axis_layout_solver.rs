use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, warn};

use crate::core::{AxisId, Rect, Thickness1D};
use crate::error::PlotResult;
use crate::interaction::LayoutMode;

use super::axis_equal_scale_resolver::resolve_equal_axes;
use super::axis_label_measurer::measure_axis_labels;
use super::axis_margin_expander::expand_axis_margins;
use super::axis_margin_initializer::initialize_margins;
use super::axis_placement::{
    AxisGeometry, axis_geometry, place_each_axis, position_labels, region_frame,
};
use super::label_oracle::LabelSizeOracle;
use super::label_size_cache::LabelSizeCache;
use super::layout_context::{LayoutContext, RegionId};

/// Solved state of one axis after a layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisPlacement {
    pub id: AxisId,
    pub scale: f64,
    pub offset: f64,
    pub total_length: f64,
    pub padding: Thickness1D,
    pub thickness: f64,
    pub position: f64,
    pub shown_labels: Vec<bool>,
    /// Rescales spent on the axis's group in the last expansion.
    pub rescales: usize,
    pub geometry: AxisGeometry,
}

/// Solved outer frame of one plot region.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionPlacement {
    pub id: RegionId,
    /// Whole region including axes, in region pixels.
    pub axes_region: Rect,
    /// Plot canvas inside the axes, in region pixels.
    pub canvas_location: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutOutcome {
    pub mode: LayoutMode,
    pub axes: IndexMap<AxisId, AxisPlacement>,
    pub regions: IndexMap<RegionId, RegionPlacement>,
    /// False when any margin expansion stopped at the rescale cap.
    pub converged: bool,
}

impl LayoutOutcome {
    #[must_use]
    pub fn axis(&self, id: AxisId) -> Option<&AxisPlacement> {
        self.axes.get(&id)
    }

    #[must_use]
    pub fn region(&self, id: RegionId) -> Option<&RegionPlacement> {
        self.regions.get(&id)
    }
}

/// Full layout: measures labels, then runs margin initialization, margin
/// expansion, equal-axes resolution and placement for each outer pass.
///
/// Overlap culling runs on the first pass, and again on the last pass for
/// regions with an equal-axes pair; hidden labels stay hidden afterwards.
pub fn place_axes(
    ctx: &mut LayoutContext,
    oracle: &dyn LabelSizeOracle,
    cache: &mut LabelSizeCache,
) -> PlotResult<LayoutOutcome> {
    let span = debug_span!("place_axes", axes = ctx.axes_map().len());
    let _entered = span.enter();

    let config = ctx.config().clone();
    for axis in ctx.axes_map_mut().values_mut() {
        measure_axis_labels(axis, oracle, cache, &config);
    }
    ctx.refresh_innermost();

    let groups = ctx.resolved_groups();
    let region_ids = ctx.region_ids();
    let last_iteration = config.outer_iterations.saturating_sub(1);
    let mut rescales: IndexMap<AxisId, usize> = IndexMap::new();
    let mut converged = true;

    for iteration in 0..config.outer_iterations {
        for region_id in &region_ids {
            initialize_margins(ctx, *region_id)?;
        }

        for group in &groups {
            let fixed_length = group
                .axes
                .first()
                .and_then(|id| ctx.region_of(*id))
                .and_then(|region_id| ctx.region(region_id).ok())
                .and_then(|region| region.fixed_plot_length(group.orientation));
            let report = expand_axis_margins(
                ctx.axes_map_mut(),
                &group.axes,
                fixed_length,
                config.max_rescales,
            );
            converged &= report.converged;
            for id in &group.axes {
                rescales.insert(*id, report.rescales);
            }
        }

        let mut equalized = Vec::new();
        if iteration == last_iteration {
            for region_id in &region_ids {
                if let Some(report) = resolve_equal_axes(ctx, *region_id, &groups)? {
                    converged &= report.converged;
                    equalized.push(*region_id);
                }
            }
        }

        for region_id in &region_ids {
            place_each_axis(ctx, *region_id)?;
            let cull = iteration == 0 || equalized.contains(region_id);
            let region = ctx.region(*region_id)?.clone();
            for id in region.x_axes().iter().chain(region.y_axes()) {
                position_labels(ctx.axis_mut(*id)?, cull);
            }
        }
        debug!(iteration, "layout pass complete");
    }

    if !converged {
        warn!("layout finished with unconverged margin expansion");
    }
    build_outcome(ctx, LayoutMode::Full, &rescales, converged)
}

/// Drag-time layout: scales, paddings and positions stay as the last full
/// layout left them. Offsets follow the new ranges, stale labels are
/// re-measured and overlapping labels are culled again.
pub fn place_axes_offset_only(
    ctx: &mut LayoutContext,
    oracle: &dyn LabelSizeOracle,
    cache: &mut LabelSizeCache,
) -> PlotResult<LayoutOutcome> {
    let config = ctx.config().clone();
    for axis in ctx.axes_map_mut().values_mut() {
        if axis.labels_stale() {
            measure_axis_labels(axis, oracle, cache, &config);
        }
        axis.update_offset();
        position_labels(axis, true);
    }
    build_outcome(ctx, LayoutMode::OffsetOnly, &IndexMap::new(), true)
}

fn build_outcome(
    ctx: &LayoutContext,
    mode: LayoutMode,
    rescales: &IndexMap<AxisId, usize>,
    converged: bool,
) -> PlotResult<LayoutOutcome> {
    let axes = ctx
        .axes()
        .map(|axis| {
            let placement = AxisPlacement {
                id: axis.id(),
                scale: axis.scale(),
                offset: axis.offset(),
                total_length: axis.total_length(),
                padding: axis.padding(),
                thickness: axis.thickness(),
                position: axis.position(),
                shown_labels: (0..axis.ticks().len())
                    .map(|index| axis.label_participates(index))
                    .collect(),
                rescales: rescales.get(&axis.id()).copied().unwrap_or(0),
                geometry: axis_geometry(axis),
            };
            (axis.id(), placement)
        })
        .collect();

    let mut regions = IndexMap::new();
    for region_id in ctx.region_ids() {
        let frame = region_frame(ctx, region_id)?;
        regions.insert(
            region_id,
            RegionPlacement {
                id: region_id,
                axes_region: frame.axes_region(),
                canvas_location: frame.canvas_location(),
            },
        );
    }

    Ok(LayoutOutcome {
        mode,
        axes,
        regions,
        converged,
    })
}
