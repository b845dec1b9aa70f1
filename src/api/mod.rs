mod axis_controller;
mod axis_equal_scale_resolver;
mod axis_label_culler;
mod axis_label_measurer;
mod axis_layout_solver;
mod axis_margin_expander;
mod axis_margin_initializer;
mod axis_placement;
mod curve_controller;
mod engine;
mod engine_snapshot;
mod interaction_controller;
mod label_oracle;
mod label_size_cache;
mod layout_config;
mod layout_context;
mod render_frame_builder;
mod render_style;
mod snapshot_controller;

pub use axis_label_culler::{LabelExtent, cull};
pub use axis_layout_solver::{
    AxisPlacement, LayoutOutcome, RegionPlacement, place_axes, place_axes_offset_only,
};
pub use axis_placement::{
    AxisGeometry, LabelPlacement, RegionFrame, Segment, axis_geometry, label_extents,
};
pub use curve_controller::{CurveEntry, CurveStyle};
pub use engine::PlotEngine;
pub use engine_snapshot::{AxisSnapshot, CurveSnapshot, PlotSnapshot};
pub use label_oracle::{
    FontDescriptor, HeuristicLabelSizeOracle, LabelSizeOracle, estimate_text_width_px,
};
pub use label_size_cache::{LabelSizeCache, LabelSizeCacheStats};
pub use layout_config::{LayoutConfig, MIN_PLOT_LENGTH_PX, PlotRegionConfig};
pub use layout_context::{AlignedAxisGroup, AxisIds, LayoutContext, PlotRegion, RegionId};
pub use render_style::RenderStyle;
