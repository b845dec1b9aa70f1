use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::core::{CurveId, PixelScale, Rect};
use crate::error::PlotResult;
use crate::interaction::{LayoutMode, PanState};
use crate::render::Renderer;

use super::axis_layout_solver::{LayoutOutcome, place_axes, place_axes_offset_only};
use super::curve_controller::CurveEntry;
use super::label_oracle::{HeuristicLabelSizeOracle, LabelSizeOracle};
use super::label_size_cache::{LabelSizeCache, LabelSizeCacheStats};
use super::layout_config::LayoutConfig;
use super::layout_context::LayoutContext;
use super::render_frame_builder::build_render_frame;
use super::render_style::RenderStyle;

/// Main orchestration facade consumed by host applications.
///
/// `PlotEngine` owns the axes and regions, the curves bound to them, the
/// label measurement pipeline and the renderer.
pub struct PlotEngine<R: Renderer> {
    pub(super) renderer: R,
    pub(super) context: LayoutContext,
    pub(super) curves: IndexMap<CurveId, CurveEntry>,
    pub(super) next_curve_id: u32,
    pub(super) oracle: Box<dyn LabelSizeOracle>,
    pub(super) label_cache: LabelSizeCache,
    pub(super) pan: PanState,
    pub(super) render_style: RenderStyle,
    pub(super) has_full_layout: bool,
    pub(super) last_layout: Option<LayoutOutcome>,
}

impl<R: Renderer> PlotEngine<R> {
    pub fn new(renderer: R, config: LayoutConfig) -> PlotResult<Self> {
        let context = LayoutContext::new(config)?;
        Ok(Self {
            renderer,
            context,
            curves: IndexMap::new(),
            next_curve_id: 0,
            oracle: Box::new(HeuristicLabelSizeOracle::default()),
            label_cache: LabelSizeCache::default(),
            pan: PanState::default(),
            render_style: RenderStyle::default(),
            has_full_layout: false,
            last_layout: None,
        })
    }

    /// Replaces the label measurement source and drops cached sizes.
    #[must_use]
    pub fn with_label_oracle(mut self, oracle: impl LabelSizeOracle + 'static) -> Self {
        self.set_label_oracle(oracle);
        self
    }

    pub fn set_label_oracle(&mut self, oracle: impl LabelSizeOracle + 'static) {
        self.oracle = Box::new(oracle);
        self.label_cache.invalidate();
        self.pan.invalidate_layout();
    }

    #[must_use]
    pub fn context(&self) -> &LayoutContext {
        &self.context
    }

    #[must_use]
    pub fn config(&self) -> &LayoutConfig {
        self.context.config()
    }

    pub fn set_config(&mut self, config: LayoutConfig) -> PlotResult<()> {
        let font_changed = config.label_font != self.context.config().label_font
            || config.title_font != self.context.config().title_font;
        self.context.set_config(config)?;
        if font_changed {
            self.label_cache.invalidate();
        }
        self.pan.invalidate_layout();
        Ok(())
    }

    #[must_use]
    pub fn render_style(&self) -> RenderStyle {
        self.render_style
    }

    pub fn set_render_style(&mut self, style: RenderStyle) -> PlotResult<()> {
        style.validate()?;
        self.render_style = style;
        Ok(())
    }

    #[must_use]
    pub fn label_cache_stats(&self) -> LabelSizeCacheStats {
        self.label_cache.stats()
    }

    /// Result of the last [`PlotEngine::layout`] call.
    #[must_use]
    pub fn last_layout(&self) -> Option<&LayoutOutcome> {
        self.last_layout.as_ref()
    }

    /// Runs the layout pass the current state calls for and refreshes curve
    /// decimation for the new view.
    ///
    /// While a pan is active only offsets and culling update; otherwise the
    /// full solver runs.
    pub fn layout(&mut self) -> PlotResult<&LayoutOutcome> {
        let mode = self.pan.layout_mode(self.has_full_layout);
        let outcome = match mode {
            LayoutMode::Full => {
                place_axes(&mut self.context, self.oracle.as_ref(), &mut self.label_cache)?
            }
            LayoutMode::OffsetOnly => place_axes_offset_only(
                &mut self.context,
                self.oracle.as_ref(),
                &mut self.label_cache,
            )?,
        };
        debug!(?mode, converged = outcome.converged, "layout updated");
        self.pan.mark_layout_done(mode);
        if mode == LayoutMode::Full {
            self.has_full_layout = true;
        }
        self.decimate_curves();
        Ok(self.last_layout.insert(outcome))
    }

    pub(super) fn decimate_curves(&mut self) {
        for entry in self.curves.values_mut() {
            let (Ok(x_axis), Ok(y_axis)) = (
                self.context.axis(entry.x_axis),
                self.context.axis(entry.y_axis),
            ) else {
                continue;
            };
            let kinds = (x_axis.kind(), y_axis.kind());
            if entry.transformed_for != Some(kinds) {
                entry.curve.transform(kinds.0, kinds.1);
                entry.transformed_for = Some(kinds);
            }
            if !(x_axis.scale() > 0.0 && y_axis.scale() > 0.0) {
                continue;
            }
            let view = Rect::from_ranges(x_axis.transformed_range(), y_axis.transformed_range());
            let scale = PixelScale::new(1.0 / x_axis.scale(), 1.0 / y_axis.scale());
            let mask = entry.curve.filter_min_max(view, scale);
            trace!(
                curve = %entry.id,
                line_points = mask.line_point_count(),
                "curve decimated"
            );
        }
    }

    /// Lays out if needed and hands the resulting frame to the renderer.
    pub fn render(&mut self) -> PlotResult<()> {
        self.layout()?;
        let frame = build_render_frame(self)?;
        self.renderer.render(&frame)
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }
}
