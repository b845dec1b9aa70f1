use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::axis_kind::AxisKind;
use crate::core::label_text::LabelText;
use crate::core::ticks::{TickOverrides, TickSet, derive_ticks};
use crate::core::types::{LabelSize, Range, Thickness1D, Transform1D};

/// Extra gap between a vertical axis's tick and its label.
pub const VERTICAL_LABEL_GAP_PX: f64 = 3.0;

/// Stable identifier of an axis inside a layout context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AxisId(pub u32);

impl fmt::Display for AxisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "axis#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisOrientation {
    /// X axis; canvas coordinates grow to the right.
    Horizontal,
    /// Y axis; canvas coordinates grow upwards from the bottom of the plot.
    Vertical,
}

/// Which side of the plot an axis sits on.
///
/// `Near` is bottom for X axes and left for Y axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisSide {
    Near,
    Far,
}

/// Presentation settings that affect tick derivation and axis thickness.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisStyle {
    pub tick_count: usize,
    pub tick_length: f64,
    pub labels_visible: bool,
    pub ticks_visible: bool,
    pub title: Option<String>,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            tick_count: 10,
            tick_length: 5.0,
            labels_visible: true,
            ticks_visible: true,
            title: None,
        }
    }
}

impl AxisStyle {
    #[must_use]
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = tick_count;
        self
    }

    #[must_use]
    pub fn with_tick_length(mut self, tick_length: f64) -> Self {
        self.tick_length = tick_length;
        self
    }

    #[must_use]
    pub fn with_labels_visible(mut self, visible: bool) -> Self {
        self.labels_visible = visible;
        self
    }

    #[must_use]
    pub fn with_ticks_visible(mut self, visible: bool) -> Self {
        self.ticks_visible = visible;
        self
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Tick mark length that contributes to axis thickness.
    #[must_use]
    pub fn effective_tick_length(&self) -> f64 {
        if self.ticks_visible {
            self.tick_length.max(0.0)
        } else {
            0.0
        }
    }
}

/// Caller-supplied label formatter that replaces numeric and calendar text.
#[derive(Clone)]
pub struct LabelFormatter(Arc<dyn Fn(f64) -> String + Send + Sync>);

impl LabelFormatter {
    pub fn new(format: impl Fn(f64) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(format))
    }

    #[must_use]
    pub fn format(&self, value: f64) -> String {
        (self.0)(value)
    }
}

impl fmt::Debug for LabelFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("LabelFormatter(..)")
    }
}

/// Measured size and visibility of one tick label.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TickLabel {
    pub size: LabelSize,
    pub shown: bool,
}

/// One axis: range, kind, derived ticks and the layout state the solver owns.
///
/// Canvas mapping along the axis is `scale * transformed - offset`, measured
/// from the low end of the axis including its lower padding.
#[derive(Debug, Clone)]
pub struct Axis {
    id: AxisId,
    orientation: AxisOrientation,
    side: AxisSide,
    kind: AxisKind,
    range: Range,
    style: AxisStyle,
    ticks: TickSet,
    overrides: Option<TickOverrides>,
    formatter: Option<LabelFormatter>,
    labels: Vec<TickLabel>,
    labels_stale: bool,
    title_size: LabelSize,
    transform: Transform1D,
    total_length: f64,
    padding: Thickness1D,
    thickness: f64,
    position: f64,
    is_innermost: bool,
    bound_to: Option<AxisId>,
}

impl Axis {
    #[must_use]
    pub fn new(id: AxisId, orientation: AxisOrientation, side: AxisSide) -> Self {
        let kind = AxisKind::default();
        let mut axis = Self {
            id,
            orientation,
            side,
            kind,
            range: kind.default_range(),
            style: AxisStyle::default(),
            ticks: TickSet::default(),
            overrides: None,
            formatter: None,
            labels: Vec::new(),
            labels_stale: true,
            title_size: LabelSize::default(),
            transform: Transform1D::new(1.0, 0.0),
            total_length: 0.0,
            padding: Thickness1D::default(),
            thickness: 0.0,
            position: 0.0,
            is_innermost: false,
            bound_to: None,
        };
        axis.rederive_ticks();
        axis
    }

    #[must_use]
    pub fn with_kind(mut self, kind: AxisKind) -> Self {
        self.set_kind(kind);
        self
    }

    #[must_use]
    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.set_style(style);
        self
    }

    /// Builder form of [`Axis::set_range`]; an invalid range keeps the default.
    #[must_use]
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.set_range(min, max);
        self
    }

    #[must_use]
    pub fn id(&self) -> AxisId {
        self.id
    }

    #[must_use]
    pub fn orientation(&self) -> AxisOrientation {
        self.orientation
    }

    #[must_use]
    pub fn side(&self) -> AxisSide {
        self.side
    }

    #[must_use]
    pub fn kind(&self) -> AxisKind {
        self.kind
    }

    #[must_use]
    pub fn range(&self) -> Range {
        self.range
    }

    #[must_use]
    pub fn style(&self) -> &AxisStyle {
        &self.style
    }

    #[must_use]
    pub fn ticks(&self) -> &TickSet {
        &self.ticks
    }

    #[must_use]
    pub fn labels(&self) -> &[TickLabel] {
        &self.labels
    }

    #[must_use]
    pub fn title_size(&self) -> LabelSize {
        self.title_size
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.transform.scale
    }

    #[must_use]
    pub fn offset(&self) -> f64 {
        self.transform.offset
    }

    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.total_length
    }

    #[must_use]
    pub fn padding(&self) -> Thickness1D {
        self.padding
    }

    /// Perpendicular extent computed by the last margin initialization.
    #[must_use]
    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    /// Perpendicular canvas position of the axis line.
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    #[must_use]
    pub fn is_innermost(&self) -> bool {
        self.is_innermost
    }

    #[must_use]
    pub fn bound_to(&self) -> Option<AxisId> {
        self.bound_to
    }

    /// Mirrors the range of `source` whenever the engine updates it.
    pub fn bind_to(&mut self, source: Option<AxisId>) {
        self.bound_to = source;
    }

    /// Applies a new range if it is valid for the axis kind.
    ///
    /// Swapped bounds are corrected. Any other invalid request leaves the
    /// previous range and ticks untouched and returns `false`.
    pub fn set_range(&mut self, min: f64, max: f64) -> bool {
        match self.kind.validate_range(min, max) {
            Ok(range) => {
                if range != self.range {
                    self.range = range;
                    self.rederive_ticks();
                }
                true
            }
            Err(err) => {
                debug!(axis = %self.id, min, max, error = %err, "rejected axis range");
                false
            }
        }
    }

    /// Switches the axis kind, falling back to the kind's default range when
    /// the current range is not valid for it.
    pub fn set_kind(&mut self, kind: AxisKind) {
        self.kind = kind;
        if kind.validate_range(self.range.min, self.range.max).is_err() {
            debug!(axis = %self.id, ?kind, "range reset for axis kind");
            self.range = kind.default_range();
        }
        self.rederive_ticks();
    }

    pub fn set_style(&mut self, style: AxisStyle) {
        self.style = style;
        self.rederive_ticks();
    }

    pub fn set_tick_overrides(&mut self, overrides: Option<TickOverrides>) {
        self.overrides = overrides;
        self.rederive_ticks();
    }

    pub fn set_label_formatter(&mut self, formatter: Option<LabelFormatter>) {
        self.formatter = formatter;
        self.rederive_ticks();
    }

    /// Ascending transformed range.
    #[must_use]
    pub fn transformed_range(&self) -> Range {
        self.kind.transformed_range(self.range)
    }

    #[must_use]
    pub fn min_transformed(&self) -> f64 {
        self.transformed_range().min
    }

    #[must_use]
    pub fn max_transformed(&self) -> f64 {
        self.transformed_range().max
    }

    /// Span of the transformed range.
    #[must_use]
    pub fn delta(&self) -> f64 {
        self.transformed_range().length()
    }

    fn rederive_ticks(&mut self) {
        let tick_count = self.style.tick_count;
        let mut ticks = derive_ticks(self.range, self.kind, tick_count, self.overrides.as_mut());
        if let Some(formatter) = &self.formatter {
            for tick in &mut ticks.ticks {
                tick.label = LabelText::Plain(formatter.format(tick.value));
            }
        }
        self.ticks = ticks;
        self.labels_stale = true;
    }

    /// True when tick labels changed since they were last measured.
    #[must_use]
    pub fn labels_stale(&self) -> bool {
        self.labels_stale || self.labels.len() != self.ticks.len()
    }

    /// Stores fresh label measurements; every label starts shown.
    pub(crate) fn set_label_sizes(&mut self, sizes: Vec<LabelSize>) {
        self.labels = sizes
            .into_iter()
            .map(|size| TickLabel { size, shown: true })
            .collect();
        self.labels_stale = false;
    }

    pub(crate) fn set_title_size(&mut self, size: LabelSize) {
        self.title_size = size;
    }

    pub(crate) fn show_all_labels(&mut self) {
        for label in &mut self.labels {
            label.shown = true;
        }
    }

    /// Hides every label the mask marks hidden; never re-shows a label.
    pub(crate) fn apply_label_mask(&mut self, mask: &[bool]) {
        for (label, keep) in self.labels.iter_mut().zip(mask) {
            label.shown &= *keep;
        }
    }

    /// True if label `index` takes part in layout (visible, non-empty, shown).
    #[must_use]
    pub fn label_participates(&self, index: usize) -> bool {
        self.style.labels_visible
            && self.labels.get(index).is_some_and(|label| label.shown)
            && self
                .ticks
                .ticks
                .get(index)
                .is_some_and(|tick| !tick.label.is_empty())
    }

    /// Label extent along the axis direction.
    #[must_use]
    pub fn label_length(&self, index: usize) -> f64 {
        let size = self.labels.get(index).map(|label| label.size).unwrap_or_default();
        match self.orientation {
            AxisOrientation::Horizontal => size.width,
            AxisOrientation::Vertical => size.height,
        }
    }

    /// Label extent perpendicular to the axis, including the vertical label gap.
    #[must_use]
    pub fn label_thickness(&self, index: usize) -> f64 {
        let size = self.labels.get(index).map(|label| label.size).unwrap_or_default();
        match self.orientation {
            AxisOrientation::Horizontal => size.height,
            AxisOrientation::Vertical => size.width + VERTICAL_LABEL_GAP_PX,
        }
    }

    /// Recomputes and stores the perpendicular thickness from shown labels,
    /// tick length and title.
    pub(crate) fn calculate_thickness(&mut self) -> f64 {
        let label_thickness = if self.style.labels_visible {
            (0..self.labels.len())
                .filter(|&index| self.labels[index].shown)
                .map(|index| self.label_thickness(index))
                .fold(0.0, f64::max)
        } else {
            0.0
        };
        self.thickness =
            label_thickness + self.style.effective_tick_length() + self.title_size.height;
        self.thickness
    }

    pub(crate) fn set_total_length(&mut self, total_length: f64) {
        self.total_length = total_length;
    }

    pub(crate) fn set_position(&mut self, position: f64) {
        self.position = position;
    }

    pub(crate) fn set_innermost(&mut self, is_innermost: bool) {
        self.is_innermost = is_innermost;
    }

    /// Replaces the padding, keeping the total length.
    pub(crate) fn reset_axis_margin(&mut self, margin: Thickness1D) {
        self.padding = margin;
        let axis_length = self.total_length - margin.total();
        let scale = axis_length / self.delta();
        self.transform = Transform1D::new(scale, scale * self.min_transformed() - margin.lower);
    }

    /// Replaces scale and padding, keeping the total length.
    pub(crate) fn rescale(&mut self, scale: f64, margin: Thickness1D) {
        self.padding = margin;
        self.transform = Transform1D::new(scale, scale * self.min_transformed() - margin.lower);
    }

    /// Recomputes the offset for the current range; scale and padding stay.
    pub(crate) fn update_offset(&mut self) {
        let scale = self.transform.scale;
        self.transform.offset = scale * self.min_transformed() - self.padding.lower;
    }

    /// Along-axis position of a transformed value, from the low end of the axis region.
    #[must_use]
    pub fn axis_coordinate(&self, transformed: f64) -> f64 {
        self.transform.transform(transformed)
    }

    /// Maps transformed graph values to plot-canvas pixels (origin top-left of
    /// the plot area, inside the padding).
    #[must_use]
    pub fn graph_to_canvas_transform(&self) -> Transform1D {
        match self.orientation {
            AxisOrientation::Horizontal => Transform1D::new(
                self.transform.scale,
                self.transform.offset + self.padding.lower,
            ),
            AxisOrientation::Vertical => Transform1D::new(
                -self.transform.scale,
                -self.transform.offset - self.total_length + self.padding.upper,
            ),
        }
    }

    /// Raw data value to plot-canvas pixel.
    #[must_use]
    pub fn graph_to_canvas(&self, value: f64) -> f64 {
        self.graph_to_canvas_transform()
            .transform(self.kind.graph_transform(value))
    }

    /// Plot-canvas pixel to raw data value.
    #[must_use]
    pub fn canvas_to_graph(&self, canvas: f64) -> f64 {
        self.kind
            .canvas_transform(self.graph_to_canvas_transform().inverse_transform(canvas))
    }

    /// Shifts the transformed range by `pixels` along the canvas direction of
    /// increasing transformed value and applies it through [`Axis::set_range`].
    pub fn pan_pixels(&mut self, pixels: f64) -> bool {
        let scale = self.transform.scale;
        if !scale.is_finite() || scale <= 0.0 {
            return false;
        }
        let shift = pixels / scale;
        let transformed = self.transformed_range();
        let a = self.kind.canvas_transform(transformed.min + shift);
        let b = self.kind.canvas_transform(transformed.max + shift);
        self.set_range(a.min(b), a.max(b))
    }
}
