use crate::core::{Axis, LabelSize, LabelText};

use super::label_oracle::{LabelSizeOracle, FontDescriptor};
use super::label_size_cache::LabelSizeCache;
use super::layout_config::LayoutConfig;

/// Measures every tick label and the title of `axis`; all labels end up shown.
///
/// Hidden labels still get a zero-size entry so indices line up with ticks.
pub(crate) fn measure_axis_labels(
    axis: &mut Axis,
    oracle: &dyn LabelSizeOracle,
    cache: &mut LabelSizeCache,
    config: &LayoutConfig,
) {
    let font = &config.label_font;
    let sizes: Vec<LabelSize> = if axis.style().labels_visible {
        axis.ticks()
            .ticks
            .iter()
            .map(|tick| measure_label(&tick.label, oracle, cache, font))
            .collect()
    } else {
        vec![LabelSize::default(); axis.ticks().len()]
    };
    axis.set_label_sizes(sizes);

    let title_size = match &axis.style().title {
        Some(title) if !title.is_empty() => measure_label(
            &LabelText::plain(title.clone()),
            oracle,
            cache,
            &config.title_font,
        ),
        _ => LabelSize::default(),
    };
    axis.set_title_size(title_size);
}

fn measure_label(
    label: &LabelText,
    oracle: &dyn LabelSizeOracle,
    cache: &mut LabelSizeCache,
    font: &FontDescriptor,
) -> LabelSize {
    if label.is_empty() {
        return LabelSize::default();
    }
    cache.measure(oracle, label, font)
}
