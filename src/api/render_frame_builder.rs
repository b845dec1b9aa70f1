use crate::core::{Axis, AxisOrientation, LabelText, Size};
use crate::error::PlotResult;
use crate::render::{
    LinePrimitive, RectPrimitive, RenderFrame, Renderer, TextDirection, TextPrimitive,
};

use super::PlotEngine;
use super::axis_placement::{AxisGeometry, LabelPlacement, Segment, axis_geometry, region_frame};
use super::curve_controller::CurveEntry;
use super::render_style::RenderStyle;

/// Materializes axes and decimated curves of every region into one frame.
pub(super) fn build_render_frame<R: Renderer>(engine: &PlotEngine<R>) -> PlotResult<RenderFrame> {
    let ctx = &engine.context;
    let style = engine.render_style;
    let label_font = ctx.config().label_font.size_px;
    let title_font = ctx.config().title_font.size_px;

    let mut size = Size::default();
    let mut frame = RenderFrame::new(size);
    for region in ctx.regions() {
        let origin = (region.config().origin_x, region.config().origin_y);
        let bounds = region_frame(ctx, region.id())?;
        size.width = size.width.max(origin.0 + bounds.width);
        size.height = size.height.max(origin.1 + bounds.height);

        for id in region.x_axes().iter().chain(region.y_axes()) {
            let axis = ctx.axis(*id)?;
            let geometry = axis_geometry(axis);
            push_axis(&mut frame, axis, &geometry, origin, style, label_font, title_font);
        }

        let canvas = bounds.canvas_location();
        let canvas_origin = (origin.0 + canvas.x_min, origin.1 + canvas.y_min);
        for entry in engine.curves.values() {
            if ctx.region_of(entry.x_axis) != Some(region.id()) {
                continue;
            }
            push_curve(&mut frame, engine, entry, canvas_origin)?;
        }
    }
    frame.size = size;
    Ok(frame)
}

fn push_axis(
    frame: &mut RenderFrame,
    axis: &Axis,
    geometry: &AxisGeometry,
    origin: (f64, f64),
    style: RenderStyle,
    label_font: f64,
    title_font: f64,
) {
    let shift = |segment: &Segment| {
        (
            origin.0 + segment.x1,
            origin.1 + segment.y1,
            origin.0 + segment.x2,
            origin.1 + segment.y2,
        )
    };
    if let Some(line) = &geometry.axis_line {
        let (x1, y1, x2, y2) = shift(line);
        frame.lines.push(LinePrimitive::new(
            x1,
            y1,
            x2,
            y2,
            style.axis_line_width,
            style.axis_line_color,
        ));
    }
    for tick in &geometry.ticks {
        let (x1, y1, x2, y2) = shift(tick);
        frame
            .lines
            .push(LinePrimitive::new(x1, y1, x2, y2, style.tick_width, style.tick_color));
    }
    for placement in geometry.labels.iter().filter(|placement| placement.shown) {
        let Some(tick) = axis.ticks().ticks.get(placement.index) else {
            continue;
        };
        push_text(
            frame,
            &tick.label,
            placement,
            origin,
            label_font,
            TextDirection::Horizontal,
            style,
        );
    }
    if let (Some(placement), Some(title)) = (&geometry.title, &axis.style().title) {
        let direction = match axis.orientation() {
            AxisOrientation::Horizontal => TextDirection::Horizontal,
            AxisOrientation::Vertical => TextDirection::Upward,
        };
        push_text(
            frame,
            &LabelText::plain(title.clone()),
            placement,
            origin,
            title_font,
            direction,
            style,
        );
    }
}

fn push_text(
    frame: &mut RenderFrame,
    label: &LabelText,
    placement: &LabelPlacement,
    origin: (f64, f64),
    font_size_px: f64,
    direction: TextDirection,
    style: RenderStyle,
) {
    let text = label.display_text();
    if text.is_empty() {
        return;
    }
    frame.texts.push(TextPrimitive {
        text,
        left: origin.0 + placement.left,
        top: origin.1 + placement.top,
        font_size_px,
        color: style.label_color,
        direction,
    });
}

fn push_curve<R: Renderer>(
    frame: &mut RenderFrame,
    engine: &PlotEngine<R>,
    entry: &CurveEntry,
    canvas_origin: (f64, f64),
) -> PlotResult<()> {
    let x_map = engine.context.axis(entry.x_axis)?.graph_to_canvas_transform();
    let y_map = engine.context.axis(entry.y_axis)?.graph_to_canvas_transform();
    let curve = &entry.curve;
    let mask = curve.decimation();
    let point = |index: usize| -> Option<(f64, f64)> {
        let x = canvas_origin.0 + x_map.transform(*curve.x_transformed().get(index)?);
        let y = canvas_origin.1 + y_map.transform(*curve.y_transformed().get(index)?);
        (x.is_finite() && y.is_finite()).then_some((x, y))
    };

    let mut previous: Option<(f64, f64)> = None;
    for (index, included) in mask.include_line.iter().enumerate() {
        if !included {
            continue;
        }
        let current = point(index);
        if let (Some(from), Some(to)) = (previous, current) {
            frame.lines.push(LinePrimitive::new(
                from.0,
                from.1,
                to.0,
                to.1,
                entry.style.stroke_width,
                entry.style.color,
            ));
        }
        previous = current;
    }

    if entry.style.marker_size > 0.0 {
        for (index, included) in mask.include_marker.iter().enumerate() {
            if let (true, Some((x, y))) = (*included, point(index)) {
                frame.rects.push(RectPrimitive::centered(
                    x,
                    y,
                    entry.style.marker_size,
                    entry.style.color,
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::build_render_frame;
    use crate::api::{LayoutConfig, PlotEngine, PlotRegionConfig};
    use crate::core::{AxisKind, AxisOrientation, AxisSide, AxisStyle, Size};
    use crate::render::{NullRenderer, TextDirection};

    #[test]
    fn vertical_axis_titles_run_upward() {
        let mut engine =
            PlotEngine::new(NullRenderer::default(), LayoutConfig::default()).expect("engine");
        let region = engine
            .add_region(PlotRegionConfig::new(Size::new(400.0, 300.0)))
            .expect("region");
        for (orientation, title) in [
            (AxisOrientation::Horizontal, "time"),
            (AxisOrientation::Vertical, "value"),
        ] {
            engine
                .add_axis(
                    region,
                    orientation,
                    AxisSide::Near,
                    AxisKind::Linear,
                    AxisStyle::default().with_title(title),
                )
                .expect("axis");
        }
        engine.layout().expect("layout");

        let frame = build_render_frame(&engine).expect("frame");
        let direction = |title: &str| {
            frame
                .texts
                .iter()
                .find(|text| text.text == title)
                .map(|text| text.direction)
        };
        assert_eq!(direction("time"), Some(TextDirection::Horizontal));
        assert_eq!(direction("value"), Some(TextDirection::Upward));
        assert!(
            frame
                .texts
                .iter()
                .filter(|text| text.text != "time" && text.text != "value")
                .all(|text| text.direction == TextDirection::Horizontal)
        );
    }
}
