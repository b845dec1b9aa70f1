use criterion::{Criterion, criterion_group, criterion_main};
use plotaxis::api::{
    HeuristicLabelSizeOracle, LabelSizeCache, LayoutConfig, LayoutContext, PlotEngine,
    PlotRegionConfig, place_axes,
};
use plotaxis::core::{
    AxisKind, AxisOrientation, AxisSide, AxisStyle, CurveDecimator, PixelScale, Range, Rect,
    Size, derive_ticks,
};
use plotaxis::render::NullRenderer;
use std::hint::black_box;

fn bench_linear_tick_derivation(c: &mut Criterion) {
    c.bench_function("linear_tick_derivation", |b| {
        b.iter(|| {
            let _ = derive_ticks(
                black_box(Range::new(-1_234.5, 98_765.4)),
                AxisKind::Linear,
                black_box(10),
                None,
            );
        })
    });
}

fn bench_date_tick_derivation(c: &mut Criterion) {
    c.bench_function("date_tick_derivation", |b| {
        b.iter(|| {
            let _ = derive_ticks(
                black_box(Range::new(40_000.0, 40_400.0)),
                AxisKind::Date,
                black_box(10),
                None,
            );
        })
    });
}

fn bench_full_layout_two_regions(c: &mut Criterion) {
    let mut ctx = LayoutContext::new(LayoutConfig::default()).expect("context");
    let mut y_axes = Vec::new();
    for row in 0..2 {
        let region = ctx
            .add_region(
                PlotRegionConfig::new(Size::new(1_600.0, 450.0)).with_origin(0.0, 450.0 * f64::from(row)),
            )
            .expect("region");
        let x = ctx
            .add_axis(region, AxisOrientation::Horizontal, AxisSide::Near)
            .expect("x axis");
        let y = ctx
            .add_axis(region, AxisOrientation::Vertical, AxisSide::Near)
            .expect("y axis");
        ctx.axis_mut(x).expect("x").set_range(0.0, 86_400.0);
        ctx.axis_mut(y).expect("y").set_style(AxisStyle::default().with_tick_count(8));
        ctx.axis_mut(y).expect("y").set_range(-0.003, 1_250.0);
        y_axes.push(y);
    }
    ctx.add_aligned_group(&y_axes).expect("aligned group");
    let oracle = HeuristicLabelSizeOracle::default();
    let mut cache = LabelSizeCache::default();

    c.bench_function("full_layout_two_regions", |b| {
        b.iter(|| {
            let outcome = place_axes(&mut ctx, &oracle, &mut cache).expect("layout");
            black_box(outcome.converged);
        })
    });
}

fn bench_decimation_100k(c: &mut Criterion) {
    let x: Vec<f64> = (0..100_000).map(|i| f64::from(i) * 0.01).collect();
    let y: Vec<f64> = x.iter().map(|v| (v * 0.7).sin() + (v * 13.0).cos() * 0.05).collect();
    let view = Rect::new(200.0, -1.5, 600.0, 1.5);
    let scale = PixelScale::new(400.0 / 1_600.0, 3.0 / 900.0);

    c.bench_function("decimation_100k", |b| {
        b.iter(|| {
            let mut decimator = CurveDecimator::new(x.len());
            let mask = decimator.compute_visible_subset(black_box(&x), black_box(&y), view, scale);
            black_box(mask.line_point_count());
        })
    });
}

fn bench_engine_render_10k(c: &mut Criterion) {
    let mut engine =
        PlotEngine::new(NullRenderer::default(), LayoutConfig::default()).expect("engine");
    let region = engine
        .add_region(PlotRegionConfig::new(Size::new(1_600.0, 900.0)))
        .expect("region");
    let x_axis = engine
        .add_axis(
            region,
            AxisOrientation::Horizontal,
            AxisSide::Near,
            AxisKind::Linear,
            AxisStyle::default(),
        )
        .expect("x axis");
    let y_axis = engine
        .add_axis(
            region,
            AxisOrientation::Vertical,
            AxisSide::Near,
            AxisKind::Linear,
            AxisStyle::default(),
        )
        .expect("y axis");
    let x: Vec<f64> = (0..10_000).map(|i| f64::from(i) * 0.1).collect();
    let y: Vec<f64> = x.iter().map(|v| v.sin()).collect();
    engine.add_curve(x, y, x_axis, y_axis).expect("curve");
    engine.fit_axis_to_curves(x_axis).expect("fit x");
    engine.fit_axis_to_curves(y_axis).expect("fit y");

    let mut shift = 0.0;
    c.bench_function("engine_render_10k", |b| {
        b.iter(|| {
            shift = if shift == 0.0 { 1.0 } else { 0.0 };
            engine
                .set_axis_range(x_axis, shift, 999.9 + shift)
                .expect("range");
            engine.render().expect("render");
        })
    });
}

criterion_group!(
    benches,
    bench_linear_tick_derivation,
    bench_date_tick_derivation,
    bench_full_layout_two_regions,
    bench_decimation_100k,
    bench_engine_render_10k
);
criterion_main!(benches);
