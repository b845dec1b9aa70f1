use plotaxis::core::{CurveDecimator, PixelScale, PointRegion, Rect};
use proptest::prelude::*;

fn curve_points() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1_000.0f64..1_000.0, 3..400)
}

/// Maximal runs of at least two consecutive points sharing one off-screen region.
fn off_screen_runs(regions: &[PointRegion]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = 0;
    while start < regions.len() {
        let mut end = start;
        while end + 1 < regions.len() && regions[end + 1] == regions[start] {
            end += 1;
        }
        if regions[start].is_outside() && end > start {
            runs.push((start, end));
        }
        start = end + 1;
    }
    runs
}

proptest! {
    #[test]
    fn decimation_is_idempotent_for_unchanged_view(
        y in curve_points(),
        view_start in -50.0f64..300.0,
        view_width in 5.0f64..200.0,
        pixel in 0.001f64..2.0
    ) {
        let x: Vec<f64> = (0..y.len()).map(|index| index as f64).collect();
        let view = Rect::new(view_start, -200.0, view_start + view_width, 200.0);
        let scale = PixelScale::new(pixel, pixel);

        let mut decimator = CurveDecimator::new(x.len());
        let first = decimator.compute_visible_subset(&x, &y, view, scale).clone();
        let second = decimator.compute_visible_subset(&x, &y, view, scale).clone();
        decimator.invalidate();
        let recomputed = decimator.compute_visible_subset(&x, &y, view, scale).clone();

        prop_assert_eq!(&first, &second);
        prop_assert_eq!(&first, &recomputed);
        prop_assert_eq!(first.len(), x.len());
    }

    #[test]
    fn off_screen_runs_keep_their_neighbours(
        y in curve_points(),
        view_start in -50.0f64..300.0,
        view_width in 5.0f64..200.0,
        pixel in 0.001f64..2.0
    ) {
        let x: Vec<f64> = (0..y.len()).map(|index| index as f64).collect();
        let view = Rect::new(view_start, -200.0, view_start + view_width, 200.0);
        let mut decimator = CurveDecimator::new(x.len());
        let mask = decimator
            .compute_visible_subset(&x, &y, view, PixelScale::new(pixel, pixel))
            .clone();
        let regions = decimator.regions().to_vec();

        for (start, end) in off_screen_runs(&regions) {
            if start > 0 {
                prop_assert!(mask.include_line[start - 1], "point before run {start}..={end}");
            }
            if end + 1 < regions.len() {
                prop_assert!(mask.include_line[end + 1], "point after run {start}..={end}");
            }
        }
        for (index, region) in regions.iter().enumerate() {
            prop_assert_eq!(mask.include_marker[index], !region.is_outside());
        }
    }
}
