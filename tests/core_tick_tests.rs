use approx::assert_relative_eq;
use plotaxis::core::{AxisKind, Range, TickOverrides, TickStep, derive_ticks, nice_interval};

#[test]
fn linear_range_gets_decade_ticks_with_boundary_tick() {
    let set = derive_ticks(Range::new(0.0, 100.0), AxisKind::Linear, 10, None);

    assert_eq!(set.len(), 11);
    let values = set.values();
    for (index, value) in values.iter().enumerate() {
        assert_relative_eq!(*value, index as f64 * 10.0, epsilon = 1e-9);
    }
    match set.step {
        TickStep::Numeric(interval) => {
            assert_relative_eq!(interval.value, 10.0);
            assert_relative_eq!(interval.coefficient, 1.0);
            assert_eq!(interval.exponent, 1);
        }
        other => panic!("unexpected step: {other:?}"),
    }

    let labels: Vec<String> = set.ticks.iter().map(|tick| tick.label.display_text()).collect();
    assert_eq!(labels.first().map(String::as_str), Some("0"));
    assert_eq!(labels.get(5).map(String::as_str), Some("50"));
    assert_eq!(labels.last().map(String::as_str), Some("100"));
}

#[test]
fn log_range_spanning_three_decades_ticks_every_decade() {
    let set = derive_ticks(Range::new(1.0, 1000.0), AxisKind::Log, 10, None);

    assert_eq!(set.step, TickStep::Decades(1));
    assert_eq!(set.transformed(), vec![0.0, 1.0, 2.0, 3.0]);
    let values = set.values();
    for (value, expected) in values.iter().zip([1.0, 10.0, 100.0, 1000.0]) {
        assert_relative_eq!(*value, expected, max_relative = 1e-12);
    }
}

#[test]
fn log_range_below_one_decade_falls_back_to_linear_spacing() {
    let set = derive_ticks(Range::new(2.0, 8.0), AxisKind::Log, 6, None);

    assert!(matches!(set.step, TickStep::Numeric(_)));
    assert!(!set.is_empty());
    for tick in &set.ticks {
        assert!(tick.value > 0.0);
        assert_relative_eq!(tick.transformed, tick.value.log10(), epsilon = 1e-12);
    }
}

#[test]
fn wide_log_range_steps_over_several_decades() {
    let set = derive_ticks(Range::new(1e-6, 1e12), AxisKind::Log, 5, None);

    match set.step {
        TickStep::Decades(step) => assert!(step >= 2),
        other => panic!("unexpected step: {other:?}"),
    }
    assert!(set.len() <= 6);
}

#[test]
fn reversed_axis_lists_ticks_from_largest_value() {
    let set = derive_ticks(Range::new(0.0, 50.0), AxisKind::LinearReversed, 5, None);
    let values = set.values();

    assert_eq!(values.first().copied(), Some(50.0));
    assert_eq!(values.last().copied(), Some(0.0));
    for pair in set.ticks.windows(2) {
        assert!(pair[0].value > pair[1].value);
        assert!(pair[0].transformed < pair[1].transformed);
    }
    let transformed = set.transformed_range.expect("transformed range");
    assert_relative_eq!(transformed.min, -50.0);
    assert_relative_eq!(transformed.max, 0.0);
}

#[test]
fn overrides_keep_only_values_inside_the_range() {
    let mut overrides = TickOverrides::new(vec![-5.0, 2.5, 40.0, 75.0, 150.0]);
    let set = derive_ticks(
        Range::new(0.0, 100.0),
        AxisKind::Linear,
        3,
        Some(&mut overrides),
    );

    assert_eq!(set.step, TickStep::Override);
    assert_eq!(set.values(), vec![2.5, 40.0, 75.0]);
    let labels: Vec<String> = set.ticks.iter().map(|tick| tick.label.display_text()).collect();
    assert_eq!(labels, vec!["2.5", "40", "75"]);
}

#[test]
fn override_labels_replace_numeric_text() {
    let mut overrides = TickOverrides::new(vec![0.0, 50.0, 100.0])
        .with_labels(vec!["low".to_owned(), "mid".to_owned(), "high".to_owned()]);
    let set = derive_ticks(
        Range::new(0.0, 100.0),
        AxisKind::Linear,
        10,
        Some(&mut overrides),
    );

    let labels: Vec<String> = set.ticks.iter().map(|tick| tick.label.display_text()).collect();
    assert_eq!(labels, vec!["low", "mid", "high"]);
}

#[test]
fn zero_tick_budget_yields_no_ticks() {
    let set = derive_ticks(Range::new(0.0, 100.0), AxisKind::Linear, 0, None);
    assert!(set.is_empty());
    assert!(set.transformed_range.is_some());
}

#[test]
fn empty_span_still_produces_ticks() {
    let set = derive_ticks(Range::new(5.0, 5.0), AxisKind::Linear, 10, None);
    assert_eq!(set.values(), vec![5.0]);
}

#[test]
fn nice_interval_snaps_up_to_one_two_five() {
    assert_relative_eq!(nice_interval(25.0).value, 50.0);
    assert_relative_eq!(nice_interval(20.0).value, 20.0);
    assert_relative_eq!(nice_interval(0.013).value, 0.02);
    assert_relative_eq!(nice_interval(7.0).value, 10.0);
    assert_eq!(nice_interval(7.0).coefficient, 1.0);
    assert_eq!(nice_interval(7.0).exponent, 1);
}

#[test]
fn small_fractional_ticks_keep_their_digits() {
    let set = derive_ticks(Range::new(0.1, 0.2), AxisKind::Linear, 5, None);
    let labels: Vec<String> = set.ticks.iter().map(|tick| tick.label.display_text()).collect();

    assert_eq!(labels, vec!["0.10", "0.12", "0.14", "0.16", "0.18", "0.20"]);
}
