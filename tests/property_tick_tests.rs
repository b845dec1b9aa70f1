use plotaxis::core::{AxisKind, Range, TickStep, derive_ticks, nice_interval};
use proptest::prelude::*;

proptest! {
    #[test]
    fn linear_ticks_increase_and_stay_within_budget(
        min in -1_000_000.0f64..1_000_000.0,
        span in 0.001f64..1_000_000.0,
        max_tick_count in 1usize..20
    ) {
        let range = Range::new(min, min + span);
        let set = derive_ticks(range, AxisKind::Linear, max_tick_count, None);

        prop_assert!(set.len() <= max_tick_count + 1);
        for pair in set.ticks.windows(2) {
            prop_assert!(pair[0].transformed < pair[1].transformed);
        }
        for tick in &set.ticks {
            let tolerance = span * 1e-4;
            prop_assert!(tick.value >= range.min - tolerance);
            prop_assert!(tick.value <= range.max + tolerance);
        }
    }

    #[test]
    fn reversed_ticks_decrease_in_raw_value(
        min in -10_000.0f64..10_000.0,
        span in 0.01f64..10_000.0,
        max_tick_count in 1usize..15
    ) {
        let set = derive_ticks(Range::new(min, min + span), AxisKind::LinearReversed, max_tick_count, None);

        prop_assert!(set.len() <= max_tick_count + 1);
        for pair in set.ticks.windows(2) {
            prop_assert!(pair[0].value > pair[1].value);
            prop_assert!(pair[0].transformed < pair[1].transformed);
        }
    }

    #[test]
    fn log_ticks_increase_and_stay_within_budget(
        min_exponent in -3.0f64..3.0,
        decades in 0.05f64..12.0,
        max_tick_count in 1usize..12
    ) {
        let min = 10f64.powf(min_exponent);
        let max = 10f64.powf(min_exponent + decades);
        let set = derive_ticks(Range::new(min, max), AxisKind::Log, max_tick_count, None);

        prop_assert!(set.len() <= max_tick_count + 1);
        for pair in set.ticks.windows(2) {
            prop_assert!(pair[0].transformed < pair[1].transformed);
        }
        for tick in &set.ticks {
            prop_assert!(tick.value > 0.0);
        }
    }

    #[test]
    fn nice_interval_coefficient_is_one_two_or_five(min_interval in 1e-9f64..1e9) {
        let interval = nice_interval(min_interval);

        prop_assert!(
            interval.coefficient == 1.0 || interval.coefficient == 2.0 || interval.coefficient == 5.0
        );
        prop_assert!(interval.value >= min_interval * (1.0 - 1e-5));
        prop_assert!(interval.value < min_interval * 10.0);
    }

    #[test]
    fn date_ticks_strictly_increase_down_to_sub_second_spans(
        start in 1_000.0f64..60_000.0,
        span_exponent in -9.0f64..3.5,
        max_tick_count in 1usize..1_000
    ) {
        let span = 10f64.powf(span_exponent);
        let set = derive_ticks(Range::new(start, start + span), AxisKind::Date, max_tick_count, None);

        for pair in set.ticks.windows(2) {
            prop_assert!(pair[0].transformed < pair[1].transformed);
            prop_assert!(pair[0].value < pair[1].value);
        }
    }

    #[test]
    fn linear_step_is_a_nice_interval(
        span in 0.001f64..1_000_000.0,
        max_tick_count in 1usize..20
    ) {
        let set = derive_ticks(Range::new(0.0, span), AxisKind::Linear, max_tick_count, None);

        match set.step {
            TickStep::Numeric(interval) => {
                prop_assert!(
                    interval.coefficient == 1.0
                        || interval.coefficient == 2.0
                        || interval.coefficient == 5.0
                );
            }
            other => prop_assert!(false, "unexpected step {:?}", other),
        }
    }
}
