use chrono::NaiveDate;
use plotaxis::core::{
    AxisKind, DateTickUnit, Range, TickStep, derive_ticks, from_ole_date, to_ole_date,
};

fn ole(y: i32, m: u32, d: u32, h: u32) -> f64 {
    to_ole_date(
        NaiveDate::from_ymd_opt(y, m, d)
            .and_then(|date| date.and_hms_opt(h, 0, 0))
            .expect("valid date"),
    )
}

fn labels(min: f64, max: f64, max_tick_count: usize) -> Vec<String> {
    derive_ticks(Range::new(min, max), AxisKind::Date, max_tick_count, None)
        .ticks
        .iter()
        .map(|tick| tick.label.display_text())
        .collect()
}

#[test]
fn ten_day_span_ticks_every_midnight() {
    let set = derive_ticks(
        Range::new(ole(2024, 3, 1, 0), ole(2024, 3, 11, 0)),
        AxisKind::Date,
        10,
        None,
    );

    assert_eq!(
        set.step,
        TickStep::Calendar {
            unit: DateTickUnit::Day,
            count: 1
        }
    );
    assert_eq!(set.len(), 11);
    assert_eq!(set.ticks[0].label.display_text(), "2024-03-01");
    assert_eq!(set.ticks[10].label.display_text(), "2024-03-11");
}

#[test]
fn month_ticks_start_on_aligned_month_boundary() {
    let labels = labels(ole(2024, 1, 15, 0), ole(2024, 12, 15, 0), 6);
    assert_eq!(
        labels,
        vec!["2024-03-01", "2024-05-01", "2024-07-01", "2024-09-01", "2024-11-01"]
    );
}

#[test]
fn ticks_start_at_or_after_range_start() {
    let start = ole(2023, 6, 10, 7);
    let end = ole(2023, 6, 11, 7);
    let set = derive_ticks(Range::new(start, end), AxisKind::Date, 8, None);

    assert!(!set.is_empty());
    assert!(set.ticks[0].value >= start);
    assert!(set.ticks.iter().all(|tick| tick.value <= end));
    assert_eq!(
        set.step,
        TickStep::Calendar {
            unit: DateTickUnit::Hour,
            count: 4
        }
    );
    assert_eq!(set.ticks[0].label.display_text(), "2023-06-10\n08:00");
}

#[test]
fn date_ticks_round_trip_through_calendar() {
    let set = derive_ticks(
        Range::new(ole(2000, 1, 1, 0), ole(2030, 1, 1, 0)),
        AxisKind::Date,
        6,
        None,
    );

    assert!(matches!(
        set.step,
        TickStep::Calendar {
            unit: DateTickUnit::Year,
            ..
        }
    ));
    for tick in &set.ticks {
        let date = from_ole_date(tick.value).expect("tick inside calendar");
        assert_eq!(to_ole_date(date), tick.value);
    }
}

#[test]
fn date_axis_rejects_values_outside_calendar() {
    assert!(AxisKind::Date.validate_range(-1e9, 0.0).is_err());
    assert!(AxisKind::Date.validate_range(0.0, 1e9).is_err());
    assert!(AxisKind::Date.validate_range(0.0, 1.0).is_ok());
}
