//! Calendar-aware ticks for date axes.
//!
//! Date axes hold OLE Automation date values: days since 1899-12-30, with
//! the fractional part giving the time of day. Negative values keep their
//! time-of-day fraction positive, so `-1.25` is 1899-12-29 06:00.

use chrono::{DateTime, Datelike, Months, NaiveDate, NaiveDateTime, TimeDelta, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::core::label_text::LabelText;
use crate::core::ticks::{Tick, TickSet, TickStep, first_tick, nice_integer_interval, nice_interval};
use crate::core::types::Range;

const MILLIS_PER_DAY: i64 = 86_400_000;
/// Days between 1899-12-30 and 1970-01-01.
const OLE_DAYS_BEFORE_UNIX_EPOCH: i64 = 25_569;
/// OLE value of 0101-01-01 00:00.
const MIN_OLE_DATE: f64 = -657_069.0;
/// Milliseconds from the OLE epoch to 9999-12-31 23:59:59.999.
const MAX_OLE_MILLIS: i64 = 255_611_462_399_999;
/// Date values resolve to whole milliseconds, so finer ticks would collapse.
const MIN_SUB_SECOND_INTERVAL: f64 = 1e-3;

/// Smallest date value a date axis accepts.
#[must_use]
pub fn min_ole_date() -> f64 {
    MIN_OLE_DATE
}

/// Date values must stay strictly below this bound.
#[must_use]
pub fn max_ole_date() -> f64 {
    MAX_OLE_MILLIS as f64 / MILLIS_PER_DAY as f64
}

/// Granularity chosen for a date tick set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateTickUnit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

/// Converts an OLE Automation date to a calendar date-time (millisecond precision).
#[must_use]
pub fn from_ole_date(value: f64) -> Option<NaiveDateTime> {
    if !value.is_finite() {
        return None;
    }
    let scaled = (value * MILLIS_PER_DAY as f64).round();
    if scaled.abs() > MAX_OLE_MILLIS as f64 * 2.0 {
        return None;
    }
    let mut millis = scaled as i64;
    if millis < 0 {
        millis -= (millis % MILLIS_PER_DAY) * 2;
    }
    let since_unix = millis - OLE_DAYS_BEFORE_UNIX_EPOCH * MILLIS_PER_DAY;
    unix_epoch().checked_add_signed(TimeDelta::try_milliseconds(since_unix)?)
}

/// Converts a calendar date-time to an OLE Automation date.
#[must_use]
pub fn to_ole_date(date: NaiveDateTime) -> f64 {
    let mut millis = date.signed_duration_since(unix_epoch()).num_milliseconds()
        + OLE_DAYS_BEFORE_UNIX_EPOCH * MILLIS_PER_DAY;
    if millis < 0 {
        let fraction = millis % MILLIS_PER_DAY;
        if fraction != 0 {
            millis -= (MILLIS_PER_DAY + fraction) * 2;
        }
    }
    millis as f64 / MILLIS_PER_DAY as f64
}

fn unix_epoch() -> NaiveDateTime {
    DateTime::<Utc>::UNIX_EPOCH.naive_utc()
}

/// Derives calendar-aligned ticks over an OLE date range.
///
/// Generation stops quietly at the first calendar overflow, keeping the
/// ticks produced so far.
#[must_use]
pub fn derive_date_ticks(range: Range, max_tick_count: usize) -> TickSet {
    let (Some(start), Some(end)) = (from_ole_date(range.min), from_ole_date(range.max)) else {
        return TickSet::empty(None);
    };
    if max_tick_count == 0 {
        return TickSet::empty(None);
    }
    let min_interval = range.length() / max_tick_count as f64;

    let (ticks, step) = if min_interval >= 365.0 {
        let years = nice_integer_interval((min_interval / 365.0).floor() as i64);
        (year_ticks(start, end, years), calendar_step(DateTickUnit::Year, years))
    } else if min_interval >= 28.0 {
        let months = month_step(min_interval);
        (month_ticks(start, end, months), calendar_step(DateTickUnit::Month, months))
    } else if min_interval >= 0.5 {
        let days = nice_integer_interval(min_interval.ceil() as i64);
        (day_ticks(start, end, days), calendar_step(DateTickUnit::Day, days))
    } else if min_interval >= 0.5 / 24.0 {
        let hours = hour_step(min_interval * 24.0);
        (
            time_ticks(start, end, DateTickUnit::Hour, hours),
            calendar_step(DateTickUnit::Hour, hours),
        )
    } else if min_interval >= 0.5 / 1440.0 {
        let minutes = sixty_based_step(min_interval * 1440.0);
        (
            time_ticks(start, end, DateTickUnit::Minute, minutes),
            calendar_step(DateTickUnit::Minute, minutes),
        )
    } else if min_interval >= 0.5 / 86_400.0 {
        let seconds = sixty_based_step(min_interval * 86_400.0);
        (
            time_ticks(start, end, DateTickUnit::Second, seconds),
            calendar_step(DateTickUnit::Second, seconds),
        )
    } else {
        return sub_second_ticks(start, end, min_interval * 86_400.0);
    };

    TickSet {
        ticks,
        transformed_range: None,
        step,
    }
}

fn calendar_step(unit: DateTickUnit, count: i64) -> TickStep {
    TickStep::Calendar { unit, count }
}

fn month_step(min_interval_days: f64) -> i64 {
    match min_interval_days {
        d if d < 30.0 => 1,
        d if d < 60.0 => 2,
        d if d < 90.0 => 3,
        d if d < 120.0 => 4,
        d if d < 180.0 => 6,
        _ => 12,
    }
}

fn hour_step(min_interval_hours: f64) -> i64 {
    match min_interval_hours {
        h if h < 1.0 => 1,
        h if h < 2.0 => 2,
        h if h < 3.0 => 3,
        h if h < 4.0 => 4,
        h if h < 6.0 => 6,
        _ => 12,
    }
}

fn sixty_based_step(min_interval: f64) -> i64 {
    match min_interval {
        m if m < 1.0 => 1,
        m if m < 2.0 => 2,
        m if m < 5.0 => 5,
        m if m < 10.0 => 10,
        m if m < 15.0 => 15,
        _ => 30,
    }
}

/// Amount to add so that `position` becomes a multiple of `step`.
fn alignment_shift(position: i64, step: i64) -> i64 {
    let modulus = position.rem_euclid(step);
    if modulus == 0 { 0 } else { step - modulus }
}

fn add_months(date: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
    date.checked_add_months(Months::new(u32::try_from(months).ok()?))
}

fn add_delta(date: NaiveDateTime, delta: TimeDelta) -> Option<NaiveDateTime> {
    date.checked_add_signed(delta)
}

fn midnight(date: NaiveDate) -> Option<NaiveDateTime> {
    date.and_hms_opt(0, 0, 0)
}

fn year_ticks(start: NaiveDateTime, end: NaiveDateTime, years: i64) -> Vec<Tick> {
    let first = NaiveDate::from_ymd_opt(start.year(), 1, 1)
        .and_then(midnight)
        .and_then(|whole| if start > whole { add_months(whole, 12) } else { Some(whole) })
        .and_then(|whole| {
            add_months(whole, 12 * alignment_shift(i64::from(whole.year()), years))
        });
    collect_ticks(first, end, date_label, |date| add_months(date, 12 * years))
}

fn month_ticks(start: NaiveDateTime, end: NaiveDateTime, months: i64) -> Vec<Tick> {
    let first = NaiveDate::from_ymd_opt(start.year(), start.month(), 1)
        .and_then(midnight)
        .and_then(|whole| if start > whole { add_months(whole, 1) } else { Some(whole) })
        .and_then(|whole| add_months(whole, alignment_shift(i64::from(whole.month0()), months)));
    collect_ticks(first, end, date_label, |date| add_months(date, months))
}

fn day_ticks(start: NaiveDateTime, end: NaiveDateTime, days: i64) -> Vec<Tick> {
    let step = TimeDelta::try_days(days);
    let first = midnight(start.date())
        .and_then(|whole| {
            if start > whole {
                add_delta(whole, TimeDelta::days(1))
            } else {
                Some(whole)
            }
        })
        .and_then(|whole| {
            let shift = TimeDelta::try_days(alignment_shift(i64::from(whole.day()), days))?;
            add_delta(whole, shift)
        });
    collect_ticks(first, end, date_label, |date| add_delta(date, step?))
}

fn time_ticks(start: NaiveDateTime, end: NaiveDateTime, unit: DateTickUnit, count: i64) -> Vec<Tick> {
    let (whole, unit_delta, position): (Option<NaiveDateTime>, TimeDelta, fn(&NaiveDateTime) -> u32) =
        match unit {
            DateTickUnit::Hour => (
                start.date().and_hms_opt(start.hour(), 0, 0),
                TimeDelta::hours(1),
                Timelike::hour,
            ),
            DateTickUnit::Minute => (
                start.date().and_hms_opt(start.hour(), start.minute(), 0),
                TimeDelta::minutes(1),
                Timelike::minute,
            ),
            _ => (
                start
                    .date()
                    .and_hms_opt(start.hour(), start.minute(), start.second()),
                TimeDelta::seconds(1),
                Timelike::second,
            ),
        };
    let label: fn(NaiveDateTime) -> String = match unit {
        DateTickUnit::Second => date_second_label,
        _ => date_minute_label,
    };

    let step = unit_delta * i32::try_from(count).unwrap_or(i32::MAX);
    let first = whole
        .and_then(|whole| if start > whole { add_delta(whole, unit_delta) } else { Some(whole) })
        .and_then(|whole| {
            let shift = alignment_shift(i64::from(position(&whole)), count);
            add_delta(whole, unit_delta * i32::try_from(shift).ok()?)
        });
    collect_ticks(first, end, label, |date| add_delta(date, step))
}

fn sub_second_ticks(start: NaiveDateTime, end: NaiveDateTime, min_interval_seconds: f64) -> TickSet {
    let Some(whole) = start.with_nanosecond(0) else {
        return TickSet::empty(None);
    };
    let seconds_start = start.signed_duration_since(whole).num_milliseconds() as f64 / 1_000.0;
    let interval = nice_interval(min_interval_seconds.max(MIN_SUB_SECOND_INTERVAL));
    let first = first_tick(seconds_start, interval);
    let decimals = usize::try_from(-interval.exponent).unwrap_or(0);

    let mut ticks: Vec<Tick> = Vec::new();
    for index in 0_u32.. {
        let seconds = first.value + f64::from(index) * interval.value;
        let Some(date) = TimeDelta::try_milliseconds((seconds * 1_000.0).round() as i64)
            .and_then(|offset| add_delta(whole, offset))
        else {
            break;
        };
        if date > end {
            break;
        }
        let tick = calendar_tick(date, sub_second_label(date, decimals));
        if ticks.last().is_some_and(|last| last.value >= tick.value) {
            continue;
        }
        ticks.push(tick);
    }

    TickSet {
        ticks,
        transformed_range: None,
        step: TickStep::Numeric(interval),
    }
}

fn collect_ticks(
    first: Option<NaiveDateTime>,
    end: NaiveDateTime,
    label: impl Fn(NaiveDateTime) -> String,
    advance: impl Fn(NaiveDateTime) -> Option<NaiveDateTime>,
) -> Vec<Tick> {
    let mut ticks = Vec::new();
    let mut current = first;
    while let Some(date) = current.filter(|date| *date <= end) {
        ticks.push(calendar_tick(date, label(date)));
        current = advance(date);
    }
    ticks
}

fn calendar_tick(date: NaiveDateTime, label: String) -> Tick {
    let value = to_ole_date(date);
    Tick {
        value,
        transformed: value,
        decomposition: None,
        required_decimals: 0,
        label: LabelText::Plain(label),
    }
}

fn date_label(date: NaiveDateTime) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn date_minute_label(date: NaiveDateTime) -> String {
    date.format("%Y-%m-%d\n%H:%M").to_string()
}

fn date_second_label(date: NaiveDateTime) -> String {
    date.format("%Y-%m-%d\n%H:%M:%S").to_string()
}

fn sub_second_label(date: NaiveDateTime, decimals: usize) -> String {
    let seconds = f64::from(date.second()) + f64::from(date.nanosecond() / 1_000_000) / 1_000.0;
    let width = if decimals == 0 { 2 } else { decimals + 3 };
    format!(
        "{}\n{:02}:{:02}:{:0width$.decimals$}",
        date.format("%Y-%m-%d"),
        date.hour(),
        date.minute(),
        seconds,
    )
}
