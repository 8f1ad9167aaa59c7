//! Calendar-aware boundary rounding.
//!
//! Snaps an instant to the start of the period containing it (`down`), the
//! start of the following period (`up`), or whichever of the two is closer
//! (`nearest`). Units cover the standard calendar hierarchy plus weeks
//! (anchored to Monday) and named weekdays. All functions are pure.
//!
//! Calendar components are taken in the instant's own offset, and the
//! snapped instant keeps that offset — a fixed offset has no DST gaps, so
//! reconstruction never lands on a nonexistent local time.
//!
//! Directional semantics:
//!
//! - `down` zeroes every component finer than the unit (month and day reset
//!   to 1, the rest to zero).
//! - `up` is a true no-op for an instant already exactly at the boundary;
//!   otherwise it is `down` plus one calendar unit, so January 31 rounds up
//!   by month to February 1 and December 31 up by year to the next
//!   January 1.
//! - `nearest` compares against the midpoint between `down` and `up`;
//!   an instant at or before the midpoint snaps down.

use chrono::{
    DateTime, Datelike, Days, FixedOffset, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta,
    Timelike, Weekday,
};

/// The period unit an instant is snapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundUnit {
    Year,
    Month,
    /// Monday-anchored calendar week.
    Week,
    Day,
    Hour,
    Minute,
    Second,
    /// The most recent / next occurrence of a specific weekday at midnight.
    Weekday(Weekday),
}

/// Which boundary of the containing period to snap to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoundDirection {
    #[default]
    Down,
    Up,
    Nearest,
}

/// A parsed `round` option: unit plus direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSpec {
    pub unit: RoundUnit,
    pub direction: RoundDirection,
}

impl RoundSpec {
    /// Parse the declarative `"<unit>[:<direction>]"` form.
    ///
    /// Returns `None` for an unrecognized unit token, which disables
    /// rounding for the field. An omitted or unrecognized direction falls
    /// back to `down`.
    pub fn parse(raw: &str) -> Option<RoundSpec> {
        let raw = raw.trim().to_lowercase();
        let (unit_str, dir_str) = match raw.split_once(':') {
            Some((u, d)) => (u.trim(), Some(d.trim())),
            None => (raw.as_str(), None),
        };

        let unit = parse_unit(unit_str)?;
        let direction = match dir_str {
            Some("up") => RoundDirection::Up,
            Some("nearest") => RoundDirection::Nearest,
            _ => RoundDirection::Down,
        };
        Some(RoundSpec { unit, direction })
    }
}

fn parse_unit(s: &str) -> Option<RoundUnit> {
    match s {
        "year" => Some(RoundUnit::Year),
        "month" => Some(RoundUnit::Month),
        "week" => Some(RoundUnit::Week),
        "day" => Some(RoundUnit::Day),
        "hour" => Some(RoundUnit::Hour),
        "minute" => Some(RoundUnit::Minute),
        "second" => Some(RoundUnit::Second),
        _ => parse_weekday(s).map(RoundUnit::Weekday),
    }
}

/// Parse a weekday name (lowercase, full or abbreviated).
fn parse_weekday(s: &str) -> Option<Weekday> {
    match s {
        "monday" | "mon" => Some(Weekday::Mon),
        "tuesday" | "tue" | "tues" => Some(Weekday::Tue),
        "wednesday" | "wed" => Some(Weekday::Wed),
        "thursday" | "thu" | "thurs" => Some(Weekday::Thu),
        "friday" | "fri" => Some(Weekday::Fri),
        "saturday" | "sat" => Some(Weekday::Sat),
        "sunday" | "sun" => Some(Weekday::Sun),
        _ => None,
    }
}

/// Apply a full rounding spec.
pub fn round(dt: DateTime<FixedOffset>, spec: &RoundSpec) -> DateTime<FixedOffset> {
    match spec.direction {
        RoundDirection::Down => round_down(dt, spec.unit),
        RoundDirection::Up => round_up(dt, spec.unit),
        RoundDirection::Nearest => round_nearest(dt, spec.unit),
    }
}

/// Snap to the start of the period containing `dt`.
pub fn round_down(dt: DateTime<FixedOffset>, unit: RoundUnit) -> DateTime<FixedOffset> {
    floor_naive(dt.naive_local(), unit)
        .and_then(|naive| rebuild_local(naive, *dt.offset()))
        .unwrap_or(dt)
}

/// Snap to the start of the period after `dt`, unless `dt` is already
/// exactly at a boundary, in which case it is returned unchanged.
pub fn round_up(dt: DateTime<FixedOffset>, unit: RoundUnit) -> DateTime<FixedOffset> {
    let down = round_down(dt, unit);
    if down == dt {
        return dt;
    }
    step_forward(down, unit).unwrap_or(dt)
}

/// Snap to whichever of `down` / `up` is closer; an instant at or before
/// the midpoint (ties included) snaps down.
pub fn round_nearest(dt: DateTime<FixedOffset>, unit: RoundUnit) -> DateTime<FixedOffset> {
    let down = round_down(dt, unit);
    if down == dt {
        return dt;
    }
    let up = round_up(dt, unit);
    if up == down {
        return down;
    }
    let midpoint = down + (up - down) / 2;
    if dt <= midpoint {
        down
    } else {
        up
    }
}

/// Whether `dt` already sits exactly on the unit's boundary.
pub fn is_at_boundary(dt: DateTime<FixedOffset>, unit: RoundUnit) -> bool {
    round_down(dt, unit) == dt
}

/// Reattach local wall-clock components to a fixed offset.
pub(crate) fn rebuild_local(
    naive_local: NaiveDateTime,
    offset: FixedOffset,
) -> Option<DateTime<FixedOffset>> {
    let naive_utc =
        naive_local.checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))?;
    Some(DateTime::from_naive_utc_and_offset(naive_utc, offset))
}

/// Zero every component finer than the unit, in local wall-clock terms.
fn floor_naive(naive: NaiveDateTime, unit: RoundUnit) -> Option<NaiveDateTime> {
    let date = naive.date();
    let time = naive.time();
    let floored = match unit {
        RoundUnit::Second => {
            date.and_time(NaiveTime::from_hms_opt(time.hour(), time.minute(), time.second())?)
        }
        RoundUnit::Minute => {
            date.and_time(NaiveTime::from_hms_opt(time.hour(), time.minute(), 0)?)
        }
        RoundUnit::Hour => date.and_time(NaiveTime::from_hms_opt(time.hour(), 0, 0)?),
        RoundUnit::Day => date.and_time(NaiveTime::MIN),
        RoundUnit::Week => {
            let back = u64::from(date.weekday().num_days_from_monday());
            date.checked_sub_days(Days::new(back))?.and_time(NaiveTime::MIN)
        }
        RoundUnit::Weekday(target) => {
            // Most recent occurrence, today inclusive.
            let back = (date.weekday().num_days_from_monday() + 7
                - target.num_days_from_monday())
                % 7;
            date.checked_sub_days(Days::new(u64::from(back)))?.and_time(NaiveTime::MIN)
        }
        RoundUnit::Month => {
            NaiveDate::from_ymd_opt(date.year(), date.month(), 1)?.and_time(NaiveTime::MIN)
        }
        RoundUnit::Year => NaiveDate::from_ymd_opt(date.year(), 1, 1)?.and_time(NaiveTime::MIN),
    };
    Some(floored)
}

/// Advance a boundary instant by exactly one unit, calendar-aware.
fn step_forward(dt: DateTime<FixedOffset>, unit: RoundUnit) -> Option<DateTime<FixedOffset>> {
    match unit {
        RoundUnit::Year => dt.checked_add_months(Months::new(12)),
        RoundUnit::Month => dt.checked_add_months(Months::new(1)),
        RoundUnit::Week | RoundUnit::Weekday(_) => dt.checked_add_days(Days::new(7)),
        RoundUnit::Day => dt.checked_add_days(Days::new(1)),
        RoundUnit::Hour => dt.checked_add_signed(TimeDelta::hours(1)),
        RoundUnit::Minute => dt.checked_add_signed(TimeDelta::minutes(1)),
        RoundUnit::Second => dt.checked_add_signed(TimeDelta::seconds(1)),
    }
}
