//! Relative and keyword time expression resolution.
//!
//! Recognizes a closed English vocabulary:
//!
//! - **Relative**: `<n>_<unit>(s)?_<ago|from_now>` where the unit is one of
//!   `year`, `month`, `week`, `day`, `hour`, `minute`, `second`,
//!   `nanosecond`. Calendar units are applied calendar-aware (variable
//!   month length, leap years); duration units as fixed-length offsets.
//! - **Keywords**: `now`, `today`, `yesterday`, `tomorrow`.
//!
//! Resolution is evaluated against the anchor passed to
//! [`resolve_expression_at`]; [`resolve_expression`] samples the wall clock
//! at the moment of the call, so repeated calls are not deterministic
//! unless the caller freezes the anchor. Non-matching input yields `None`,
//! never an error — the caller falls through to its other formats.

use chrono::{DateTime, Days, FixedOffset, Local, Months, NaiveTime, TimeDelta};

/// Resolve an expression against the current wall clock.
pub fn resolve_expression(expr: &str) -> Option<DateTime<FixedOffset>> {
    resolve_expression_at(expr, now_local())
}

/// Resolve an expression against an explicit anchor. Pure.
pub fn resolve_expression_at(
    expr: &str,
    now: DateTime<FixedOffset>,
) -> Option<DateTime<FixedOffset>> {
    match expr {
        "now" => Some(now),
        "today" => start_of_day(now),
        "yesterday" => start_of_day(now)?.checked_sub_days(Days::new(1)),
        "tomorrow" => start_of_day(now)?.checked_add_days(Days::new(1)),
        _ => resolve_relative(expr, now),
    }
}

/// The anchor used by the clock-sampling entry points: the current local
/// instant, flattened to its fixed offset.
pub(crate) fn now_local() -> DateTime<FixedOffset> {
    Local::now().fixed_offset()
}

/// Midnight of the anchor's calendar day, in the anchor's own offset.
fn start_of_day(now: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    crate::round::rebuild_local(now.date_naive().and_time(NaiveTime::MIN), *now.offset())
}

/// Parse and apply `<n>_<unit>(s)?_<ago|from_now>`.
fn resolve_relative(expr: &str, now: DateTime<FixedOffset>) -> Option<DateTime<FixedOffset>> {
    let (rest, backwards) = if let Some(rest) = expr.strip_suffix("_ago") {
        (rest, true)
    } else if let Some(rest) = expr.strip_suffix("_from_now") {
        (rest, false)
    } else {
        return None;
    };

    let (count_str, unit) = rest.split_once('_')?;
    if count_str.is_empty() || !count_str.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let unit = unit.strip_suffix('s').unwrap_or(unit);

    match unit {
        "year" | "month" => {
            let n: u32 = count_str.parse().ok()?;
            let months = if unit == "year" {
                Months::new(n.checked_mul(12)?)
            } else {
                Months::new(n)
            };
            if backwards {
                now.checked_sub_months(months)
            } else {
                now.checked_add_months(months)
            }
        }
        "week" | "day" => {
            let n: u64 = count_str.parse().ok()?;
            let days = if unit == "week" {
                Days::new(n.checked_mul(7)?)
            } else {
                Days::new(n)
            };
            if backwards {
                now.checked_sub_days(days)
            } else {
                now.checked_add_days(days)
            }
        }
        "hour" | "minute" | "second" | "nanosecond" => {
            let n: i64 = count_str.parse().ok()?;
            let delta = match unit {
                "hour" => TimeDelta::try_hours(n)?,
                "minute" => TimeDelta::try_minutes(n)?,
                "second" => TimeDelta::try_seconds(n)?,
                _ => TimeDelta::nanoseconds(n),
            };
            if backwards {
                now.checked_sub_signed(delta)
            } else {
                now.checked_add_signed(delta)
            }
        }
        _ => None,
    }
}
