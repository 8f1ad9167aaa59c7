//! Ordered multi-format textual parsing.
//!
//! A field declares an ordered list of formats; the first one that parses
//! the input wins and the rest are never tried. Entries are either named
//! presets (the Go stdlib layout vocabulary the original wire format
//! used), the literal `expression` pseudo-format, or a verbatim strftime
//! pattern.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{FieldError, Result};
use crate::expression::resolve_expression;

/// One entry of a field's format list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSpec {
    /// Delegate to the expression resolver.
    Expression,
    /// RFC 3339 (covers the `RFC3339` / `RFC3339Nano` presets).
    Rfc3339,
    /// RFC 2822 (covers the `RFC822` / `RFC1123` preset family; accepts
    /// the obsolete zone names those layouts carry).
    Rfc2822,
    /// A concrete strftime pattern, preset-resolved or caller-supplied.
    Pattern(String),
}

/// The default format list: RFC 3339, then expressions.
pub(crate) fn default_formats() -> Vec<FormatSpec> {
    vec![FormatSpec::Rfc3339, FormatSpec::Expression]
}

/// Parse the comma-separated declarative `format` option.
pub(crate) fn parse_format_list(raw: &str) -> Vec<FormatSpec> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(lookup_preset)
        .collect()
}

/// Resolve a preset name; anything unrecognized is a custom pattern.
fn lookup_preset(name: &str) -> FormatSpec {
    match name {
        "expression" => FormatSpec::Expression,
        "RFC3339" | "RFC3339Nano" => FormatSpec::Rfc3339,
        "RFC822" | "RFC822Z" | "RFC1123" | "RFC1123Z" => FormatSpec::Rfc2822,
        "ANSIC" => FormatSpec::Pattern("%a %b %e %H:%M:%S %Y".to_string()),
        "RubyDate" => FormatSpec::Pattern("%a %b %d %H:%M:%S %z %Y".to_string()),
        "Kitchen" => FormatSpec::Pattern("%I:%M%p".to_string()),
        "Stamp" => FormatSpec::Pattern("%b %e %H:%M:%S".to_string()),
        "StampMilli" => FormatSpec::Pattern("%b %e %H:%M:%S%.3f".to_string()),
        "StampMicro" => FormatSpec::Pattern("%b %e %H:%M:%S%.6f".to_string()),
        "StampNano" => FormatSpec::Pattern("%b %e %H:%M:%S%.9f".to_string()),
        "DateTime" => FormatSpec::Pattern("%Y-%m-%d %H:%M:%S".to_string()),
        "DateOnly" => FormatSpec::Pattern("%Y-%m-%d".to_string()),
        "TimeOnly" => FormatSpec::Pattern("%H:%M:%S".to_string()),
        custom => FormatSpec::Pattern(custom.to_string()),
    }
}

/// Try each configured format in order; first successful parse wins.
pub(crate) fn parse_with(formats: &[FormatSpec], input: &str) -> Result<DateTime<FixedOffset>> {
    for format in formats {
        let parsed = match format {
            FormatSpec::Expression => resolve_expression(input),
            FormatSpec::Rfc3339 => DateTime::parse_from_rfc3339(input).ok(),
            FormatSpec::Rfc2822 => DateTime::parse_from_rfc2822(input).ok(),
            FormatSpec::Pattern(pattern) => parse_pattern(pattern, input),
        };
        if let Some(instant) = parsed {
            return Ok(instant);
        }
    }
    Err(FieldError::InvalidFormat)
}

/// Layered pattern parsing: offset-aware datetime, then naive datetime
/// (anchored to UTC), then date-only (midnight UTC), then time-only
/// (attached to 1970-01-01 UTC).
fn parse_pattern(pattern: &str, input: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_str(input, pattern) {
        return Some(dt);
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, pattern) {
        return Some(naive.and_utc().fixed_offset());
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, pattern) {
        return Some(date.and_time(NaiveTime::MIN).and_utc().fixed_offset());
    }
    if let Ok(time) = NaiveTime::parse_from_str(input, pattern) {
        let epoch_day = DateTime::UNIX_EPOCH.date_naive();
        return Some(epoch_day.and_time(time).and_utc().fixed_offset());
    }
    None
}
