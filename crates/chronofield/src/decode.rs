//! Field decode orchestration.
//!
//! One decode call classifies its input (absent / blank / null / value),
//! resolves an instant through the configured formats, applies rounding,
//! checks the configured bounds, and produces a present / null / error
//! outcome. Decoding is a pure, synchronous function of the input and the
//! current instant; there are no retries and no partial recovery.
//!
//! The outcome is a [`Decoded`] pair rather than a plain `Result`: one
//! blank-handling policy (`discard_blank = false`) marks the field present
//! *and* reports a non-fatal `Blank` error, which both halves of the pair
//! are needed to express.

use chrono::{DateTime, FixedOffset};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::config::FieldConfig;
use crate::error::FieldError;
use crate::format::parse_with;
use crate::round::round;
use crate::validate::check_range;

/// A decoded temporal field value.
///
/// Invariants: `null` implies `present`; a non-present value holds the
/// zero instant (the Unix epoch).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TemporalValue {
    pub instant: DateTime<FixedOffset>,
    pub present: bool,
    pub null: bool,
}

fn zero_instant() -> DateTime<FixedOffset> {
    DateTime::UNIX_EPOCH.fixed_offset()
}

impl TemporalValue {
    /// A present, non-null value.
    pub fn new(instant: DateTime<FixedOffset>) -> TemporalValue {
        TemporalValue {
            instant,
            present: true,
            null: false,
        }
    }

    /// A value for a field missing from the source.
    pub fn absent() -> TemporalValue {
        TemporalValue {
            instant: zero_instant(),
            present: false,
            null: false,
        }
    }

    /// An explicit null: present, carrying no instant.
    pub fn null() -> TemporalValue {
        TemporalValue {
            instant: zero_instant(),
            present: true,
            null: true,
        }
    }

    /// Persistence adapter: the raw instant for a present, non-null value,
    /// `None` otherwise — mirroring the serialization contract.
    pub fn stored(&self) -> Option<DateTime<FixedOffset>> {
        (self.present && !self.null).then_some(self.instant)
    }
}

impl Default for TemporalValue {
    fn default() -> Self {
        TemporalValue::absent()
    }
}

/// A present, non-null value serializes to an RFC 3339 timestamp; an
/// absent or null value serializes to the null literal.
impl Serialize for TemporalValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.present && !self.null {
            serializer.serialize_str(&self.instant.to_rfc3339())
        } else {
            serializer.serialize_none()
        }
    }
}

impl<'de> Deserialize<'de> for TemporalValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(TemporalValue::null()),
            Some(text) => DateTime::parse_from_rfc3339(&text)
                .map(TemporalValue::new)
                .map_err(D::Error::custom),
        }
    }
}

/// Input for [`decode_dynamic`]: the three shapes a generic map or JSON
/// adapter can hand over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DynamicValue {
    /// Explicit null; handled like blank text.
    Null,
    /// Raw text, run through the configured formats.
    Text(String),
    /// A pre-typed instant; skips format parsing but is still rounded and
    /// range-checked.
    Instant(DateTime<FixedOffset>),
}

/// The outcome of one field decode.
///
/// `error` is `Some` both for fatal failures (where `value` is left
/// absent) and for the one reported-but-non-fatal case, blank input under
/// `discard_blank = false` (where `value` is present).
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct Decoded {
    pub value: TemporalValue,
    pub error: Option<FieldError>,
}

impl Decoded {
    fn ok(value: TemporalValue) -> Decoded {
        Decoded { value, error: None }
    }

    fn failed(error: FieldError) -> Decoded {
        Decoded {
            value: TemporalValue::absent(),
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Collapse into a `Result`, treating any reported error as fatal.
    pub fn into_result(self) -> crate::error::Result<TemporalValue> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.value),
        }
    }
}

/// Decode raw text from a query-string or form-encoded source.
pub fn decode_text(raw: &str, config: &FieldConfig) -> Decoded {
    if raw.is_empty() {
        return decode_blank(config);
    }
    match parse_with(&config.formats, raw) {
        Ok(instant) => finish(instant, config),
        Err(error) => Decoded::failed(error),
    }
}

/// Decode a value from a generic map or JSON-structured source.
pub fn decode_dynamic(value: DynamicValue, config: &FieldConfig) -> Decoded {
    match value {
        DynamicValue::Null => decode_blank(config),
        DynamicValue::Text(text) => decode_text(&text, config),
        DynamicValue::Instant(instant) => finish(instant, config),
    }
}

/// Decode a JSON scalar: null is blank, a string is text, anything else
/// cannot carry an instant.
pub fn decode_json(value: &serde_json::Value, config: &FieldConfig) -> Decoded {
    match value {
        serde_json::Value::Null => decode_blank(config),
        serde_json::Value::String(text) => decode_text(text, config),
        _ => Decoded::failed(FieldError::InvalidFormat),
    }
}

/// Decode a field missing from the source entirely: always succeeds,
/// leaving the field non-present.
pub fn decode_absent(_config: &FieldConfig) -> Decoded {
    Decoded::ok(TemporalValue::absent())
}

/// Blank input, resolved by policy precedence:
/// nullable → required → keep-blank → discard.
fn decode_blank(config: &FieldConfig) -> Decoded {
    if config.nullable {
        return Decoded::ok(TemporalValue::null());
    }
    if config.required {
        return Decoded::failed(FieldError::Blank);
    }
    if !config.discard_blank {
        // Present without a value; Blank is reported but not fatal to the
        // rest of the batch.
        return Decoded {
            value: TemporalValue {
                instant: zero_instant(),
                present: true,
                null: false,
            },
            error: Some(FieldError::Blank),
        };
    }
    Decoded::ok(TemporalValue::absent())
}

/// Round the resolved instant (when configured) and range-check it.
fn finish(instant: DateTime<FixedOffset>, config: &FieldConfig) -> Decoded {
    let instant = match &config.round {
        Some(spec) => round(instant, spec),
        None => instant,
    };
    match check_range(instant, config) {
        Ok(()) => Decoded::ok(TemporalValue::new(instant)),
        Err(error) => Decoded::failed(error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldOptions;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<FixedOffset> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap().fixed_offset()
    }

    fn config(options: FieldOptions) -> FieldConfig {
        FieldConfig::build(&options)
    }

    // ── End-to-end scenarios ────────────────────────────────────────────

    #[test]
    fn e2e_month_up_rounds_to_first_of_next_month() {
        let cfg = config(FieldOptions {
            round: Some("month:up".into()),
            ..Default::default()
        });
        let decoded = decode_text("2024-01-15T14:30:45Z", &cfg);
        assert!(decoded.is_ok());
        assert_eq!(decoded.value.instant, at(2024, 2, 1, 0, 0, 0));
        assert!(decoded.value.present);
        assert!(!decoded.value.null);
    }

    #[test]
    fn e2e_week_up_from_monday_afternoon() {
        let cfg = config(FieldOptions {
            round: Some("week:up".into()),
            ..Default::default()
        });
        let decoded = decode_text("2024-01-01T14:00:00Z", &cfg);
        assert_eq!(decoded.value.instant, at(2024, 1, 8, 0, 0, 0));
    }

    #[test]
    fn relative_min_exclusive_rejects_equal_candidate() {
        // The candidate and the bound resolve "1_day_ago" independently,
        // microseconds apart; the exclusive minimum still rejects it.
        let cfg = config(FieldOptions {
            min: Some("!1_day_ago".into()),
            max: Some("!1_day_from_now".into()),
            ..Default::default()
        });
        let decoded = decode_text("1_day_ago", &cfg);
        assert_eq!(decoded.error, Some(FieldError::BelowMinimum));
        assert!(!decoded.value.present);
    }

    #[test]
    fn e2e_required_blank_fails() {
        let cfg = config(FieldOptions {
            required: true,
            ..Default::default()
        });
        let decoded = decode_text("", &cfg);
        assert_eq!(decoded.error, Some(FieldError::Blank));
        assert!(!decoded.value.present);
    }

    #[test]
    fn e2e_unparseable_input_is_invalid_format() {
        let decoded = decode_text("wat", &FieldConfig::default());
        assert_eq!(decoded.error, Some(FieldError::InvalidFormat));
    }

    #[test]
    fn e2e_absent_field_succeeds_non_present() {
        let decoded = decode_absent(&FieldConfig::default());
        assert!(decoded.is_ok());
        assert!(!decoded.value.present);
        assert!(!decoded.value.null);
    }

    // ── Blank policy ────────────────────────────────────────────────────

    #[test]
    fn blank_is_discarded_by_default() {
        let decoded = decode_text("", &FieldConfig::default());
        assert!(decoded.is_ok());
        assert!(!decoded.value.present);
    }

    #[test]
    fn blank_with_nullable_yields_explicit_null() {
        let cfg = config(FieldOptions {
            nullable: true,
            ..Default::default()
        });
        let decoded = decode_text("", &cfg);
        assert!(decoded.is_ok());
        assert!(decoded.value.present);
        assert!(decoded.value.null);
    }

    #[test]
    fn nullable_takes_precedence_over_required() {
        let cfg = config(FieldOptions {
            nullable: true,
            required: true,
            ..Default::default()
        });
        let decoded = decode_text("", &cfg);
        assert!(decoded.is_ok());
        assert!(decoded.value.null);
    }

    #[test]
    fn kept_blank_is_present_with_a_reported_error() {
        let cfg = config(FieldOptions {
            discard_blank: false,
            ..Default::default()
        });
        let decoded = decode_text("", &cfg);
        assert_eq!(decoded.error, Some(FieldError::Blank));
        assert!(decoded.value.present);
        assert!(!decoded.value.null);
    }

    // ── Dynamic and JSON sources ────────────────────────────────────────

    #[test]
    fn dynamic_null_follows_the_blank_policy() {
        let cfg = config(FieldOptions {
            nullable: true,
            ..Default::default()
        });
        let decoded = decode_dynamic(DynamicValue::Null, &cfg);
        assert!(decoded.value.null);
    }

    #[test]
    fn dynamic_text_is_parsed_through_the_formats() {
        let decoded = decode_dynamic(
            DynamicValue::Text("2024-01-15T14:30:45Z".into()),
            &FieldConfig::default(),
        );
        assert_eq!(decoded.value.instant, at(2024, 1, 15, 14, 30, 45));
    }

    #[test]
    fn dynamic_instant_is_still_rounded() {
        let cfg = config(FieldOptions {
            round: Some("month:up".into()),
            ..Default::default()
        });
        let decoded = decode_dynamic(DynamicValue::Instant(at(2024, 1, 15, 14, 30, 45)), &cfg);
        assert_eq!(decoded.value.instant, at(2024, 2, 1, 0, 0, 0));
    }

    #[test]
    fn dynamic_instant_is_still_range_checked() {
        let cfg = config(FieldOptions {
            max: Some("2024-01-01T00:00:00Z".into()),
            ..Default::default()
        });
        let decoded = decode_dynamic(DynamicValue::Instant(at(2024, 1, 15, 0, 0, 0)), &cfg);
        assert_eq!(decoded.error, Some(FieldError::AboveMaximum));
    }

    #[test]
    fn rounding_happens_before_range_checking() {
        // Jan 15 is inside the exclusive max, but month:up carries it onto
        // the (rounded) bound itself
        let cfg = config(FieldOptions {
            round: Some("month:up".into()),
            max: Some("!2024-02-01T00:00:00Z".into()),
            ..Default::default()
        });
        let decoded = decode_text("2024-01-15T14:30:45Z", &cfg);
        assert_eq!(decoded.error, Some(FieldError::AboveMaximum));
    }

    #[test]
    fn json_null_and_string_and_scalar() {
        let cfg = config(FieldOptions {
            nullable: true,
            ..Default::default()
        });
        assert!(decode_json(&json!(null), &cfg).value.null);
        assert_eq!(
            decode_json(&json!("2024-01-15T14:30:45Z"), &cfg).value.instant,
            at(2024, 1, 15, 14, 30, 45)
        );
        assert_eq!(
            decode_json(&json!(1705329045), &cfg).error,
            Some(FieldError::InvalidFormat)
        );
    }

    #[test]
    fn into_result_collapses_the_pair() {
        assert_eq!(
            decode_text("wat", &FieldConfig::default()).into_result(),
            Err(FieldError::InvalidFormat)
        );
        assert!(decode_text("2024-01-15T14:30:45Z", &FieldConfig::default())
            .into_result()
            .is_ok());
    }

    // ── Serialization contract ──────────────────────────────────────────

    #[test]
    fn present_value_serializes_to_a_timestamp_string() {
        let value = TemporalValue::new(at(2024, 2, 1, 0, 0, 0));
        assert_eq!(
            serde_json::to_string(&value).unwrap(),
            r#""2024-02-01T00:00:00+00:00""#
        );
    }

    #[test]
    fn absent_and_null_serialize_to_the_null_literal() {
        assert_eq!(serde_json::to_string(&TemporalValue::absent()).unwrap(), "null");
        assert_eq!(serde_json::to_string(&TemporalValue::null()).unwrap(), "null");
    }

    #[test]
    fn deserializing_null_yields_a_present_null() {
        let value: TemporalValue = serde_json::from_str("null").unwrap();
        assert!(value.present);
        assert!(value.null);
    }

    #[test]
    fn deserializing_a_timestamp_yields_a_present_value() {
        let value: TemporalValue =
            serde_json::from_str(r#""2024-01-15T14:30:45Z""#).unwrap();
        assert!(value.present);
        assert!(!value.null);
        assert_eq!(value.instant, at(2024, 1, 15, 14, 30, 45));
    }

    #[test]
    fn deserializing_garbage_is_an_error() {
        assert!(serde_json::from_str::<TemporalValue>(r#""wat""#).is_err());
    }

    #[test]
    fn stored_mirrors_the_serialization_contract() {
        let instant = at(2024, 1, 15, 14, 30, 45);
        assert_eq!(TemporalValue::new(instant).stored(), Some(instant));
        assert_eq!(TemporalValue::absent().stored(), None);
        assert_eq!(TemporalValue::null().stored(), None);
    }

    #[test]
    fn expression_input_decodes_through_the_default_formats() {
        let before = Utc::now();
        let decoded = decode_text("now", &FieldConfig::default());
        let after = Utc::now();
        assert!(decoded.is_ok());
        let instant = decoded.value.instant.to_utc();
        assert!(instant >= before && instant <= after);
    }

    #[test]
    fn in_range_value_passes_both_bounds() {
        let cfg = config(FieldOptions {
            min: Some("2024-01-01T00:00:00Z".into()),
            max: Some("2024-12-31T00:00:00Z".into()),
            ..Default::default()
        });
        let decoded = decode_text("2024-06-15T12:00:00Z", &cfg);
        assert!(decoded.is_ok());
    }
}
