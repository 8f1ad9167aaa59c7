//! Per-field declarative options and the typed configuration built from
//! them.
//!
//! [`FieldOptions`] is the raw declarative surface — what a host framework
//! reads off a field declaration (it derives `Deserialize`, so annotation
//! material parsed once at startup can come straight from JSON or TOML).
//! [`FieldConfig::build`] resolves it into an immutable [`FieldConfig`]:
//! preset format names become concrete formats, the rounding spec is
//! parsed, and literal bounds are resolved and rounded up front. A config
//! is built once per field declaration and shared read-only across decode
//! calls.

use serde::Deserialize;

use crate::format::{default_formats, parse_format_list, FormatSpec};
use crate::round::RoundSpec;
use crate::validate::BoundSpec;

/// Declarative options recognized on a temporal field.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FieldOptions {
    /// Reject blank input with a `Blank` error.
    pub required: bool,
    /// Treat blank input as absent (the default). When disabled, blank
    /// input marks the field present and reports `Blank` non-fatally.
    pub discard_blank: bool,
    /// Accept blank input as an explicit null.
    pub nullable: bool,
    /// Comma-separated format list; `None` means RFC 3339 plus
    /// expressions.
    pub format: Option<String>,
    /// Minimum bound: a literal date or an expression, `!`-prefixed for
    /// exclusive.
    pub min: Option<String>,
    /// Maximum bound, same grammar as `min`.
    pub max: Option<String>,
    /// Rounding spec, `"<unit>[:<direction>]"`.
    pub round: Option<String>,
}

impl Default for FieldOptions {
    fn default() -> Self {
        FieldOptions {
            required: false,
            discard_blank: true,
            nullable: false,
            format: None,
            min: None,
            max: None,
            round: None,
        }
    }
}

/// The resolved, immutable configuration for one temporal field.
#[derive(Debug, Clone)]
pub struct FieldConfig {
    pub required: bool,
    pub discard_blank: bool,
    pub nullable: bool,
    /// Ordered format list; order defines parse precedence.
    pub formats: Vec<FormatSpec>,
    pub min: Option<BoundSpec>,
    pub max: Option<BoundSpec>,
    pub round: Option<RoundSpec>,
}

impl FieldConfig {
    /// Resolve declarative options into a typed configuration.
    ///
    /// Bounds are built against the field's own formats and rounding, so a
    /// literal bound compares rounding-consistently with parsed values.
    pub fn build(options: &FieldOptions) -> FieldConfig {
        let formats = match options.format.as_deref() {
            Some(raw) => parse_format_list(raw),
            None => default_formats(),
        };
        let round = options.round.as_deref().and_then(RoundSpec::parse);
        let min = options
            .min
            .as_deref()
            .and_then(|raw| BoundSpec::build(raw, &formats, round.as_ref()));
        let max = options
            .max
            .as_deref()
            .and_then(|raw| BoundSpec::build(raw, &formats, round.as_ref()));

        FieldConfig {
            required: options.required,
            discard_blank: options.discard_blank,
            nullable: options.nullable,
            formats,
            min,
            max,
            round,
        }
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig::build(&FieldOptions::default())
    }
}
