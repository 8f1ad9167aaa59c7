//! # chronofield
//!
//! Temporal field decoding for declarative request-decoding frameworks.
//!
//! One field declaration — required / nullable flags, an ordered format
//! list, optional min/max bounds, an optional rounding spec — is built
//! once into a [`FieldConfig`]; each decode call then turns heterogeneous
//! input (raw text, a pre-typed instant, or a JSON scalar) into a
//! canonical [`TemporalValue`], optionally snapped to a calendar or
//! weekday boundary and checked against the bounds.
//!
//! The pipeline is synchronous and shares no mutable state: configs are
//! read-only after construction and every lookup table is a constant
//! `match`, so concurrent decodes need no synchronization. The only
//! moving part is the wall clock — expressions like `"1_day_ago"` resolve
//! against "now" at each call, and the range validator's 250 ms tolerance
//! window absorbs the skew between independently sampled clocks.
//!
//! ## Modules
//!
//! - [`config`] — declarative options → typed per-field configuration
//! - [`expression`] — relative and keyword time expressions
//! - [`format`] — ordered multi-format textual parsing
//! - [`round`] — calendar-aware boundary rounding
//! - [`validate`] — bound resolution and tolerance-aware range checks
//! - [`decode`] — orchestration, input classification, serialization
//! - [`error`] — the field error taxonomy

pub mod config;
pub mod decode;
pub mod error;
pub mod expression;
pub mod format;
pub mod round;
pub mod validate;

pub use config::{FieldConfig, FieldOptions};
pub use decode::{
    decode_absent, decode_dynamic, decode_json, decode_text, Decoded, DynamicValue, TemporalValue,
};
pub use error::FieldError;
pub use expression::{resolve_expression, resolve_expression_at};
pub use format::FormatSpec;
pub use round::{
    is_at_boundary, round, round_down, round_nearest, round_up, RoundDirection, RoundSpec,
    RoundUnit,
};
pub use validate::{BoundSpec, TOLERANCE_MS};
