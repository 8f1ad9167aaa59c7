//! Min/max bound resolution and tolerance-aware range validation.
//!
//! A bound declared as a literal date is resolved (and rounded, when the
//! field rounds) once at configuration time; a bound declared as an
//! expression is re-resolved against "now" at every validation call and
//! then rounded the same way. The asymmetry is deliberate: expressions are
//! inherently time-dependent, literals are not.
//!
//! Comparisons carry a ±250 ms tolerance window. The field value and an
//! expression bound each sample "now" independently, microseconds apart;
//! the window absorbs that skew so validation stays deterministic.

use chrono::{DateTime, FixedOffset, TimeDelta};

use crate::config::FieldConfig;
use crate::error::{FieldError, Result};
use crate::expression::{now_local, resolve_expression};
use crate::format::{parse_with, FormatSpec};
use crate::round::{round, RoundSpec};

/// Evaluation-skew allowance for instant comparisons, in milliseconds.
pub const TOLERANCE_MS: i64 = 250;

fn tolerance() -> TimeDelta {
    TimeDelta::milliseconds(TOLERANCE_MS)
}

/// A configured minimum or maximum bound.
#[derive(Debug, Clone)]
pub struct BoundSpec {
    pub(crate) exclusive: bool,
    pub(crate) value: BoundValue,
}

#[derive(Debug, Clone)]
pub(crate) enum BoundValue {
    /// Resolved and rounded once, at configuration time.
    Fixed(DateTime<FixedOffset>),
    /// Re-evaluated against "now" at each validation call.
    Expression(String),
}

impl BoundSpec {
    /// Build a bound from its declarative text.
    ///
    /// A leading `!` marks the bound exclusive. Text that resolves as an
    /// expression (when the field's formats include the expression
    /// pseudo-format) stays deferred; otherwise the text is parsed through
    /// the field's formats and cached. Text that matches neither silently
    /// yields no bound — a misdeclared bound never blocks decoding.
    pub(crate) fn build(
        raw: &str,
        formats: &[FormatSpec],
        round_spec: Option<&RoundSpec>,
    ) -> Option<BoundSpec> {
        let (value, exclusive) = match raw.strip_prefix('!') {
            Some(rest) => (rest, true),
            None => (raw, false),
        };

        if formats.contains(&FormatSpec::Expression) && resolve_expression(value).is_some() {
            return Some(BoundSpec {
                exclusive,
                value: BoundValue::Expression(value.to_string()),
            });
        }

        let parsed = parse_with(formats, value).ok()?;
        let fixed = match round_spec {
            Some(spec) => round(parsed, spec),
            None => parsed,
        };
        Some(BoundSpec {
            exclusive,
            value: BoundValue::Fixed(fixed),
        })
    }

    /// The comparison instant for this validation call.
    fn resolve(&self, round_spec: Option<&RoundSpec>) -> DateTime<FixedOffset> {
        match &self.value {
            BoundValue::Fixed(instant) => *instant,
            BoundValue::Expression(expr) => {
                let instant = resolve_expression(expr).unwrap_or_else(now_local);
                match round_spec {
                    Some(spec) => round(instant, spec),
                    None => instant,
                }
            }
        }
    }
}

/// Check a rounded candidate against the field's bounds.
///
/// Minimum is checked before maximum; the first violation is reported.
pub(crate) fn check_range(candidate: DateTime<FixedOffset>, config: &FieldConfig) -> Result<()> {
    if let Some(min) = &config.min {
        let bound = min.resolve(config.round.as_ref());
        if min.exclusive {
            // Must be strictly after the bound, beyond the tolerance window
            if candidate <= bound + tolerance() {
                return Err(FieldError::BelowMinimum);
            }
        } else if candidate < bound - tolerance() {
            return Err(FieldError::BelowMinimum);
        }
    }
    if let Some(max) = &config.max {
        let bound = max.resolve(config.round.as_ref());
        if max.exclusive {
            // Must be strictly before the bound, beyond the tolerance window
            if candidate >= bound - tolerance() {
                return Err(FieldError::AboveMaximum);
            }
        } else if candidate > bound + tolerance() {
            return Err(FieldError::AboveMaximum);
        }
    }
    Ok(())
}
