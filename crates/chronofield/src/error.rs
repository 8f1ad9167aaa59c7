//! Error codes for temporal field decoding.

use thiserror::Error;

/// The closed error taxonomy for a field decode.
///
/// Every decode returns at most one of these to the caller; aggregating
/// errors across the fields of a request is the host framework's job.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// Empty input rejected under the current null/required/discard policy.
    #[error("blank value")]
    Blank,

    /// No configured format (including expression resolution) matched.
    #[error("invalid time format")]
    InvalidFormat,

    /// Candidate instant fell below the configured minimum bound.
    #[error("before minimum date")]
    BelowMinimum,

    /// Candidate instant fell above the configured maximum bound.
    #[error("after maximum date")]
    AboveMaximum,
}

pub type Result<T> = std::result::Result<T, FieldError>;
