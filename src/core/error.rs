//! Core capability errors (parsing, validation, domain invariants).
//!
//! These are bounded and stable: core errors represent domain/refusal
//! states, not library implementation details.

use thiserror::Error;

/// Invalid identifier.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum InvalidId {
    #[error("request id `{raw}` is invalid: {reason}")]
    Request { raw: String, reason: String },
    #[error("update id `{raw}` is invalid: {reason}")]
    Update { raw: String, reason: String },
    #[error("user id `{raw}` is invalid: {reason}")]
    User { raw: String, reason: String },
    #[error("property id `{raw}` is invalid: {reason}")]
    Property { raw: String, reason: String },
    #[error("unit id `{raw}` is invalid: {reason}")]
    Unit { raw: String, reason: String },
}

/// Field value exceeds a configured limit.
#[derive(Debug, Error, Clone)]
#[error("{field} length {actual} exceeds limit {max}")]
pub struct LimitExceeded {
    pub field: &'static str,
    pub actual: usize,
    pub max: usize,
}

/// Canonical error enum for the core capability.
#[derive(Debug, Error, Clone)]
#[non_exhaustive]
pub enum CoreError {
    #[error(transparent)]
    InvalidId(#[from] InvalidId),
    #[error(transparent)]
    LimitExceeded(#[from] LimitExceeded),
}
