//! Tri-state outcome returned by every backend collaborator call.
//!
//! Backends report one of three results:
//!
//! - [`Outcome::Success`]: the call produced a value.
//! - [`Outcome::ConstraintViolation`]: a user-actionable rejection (invalid filter, unmet
//!   product constraint). Its detail is safe to surface to clients verbatim.
//! - [`Outcome::Failure`]: anything else. Logged server-side; clients only ever see a
//!   generic internal error.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of a backend call. Callers must handle all three branches.
#[derive(Debug)]
#[must_use]
pub enum Outcome<T> {
    /// The backend call succeeded.
    Success(T),
    /// The request broke a business rule; the detail is client-facing.
    ConstraintViolation(ConstraintViolation),
    /// Unexpected backend or infrastructure error.
    Failure(anyhow::Error),
}

impl<T> Outcome<T> {
    /// Shorthand for `Outcome::ConstraintViolation` with the given detail.
    pub fn violation(detail: impl Into<Value>) -> Self {
        Self::ConstraintViolation(ConstraintViolation::new(detail))
    }

    /// Shorthand for `Outcome::Failure`.
    pub fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    /// Maps the success value, leaving the other branches untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Self::Success(value) => Outcome::Success(f(value)),
            Self::ConstraintViolation(violation) => Outcome::ConstraintViolation(violation),
            Self::Failure(error) => Outcome::Failure(error),
        }
    }

    /// Returns `true` for the `Success` branch.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Any `anyhow::Result` converts into an outcome: `Ok` is success and `Err` is a failure.
///
/// Backends that want to reject with a constraint violation must do so explicitly.
impl<T> From<anyhow::Result<T>> for Outcome<T> {
    fn from(result: anyhow::Result<T>) -> Self {
        match result {
            Ok(value) => Self::Success(value),
            Err(error) => Self::Failure(error),
        }
    }
}

/// A structured business-rule rejection.
///
/// `detail` is arbitrary JSON chosen by the backend (a message string, or an object naming
/// the violated rule). It is passed to the client unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintViolation {
    pub detail: Value,
}

impl ConstraintViolation {
    #[must_use]
    pub fn new(detail: impl Into<Value>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.detail {
            Value::String(message) => write!(f, "constraint violation: {message}"),
            other => write!(f, "constraint violation: {other}"),
        }
    }
}

impl std::error::Error for ConstraintViolation {}
