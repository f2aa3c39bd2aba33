//! Error taxonomy at the orchestration boundary.
//!
//! [`settle`] is the single place where a backend [`Outcome`] is interpreted. Constraint
//! violations pass through with their detail; failures are logged in full here and leave
//! as [`ServiceError::Internal`], which only carries a fixed public message.

use tasking_core::{ConstraintViolation, Outcome};
use tracing::{debug, error};

use super::registry::RegistryError;

/// Errors surfaced to the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Business-rule rejection; the detail is client-facing.
    #[error(transparent)]
    ConstraintViolation(#[from] ConstraintViolation),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    /// Payload failed schema validation before reaching a backend.
    #[error("validation failed: {}", errors.join("; "))]
    Validation { errors: Vec<String> },
    /// Anything unexpected. The cause has already been logged.
    #[error("{message}")]
    Internal { message: &'static str },
}

impl ServiceError {
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    #[must_use]
    pub fn validation(errors: Vec<String>) -> Self {
        Self::Validation { errors }
    }
}

impl From<RegistryError> for ServiceError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound { id } => Self::not_found("product", id),
            RegistryError::DuplicateProduct { id } => {
                error!(product_id = %id, "registry mutation reached request handling");
                Self::Internal {
                    message: "Internal server error",
                }
            }
        }
    }
}

/// Resolves a backend outcome.
///
/// `action` names what was attempted (for the log line); `public_message` is the only
/// text a client sees if the backend failed.
///
/// # Errors
///
/// `ServiceError::ConstraintViolation` with the backend's detail unchanged, or
/// `ServiceError::Internal` carrying `public_message`.
pub fn settle<T>(
    outcome: Outcome<T>,
    action: &'static str,
    public_message: &'static str,
) -> Result<T, ServiceError> {
    match outcome {
        Outcome::Success(value) => Ok(value),
        Outcome::ConstraintViolation(violation) => {
            debug!(detail = %violation.detail, "{action} rejected by constraint");
            Err(ServiceError::ConstraintViolation(violation))
        }
        Outcome::Failure(err) => {
            error!(error = ?err, "An error occurred while {action}");
            Err(ServiceError::Internal {
                message: public_message,
            })
        }
    }
}

/// Reports an internal error raised inside the orchestration layer itself.
pub(crate) fn internal(
    err: &dyn std::error::Error,
    action: &'static str,
    public_message: &'static str,
) -> ServiceError {
    error!(error = %err, "An error occurred while {action}");
    ServiceError::Internal {
        message: public_message,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn success_passes_value() {
        let value = settle(Outcome::Success(7), "testing", "Error testing").unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn violation_keeps_detail() {
        let err = settle::<()>(
            Outcome::violation(json!({"rule": "max_cloud_cover"})),
            "testing",
            "Error testing",
        )
        .unwrap_err();
        match err {
            ServiceError::ConstraintViolation(v) => {
                assert_eq!(v.detail, json!({"rule": "max_cloud_cover"}));
            }
            other => panic!("expected violation, got {other:?}"),
        }
    }

    #[test]
    fn failure_becomes_generic_internal() {
        let err = settle::<()>(
            Outcome::failure(anyhow::anyhow!("connection refused: db-primary:5432")),
            "testing",
            "Error testing",
        )
        .unwrap_err();
        assert!(matches!(err, ServiceError::Internal { message: "Error testing" }));
        assert!(!err.to_string().contains("db-primary"));
    }

    #[test]
    fn registry_not_found_maps_to_not_found() {
        let err: ServiceError = RegistryError::NotFound { id: "x".into() }.into();
        assert!(matches!(err, ServiceError::NotFound { entity: "product", ref id } if id == "x"));
    }
}
