//! API error types and HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::header::HeaderName;
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use tasking_core::RequestContext;

use crate::service::{RegistryError, ServiceError};

/// API result type.
pub type ApiResult<T> = Result<T, ApiError>;

/// JSON error response body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    /// Stable machine-readable error code.
    pub code: &'static str,
    /// Human-readable message (safe for clients).
    pub message: String,
    /// Structured detail for constraint violations and validation failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
    /// Request ID for correlation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

/// HTTP API error with a stable machine-readable code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
    detail: Option<Value>,
    request_id: Option<String>,
}

impl ApiError {
    /// Malformed request body.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "NOT_FOUND", message)
    }

    /// Well-formed body that does not fit the expected shape or schema.
    pub fn validation(message: impl Into<String>, errors: Vec<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
            .with_detail(Value::from(errors))
    }

    /// Business-rule rejection from a product backend.
    #[must_use]
    pub fn constraint_violation(detail: Value) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "CONSTRAINT_VIOLATION",
            "Constraint violation",
        )
        .with_detail(detail)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL", message)
    }

    /// The server is draining and takes no new work.
    #[must_use]
    pub fn unavailable() -> Self {
        Self::new(
            StatusCode::SERVICE_UNAVAILABLE,
            "UNAVAILABLE",
            "Server is shutting down",
        )
    }

    /// Attaches a request ID for correlation.
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    #[must_use]
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn detail(&self) -> Option<&Value> {
        self.detail.as_ref()
    }

    /// Maps a JSON body rejection. Syntax errors are 400; everything else the body
    /// extractor can reject (wrong shape, bad datetime interval, zero limit) is 422.
    #[must_use]
    pub fn from_rejection(rejection: &JsonRejection) -> Self {
        match rejection {
            JsonRejection::JsonSyntaxError(_) => Self::bad_request(rejection.body_text()),
            JsonRejection::MissingJsonContentType(_) => Self::new(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                rejection.body_text(),
            ),
            _ => Self::validation("Request body is invalid", vec![rejection.body_text()]),
        }
    }

    fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            detail: None,
            request_id: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let request_id = self.request_id;
        let mut response = (
            self.status,
            Json(ApiErrorBody {
                code: self.code,
                message: self.message,
                detail: self.detail,
                request_id: request_id.clone(),
            }),
        )
            .into_response();

        if let Some(request_id) = request_id {
            if let Ok(value) = HeaderValue::from_str(&request_id) {
                response
                    .headers_mut()
                    .insert(HeaderName::from_static("x-request-id"), value);
            }
        }

        response
    }
}

impl From<ServiceError> for ApiError {
    fn from(value: ServiceError) -> Self {
        match value {
            ServiceError::ConstraintViolation(violation) => {
                Self::constraint_violation(violation.detail)
            }
            ServiceError::NotFound { entity, id } => {
                Self::not_found(format!("{entity} not found: {id}"))
            }
            ServiceError::Validation { errors } => {
                Self::validation("Request failed validation", errors)
            }
            ServiceError::Internal { message } => Self::internal(message),
        }
    }
}

impl From<RegistryError> for ApiError {
    fn from(value: RegistryError) -> Self {
        ServiceError::from(value).into()
    }
}

/// Tags the error side of a result with the request id before it leaves a handler.
pub trait ForRequest<T> {
    /// # Errors
    ///
    /// Returns the converted error carrying `ctx.request_id`.
    fn for_request(self, ctx: &RequestContext) -> ApiResult<T>;
}

impl<T, E: Into<ApiError>> ForRequest<T> for Result<T, E> {
    fn for_request(self, ctx: &RequestContext) -> ApiResult<T> {
        self.map_err(|err| err.into().with_request_id(ctx.request_id.as_str()))
    }
}
