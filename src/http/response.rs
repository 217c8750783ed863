//! Response handling and error mapping.
//!
//! # Responsibilities
//! - Define the API error taxonomy
//! - Map errors to status codes and JSON bodies
//! - Attach `Allow` headers to method errors
//!
//! # Design Decisions
//! - Error bodies are `{"detail": "..."}`; validation errors are keyed by field
//! - Internal causes are logged, never sent to the client

use std::collections::BTreeMap;

use axum::http::{header, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::todos::store::StoreError;

/// Field name → list of messages, rendered as the body of a 400 response.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Errors a request can end in.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found.")]
    NotFound,

    #[error("Method \"{method}\" not allowed.")]
    MethodNotAllowed { method: Method, allowed: Vec<Method> },

    #[error("JSON parse error - {0}")]
    ParseError(String),

    #[error("Invalid input.")]
    Validation(FieldErrors),

    #[error("Unsupported media type \"{0}\" in request.")]
    UnsupportedMediaType(String),

    #[error("Request body too large.")]
    PayloadTooLarge,

    #[error("A server error occurred.")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// A validation error on a single field.
    pub fn field(name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(name.into(), vec![message.into()]);
        ApiError::Validation(errors)
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::ParseError(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Render an `Allow` header value, e.g. `GET, POST, HEAD, OPTIONS`.
pub fn allow_header(methods: &[Method]) -> HeaderValue {
    let joined = methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ");
    HeaderValue::from_str(&joined).unwrap_or_else(|_| HeaderValue::from_static(""))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            ApiError::Validation(errors) => json!(errors),
            ApiError::Internal(cause) => {
                tracing::error!(error = %cause, "Internal error");
                json!({ "detail": self.to_string() })
            }
            _ => json!({ "detail": self.to_string() }),
        };

        let mut response = (status, Json(body)).into_response();
        if let ApiError::MethodNotAllowed { allowed, .. } = &self {
            response
                .headers_mut()
                .insert(header::ALLOW, allow_header(allowed));
        }
        response
    }
}
