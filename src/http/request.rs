//! Request handling.
//!
//! # Responsibilities
//! - Expose the request ID assigned by the request-id layer
//! - Percent-decode the path used for routing
//! - Derive the origin used for absolute URLs
//! - Read and parse JSON request bodies within the size limit
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Only `application/json` bodies are parsed
//! - An empty body is "no data", not a parse error

use std::borrow::Cow;

use axum::body::Body;
use axum::http::{header, HeaderMap, Uri};
use percent_encoding::percent_decode_str;
use serde_json::Value;

use crate::http::response::{ApiError, ApiResult};

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID set by the request-id layer, or `unknown`.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// The request path with percent-escapes decoded, or `None` if it is not UTF-8.
pub fn decoded_path(uri: &Uri) -> Option<Cow<'_, str>> {
    percent_decode_str(uri.path()).decode_utf8().ok()
}

/// Scheme and host for absolute URLs.
///
/// The configured public URL wins; otherwise the Host header is used.
pub fn request_origin(headers: &HeaderMap, public_url: Option<&str>) -> String {
    if let Some(url) = public_url {
        return url.trim_end_matches('/').to_string();
    }
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .filter(|h| !h.is_empty())
        .unwrap_or("localhost");
    format!("http://{host}")
}

fn is_json(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
}

/// Read the body and parse it as JSON.
///
/// Returns `None` for an empty body.
pub async fn read_json_body(headers: &HeaderMap, body: Body, limit: usize) -> ApiResult<Option<Value>> {
    let bytes = axum::body::to_bytes(body, limit)
        .await
        .map_err(|_| ApiError::PayloadTooLarge)?;

    if bytes.is_empty() {
        return Ok(None);
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    if !is_json(content_type) {
        return Err(ApiError::UnsupportedMediaType(content_type.to_string()));
    }

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| ApiError::ParseError(e.to_string()))
}
