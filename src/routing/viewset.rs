//! View set contract.
//!
//! A view set bundles the handlers for one resource's CRUD actions. The
//! router owns the URL shape; the view set only sees the resolved action,
//! the lookup value and the parsed request body.

use async_trait::async_trait;
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Map, Value};

use crate::http::response::{ApiError, ApiResult};
use crate::routing::router::UrlBuilder;

/// Actions generated for a registered view set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    List,
    Create,
    Retrieve,
    Update,
    PartialUpdate,
    Destroy,
    Metadata,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::List => "list",
            Action::Create => "create",
            Action::Retrieve => "retrieve",
            Action::Update => "update",
            Action::PartialUpdate => "partial_update",
            Action::Destroy => "destroy",
            Action::Metadata => "metadata",
        }
    }

    /// Whether the action consumes a request body.
    pub fn reads_body(&self) -> bool {
        matches!(self, Action::Create | Action::Update | Action::PartialUpdate)
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a view set handler gets to see about a request.
#[derive(Debug, Clone)]
pub struct ViewRequest {
    pub action: Action,
    lookup: Option<String>,
    data: Value,
    urls: UrlBuilder,
}

impl ViewRequest {
    pub fn new(action: Action, lookup: Option<String>, data: Option<Value>, urls: UrlBuilder) -> Self {
        Self {
            action,
            lookup,
            data: data.unwrap_or_else(|| Value::Object(Map::new())),
            urls,
        }
    }

    /// The detail lookup value. Absent on list routes.
    pub fn lookup(&self) -> ApiResult<&str> {
        self.lookup.as_deref().ok_or(ApiError::NotFound)
    }

    /// The parsed body. An empty body reads as `{}`.
    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn urls(&self) -> &UrlBuilder {
        &self.urls
    }
}

/// A handler's successful outcome.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
    pub location: Option<String>,
}

impl ViewResponse {
    pub fn ok(body: Value) -> Self {
        Self {
            status: StatusCode::OK,
            body: Some(body),
            location: None,
        }
    }

    pub fn created(body: Value, location: impl Into<String>) -> Self {
        Self {
            status: StatusCode::CREATED,
            body: Some(body),
            location: Some(location.into()),
        }
    }

    pub fn no_content() -> Self {
        Self {
            status: StatusCode::NO_CONTENT,
            body: None,
            location: None,
        }
    }
}

impl IntoResponse for ViewResponse {
    fn into_response(self) -> Response {
        let mut response = match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        };
        if let Some(location) = self.location {
            if let Ok(value) = HeaderValue::from_str(&location) {
                response.headers_mut().insert(header::LOCATION, value);
            }
        }
        response
    }
}

/// Handlers for one resource's CRUD actions.
#[async_trait]
pub trait ViewSet: Send + Sync {
    /// Stem for generated route names (`<basename>-list`, `<basename>-detail`).
    fn basename(&self) -> &str;

    /// Human readable resource name, e.g. "Todo Item".
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    async fn list(&self, req: ViewRequest) -> ApiResult<ViewResponse>;

    async fn create(&self, req: ViewRequest) -> ApiResult<ViewResponse>;

    async fn retrieve(&self, req: ViewRequest) -> ApiResult<ViewResponse>;

    async fn update(&self, req: ViewRequest) -> ApiResult<ViewResponse>;

    async fn partial_update(&self, req: ViewRequest) -> ApiResult<ViewResponse>;

    async fn destroy(&self, req: ViewRequest) -> ApiResult<ViewResponse>;
}

/// Metadata body served for `OPTIONS`.
pub fn metadata(name: &str, description: &str) -> Value {
    json!({
        "name": name,
        "description": description,
        "renders": ["application/json"],
        "parses": ["application/json"],
    })
}

/// Invoke the handler for `req.action`.
pub async fn dispatch(view_set: &dyn ViewSet, req: ViewRequest) -> ApiResult<ViewResponse> {
    match req.action {
        Action::List => view_set.list(req).await,
        Action::Create => view_set.create(req).await,
        Action::Retrieve => view_set.retrieve(req).await,
        Action::Update => view_set.update(req).await,
        Action::PartialUpdate => view_set.partial_update(req).await,
        Action::Destroy => view_set.destroy(req).await,
        Action::Metadata => {
            let suffix = if req.lookup.is_some() { "Instance" } else { "List" };
            let name = format!("{} {}", view_set.name(), suffix);
            Ok(ViewResponse::ok(metadata(&name, view_set.description())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_reading_actions() {
        assert!(Action::Create.reads_body());
        assert!(Action::Update.reads_body());
        assert!(Action::PartialUpdate.reads_body());
        assert!(!Action::List.reads_body());
        assert!(!Action::Destroy.reads_body());
        assert!(!Action::Metadata.reads_body());
    }

    #[test]
    fn test_missing_body_reads_as_empty_object() {
        let urls = UrlBuilder::new("http://localhost", "todos", false);
        let req = ViewRequest::new(Action::Create, None, None, urls);
        assert_eq!(req.data(), &json!({}));
        assert!(matches!(req.lookup(), Err(ApiError::NotFound)));
    }

    #[test]
    fn test_created_sets_location() {
        let response =
            ViewResponse::created(json!({ "id": 1 }), "http://localhost/todos/1").into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        assert_eq!(
            response.headers()[header::LOCATION],
            "http://localhost/todos/1"
        );
    }

    #[test]
    fn test_no_content_has_no_body_type() {
        let response = ViewResponse::no_content().into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(response.headers().get(header::CONTENT_TYPE).is_none());
    }
}
