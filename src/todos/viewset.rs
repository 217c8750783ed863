//! `TodoItemViewSet`: CRUD handlers for todo items.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::http::response::{ApiError, ApiResult};
use crate::routing::viewset::{ViewRequest, ViewResponse, ViewSet};
use crate::todos::model::{TodoChanges, TodoItem};
use crate::todos::store::TodoStore;

pub struct TodoItemViewSet {
    store: Arc<dyn TodoStore>,
}

impl TodoItemViewSet {
    pub fn new(store: Arc<dyn TodoStore>) -> Self {
        Self { store }
    }

    /// Lookups that are not a valid id can never name an item.
    fn object_id(req: &ViewRequest) -> ApiResult<u64> {
        req.lookup()?.parse().map_err(|_| ApiError::NotFound)
    }

    fn represent(req: &ViewRequest, item: &TodoItem) -> Value {
        item.to_representation(req.urls().detail(item.id))
    }

    async fn save(&self, req: ViewRequest, changes: TodoChanges) -> ApiResult<ViewResponse> {
        let id = Self::object_id(&req)?;
        let item = self.store.apply(id, &changes)?.ok_or(ApiError::NotFound)?;
        tracing::info!(todo_id = item.id, action = %req.action, "Todo item updated");
        Ok(ViewResponse::ok(Self::represent(&req, &item)))
    }
}

#[async_trait]
impl ViewSet for TodoItemViewSet {
    fn basename(&self) -> &str {
        "todoitem"
    }

    fn name(&self) -> &str {
        "Todo Item"
    }

    async fn list(&self, req: ViewRequest) -> ApiResult<ViewResponse> {
        let items = self.store.list()?;
        let body = items
            .iter()
            .map(|item| Self::represent(&req, item))
            .collect();
        Ok(ViewResponse::ok(Value::Array(body)))
    }

    async fn create(&self, req: ViewRequest) -> ApiResult<ViewResponse> {
        let changes = TodoChanges::full(req.data())?;
        let item = self.store.create(changes.into_new())?;
        tracing::info!(todo_id = item.id, "Todo item created");

        let url = req.urls().detail(item.id);
        Ok(ViewResponse::created(item.to_representation(url.clone()), url))
    }

    async fn retrieve(&self, req: ViewRequest) -> ApiResult<ViewResponse> {
        let id = Self::object_id(&req)?;
        let item = self.store.get(id)?.ok_or(ApiError::NotFound)?;
        Ok(ViewResponse::ok(Self::represent(&req, &item)))
    }

    async fn update(&self, req: ViewRequest) -> ApiResult<ViewResponse> {
        // Unknown ids answer 404 before the body is validated.
        let id = Self::object_id(&req)?;
        if self.store.get(id)?.is_none() {
            return Err(ApiError::NotFound);
        }
        let changes = TodoChanges::full(req.data())?;
        self.save(req, changes).await
    }

    async fn partial_update(&self, req: ViewRequest) -> ApiResult<ViewResponse> {
        let id = Self::object_id(&req)?;
        if self.store.get(id)?.is_none() {
            return Err(ApiError::NotFound);
        }
        let changes = TodoChanges::partial(req.data())?;
        self.save(req, changes).await
    }

    async fn destroy(&self, req: ViewRequest) -> ApiResult<ViewResponse> {
        let id = Self::object_id(&req)?;
        if !self.store.remove(id)? {
            return Err(ApiError::NotFound);
        }
        tracing::info!(todo_id = id, "Todo item deleted");
        Ok(ViewResponse::no_content())
    }
}
