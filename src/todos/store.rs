//! Todo item storage.
//!
//! # Design Decisions
//! - Ids are assigned by the store, start at 1 and are never reused
//! - Listing order is ascending id
//! - A poisoned lock surfaces as an error instead of a panic

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use crate::todos::model::{NewTodo, TodoChanges, TodoItem};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("todo store lock poisoned")]
    Poisoned,
}

/// Storage backend for todo items.
pub trait TodoStore: Send + Sync {
    fn list(&self) -> Result<Vec<TodoItem>, StoreError>;

    fn get(&self, id: u64) -> Result<Option<TodoItem>, StoreError>;

    fn create(&self, new: NewTodo) -> Result<TodoItem, StoreError>;

    /// Apply `changes` to an existing item. `None` if the id is unknown.
    fn apply(&self, id: u64, changes: &TodoChanges) -> Result<Option<TodoItem>, StoreError>;

    /// Remove an item. `false` if the id is unknown.
    fn remove(&self, id: u64) -> Result<bool, StoreError>;
}

/// Process-local store.
#[derive(Debug)]
pub struct InMemoryTodoStore {
    items: RwLock<BTreeMap<u64, TodoItem>>,
    next_id: AtomicU64,
}

impl InMemoryTodoStore {
    pub fn new() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

impl Default for InMemoryTodoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoStore for InMemoryTodoStore {
    fn list(&self) -> Result<Vec<TodoItem>, StoreError> {
        let items = self.items.read().map_err(|_| StoreError::Poisoned)?;
        Ok(items.values().cloned().collect())
    }

    fn get(&self, id: u64) -> Result<Option<TodoItem>, StoreError> {
        let items = self.items.read().map_err(|_| StoreError::Poisoned)?;
        Ok(items.get(&id).cloned())
    }

    fn create(&self, new: NewTodo) -> Result<TodoItem, StoreError> {
        let mut items = self.items.write().map_err(|_| StoreError::Poisoned)?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let item = TodoItem {
            id,
            title: new.title,
            completed: new.completed,
            order: new.order,
        };
        items.insert(id, item.clone());
        Ok(item)
    }

    fn apply(&self, id: u64, changes: &TodoChanges) -> Result<Option<TodoItem>, StoreError> {
        let mut items = self.items.write().map_err(|_| StoreError::Poisoned)?;
        Ok(items.get_mut(&id).map(|item| {
            item.apply(changes);
            item.clone()
        }))
    }

    fn remove(&self, id: u64) -> Result<bool, StoreError> {
        let mut items = self.items.write().map_err(|_| StoreError::Poisoned)?;
        Ok(items.remove(&id).is_some())
    }
}
