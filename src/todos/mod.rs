//! Todo item resource.
//!
//! # Data Flow
//! ```text
//! ViewRequest (action, lookup, JSON body)
//!     → viewset.rs (TodoItemViewSet handlers)
//!     → model.rs (validation → TodoChanges)
//!     → store.rs (TodoStore)
//!     → ViewResponse (status, representation with absolute url)
//! ```

pub mod model;
pub mod store;
pub mod viewset;

pub use model::{NewTodo, TodoChanges, TodoItem};
pub use store::{InMemoryTodoStore, StoreError, TodoStore};
pub use viewset::TodoItemViewSet;
