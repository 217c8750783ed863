//! URL configuration for the todo API.

use std::sync::Arc;

use crate::routing::{ResourceRouter, RouteError, RouterOptions};
use crate::todos::{TodoItemViewSet, TodoStore};

/// Route table: `todos` → [`TodoItemViewSet`].
pub fn api_router(
    options: RouterOptions,
    store: Arc<dyn TodoStore>,
) -> Result<ResourceRouter, RouteError> {
    let mut router = ResourceRouter::new(options);
    router.register("todos", Arc::new(TodoItemViewSet::new(store)))?;
    Ok(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{Action, Resolution};
    use crate::todos::InMemoryTodoStore;
    use axum::http::Method;

    fn router() -> ResourceRouter {
        api_router(RouterOptions::default(), Arc::new(InMemoryTodoStore::new())).unwrap()
    }

    #[test]
    fn test_every_route_resolves_to_todo_view_set() {
        let router = router();

        let cases = [
            (Method::GET, "/todos", Action::List, None),
            (Method::POST, "/todos", Action::Create, None),
            (Method::GET, "/todos/1", Action::Retrieve, Some("1")),
            (Method::PUT, "/todos/1", Action::Update, Some("1")),
            (Method::PATCH, "/todos/1", Action::PartialUpdate, Some("1")),
            (Method::DELETE, "/todos/1", Action::Destroy, Some("1")),
        ];

        for (method, path, action, lookup) in cases {
            let Resolution::Matched(m) = router.resolve(&method, path) else {
                panic!("{method} {path} did not match");
            };
            assert_eq!(m.view_set.basename(), "todoitem", "{method} {path}");
            assert_eq!(m.prefix, "todos");
            assert_eq!(m.action, action, "{method} {path}");
            assert_eq!(m.lookup.as_deref(), lookup);
        }
    }

    #[test]
    fn test_route_table() {
        let routes: Vec<_> = router()
            .routes()
            .into_iter()
            .map(|r| (r.name, r.pattern))
            .collect();

        assert_eq!(
            routes,
            vec![
                ("api-root".to_string(), "/".to_string()),
                ("todoitem-list".to_string(), "/todos".to_string()),
                ("todoitem-detail".to_string(), "/todos/{id}".to_string()),
            ]
        );
    }
}
