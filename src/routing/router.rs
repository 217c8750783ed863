//! Route registration, lookup and reversal.
//!
//! # Responsibilities
//! - Register view sets under a URL prefix
//! - Generate list and detail routes for each registration
//! - Resolve `(method, path)` to a view set action
//! - Reverse route names into paths
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - O(n) scan over registrations (acceptable for typical route counts)
//! - Explicit NotFound / MethodNotAllowed rather than silent default

use std::sync::Arc;

use axum::http::Method;
use serde_json::{Map, Value};

use crate::routing::matcher::{DetailMatcher, ListMatcher, Matcher, PathShape, RootMatcher};
use crate::routing::viewset::{Action, ViewSet};

/// Route name used for the API root.
pub const API_ROOT_NAME: &str = "api-root";

/// Options controlling the shape of generated routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouterOptions {
    pub trailing_slash: bool,
    pub include_root_view: bool,
    pub include_format_suffixes: bool,
}

impl Default for RouterOptions {
    fn default() -> Self {
        Self {
            trailing_slash: false,
            include_root_view: true,
            include_format_suffixes: true,
        }
    }
}

/// Errors raised while building the route table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    #[error("invalid route prefix '{0}'")]
    InvalidPrefix(String),

    #[error("prefix '{0}' is already registered")]
    DuplicatePrefix(String),

    #[error("basename '{0}' is already registered")]
    DuplicateBasename(String),
}

/// Which generated route a path matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    List,
    Detail,
    Root,
}

impl RouteKind {
    /// Methods the generated route answers, in `Allow` header order.
    pub fn allowed_methods(&self) -> Vec<Method> {
        match self {
            RouteKind::List => vec![Method::GET, Method::POST, Method::HEAD, Method::OPTIONS],
            RouteKind::Detail => vec![
                Method::GET,
                Method::PUT,
                Method::PATCH,
                Method::DELETE,
                Method::HEAD,
                Method::OPTIONS,
            ],
            RouteKind::Root => vec![Method::GET, Method::HEAD, Method::OPTIONS],
        }
    }

    /// Action bound to `method` on this route.
    pub fn action_for(&self, method: &Method) -> Option<Action> {
        match (self, method.as_str()) {
            (_, "OPTIONS") => Some(Action::Metadata),
            (RouteKind::List, "GET" | "HEAD") => Some(Action::List),
            (RouteKind::List, "POST") => Some(Action::Create),
            (RouteKind::Detail, "GET" | "HEAD") => Some(Action::Retrieve),
            (RouteKind::Detail, "PUT") => Some(Action::Update),
            (RouteKind::Detail, "PATCH") => Some(Action::PartialUpdate),
            (RouteKind::Detail, "DELETE") => Some(Action::Destroy),
            (RouteKind::Root, "GET" | "HEAD") => Some(Action::List),
            _ => None,
        }
    }
}

/// A generated route, as listed by [`ResourceRouter::routes`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
    pub name: String,
    pub pattern: String,
    pub kind: RouteKind,
    pub methods: Vec<Method>,
}

/// A path that resolved to a view set action.
#[derive(Clone)]
pub struct RouteMatch {
    pub view_set: Arc<dyn ViewSet>,
    pub prefix: String,
    pub route_name: String,
    pub kind: RouteKind,
    pub action: Action,
    pub lookup: Option<String>,
    pub format: Option<String>,
}

impl std::fmt::Debug for RouteMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteMatch")
            .field("prefix", &self.prefix)
            .field("route_name", &self.route_name)
            .field("kind", &self.kind)
            .field("action", &self.action)
            .field("lookup", &self.lookup)
            .field("format", &self.format)
            .finish()
    }
}

/// Outcome of resolving a request.
#[derive(Debug, Clone)]
pub enum Resolution {
    Matched(RouteMatch),
    Root {
        action: Action,
        format: Option<String>,
    },
    MethodNotAllowed {
        route_name: String,
        allowed: Vec<Method>,
    },
    NotFound,
}

/// Builds absolute URLs for one registered prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlBuilder {
    origin: String,
    prefix: String,
    trailing_slash: bool,
}

impl UrlBuilder {
    pub fn new(origin: impl Into<String>, prefix: impl Into<String>, trailing_slash: bool) -> Self {
        Self {
            origin: origin.into().trim_end_matches('/').to_string(),
            prefix: prefix.into(),
            trailing_slash,
        }
    }

    pub fn list(&self) -> String {
        format!("{}{}", self.origin, list_path(&self.prefix, self.trailing_slash))
    }

    pub fn detail(&self, lookup: impl std::fmt::Display) -> String {
        format!(
            "{}{}",
            self.origin,
            detail_path(&self.prefix, &lookup.to_string(), self.trailing_slash)
        )
    }
}

fn slash(trailing_slash: bool) -> &'static str {
    if trailing_slash {
        "/"
    } else {
        ""
    }
}

fn list_path(prefix: &str, trailing_slash: bool) -> String {
    format!("/{prefix}{}", slash(trailing_slash))
}

fn detail_path(prefix: &str, lookup: &str, trailing_slash: bool) -> String {
    format!("/{prefix}/{lookup}{}", slash(trailing_slash))
}

fn is_valid_prefix(prefix: &str) -> bool {
    !prefix.is_empty()
        && prefix
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

struct Registration {
    prefix: String,
    basename: String,
    view_set: Arc<dyn ViewSet>,
    list: ListMatcher,
    detail: DetailMatcher,
}

impl Registration {
    fn list_name(&self) -> String {
        format!("{}-list", self.basename)
    }

    fn detail_name(&self) -> String {
        format!("{}-detail", self.basename)
    }
}

/// Route table mapping URL prefixes to view sets.
pub struct ResourceRouter {
    options: RouterOptions,
    root: Option<RootMatcher>,
    registrations: Vec<Registration>,
}

impl ResourceRouter {
    pub fn new(options: RouterOptions) -> Self {
        let root = options
            .include_root_view
            .then(|| RootMatcher::new(options.include_format_suffixes));
        Self {
            options,
            root,
            registrations: Vec::new(),
        }
    }

    /// Register `view_set` under `prefix`, generating its list and detail routes.
    pub fn register<V: ViewSet + 'static>(
        &mut self,
        prefix: &str,
        view_set: Arc<V>,
    ) -> Result<(), RouteError> {
        if !is_valid_prefix(prefix) {
            return Err(RouteError::InvalidPrefix(prefix.to_string()));
        }
        if self.registrations.iter().any(|r| r.prefix == prefix) {
            return Err(RouteError::DuplicatePrefix(prefix.to_string()));
        }
        let basename = view_set.basename().to_string();
        if self.registrations.iter().any(|r| r.basename == basename) {
            return Err(RouteError::DuplicateBasename(basename));
        }

        let shape = PathShape {
            trailing_slash: self.options.trailing_slash,
            format_suffixes: self.options.include_format_suffixes,
        };

        tracing::debug!(prefix, basename = %basename, "Registering view set");

        self.registrations.push(Registration {
            prefix: prefix.to_string(),
            basename,
            view_set,
            list: ListMatcher::new(prefix, shape),
            detail: DetailMatcher::new(prefix, shape),
        });
        Ok(())
    }

    /// Generated routes in registration order.
    pub fn routes(&self) -> Vec<RouteEntry> {
        let slash = self.options.trailing_slash;
        let mut entries = Vec::with_capacity(self.registrations.len() * 2 + 1);

        if self.root.is_some() {
            entries.push(RouteEntry {
                name: API_ROOT_NAME.to_string(),
                pattern: "/".to_string(),
                kind: RouteKind::Root,
                methods: RouteKind::Root.allowed_methods(),
            });
        }

        for reg in &self.registrations {
            entries.push(RouteEntry {
                name: reg.list_name(),
                pattern: list_path(&reg.prefix, slash),
                kind: RouteKind::List,
                methods: RouteKind::List.allowed_methods(),
            });
            entries.push(RouteEntry {
                name: reg.detail_name(),
                pattern: detail_path(&reg.prefix, "{id}", slash),
                kind: RouteKind::Detail,
                methods: RouteKind::Detail.allowed_methods(),
            });
        }
        entries
    }

    /// Resolve a request method and path.
    pub fn resolve(&self, method: &Method, path: &str) -> Resolution {
        if let Some(m) = self.root.as_ref().and_then(|root| root.match_path(path)) {
            return match RouteKind::Root.action_for(method) {
                Some(action) => Resolution::Root {
                    action,
                    format: m.format.map(str::to_string),
                },
                None => Resolution::MethodNotAllowed {
                    route_name: API_ROOT_NAME.to_string(),
                    allowed: RouteKind::Root.allowed_methods(),
                },
            };
        }

        for reg in &self.registrations {
            let (kind, m) = if let Some(m) = reg.list.match_path(path) {
                (RouteKind::List, m)
            } else if let Some(m) = reg.detail.match_path(path) {
                (RouteKind::Detail, m)
            } else {
                continue;
            };

            let route_name = match kind {
                RouteKind::Detail => reg.detail_name(),
                _ => reg.list_name(),
            };

            return match kind.action_for(method) {
                Some(action) => Resolution::Matched(RouteMatch {
                    view_set: reg.view_set.clone(),
                    prefix: reg.prefix.clone(),
                    route_name,
                    kind,
                    action,
                    lookup: m.lookup.map(str::to_string),
                    format: m.format.map(str::to_string),
                }),
                None => Resolution::MethodNotAllowed {
                    route_name,
                    allowed: kind.allowed_methods(),
                },
            };
        }

        Resolution::NotFound
    }

    /// Path for a route name. Detail routes need a lookup.
    pub fn reverse(&self, name: &str, lookup: Option<&str>) -> Option<String> {
        let slash = self.options.trailing_slash;
        if name == API_ROOT_NAME {
            return self.root.as_ref().map(|_| "/".to_string());
        }
        self.registrations.iter().find_map(|reg| {
            if name == reg.list_name() {
                Some(list_path(&reg.prefix, slash))
            } else if name == reg.detail_name() {
                lookup.map(|id| detail_path(&reg.prefix, id, slash))
            } else {
                None
            }
        })
    }

    /// URL builder for a registered prefix.
    pub fn url_builder(&self, prefix: &str, origin: &str) -> UrlBuilder {
        UrlBuilder::new(origin, prefix, self.options.trailing_slash)
    }

    /// API root body: `{ prefix: absolute list URL }`.
    pub fn root_listing(&self, origin: &str) -> Value {
        let listing: Map<String, Value> = self
            .registrations
            .iter()
            .map(|reg| {
                let url = self.url_builder(&reg.prefix, origin).list();
                (reg.prefix.clone(), Value::String(url))
            })
            .collect();
        Value::Object(listing)
    }
}

impl std::fmt::Debug for ResourceRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceRouter")
            .field("options", &self.options)
            .field("routes", &self.routes())
            .finish()
    }
}
