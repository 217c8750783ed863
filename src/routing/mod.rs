//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     register(prefix, view set)
//!     → validate prefix, reject duplicates
//!     → generate list + detail matchers
//!     → Freeze as immutable ResourceRouter (shared via Arc)
//!
//! Incoming Request (method, path)
//!     → router.rs (route lookup)
//!     → matcher.rs (path shape, lookup, format suffix)
//!     → Return: Matched action, Root, MethodNotAllowed or NotFound
//!     → viewset.rs (dispatch to the view set handler)
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path
//! - Deterministic: same input always resolves the same way
//! - Trailing slashes are never normalized or redirected

pub mod matcher;
pub mod router;
pub mod viewset;

pub use router::{
    ResourceRouter, Resolution, RouteEntry, RouteError, RouteKind, RouteMatch, RouterOptions,
    UrlBuilder,
};
pub use viewset::{Action, ViewRequest, ViewResponse, ViewSet};
