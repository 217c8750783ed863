//! Todo backend library.
//!
//! A REST resource (`todos`) served through a resource router that generates
//! list and detail routes for a registered view set.

// Core subsystems
pub mod config;
pub mod http;
pub mod routing;
pub mod todos;
pub mod urls;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::ResourceRouter;
