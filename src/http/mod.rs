//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, origin, JSON body)
//!     → routing layer resolves the view set action
//!     → response.rs (status codes, error bodies)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::X_REQUEST_ID;
pub use response::{ApiError, ApiResult};
pub use server::{AppState, HttpServer};
