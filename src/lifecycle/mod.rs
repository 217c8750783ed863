//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Register routes → Bind listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain connections → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//! ```

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{bind, build_server, Service, StartupError};
