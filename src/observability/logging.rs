//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level from config, overridable via `RUST_LOG`
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::{LogFormat, ObservabilityConfig};

/// Default filter directives for `level`.
pub fn default_directives(level: &str) -> String {
    format!("todo_backend={level},tower_http={level}")
}

/// Install the global subscriber.
pub fn init_logging(
    config: &ObservabilityConfig,
) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(&config.log_level.to_ascii_lowercase()).into());

    let json = config.log_format == LogFormat::Json;

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .try_init()
}
