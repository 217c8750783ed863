//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::routing::RouterOptions;

/// Root configuration for the todo service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Resource router options.
    pub router: RouterConfig,

    /// Public API settings (absolute URL generation).
    pub api: ApiConfig,

    /// Request limits and timeouts.
    pub limits: LimitsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8000".to_string(),
        }
    }
}

/// Resource router configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Whether generated routes end with a `/`.
    pub trailing_slash: bool,

    /// Serve the API root listing at `/`.
    pub include_root_view: bool,

    /// Accept `.json` style format suffixes on generated routes.
    pub include_format_suffixes: bool,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            trailing_slash: false,
            include_root_view: true,
            include_format_suffixes: true,
        }
    }
}

impl From<&RouterConfig> for RouterOptions {
    fn from(config: &RouterConfig) -> Self {
        RouterOptions {
            trailing_slash: config.trailing_slash,
            include_root_view: config.include_root_view,
            include_format_suffixes: config.include_format_suffixes,
        }
    }
}

/// Public API configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Scheme and host used for absolute URLs (e.g., "https://todo.example.com").
    /// When unset, the request's Host header is used.
    pub public_url: Option<String>,
}

/// Request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_timeout_secs: u64,

    /// Maximum accepted request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            max_body_bytes: 64 * 1024,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
