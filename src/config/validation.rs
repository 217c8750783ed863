//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, addresses parse)
//! - Validate the public URL shape
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::AppConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with a loaded configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Check every semantic constraint on `config`.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if let Some(url) = &config.api.public_url {
        let has_scheme = url.starts_with("http://") || url.starts_with("https://");
        let host = url
            .split("://")
            .nth(1)
            .unwrap_or_default()
            .trim_end_matches('/');
        if !has_scheme || host.is_empty() {
            errors.push(ValidationError::new(
                "api.public_url",
                format!("'{url}' must be an http(s) origin"),
            ));
        } else if host.contains('/') {
            errors.push(ValidationError::new(
                "api.public_url",
                "must not contain a path",
            ));
        }
    }

    if config.limits.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "limits.request_timeout_secs",
            "must be greater than zero",
        ));
    }

    if config.limits.max_body_bytes == 0 {
        errors.push(ValidationError::new(
            "limits.max_body_bytes",
            "must be greater than zero",
        ));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if config.observability.metrics_enabled
        && config
            .observability
            .metrics_address
            .parse::<SocketAddr>()
            .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.limits.request_timeout_secs = 0;
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "limits.request_timeout_secs",
                "observability.log_level"
            ]
        );
    }

    #[test]
    fn test_public_url_shape() {
        let mut config = AppConfig::default();

        config.api.public_url = Some("https://todo.example.com".into());
        assert!(validate_config(&config).is_ok());

        config.api.public_url = Some("https://todo.example.com/".into());
        assert!(validate_config(&config).is_ok());

        config.api.public_url = Some("todo.example.com".into());
        assert!(validate_config(&config).is_err());

        config.api.public_url = Some("http://todo.example.com/api".into());
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = AppConfig::default();
        config.observability.metrics_address = "nope".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "observability.metrics_address");
    }
}
