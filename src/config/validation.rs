//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, pool size > 0, addresses parse)
//! - Check that TLS mode carries its certificate material
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProxyConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{ProxyConfig, ServeMode};

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
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

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &ProxyConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("`{}` is not a socket address", config.listener.bind_address),
        ));
    }

    if config.listener.mode == ServeMode::Tls {
        match &config.listener.tls {
            None => errors.push(ValidationError::new(
                "listener.tls",
                "required when listener.mode = \"tls\"",
            )),
            Some(tls) => {
                if tls.cert_path.is_empty() {
                    errors.push(ValidationError::new("listener.tls.cert_path", "must not be empty"));
                }
                if tls.key_path.is_empty() {
                    errors.push(ValidationError::new("listener.tls.key_path", "must not be empty"));
                }
                if tls.hostnames.is_empty() {
                    errors.push(ValidationError::new(
                        "listener.tls.hostnames",
                        "at least one hostname is required",
                    ));
                }
                if let Some(bad) = tls
                    .hostnames
                    .iter()
                    .find(|h| h.is_empty() || h.chars().any(char::is_whitespace))
                {
                    errors.push(ValidationError::new(
                        "listener.tls.hostnames",
                        format!("invalid hostname {bad:?}"),
                    ));
                }
            }
        }
    }

    if config.registry.address.trim().is_empty() {
        errors.push(ValidationError::new("registry.address", "must not be empty"));
    }
    if config.registry.pool_size == 0 {
        errors.push(ValidationError::new("registry.pool_size", "must be greater than 0"));
    }
    if config.registry.connect_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "registry.connect_timeout_secs",
            "must be greater than 0",
        ));
    }

    if !config.admin.path.starts_with('/') || config.admin.path == "/" {
        errors.push(ValidationError::new(
            "admin.path",
            format!("`{}` must be an absolute path other than `/`", config.admin.path),
        ));
    }
    if config.admin.max_body_bytes == 0 {
        errors.push(ValidationError::new("admin.max_body_bytes", "must be greater than 0"));
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::new("timeouts.connect_secs", "must be greater than 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("`{}` is not a socket address", config.observability.metrics_address),
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
    use crate::config::schema::TlsConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ProxyConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ProxyConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.registry.pool_size = 0;
        config.admin.path = "set".into();
        config.timeouts.request_secs = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "registry.pool_size",
                "admin.path",
                "timeouts.request_secs",
            ]
        );
    }

    #[test]
    fn test_tls_mode_requires_material() {
        let mut config = ProxyConfig::default();
        config.listener.mode = ServeMode::Tls;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "listener.tls");

        config.listener.tls = Some(TlsConfig {
            cert_path: "cert.pem".into(),
            key_path: "key.pem".into(),
            hostnames: vec![],
        });
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "listener.tls.hostnames");

        config.listener.tls.as_mut().unwrap().hostnames = vec!["hostgolang.com".into()];
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_root_admin_path_rejected() {
        let mut config = ProxyConfig::default();
        config.admin.path = "/".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "admin.path");
    }

    #[test]
    fn test_metrics_address_checked_only_when_enabled() {
        let mut config = ProxyConfig::default();
        config.observability.metrics_address = "nowhere".into();
        assert!(validate_config(&config).is_ok());

        config.observability.metrics_enabled = true;
        assert!(validate_config(&config).is_err());
    }
}
