//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{ProxyConfig, ServeMode};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file, apply environment
/// overrides, then validate.
pub fn load_config(path: Option<&Path>) -> Result<ProxyConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => ProxyConfig::default(),
    };

    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay deployment environment variables on a parsed configuration.
///
/// - `REDIS_HOST`: registry address
/// - `REDIS_PASSWORD`: registry password
/// - `ENV=prod`: serve TLS
/// - `PROXY_BIND_ADDRESS`: listener bind address
pub fn apply_env_overrides<F>(config: &mut ProxyConfig, var: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = var("REDIS_HOST").filter(|v| !v.is_empty()) {
        config.registry.address = host;
    }
    if let Some(password) = var("REDIS_PASSWORD").filter(|v| !v.is_empty()) {
        config.registry.password = Some(password);
    }
    if var("ENV").as_deref() == Some("prod") {
        config.listener.mode = ServeMode::Tls;
    }
    if let Some(addr) = var("PROXY_BIND_ADDRESS").filter(|v| !v.is_empty()) {
        config.listener.bind_address = addr;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_env_overrides() {
        let mut config = ProxyConfig::default();
        apply_env_overrides(
            &mut config,
            env(&[
                ("REDIS_HOST", "redis.internal:6380"),
                ("REDIS_PASSWORD", "hunter2"),
                ("ENV", "prod"),
                ("PROXY_BIND_ADDRESS", "127.0.0.1:7000"),
            ]),
        );

        assert_eq!(config.registry.address, "redis.internal:6380");
        assert_eq!(config.registry.password.as_deref(), Some("hunter2"));
        assert_eq!(config.listener.mode, ServeMode::Tls);
        assert_eq!(config.listener.bind_address, "127.0.0.1:7000");
    }

    #[test]
    fn test_non_prod_env_keeps_plain_mode() {
        let mut config = ProxyConfig::default();
        apply_env_overrides(&mut config, env(&[("ENV", "staging"), ("REDIS_HOST", "")]));

        assert_eq!(config.listener.mode, ServeMode::Plain);
        assert_eq!(config.registry.address, "localhost:6379");
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config(Some(Path::new("/nonexistent/proxy.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_load_invalid_file() {
        let path = std::env::temp_dir().join(format!("subdomain-proxy-{}.toml", std::process::id()));
        fs::write(&path, "[admin]\npath = \"set\"\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        fs::remove_file(&path).unwrap();

        match err {
            ConfigError::Validation(errors) => assert_eq!(errors[0].field, "admin.path"),
            other => panic!("expected validation error, got {other}"),
        }
    }
}
