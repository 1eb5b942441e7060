//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `upstream.base_url`.
pub const UPSTREAM_URL_ENV: &str = "GATEWAY_UPSTREAM_URL";

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

/// Load and validate configuration from a TOML file.
///
/// Environment overrides are applied before validation so a bad override is
/// reported like a bad file value.
pub fn load_config(path: &Path) -> Result<GatewayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: GatewayConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Apply overrides taken from the process environment.
pub fn apply_env_overrides(config: &mut GatewayConfig) {
    override_upstream_url(config, std::env::var(UPSTREAM_URL_ENV).ok());
}

fn override_upstream_url(config: &mut GatewayConfig, value: Option<String>) {
    if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
        config.upstream.base_url = url;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_replaces_base_url() {
        let mut config = GatewayConfig::default();
        override_upstream_url(&mut config, Some("http://10.0.0.5:8003".into()));
        assert_eq!(config.upstream.base_url, "http://10.0.0.5:8003");
    }

    #[test]
    fn test_blank_override_is_ignored() {
        let mut config = GatewayConfig::default();
        override_upstream_url(&mut config, Some("   ".into()));
        assert_eq!(config.upstream.base_url, "http://query-service-masha:8003");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_validation_error_display_joins_fields() {
        let err = ConfigError::Validation(vec![
            ValidationError {
                field: "upstream.timeout_secs",
                reason: "must be greater than zero".into(),
            },
            ValidationError {
                field: "listener.bind_address",
                reason: "'x' is not a socket address".into(),
            },
        ]);
        let text = err.to_string();
        assert!(text.starts_with("Validation failed: upstream.timeout_secs"));
        assert!(text.contains(", listener.bind_address"));
    }
}
