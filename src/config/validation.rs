//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the level spec parses
//! - Validate value ranges and addresses
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function over the config
//! - Runs before a config is accepted by the facility

use std::net::SocketAddr;
use thiserror::Error;

use crate::config::schema::{LoggingConfig, ServiceConfig, WriterTarget};
use crate::level::{LevelSpec, SpecError};

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("logging.level_spec: {0}")]
    LevelSpec(#[from] SpecError),

    #[error("logging.file_path must be set when writer_target is not console")]
    EmptyFilePath,

    #[error("logging.rotation_interval_hours must be at least 1")]
    ZeroRotationInterval,

    #[error("logging.rotation_size_limit must be at least 1 MB")]
    ZeroRotationSize,

    #[error("{field} is not a valid socket address: '{value}'")]
    InvalidAddress { field: &'static str, value: String },

    #[error("admin.api_key must not be empty when set")]
    EmptyApiKey,
}

/// Validate the facility settings.
pub fn validate_logging(config: &LoggingConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = LevelSpec::parse(&config.level_spec) {
        errors.push(ValidationError::LevelSpec(e));
    }

    if config.writer_target != WriterTarget::Console {
        if config.file_path.as_os_str().is_empty() {
            errors.push(ValidationError::EmptyFilePath);
        }
        if config.rotation_interval_hours == 0 {
            errors.push(ValidationError::ZeroRotationInterval);
        }
        if config.rotation_size_limit == 0 {
            errors.push(ValidationError::ZeroRotationSize);
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate a full daemon configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = validate_logging(&config.logging).err().unwrap_or_default();

    if config.admin.enabled && config.admin.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "admin.bind_address",
            value: config.admin.bind_address.clone(),
        });
    }
    if matches!(config.admin.api_key.as_deref(), Some(key) if key.trim().is_empty()) {
        errors.push(ValidationError::EmptyApiKey);
    }
    if config.metrics.enabled && config.metrics.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field: "metrics.bind_address",
            value: config.metrics.bind_address.clone(),
        });
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
    use std::path::PathBuf;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ServiceConfig::default()).is_ok());
    }

    #[test]
    fn test_bad_spec_is_reported() {
        let config = LoggingConfig {
            level_spec: "info:a=loud".into(),
            ..LoggingConfig::default()
        };
        let errors = validate_logging(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::LevelSpec(_)));
    }

    #[test]
    fn test_file_settings_only_checked_for_file_targets() {
        let console = LoggingConfig {
            file_path: PathBuf::new(),
            rotation_interval_hours: 0,
            ..LoggingConfig::default()
        };
        assert!(validate_logging(&console).is_ok());

        let file = LoggingConfig {
            writer_target: WriterTarget::File,
            ..console
        };
        let errors = validate_logging(&file).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::EmptyFilePath, ValidationError::ZeroRotationInterval]
        );
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ServiceConfig::default();
        config.logging.level_spec = "=debug".into();
        config.admin.bind_address = "not-an-address".into();
        config.admin.api_key = Some("  ".into());
        config.metrics.enabled = true;
        config.metrics.bind_address = "localhost".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors[1].to_string().contains("admin.bind_address"));
    }
}
