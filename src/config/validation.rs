//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, ports valid, pool size > 0)
//! - Detect duplicate servers
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FailoverConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;

use thiserror::Error;

use crate::config::schema::FailoverConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("server #{0} has an empty host")]
    EmptyHost(usize),

    #[error("server #{0} has port 0")]
    ZeroPort(usize),

    #[error("server {0} is listed more than once")]
    DuplicateServer(String),

    #[error("recovery_delay_secs must be positive")]
    ZeroRecoveryDelay,

    #[error("timeouts.{0} must be positive")]
    ZeroTimeout(&'static str),

    #[error("pool.size must be positive")]
    ZeroPoolSize,
}

/// Check a configuration, collecting every problem found.
pub fn validate_config(config: &FailoverConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();

    for (idx, server) in config.resolved_servers().iter().enumerate() {
        if server.host.trim().is_empty() {
            errors.push(ValidationError::EmptyHost(idx));
        }
        if server.port == 0 {
            errors.push(ValidationError::ZeroPort(idx));
        }
        if !seen.insert(server.clone()) {
            errors.push(ValidationError::DuplicateServer(server.to_string()));
        }
    }

    if config.recovery_delay_secs == 0 {
        errors.push(ValidationError::ZeroRecoveryDelay);
    }
    if config.timeouts.connect_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("connect_ms"));
    }
    if config.timeouts.operation_ms == 0 {
        errors.push(ValidationError::ZeroTimeout("operation_ms"));
    }
    if config.pool.size == 0 {
        errors.push(ValidationError::ZeroPoolSize);
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
        assert!(validate_config(&FailoverConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = FailoverConfig::with_servers([("a", 1), ("", 0), ("a", 1)]);
        config.recovery_delay_secs = 0;
        config.timeouts.operation_ms = 0;
        config.pool.size = 0;

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::EmptyHost(1),
                ValidationError::ZeroPort(1),
                ValidationError::DuplicateServer("a:1".to_string()),
                ValidationError::ZeroRecoveryDelay,
                ValidationError::ZeroTimeout("operation_ms"),
                ValidationError::ZeroPoolSize,
            ]
        );
    }

    #[test]
    fn test_empty_single_host_rejected() {
        let config = FailoverConfig {
            host: "  ".to_string(),
            ..FailoverConfig::default()
        };
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::EmptyHost(0)]
        );
    }
}
