//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (port non-zero, host non-empty)
//! - Check the log level against the set the subscriber accepts
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use crate::config::schema::ServerConfig;

const KNOWN_LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem found in a config.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "listener.port").
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a parsed config, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.host.trim().is_empty() {
        errors.push(ValidationError {
            field: "listener.host".to_string(),
            message: "host must not be empty".to_string(),
        });
    }

    if config.listener.port == 0 {
        errors.push(ValidationError {
            field: "listener.port".to_string(),
            message: "port must be non-zero".to_string(),
        });
    }

    if !KNOWN_LOG_LEVELS.contains(&config.logging.level.as_str()) {
        errors.push(ValidationError {
            field: "logging.level".to_string(),
            message: format!(
                "unknown level '{}' (expected one of: {})",
                config.logging.level,
                KNOWN_LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
