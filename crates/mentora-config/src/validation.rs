// SPDX-FileCopyrightText: 2026 Mentora Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as positive capacity bounds and non-empty paths.

use thiserror::Error;

use crate::model::MentoraConfig;

/// A configuration error discovered at load or validation time.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file(s) failed to parse or contained unknown keys.
    #[error("{0}")]
    Parse(#[from] Box<figment::Error>),

    /// A semantic constraint on a parsed value was violated.
    #[error("{message}")]
    Validation { message: String },
}

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &MentoraConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    if config.session.max_turns < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "session.max_turns must be at least 1, got {}",
                config.session.max_turns
            ),
        });
    }

    if config.session.ttl_seconds < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "session.ttl_seconds must be at least 1, got {}",
                config.session.ttl_seconds
            ),
        });
    }

    if config.memory.max_summaries < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "memory.max_summaries must be at least 1, got {}",
                config.memory.max_summaries
            ),
        });
    }

    if config.memory.scroll_limit < config.memory.max_summaries {
        errors.push(ConfigError::Validation {
            message: format!(
                "memory.scroll_limit ({}) must be at least memory.max_summaries ({})",
                config.memory.scroll_limit, config.memory.max_summaries
            ),
        });
    }

    if config.memory.embedding_dimensions < 1 {
        errors.push(ConfigError::Validation {
            message: format!(
                "memory.embedding_dimensions must be at least 1, got {}",
                config.memory.embedding_dimensions
            ),
        });
    }

    for (key, name) in [
        ("memory.user_collection", &config.memory.user_collection),
        (
            "memory.predefined_collection",
            &config.memory.predefined_collection,
        ),
    ] {
        if name.trim().is_empty() {
            errors.push(ConfigError::Validation {
                message: format!("{key} must not be empty"),
            });
        }
    }

    if config.memory.user_collection == config.memory.predefined_collection {
        errors.push(ConfigError::Validation {
            message: "memory.user_collection and memory.predefined_collection must differ"
                .to_string(),
        });
    }

    // Validate gateway host looks like a valid IP or hostname.
    let host = config.gateway.host.trim();
    if host.is_empty() {
        errors.push(ConfigError::Validation {
            message: "gateway.host must not be empty".to_string(),
        });
    } else {
        let is_valid_ip = host.parse::<std::net::IpAddr>().is_ok();
        let is_valid_hostname = host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-' || c == ':');
        if !is_valid_ip && !is_valid_hostname {
            errors.push(ConfigError::Validation {
                message: format!("gateway.host `{host}` is not a valid IP address or hostname"),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
