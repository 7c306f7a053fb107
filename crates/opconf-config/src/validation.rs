// SPDX-FileCopyrightText: 2026 Opconf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as a usable schema prefix and a separator the batch protocol can carry.

use opconf_core::KEY_DELIMITER;

use crate::diagnostic::ConfigError;
use crate::model::OpconfConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &OpconfConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let schema = &config.resolver.schema;
    if schema.is_empty() {
        errors.push(ConfigError::Validation {
            message: "resolver.schema must not be empty".to_string(),
        });
    } else if schema.chars().any(char::is_whitespace) {
        errors.push(ConfigError::Validation {
            message: format!("resolver.schema `{schema}` must not contain whitespace"),
        });
    }

    // Identifiers are `:`-joined paths and values are quoted, so neither may
    // double as the separator.
    let separator = config.resolver.separator;
    if separator == '"' || separator.is_whitespace() {
        errors.push(ConfigError::Validation {
            message: format!(
                "resolver.separator {separator:?} cannot be a double quote or whitespace"
            ),
        });
    } else if KEY_DELIMITER.starts_with(separator) {
        errors.push(ConfigError::Validation {
            message: format!(
                "resolver.separator {separator:?} collides with the key path delimiter"
            ),
        });
    }

    if let Some(account) = &config.resolver.account
        && account.trim().is_empty()
    {
        errors.push(ConfigError::Validation {
            message: "resolver.account must not be blank when set".to_string(),
        });
    }

    if config.cli.op_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "cli.op_path must not be empty".to_string(),
        });
    }

    if config.cli.timeout_secs == Some(0) {
        errors.push(ConfigError::Validation {
            message: "cli.timeout_secs must be greater than zero".to_string(),
        });
    }

    let level = config.log.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "log.level `{}` is not one of {}",
                config.log.level,
                LOG_LEVELS.join(", ")
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
