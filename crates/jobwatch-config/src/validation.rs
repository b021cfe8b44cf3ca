// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as a usable page size and a coherent WhatsApp section.

use crate::diagnostic::ConfigError;
use crate::model::JobwatchConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &JobwatchConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    if !LOG_LEVELS.contains(&config.bot.log_level.as_str()) {
        errors.push(ConfigError::Validation {
            message: format!(
                "bot.log_level must be one of {}, got `{}`",
                LOG_LEVELS.join(", "),
                config.bot.log_level
            ),
        });
    }

    if config.bot.page_size == 0 {
        errors.push(ConfigError::Validation {
            message: "bot.page_size must be at least 1".to_string(),
        });
    }

    if config.bot.cooldown_hours < 0 {
        errors.push(ConfigError::Validation {
            message: format!(
                "bot.cooldown_hours must be non-negative, got {}",
                config.bot.cooldown_hours
            ),
        });
    }

    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // The WhatsApp credentials travel together: a token without a phone
    // number id (or vice versa) cannot reach the Graph API.
    let has_token = config
        .whatsapp
        .access_token
        .as_deref()
        .is_some_and(|t| !t.trim().is_empty());
    let has_phone = config
        .whatsapp
        .phone_number_id
        .as_deref()
        .is_some_and(|p| !p.trim().is_empty());
    if has_token != has_phone {
        errors.push(ConfigError::Validation {
            message: "whatsapp.access_token and whatsapp.phone_number_id must be set together"
                .to_string(),
        });
    }

    if config.whatsapp.webhook_host.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "whatsapp.webhook_host must not be empty".to_string(),
        });
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
