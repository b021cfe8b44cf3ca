// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Jobwatch bot.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Jobwatch configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values; the WhatsApp credentials are the only values that must come
/// from the operator.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct JobwatchConfig {
    /// Bot identity and behavior settings.
    #[serde(default)]
    pub bot: BotConfig,

    /// Jobcard database settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// WhatsApp Cloud API settings.
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,
}

/// Bot identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BotConfig {
    /// Display name of the bot.
    #[serde(default = "default_bot_name")]
    pub name: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Jobcards delivered per page.
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Minimum hours between two start fetches for the same identity.
    #[serde(default = "default_cooldown_hours")]
    pub cooldown_hours: i64,

    /// WhatsApp identity that receives best-effort startup failure alerts.
    #[serde(default)]
    pub admin_identity: Option<String>,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            name: default_bot_name(),
            log_level: default_log_level(),
            page_size: default_page_size(),
            cooldown_hours: default_cooldown_hours(),
            admin_identity: None,
        }
    }
}

fn default_bot_name() -> String {
    "jobwatch".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_page_size() -> u32 {
    5
}

fn default_cooldown_hours() -> i64 {
    12
}

/// Jobcard database configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database shared with the jobcard web application.
    #[serde(default = "default_database_path")]
    pub database_path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|d| d.join("jobwatch/jobcards.db").display().to_string())
        .unwrap_or_else(|| "jobcards.db".to_string())
}

/// WhatsApp Cloud API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct WhatsAppConfig {
    /// Graph API access token. `None` leaves the channel unconfigured.
    #[serde(default)]
    pub access_token: Option<String>,

    /// WhatsApp Business phone number id.
    #[serde(default)]
    pub phone_number_id: Option<String>,

    /// Token echoed back during the webhook verification handshake.
    #[serde(default)]
    pub verify_token: Option<String>,

    /// Meta app secret for `X-Hub-Signature-256` verification. `None`
    /// disables signature checks.
    #[serde(default)]
    pub app_secret: Option<String>,

    /// Webhook bind host.
    #[serde(default = "default_webhook_host")]
    pub webhook_host: String,

    /// Webhook bind port.
    #[serde(default = "default_webhook_port")]
    pub webhook_port: u16,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            phone_number_id: None,
            verify_token: None,
            app_secret: None,
            webhook_host: default_webhook_host(),
            webhook_port: default_webhook_port(),
        }
    }
}

fn default_webhook_host() -> String {
    "0.0.0.0".to_string()
}

fn default_webhook_port() -> u16 {
    8080
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = JobwatchConfig::default();
        assert_eq!(config.bot.name, "jobwatch");
        assert_eq!(config.bot.log_level, "info");
        assert_eq!(config.bot.page_size, 5);
        assert_eq!(config.bot.cooldown_hours, 12);
        assert!(config.bot.admin_identity.is_none());
        assert!(config.whatsapp.access_token.is_none());
        assert_eq!(config.whatsapp.webhook_host, "0.0.0.0");
        assert_eq!(config.whatsapp.webhook_port, 8080);
        assert!(!config.storage.database_path.is_empty());
    }
}
