// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports the XDG hierarchy: `./jobwatch.toml` > `~/.config/jobwatch/jobwatch.toml`
//! > `/etc/jobwatch/jobwatch.toml` with environment variable overrides via the
//! `JOBWATCH_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::JobwatchConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/jobwatch/jobwatch.toml` (system-wide)
/// 3. `~/.config/jobwatch/jobwatch.toml` (user XDG config)
/// 4. `./jobwatch.toml` (local directory)
/// 5. `JOBWATCH_*` environment variables
pub fn load_config() -> Result<JobwatchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(JobwatchConfig::default()))
        .merge(Toml::file("/etc/jobwatch/jobwatch.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("jobwatch/jobwatch.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("jobwatch.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<JobwatchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(JobwatchConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<JobwatchConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(JobwatchConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `JOBWATCH_WHATSAPP_ACCESS_TOKEN` must map
/// to `whatsapp.access_token`, not `whatsapp.access.token`.
fn env_provider() -> Env {
    Env::prefixed("JOBWATCH_").map(|key| {
        // `key` is the lowercased env var name with prefix stripped.
        // Example: JOBWATCH_WHATSAPP_ACCESS_TOKEN -> "whatsapp_access_token"
        let mapped = key
            .as_str()
            .replacen("bot_", "bot.", 1)
            .replacen("storage_", "storage.", 1)
            .replacen("whatsapp_", "whatsapp.", 1);
        mapped.into()
    })
}
