// SPDX-FileCopyrightText: 2026 Jobwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Jobwatch configuration system.

use jobwatch_config::diagnostic::{ConfigError, suggest_key};
use jobwatch_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_jobwatch_config() {
    let toml = r#"
[bot]
name = "jobcards-dev"
log_level = "debug"
page_size = 3
cooldown_hours = 6
admin_identity = "263770000000"

[storage]
database_path = "/tmp/jobcards.db"

[whatsapp]
access_token = "EAAG-test"
phone_number_id = "1122334455"
verify_token = "hook-secret"
app_secret = "app-secret"
webhook_host = "127.0.0.1"
webhook_port = 9090
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.bot.name, "jobcards-dev");
    assert_eq!(config.bot.log_level, "debug");
    assert_eq!(config.bot.page_size, 3);
    assert_eq!(config.bot.cooldown_hours, 6);
    assert_eq!(config.bot.admin_identity.as_deref(), Some("263770000000"));
    assert_eq!(config.storage.database_path, "/tmp/jobcards.db");
    assert_eq!(config.whatsapp.access_token.as_deref(), Some("EAAG-test"));
    assert_eq!(
        config.whatsapp.phone_number_id.as_deref(),
        Some("1122334455")
    );
    assert_eq!(config.whatsapp.verify_token.as_deref(), Some("hook-secret"));
    assert_eq!(config.whatsapp.webhook_host, "127.0.0.1");
    assert_eq!(config.whatsapp.webhook_port, 9090);
}

/// Unknown field in [whatsapp] section produces an UnknownField error.
#[test]
fn unknown_field_in_whatsapp_produces_error() {
    let toml = r#"
[whatsapp]
acess_token = "EAAG"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("acess_token"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.bot.name, "jobwatch");
    assert_eq!(config.bot.page_size, 5);
    assert_eq!(config.bot.cooldown_hours, 12);
    assert!(config.whatsapp.access_token.is_none());
    assert!(config.whatsapp.verify_token.is_none());
}

/// The high-level entry point surfaces unknown keys as diagnostics with a
/// fuzzy suggestion.
#[test]
fn load_and_validate_str_reports_unknown_key_with_suggestion() {
    let toml = r#"
[bot]
page_sise = 5
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject unknown key");
    assert!(!errors.is_empty());
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "page_sise");
            assert_eq!(suggestion.as_deref(), Some("page_size"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

/// Validation errors surface through the high-level entry point.
#[test]
fn load_and_validate_str_runs_semantic_validation() {
    let toml = r#"
[bot]
page_size = 0
"#;

    let errors = load_and_validate_str(toml).expect_err("should reject zero page size");
    assert!(
        errors
            .iter()
            .any(|e| e.to_string().contains("bot.page_size"))
    );
}

/// Suggestion machinery is exposed for reuse and behaves sanely.
#[test]
fn suggest_key_matches_near_typos_only() {
    let valid = &["access_token", "phone_number_id", "verify_token"];
    assert_eq!(
        suggest_key("verifytoken", valid),
        Some("verify_token".to_string())
    );
    assert_eq!(suggest_key("banana", valid), None);
}
