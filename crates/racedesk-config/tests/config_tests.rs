// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the racedesk configuration system.

use figment::Jail;
use racedesk_config::diagnostic::ConfigError;
use racedesk_config::model::RacedeskConfig;
use racedesk_config::{load_and_validate_str, load_config, load_config_from_str};

#[test]
fn valid_toml_deserializes_into_config() {
    let toml = r#"
[agent]
name = "pitwall"
log_level = "debug"
max_tool_steps = 5

[business]
name = "Test Club"
capacity = 8
max_seats = 8
base_rate = 2500.0

[openai]
api_key = "sk-test"
model = "gpt-4o"

[gemini]
api_key = "g-test"

[telegram]
bot_token = "123:ABC"
admin_ids = [779270468, 42]

[storage]
database_path = "/tmp/racedesk-test.db"

[gateway]
port = 9000
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.agent.name, "pitwall");
    assert_eq!(config.agent.log_level, "debug");
    assert_eq!(config.agent.max_tool_steps, 5);
    assert_eq!(config.business.name, "Test Club");
    assert_eq!(config.business.capacity, 8);
    assert_eq!(config.business.base_rate, 2500.0);
    assert_eq!(config.openai.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.openai.model, "gpt-4o");
    assert_eq!(config.gemini.model, "gemini-2.5-flash");
    assert_eq!(config.telegram.admin_ids, vec![779270468, 42]);
    assert_eq!(config.storage.database_path, "/tmp/racedesk-test.db");
    assert_eq!(config.gateway.port, 9000);
}

#[test]
fn empty_toml_yields_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");
    let defaults = RacedeskConfig::default();
    assert_eq!(config.agent.max_tool_steps, 3);
    assert_eq!(config.agent.history_window_hours, 24);
    assert_eq!(config.business.capacity, 6);
    assert_eq!(config.business.max_hours, 12);
    assert_eq!(config.business.night_start_hour, 22);
    assert_eq!(config.business.night_multiplier, 1.25);
    assert_eq!(config.business.name, defaults.business.name);
    assert!(config.openai.api_key.is_none());
    assert_eq!(config.gateway.port, 8080);
}

#[test]
fn unknown_key_gets_suggestion() {
    let toml = r#"
[business]
capacty = 6
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        ConfigError::UnknownKey {
            key, suggestion, ..
        } => {
            assert_eq!(key, "capacty");
            assert_eq!(suggestion.as_deref(), Some("capacity"));
        }
        other => panic!("expected UnknownKey, got {other:?}"),
    }
}

#[test]
fn unknown_section_is_rejected() {
    let toml = r#"
[vault]
enabled = true
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(matches!(errors[0], ConfigError::UnknownKey { .. }));
}

#[test]
fn wrong_type_is_reported() {
    let toml = r#"
[gateway]
port = "eighty"
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    match &errors[0] {
        ConfigError::InvalidType { key, .. } => assert_eq!(key, "gateway.port"),
        other => panic!("expected InvalidType, got {other:?}"),
    }
}

#[test]
fn semantic_errors_surface_through_load_and_validate() {
    let toml = r#"
[business]
base_rate = -1.0
"#;
    let errors = load_and_validate_str(toml).unwrap_err();
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("base_rate"))
    ));
}

#[test]
fn env_overrides_file_values() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "racedesk.toml",
            r#"
[gateway]
port = 9000

[openai]
model = "gpt-4o"
"#,
        )?;
        jail.set_env("RACEDESK_GATEWAY_PORT", "9100");
        jail.set_env("RACEDESK_TELEGRAM_BOT_TOKEN", "999:XYZ");

        let config = load_config()?;
        assert_eq!(config.gateway.port, 9100);
        assert_eq!(config.openai.model, "gpt-4o");
        assert_eq!(config.telegram.bot_token.as_deref(), Some("999:XYZ"));
        Ok(())
    });
}

#[test]
fn prefixed_env_var_sets_backend_key() {
    Jail::expect_with(|jail| {
        jail.set_env("RACEDESK_OPENAI_API_KEY", "sk-real");
        jail.set_env("OPENAI_API_KEY", "sk-plain");

        let config = load_config()?;
        assert_eq!(config.openai.api_key.as_deref(), Some("sk-real"));
        Ok(())
    });
}

#[test]
fn plain_provider_env_vars_fill_missing_keys() {
    Jail::expect_with(|jail| {
        jail.set_env("OPENAI_API_KEY", "sk-from-env");
        jail.create_file(
            "racedesk.toml",
            r#"
[gemini]
api_key = "from-file"
"#,
        )?;
        jail.set_env("GEMINI_API_KEY", "ignored");

        let config = load_config()?;
        assert_eq!(config.openai.api_key.as_deref(), Some("sk-from-env"));
        assert_eq!(config.gemini.api_key.as_deref(), Some("from-file"));
        Ok(())
    });
}
