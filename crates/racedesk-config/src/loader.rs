// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Layered configuration loading with Figment.
//!
//! Lookup order: `./racedesk.toml` > `~/.config/racedesk/racedesk.toml` >
//! `/etc/racedesk/racedesk.toml`, with `RACEDESK_` environment overrides on top.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::RacedeskConfig;

/// Sections whose names prefix environment keys, e.g. `RACEDESK_OPENAI_API_KEY`.
const SECTIONS: &[&str] = &[
    "agent", "business", "openai", "gemini", "weather", "telegram", "wazzup", "storage", "gateway",
];

/// Load configuration from the standard hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/racedesk/racedesk.toml`
/// 3. `~/.config/racedesk/racedesk.toml`
/// 4. `./racedesk.toml`
/// 5. `RACEDESK_*` environment variables
///
/// Credentials still unset afterwards are filled from the plain provider
/// variables (`OPENAI_API_KEY` and friends).
pub fn load_config() -> Result<RacedeskConfig, figment::Error> {
    let mut config: RacedeskConfig = build_figment().extract()?;
    config.apply_env_fallbacks();
    Ok(config)
}

/// Load configuration from a TOML string only. No files, no environment.
pub fn load_config_from_str(toml_content: &str) -> Result<RacedeskConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(RacedeskConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<RacedeskConfig, figment::Error> {
    let mut config: RacedeskConfig = Figment::new()
        .merge(Serialized::defaults(RacedeskConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()?;
    config.apply_env_fallbacks();
    Ok(config)
}

/// The full layered Figment, before extraction.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(RacedeskConfig::default()))
        .merge(Toml::file("/etc/racedesk/racedesk.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("racedesk/racedesk.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("racedesk.toml"))
        .merge(env_provider())
}

/// Maps `RACEDESK_<SECTION>_<KEY>` to `<section>.<key>`.
///
/// Only the first underscore after a known section name becomes a dot, so
/// `RACEDESK_TELEGRAM_BOT_TOKEN` lands on `telegram.bot_token`.
fn env_provider() -> Env {
    Env::prefixed("RACEDESK_").map(|key| map_env_key(key.as_str()).into())
}

fn map_env_key(key: &str) -> String {
    let key = key.to_ascii_lowercase();
    for section in SECTIONS {
        if let Some(rest) = key
            .strip_prefix(section)
            .and_then(|r| r.strip_prefix('_'))
        {
            return format!("{section}.{rest}");
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_keys_map_to_sections() {
        assert_eq!(map_env_key("telegram_bot_token"), "telegram.bot_token");
        assert_eq!(map_env_key("openai_api_key"), "openai.api_key");
        assert_eq!(map_env_key("agent_max_tool_steps"), "agent.max_tool_steps");
        assert_eq!(map_env_key("business_night_start_hour"), "business.night_start_hour");
    }

    #[test]
    fn uppercase_env_keys_map_to_sections() {
        assert_eq!(map_env_key("OPENAI_API_KEY"), "openai.api_key");
        assert_eq!(map_env_key("GATEWAY_PORT"), "gateway.port");
        assert_eq!(map_env_key("Telegram_Bot_Token"), "telegram.bot_token");
    }

    #[test]
    fn unknown_section_is_left_alone() {
        assert_eq!(map_env_key("vault_key"), "vault_key");
    }
}
