// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Covers constraints serde cannot express: non-empty paths, the seat and hour
//! limits being consistent with venue capacity, pricing factors in range.

use crate::diagnostic::ConfigError;
use crate::model::RacedeskConfig;

/// Validate a deserialized configuration.
///
/// Collects every failure instead of stopping at the first one.
pub fn validate_config(config: &RacedeskConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();
    let mut fail = |message: String| errors.push(ConfigError::Validation { message });

    if config.storage.database_path.trim().is_empty() {
        fail("storage.database_path must not be empty".to_string());
    }

    let addr = config.gateway.bind_address.trim();
    if addr.is_empty() {
        fail("gateway.bind_address must not be empty".to_string());
    } else if addr.parse::<std::net::IpAddr>().is_err()
        && !addr
            .chars()
            .all(|c| c.is_alphanumeric() || c == '.' || c == '-')
    {
        fail(format!(
            "gateway.bind_address `{addr}` is not a valid IP address or hostname"
        ));
    }

    let business = &config.business;
    if business.max_seats < 1 {
        fail("business.max_seats must be at least 1".to_string());
    }
    if business.capacity < business.max_seats {
        fail(format!(
            "business.capacity ({}) must be at least business.max_seats ({})",
            business.capacity, business.max_seats
        ));
    }
    if business.max_hours < 1 {
        fail("business.max_hours must be at least 1".to_string());
    }
    if business.base_rate <= 0.0 {
        fail(format!(
            "business.base_rate must be positive, got {}",
            business.base_rate
        ));
    }
    if business.night_multiplier < 1.0 {
        fail(format!(
            "business.night_multiplier must be at least 1.0, got {}",
            business.night_multiplier
        ));
    }
    if business.night_start_hour > 23 {
        fail(format!(
            "business.night_start_hour must be between 0 and 23, got {}",
            business.night_start_hour
        ));
    }
    if !business.payment_base_url.starts_with("http") {
        fail(format!(
            "business.payment_base_url `{}` must be an http(s) URL",
            business.payment_base_url
        ));
    }

    if config.agent.max_tool_steps < 1 {
        fail("agent.max_tool_steps must be at least 1".to_string());
    }
    if config.agent.background_queue_capacity < 1 {
        fail("agent.background_queue_capacity must be at least 1".to_string());
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

    fn has_error(errors: &[ConfigError], needle: &str) -> bool {
        errors
            .iter()
            .any(|e| matches!(e, ConfigError::Validation { message } if message.contains(needle)))
    }

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&RacedeskConfig::default()).is_ok());
    }

    #[test]
    fn empty_database_path_fails_validation() {
        let mut config = RacedeskConfig::default();
        config.storage.database_path = "".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "database_path"));
    }

    #[test]
    fn capacity_below_max_seats_fails() {
        let mut config = RacedeskConfig::default();
        config.business.capacity = 4;
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "business.capacity"));
    }

    #[test]
    fn collects_multiple_errors() {
        let mut config = RacedeskConfig::default();
        config.business.base_rate = 0.0;
        config.business.night_multiplier = 0.5;
        config.agent.max_tool_steps = 0;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(has_error(&errors, "base_rate"));
        assert!(has_error(&errors, "night_multiplier"));
        assert!(has_error(&errors, "max_tool_steps"));
    }

    #[test]
    fn bad_bind_address_fails() {
        let mut config = RacedeskConfig::default();
        config.gateway.bind_address = "not an/address".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert!(has_error(&errors, "bind_address"));
    }
}
