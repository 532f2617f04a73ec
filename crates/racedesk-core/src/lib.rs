// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for racedesk.
//!
//! Holds the error taxonomy, the domain types (profiles, messages, bookings,
//! analytics records) and the collaborator traits every other crate plugs into.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{BackendFailure, RacedeskError};
pub use types::{AdapterType, HealthStatus, Role, Sender};

pub use traits::{
    AnalyticsRepository, CapacityStore, ChatBackend, ContextStore, Notifier, OutboundSender,
    PluginAdapter, Stores, TextBackend, WeatherProvider,
};

/// Returns true when a credential is usable: non-empty and not a template placeholder.
pub fn is_configured(secret: Option<&str>) -> bool {
    match secret.map(str::trim) {
        Some(s) => !s.is_empty() && !s.to_lowercase().contains("placeholder"),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_credentials_are_not_configured() {
        assert!(!is_configured(None));
        assert!(!is_configured(Some("")));
        assert!(!is_configured(Some("   ")));
        assert!(!is_configured(Some("sk-PLACEHOLDER-key")));
        assert!(is_configured(Some("sk-live-123")));
    }

    #[test]
    fn adapter_type_display_round_trip() {
        use std::str::FromStr;

        for variant in [
            AdapterType::Provider,
            AdapterType::Storage,
            AdapterType::Weather,
            AdapterType::Channel,
        ] {
            let parsed = AdapterType::from_str(&variant.to_string()).expect("should parse back");
            assert_eq!(variant, parsed);
        }
    }

    #[test]
    fn role_from_flag() {
        assert_eq!(Role::from_admin_flag(true), Role::Admin);
        assert_eq!(Role::from_admin_flag(false), Role::Client);
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn all_traits_are_object_safe() {
        fn _chat(_: &dyn ChatBackend) {}
        fn _text(_: &dyn TextBackend) {}
        fn _ctx(_: &dyn ContextStore) {}
        fn _cap(_: &dyn CapacityStore) {}
        fn _analytics(_: &dyn AnalyticsRepository) {}
        fn _weather(_: &dyn WeatherProvider) {}
        fn _notify(_: &dyn Notifier) {}
        fn _outbound(_: &dyn OutboundSender) {}
    }
}
