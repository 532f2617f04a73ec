// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits. All use `#[async_trait]` for dynamic dispatch.

pub mod adapter;
pub mod analytics;
pub mod backend;
pub mod notify;
pub mod store;
pub mod weather;

pub use adapter::PluginAdapter;
pub use analytics::AnalyticsRepository;
pub use backend::{ChatBackend, TextBackend};
pub use notify::{Notifier, OutboundSender};
pub use store::{CapacityStore, ContextStore, Stores};
pub use weather::WeatherProvider;
