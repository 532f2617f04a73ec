// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test fakes for racedesk.
//!
//! # Components
//!
//! - [`ScriptedChatBackend`] / [`ScriptedTextBackend`] - model backends replaying queued turns
//! - [`MemoryStore`] - in-memory context, capacity and analytics store
//! - [`RecordingNotifier`] / [`RecordingSender`] - capture admin notifications and outbound replies
//! - [`FixedWeather`] - weather provider returning a preset reading

pub mod memory_store;
pub mod mock_backend;
pub mod mock_notifier;
pub mod mock_weather;

pub use memory_store::MemoryStore;
pub use mock_backend::{ScriptedChatBackend, ScriptedTextBackend, tool_call};
pub use mock_notifier::{RecordingNotifier, RecordingSender};
pub use mock_weather::FixedWeather;
