// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Inbound boundary for racedesk.
//!
//! An axum server receives Telegram and Wazzup webhooks, hands each message
//! to the [`racedesk_agent::Orchestrator`] and delivers the reply through
//! the matching channel. Admin alerts go to Telegram when configured.

pub mod handlers;
pub mod notify;
pub mod server;
pub mod telegram;
pub mod whatsapp;

pub use notify::{LogNotifier, admin_notifier};
pub use server::{GatewayState, HealthState, ServerConfig, router, start_server};
pub use telegram::{TelegramNotifier, TelegramSender};
pub use whatsapp::WazzupSender;
