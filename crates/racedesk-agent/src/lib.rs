// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation engine for racedesk.
//!
//! The [`Orchestrator`] takes one inbound message and a role, calls the
//! [`HybridEngine`] (primary backend with a text-only fallback), runs the
//! bounded tool loop and persists the exchange. Side effects that must not
//! delay the reply go through the [`BackgroundQueue`].

pub mod background;
pub mod engine;
pub mod orchestrator;
pub mod prompts;
pub mod shutdown;

pub use background::{BackgroundJob, BackgroundQueue};
pub use engine::{Generation, HybridEngine};
pub use orchestrator::{ConversationState, Orchestrator, Reply};
pub use shutdown::install_signal_handler;
