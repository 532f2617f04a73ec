// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Tools the model can call, and the dispatcher that runs them.
//!
//! - [`catalog`]: tool names, declarations and the per-role [`Toolset`]
//! - [`args`]: typed [`ToolCall`] variants with argument coercion
//! - [`analytics`]: text rendering for the admin tools
//! - [`dispatcher`]: [`ToolDispatcher`], the [`ToolRunner`] the orchestrator drives

pub mod analytics;
pub mod args;
pub mod catalog;
pub mod dispatcher;

pub use args::ToolCall;
pub use catalog::{ToolName, Toolset};
pub use dispatcher::{ToolDispatcher, ToolOutput, ToolRunner};
