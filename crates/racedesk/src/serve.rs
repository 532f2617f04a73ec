// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `racedesk serve` command implementation.
//!
//! Builds the runtime, starts the webhook gateway and waits for SIGINT or
//! SIGTERM. In-flight requests are cancelled, queued background work is
//! drained and the database is closed before exit.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Instant;

use racedesk_agent::install_signal_handler;
use racedesk_config::RacedeskConfig;
use racedesk_core::RacedeskError;
use racedesk_gateway::{GatewayState, HealthState, ServerConfig, WazzupSender, start_server};
use tracing::info;

use crate::runtime::Runtime;

/// Crates whose events the configured log level applies to.
const LOG_TARGETS: &[&str] = &[
    "racedesk",
    "racedesk_agent",
    "racedesk_booking",
    "racedesk_gateway",
    "racedesk_gemini",
    "racedesk_openai",
    "racedesk_storage",
    "racedesk_tools",
    "racedesk_weather",
];

/// Runs the `racedesk serve` command.
pub async fn run_serve(config: RacedeskConfig) -> Result<(), RacedeskError> {
    init_tracing(&config.agent.log_level);
    info!(agent = %config.agent.name, business = %config.business.name, "starting racedesk serve");

    let runtime = Runtime::build(&config).await?;
    let shutdown = install_signal_handler();

    let state = GatewayState {
        orchestrator: runtime.orchestrator.clone(),
        telegram: runtime.telegram.clone(),
        whatsapp: Arc::new(WazzupSender::new(&config.wazzup)),
        admin_ids: Arc::new(config.telegram.admin_ids.iter().copied().collect::<HashSet<_>>()),
        health: HealthState {
            start_time: Instant::now(),
            components: runtime.components.clone(),
        },
        shutdown: shutdown.clone(),
    };

    let served = start_server(&ServerConfig::from(&config.gateway), state, shutdown.clone()).await;
    // Cancels in-flight requests when the server stopped on its own.
    shutdown.cancel();

    runtime.shutdown().await;
    info!("racedesk serve shutdown complete");
    served
}

/// Initializes the tracing subscriber: `RUST_LOG` wins, otherwise the
/// configured level for racedesk crates and `warn` for everything else.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(log_level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn default_directives(log_level: &str) -> String {
    let mut directives = vec!["warn".to_string()];
    directives.extend(LOG_TARGETS.iter().map(|target| format!("{target}={log_level}")));
    directives.join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directives_cover_every_crate() {
        let directives = default_directives("debug");
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("racedesk_agent=debug"));
        assert!(directives.contains("racedesk_gateway=debug"));
        assert!(tracing_subscriber::EnvFilter::try_new(&directives).is_ok());
    }
}
