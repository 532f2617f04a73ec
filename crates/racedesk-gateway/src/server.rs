// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the webhook gateway.

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use racedesk_agent::Orchestrator;
use racedesk_config::model::GatewayConfig;
use racedesk_core::{OutboundSender, PluginAdapter, RacedeskError};
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::telegram::TelegramSender;

/// State for the unauthenticated health endpoint.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
    /// Adapters probed on every `/health` request.
    pub components: Vec<Arc<dyn PluginAdapter>>,
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub orchestrator: Arc<Orchestrator>,
    /// `None` when no bot token is configured; replies are then only logged.
    pub telegram: Option<Arc<TelegramSender>>,
    pub whatsapp: Arc<dyn OutboundSender>,
    /// Telegram user ids that get the admin role.
    pub admin_ids: Arc<HashSet<i64>>,
    pub health: HealthState,
    /// Parent of every per-request cancellation token.
    pub shutdown: CancellationToken,
}

/// Listener address.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl From<&GatewayConfig> for ServerConfig {
    fn from(config: &GatewayConfig) -> Self {
        Self {
            host: config.bind_address.clone(),
            port: config.port,
        }
    }
}

/// All gateway routes:
/// - GET / and GET /health
/// - POST /webhook/wazzup
/// - POST /webhook/telegram
pub fn router(state: GatewayState) -> Router {
    Router::new()
        .route("/", get(handlers::get_root))
        .route("/health", get(handlers::get_health))
        .route("/webhook/wazzup", post(handlers::post_wazzup))
        .route("/webhook/telegram", post(handlers::post_telegram))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the gateway until `shutdown` is cancelled.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: CancellationToken,
) -> Result<(), RacedeskError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| RacedeskError::Channel {
            message: format!("failed to bind gateway to {addr}: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| RacedeskError::Channel {
            message: format!("gateway server error: {e}"),
            source: Some(Box::new(e)),
        })?;

    tracing::info!("gateway stopped");
    Ok(())
}
