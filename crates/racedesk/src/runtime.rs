// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builds the shared component graph from configuration.
//!
//! Every backend, store and sender is constructed once here and handed out
//! as an `Arc`; `serve` and `chat` both start from [`Runtime::build`].

use std::sync::Arc;
use std::time::Duration;

use racedesk_agent::{BackgroundQueue, HybridEngine, Orchestrator};
use racedesk_booking::{BookingRules, BookingService};
use racedesk_config::RacedeskConfig;
use racedesk_core::{
    ChatBackend, PluginAdapter, RacedeskError, Stores, TextBackend, WeatherProvider,
    is_configured,
};
use racedesk_gateway::{TelegramSender, admin_notifier};
use racedesk_gemini::GeminiBackend;
use racedesk_openai::OpenAiBackend;
use racedesk_storage::SqliteStore;
use racedesk_tools::ToolDispatcher;
use racedesk_weather::OpenWeatherMap;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// How long shutdown waits for queued background work.
const DRAIN_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Runtime {
    pub orchestrator: Arc<Orchestrator>,
    pub telegram: Option<Arc<TelegramSender>>,
    pub store: Arc<SqliteStore>,
    /// Adapters reported on `/health`.
    pub components: Vec<Arc<dyn PluginAdapter>>,
    worker: JoinHandle<()>,
}

impl Runtime {
    pub async fn build(config: &RacedeskConfig) -> Result<Self, RacedeskError> {
        let store = Arc::new(SqliteStore::open(&config.storage, &config.business).await?);
        let stores = Stores::unified(store.clone());
        let mut components: Vec<Arc<dyn PluginAdapter>> = Vec::new();
        components.push(store.clone());

        let primary: Option<Arc<dyn ChatBackend>> =
            if is_configured(config.openai.api_key.as_deref()) {
                let backend = Arc::new(OpenAiBackend::new(&config.openai)?);
                components.push(backend.clone());
                info!(model = %config.openai.model, "primary backend: openai");
                Some(backend as Arc<dyn ChatBackend>)
            } else {
                warn!("openai.api_key not set, primary backend disabled");
                None
            };

        let fallback: Option<Arc<dyn TextBackend>> =
            if is_configured(config.gemini.api_key.as_deref()) {
                let backend = Arc::new(GeminiBackend::new(&config.gemini)?);
                components.push(backend.clone());
                info!(model = %config.gemini.model, "fallback backend: gemini");
                Some(backend as Arc<dyn TextBackend>)
            } else {
                warn!("gemini.api_key not set, fallback backend disabled");
                None
            };

        let weather = Arc::new(OpenWeatherMap::new(&config.weather)?);
        components.push(weather.clone());

        let telegram = TelegramSender::from_config(&config.telegram)?.map(Arc::new);
        if telegram.is_none() {
            warn!("telegram.bot_token not set, telegram replies will only be logged");
        }
        let notifier = admin_notifier(&config.telegram, telegram.clone());

        let (queue, worker) = BackgroundQueue::spawn(
            config.agent.background_queue_capacity,
            stores.analytics.clone(),
            notifier,
        );

        let booking = Arc::new(BookingService::new(
            stores.capacity.clone(),
            BookingRules::from(&config.business),
        ));
        let tools = Arc::new(ToolDispatcher::new(
            booking,
            stores.clone(),
            weather as Arc<dyn WeatherProvider>,
        ));

        let orchestrator = Orchestrator::new(
            HybridEngine::new(primary, fallback),
            tools,
            stores.context.clone(),
            queue,
            &config.agent,
        );

        Ok(Self {
            orchestrator: Arc::new(orchestrator),
            telegram,
            store,
            components,
            worker,
        })
    }

    /// Drains the background queue and closes the store.
    ///
    /// The worker stops once every queue handle is gone, so callers must
    /// drop their own clones of the orchestrator first.
    pub async fn shutdown(self) {
        let Runtime {
            orchestrator,
            store,
            worker,
            ..
        } = self;
        orchestrator.background().flush().await;
        drop(orchestrator);

        match tokio::time::timeout(DRAIN_TIMEOUT, worker).await {
            Ok(_) => info!("background work drained"),
            Err(_) => warn!("background worker still busy after {DRAIN_TIMEOUT:?}, abandoning it"),
        }
        if let Err(e) = store.close().await {
            warn!(error = %e, "failed to close database cleanly");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn builds_without_any_credentials() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = RacedeskConfig::default();
        config.storage.database_path = dir.path().join("r.db").display().to_string();
        config.openai.api_key = None;
        config.gemini.api_key = None;
        config.weather.api_key = None;
        config.telegram.bot_token = None;

        let runtime = Runtime::build(&config).await.unwrap();
        assert!(runtime.telegram.is_none());
        assert!(runtime.orchestrator.engine().primary().is_none());
        // store + weather stub
        assert_eq!(runtime.components.len(), 2);

        let reply = runtime
            .orchestrator
            .process_message("CLI-local", "hello", false)
            .await
            .unwrap();
        assert_eq!(reply.text, racedesk_agent::prompts::OVERLOAD_REPLY);

        runtime.shutdown().await;
    }
}
