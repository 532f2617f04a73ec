// SPDX-FileCopyrightText: 2026 Racedesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Webhook routes driven through the axum router.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use racedesk_agent::{BackgroundQueue, HybridEngine, Orchestrator};
use racedesk_booking::{BookingRules, BookingService};
use racedesk_config::model::AgentConfig;
use racedesk_core::types::ChatTurn;
use racedesk_core::{CapacityStore, ChatBackend, PluginAdapter, Sender, Stores};
use racedesk_gateway::handlers::VOICE_REPLY;
use racedesk_gateway::{GatewayState, HealthState, TelegramSender, router};
use racedesk_test_utils::{
    FixedWeather, MemoryStore, RecordingNotifier, RecordingSender, ScriptedChatBackend,
};
use racedesk_tools::ToolDispatcher;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

struct Fixture {
    state: GatewayState,
    store: Arc<MemoryStore>,
    primary: Arc<ScriptedChatBackend>,
    whatsapp: Arc<RecordingSender>,
}

fn fixture(primary: ScriptedChatBackend, telegram: Option<Arc<TelegramSender>>) -> Fixture {
    let store = Arc::new(MemoryStore::new());
    let primary = Arc::new(primary);
    let booking = Arc::new(BookingService::new(
        store.clone() as Arc<dyn CapacityStore>,
        BookingRules::default(),
    ));
    let weather = Arc::new(FixedWeather::new(20.0, "Clear", 1.0, 0.0));
    let tools = Arc::new(ToolDispatcher::new(
        booking,
        Stores::unified(store.clone()),
        weather.clone(),
    ));
    let (queue, _worker) =
        BackgroundQueue::spawn(16, Some(store.clone()), Arc::new(RecordingNotifier::new()));
    let orchestrator = Orchestrator::new(
        HybridEngine::new(Some(primary.clone() as Arc<dyn ChatBackend>), None),
        tools,
        store.clone(),
        queue,
        &AgentConfig::default(),
    );
    let whatsapp = Arc::new(RecordingSender::new());

    let state = GatewayState {
        orchestrator: Arc::new(orchestrator),
        telegram,
        whatsapp: whatsapp.clone(),
        admin_ids: Arc::new(HashSet::from([99])),
        health: HealthState {
            start_time: Instant::now(),
            components: vec![
                primary.clone() as Arc<dyn PluginAdapter>,
                weather as Arc<dyn PluginAdapter>,
            ],
        },
        shutdown: CancellationToken::new(),
    };
    Fixture {
        state,
        store,
        primary,
        whatsapp,
    }
}

async fn post(state: GatewayState, uri: &str, body: &str) -> (StatusCode, Value) {
    let response = router(state)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), 64 * 1024).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

async fn telegram_mock() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .mount(&server)
        .await;
    server
}

/// Bodies of `sendMessage` calls, waiting up to two seconds for `count` of them.
async fn sent_messages(server: &MockServer, count: usize) -> Vec<Value> {
    let deadline = Instant::now() + Duration::from_secs(2);
    loop {
        let sent: Vec<Value> = server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.url.path().ends_with("/sendMessage"))
            .filter_map(|r| serde_json::from_slice(&r.body).ok())
            .collect();
        if sent.len() >= count || Instant::now() > deadline {
            return sent;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
}

#[tokio::test]
async fn root_reports_running() {
    let fx = fixture(ScriptedChatBackend::new(), None);
    let response = router(fx.state)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&body[..], b"racedesk is running");
}

#[tokio::test]
async fn health_lists_components() {
    let fx = fixture(ScriptedChatBackend::new(), None);
    let response = router(fx.state)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value =
        serde_json::from_slice(&to_bytes(response.into_body(), 64 * 1024).await.unwrap()).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["components"].as_array().unwrap().len(), 2);
    assert_eq!(body["components"][0]["name"], "scripted-chat");
}

#[tokio::test]
async fn wazzup_inbound_messages_are_answered() {
    let fx = fixture(
        ScriptedChatBackend::with_turns(vec![ChatTurn::text("Hi! How many seats?")]),
        None,
    );
    let body = json!({
        "channelId": "chan-1",
        "messages": [
            {"text": "hello", "chatId": "77010001", "direction": "inbound", "type": "text"},
            {"text": "our echo", "chatId": "77010001", "direction": "outbound", "type": "text"}
        ]
    });

    let (status, ack) = post(fx.state.clone(), "/webhook/wazzup", &body.to_string()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack, json!({"status": "ok"}));
    assert_eq!(fx.primary.call_count(), 1);

    fx.state.orchestrator.background().flush().await;
    assert_eq!(
        fx.whatsapp.sent().await,
        vec![("77010001".to_string(), "Hi! How many seats?".to_string())]
    );
    let messages = fx.store.messages("WA-77010001").await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].sender, Sender::Client);
}

#[tokio::test]
async fn malformed_json_is_rejected() {
    let fx = fixture(ScriptedChatBackend::new(), None);
    let (status, body) = post(fx.state.clone(), "/webhook/wazzup", "{\"messages\": [").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("wazzup"));

    let (status, _) = post(fx.state, "/webhook/telegram", "not json").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn telegram_reply_is_sent_to_the_chat() {
    let api = telegram_mock().await;
    let sender = Arc::new(TelegramSender::new(&api.uri(), "TOKEN").unwrap());
    let fx = fixture(
        ScriptedChatBackend::with_turns(vec![ChatTurn::text("See you at 19:00!")]),
        Some(sender),
    );
    let update = json!({
        "update_id": 1,
        "message": {"message_id": 10, "chat": {"id": 555}, "from": {"id": 1}, "text": "book me"}
    });

    let (status, _) = post(fx.state.clone(), "/webhook/telegram", &update.to_string()).await;
    assert_eq!(status, StatusCode::OK);

    let sent = sent_messages(&api, 1).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0]["chat_id"], "555");
    assert_eq!(sent[0]["text"], "See you at 19:00!");

    let requests = fx.primary.requests().await;
    assert!(requests[0].system.contains("sales manager"));
    assert!(!fx.store.messages("TG-555").await.is_empty());
}

#[tokio::test]
async fn allow_listed_sender_gets_admin_profile() {
    let api = telegram_mock().await;
    let sender = Arc::new(TelegramSender::new(&api.uri(), "TOKEN").unwrap());
    let fx = fixture(
        ScriptedChatBackend::with_turns(vec![ChatTurn::text("Revenue is up.")]),
        Some(sender),
    );
    let update = json!({
        "update_id": 2,
        "message": {"message_id": 11, "chat": {"id": 99}, "from": {"id": 99}, "text": "how are sales?"}
    });

    post(fx.state.clone(), "/webhook/telegram", &update.to_string()).await;
    sent_messages(&api, 1).await;

    let requests = fx.primary.requests().await;
    assert!(requests[0].system.contains("analytics"));
    assert!(
        requests[0]
            .tools
            .iter()
            .any(|t| t.name == "GetSalesDetailTool")
    );
}

#[tokio::test]
async fn voice_message_gets_canned_reply() {
    let api = telegram_mock().await;
    let sender = Arc::new(TelegramSender::new(&api.uri(), "TOKEN").unwrap());
    let fx = fixture(ScriptedChatBackend::new(), Some(sender));
    let update = json!({
        "update_id": 3,
        "message": {"message_id": 12, "chat": {"id": 7}, "from": {"id": 7}, "voice": {"file_id": "f1", "duration": 2}}
    });

    let (status, _) = post(fx.state.clone(), "/webhook/telegram", &update.to_string()).await;
    assert_eq!(status, StatusCode::OK);

    let sent = sent_messages(&api, 1).await;
    assert_eq!(sent[0]["text"], VOICE_REPLY);
    assert_eq!(fx.primary.call_count(), 0);
}

#[tokio::test]
async fn update_without_message_is_acknowledged() {
    let fx = fixture(ScriptedChatBackend::new(), None);
    let (status, ack) = post(fx.state, "/webhook/telegram", r#"{"update_id": 4}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["status"], "ok");
}
