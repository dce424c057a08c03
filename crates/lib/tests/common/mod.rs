//! Recording mocks for [`SendApi`] and [`CompletionBackend`] plus a helper that serves the
//! gateway router on a free local port.

#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use sweetmix_core::config::Config;
use sweetmix_core::gateway::{self, GatewayState};
use sweetmix_core::llm::{ChatMessage, CompletionBackend, CompletionError};
use sweetmix_core::messenger::{OutboundMessage, SendApi, SendError};
use sweetmix_core::profile::MemoryProfileStore;
use sweetmix_core::reply::FixedDraw;
use sweetmix_core::responder::Responder;

pub const VERIFY_TOKEN: &str = "test-verify-token";

/// Records every send as (recipient, message); always succeeds.
#[derive(Default)]
pub struct RecordingSender {
    sent: Mutex<Vec<(String, OutboundMessage)>>,
}

impl RecordingSender {
    pub fn sent(&self) -> Vec<(String, OutboundMessage)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn take(&self) -> Vec<OutboundMessage> {
        std::mem::take(&mut *self.sent.lock().unwrap())
            .into_iter()
            .map(|(_, m)| m)
            .collect()
    }
}

#[async_trait]
impl SendApi for RecordingSender {
    async fn send(&self, recipient: &str, message: &OutboundMessage) -> Result<(), SendError> {
        self.sent
            .lock()
            .unwrap()
            .push((recipient.to_string(), message.clone()));
        Ok(())
    }
}

/// Records each request and answers with a fixed text.
pub struct RecordingCompletion {
    reply: String,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl RecordingCompletion {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionBackend for RecordingCompletion {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Option<String>, CompletionError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        Ok(Some(self.reply.clone()))
    }
}

pub struct TestGateway {
    pub base_url: String,
    pub profiles: MemoryProfileStore,
    pub sender: Arc<RecordingSender>,
    pub completion: Arc<RecordingCompletion>,
    pub client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Start the gateway router on 127.0.0.1 with recording collaborators and a fixed draw
/// (`roll` picks the completion reply shape, index 0 picks the first pooled image).
pub async fn start_gateway(roll: f64) -> TestGateway {
    let profiles = MemoryProfileStore::new();
    let sender = Arc::new(RecordingSender::default());
    let completion = Arc::new(RecordingCompletion::new("  aww, hello 💖  "));
    let responder = Responder::new(
        Arc::new(profiles.clone()),
        sender.clone(),
        completion.clone(),
    )
    .with_draw(Arc::new(FixedDraw { roll, index: 0 }));

    let mut state = GatewayState::new(&Config::default(), responder);
    state.verify_token = Some(VERIFY_TOKEN.to_string());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let port = listener.local_addr().expect("local_addr").port();
    let handle = tokio::spawn(async move {
        let _ = gateway::serve(listener, state).await;
    });

    TestGateway {
        base_url: format!("http://127.0.0.1:{}", port),
        profiles,
        sender,
        completion,
        client: reqwest::Client::new(),
        handle,
    }
}

/// A single-entry page batch with one messaging event.
pub fn page_batch(event: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "object": "page",
        "entry": [ { "id": "page-1", "time": 0, "messaging": [ event ] } ]
    })
}

pub fn text_event(psid: &str, text: &str) -> serde_json::Value {
    serde_json::json!({
        "sender": { "id": psid },
        "recipient": { "id": "page-1" },
        "timestamp": 0,
        "message": { "mid": "m-1", "text": text }
    })
}

pub fn postback_event(psid: &str, payload: &str) -> serde_json::Value {
    serde_json::json!({
        "sender": { "id": psid },
        "recipient": { "id": "page-1" },
        "timestamp": 0,
        "postback": { "title": "button", "payload": payload }
    })
}
