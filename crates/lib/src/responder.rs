//! Event dispatch: route each inbound event to the postback or text handler, decide the reply,
//! and deliver it through the Send API.
//!
//! Text handling is a small per-user state machine on the profile name. While the name is unset
//! the user is asked for it (or may skip); once set, keyword intents get canned replies and
//! everything else goes to the completion service.

use crate::config::{self, Config};
use crate::intent;
use crate::llm::{self, CompletionBackend, OpenAiClient};
use crate::messenger::{
    EventError, GraphSendClient, InboundEvent, OutboundMessage, SendApi, SendError, WebhookBatch,
};
use crate::profile::{MemoryProfileStore, ProfileError, ProfileStore, PLACEHOLDER_NAME};
use crate::reply::{self, Draw, RandDraw};
use chrono::Local;
use std::sync::Arc;

/// Postback tags the responder acts on. Anything else gets a generic acknowledgement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostbackAction {
    Menu,
    Image,
    Voice,
    SkipName,
}

impl PostbackAction {
    pub fn parse(payload: &str) -> Option<Self> {
        match payload {
            "MENU" => Some(Self::Menu),
            "IMAGE" => Some(Self::Image),
            "VOICE" => Some(Self::Voice),
            "SKIP_NAME" => Some(Self::SkipName),
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Event(#[from] EventError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
}

/// Conversation responder. Cheap to clone; all collaborators are shared.
#[derive(Clone)]
pub struct Responder {
    profiles: Arc<dyn ProfileStore>,
    sender: Arc<dyn SendApi>,
    completion: Arc<dyn CompletionBackend>,
    draw: Arc<dyn Draw>,
    voice_sample_url: Option<String>,
}

impl Responder {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        sender: Arc<dyn SendApi>,
        completion: Arc<dyn CompletionBackend>,
    ) -> Self {
        Self {
            profiles,
            sender,
            completion,
            draw: Arc::new(RandDraw),
            voice_sample_url: None,
        }
    }

    /// Production wiring: in-memory profiles, Graph Send API, OpenAI-compatible completions.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(MemoryProfileStore::new()),
            Arc::new(GraphSendClient::from_config(config)),
            Arc::new(OpenAiClient::from_config(config)),
        )
        .with_voice_sample_url(config::resolve_voice_sample_url(config))
    }

    pub fn with_draw(mut self, draw: Arc<dyn Draw>) -> Self {
        self.draw = draw;
        self
    }

    pub fn with_voice_sample_url(mut self, url: Option<String>) -> Self {
        self.voice_sample_url = url.filter(|u| !u.trim().is_empty());
        self
    }

    /// Handle the first messaging event of every entry, in order. Stops at the first error.
    /// Returns the number of events handled.
    pub async fn dispatch(&self, batch: WebhookBatch) -> Result<usize, DispatchError> {
        let mut handled = 0;
        for event in batch.first_events() {
            let Some(event) = event.into_inbound()? else {
                continue;
            };
            self.handle_event(event).await?;
            handled += 1;
        }
        Ok(handled)
    }

    pub async fn handle_event(&self, event: InboundEvent) -> Result<(), DispatchError> {
        log::debug!("inbound event from {}", event.sender());
        match event {
            InboundEvent::Postback { sender, payload } => {
                self.handle_postback(&sender, &payload).await
            }
            InboundEvent::Message {
                sender,
                text,
                quick_reply,
                has_attachment,
            } => {
                if let Some(action) = quick_reply.as_deref().and_then(PostbackAction::parse) {
                    return self.run_action(&sender, action).await;
                }
                if let Some(text) = text {
                    return self.handle_text(&sender, &text).await;
                }
                if has_attachment {
                    let _ = self.deliver(&sender, &OutboundMessage::text(reply::ATTACHMENT_ACK)).await;
                }
                Ok(())
            }
        }
    }

    pub async fn handle_postback(&self, psid: &str, payload: &str) -> Result<(), DispatchError> {
        match PostbackAction::parse(payload) {
            Some(action) => self.run_action(psid, action).await,
            None => {
                log::debug!("unknown postback payload from {}: {}", psid, payload);
                let _ = self.deliver(psid, &OutboundMessage::text(reply::UNKNOWN_POSTBACK_ACK)).await;
                Ok(())
            }
        }
    }

    async fn run_action(&self, psid: &str, action: PostbackAction) -> Result<(), DispatchError> {
        let messages = match action {
            PostbackAction::Menu => vec![reply::menu()],
            PostbackAction::Image => vec![reply::random_image(self.draw.as_ref())],
            PostbackAction::Voice => vec![reply::voice(self.voice_sample_url.as_deref())],
            PostbackAction::SkipName => {
                self.profiles.set_name(psid, PLACEHOLDER_NAME).await?;
                vec![reply::skip_name_ack(), reply::menu()]
            }
        };
        self.deliver_all(psid, messages).await;
        Ok(())
    }

    pub async fn handle_text(&self, psid: &str, text: &str) -> Result<(), DispatchError> {
        let profile = self.profiles.get_or_create(psid).await?;
        self.profiles.touch(psid).await?;

        if profile.name.is_none() {
            let message = match intent::capture_name(text) {
                Some(name) => {
                    self.profiles.set_name(psid, &name).await?;
                    log::info!("captured name for {}", psid);
                    reply::name_captured(&name)
                }
                None => reply::name_prompt(),
            };
            let _ = self.deliver(psid, &message).await;
            return Ok(());
        }

        let intent = intent::classify(text);
        let canned = reply::for_intent(
            intent,
            self.voice_sample_url.as_deref(),
            self.draw.as_ref(),
            Local::now(),
        );
        if let Some(message) = canned {
            let _ = self.deliver(psid, &message).await;
            return Ok(());
        }
        let answer =
            llm::persona_reply(self.completion.as_ref(), text, profile.display_name()).await;
        let messages = reply::chat_reply(answer, self.draw.as_ref());
        self.deliver_all(psid, messages).await;
        Ok(())
    }

    /// Send one message. Failures are logged and returned; handlers do not act on them.
    pub async fn deliver(&self, psid: &str, message: &OutboundMessage) -> Result<(), SendError> {
        let result = self.sender.send(psid, message).await;
        if let Err(ref e) = result {
            log::error!("send to {} failed: {}", psid, e);
        }
        result
    }

    /// Send messages in order, continuing past failures. Returns how many were accepted.
    pub async fn deliver_all(&self, psid: &str, messages: Vec<OutboundMessage>) -> usize {
        let mut sent = 0;
        for message in &messages {
            if self.deliver(psid, message).await.is_ok() {
                sent += 1;
            }
        }
        sent
    }
}
