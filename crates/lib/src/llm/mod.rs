//! Completion service: chat message types, the backend trait, and the persona reply used as the
//! conversational fallback.

mod openai;

pub use openai::OpenAiClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Sent when the completion service gives no usable text.
pub const FALLBACK_REPLY: &str = "Hmm, say that again na? 😊";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("completion request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("completion api error: {0}")]
    Api(String),
    #[error("completion api key not configured")]
    MissingKey,
}

/// A chat completion endpoint. Returns the raw first-choice content, `None` when the response
/// carried none.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Option<String>, CompletionError>;
}

/// Persona preamble for the system message, parameterized by the user's display name.
pub fn persona_prompt(name: &str) -> String {
    format!(
        "You are a cute, flirty but SFW Bengali-English mixed chatbot.\n\
         Style: playful, sweet, romantic hints, emojis. Never explicit or adult.\n\
         Always keep replies short (1–3 sentences) and positive.\n\
         If user asks your name, say: \"আমি SweetMix Bot 💖\".\n\
         User's name: {name}.\n\
         Use Bangla base with a little English spice."
    )
}

/// One single-turn completion in the persona. Never fails: errors and blank output become
/// [`FALLBACK_REPLY`].
pub async fn persona_reply(backend: &dyn CompletionBackend, text: &str, name: &str) -> String {
    let messages = [ChatMessage::system(persona_prompt(name)), ChatMessage::user(text)];
    match backend.complete(&messages).await {
        Ok(Some(content)) if !content.trim().is_empty() => content.trim().to_string(),
        Ok(_) => {
            log::debug!("completion returned no content, using fallback reply");
            FALLBACK_REPLY.to_string()
        }
        Err(e) => {
            log::error!("completion failed: {}", e);
            FALLBACK_REPLY.to_string()
        }
    }
}
