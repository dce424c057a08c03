//! Inbound webhook payloads: the batch the platform POSTs and the events unpacked from it.

use serde::Deserialize;

/// Webhook POST body: `{ "object": "page", "entry": [ { "messaging": [ event ] } ] }`.
#[derive(Debug, Deserialize)]
pub struct WebhookBatch {
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub entry: Vec<WebhookEntry>,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEntry {
    /// The platform sends `null` here as well as omitting the field.
    #[serde(default)]
    pub messaging: Option<Vec<MessagingEvent>>,
}

/// One messaging event as delivered by the platform (only the fields the responder reads).
#[derive(Debug, Deserialize)]
pub struct MessagingEvent {
    #[serde(default)]
    pub sender: Option<Participant>,
    #[serde(default)]
    pub postback: Option<PostbackBody>,
    #[serde(default)]
    pub message: Option<MessageBody>,
}

#[derive(Debug, Deserialize)]
pub struct Participant {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct PostbackBody {
    #[serde(default)]
    pub payload: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct MessageBody {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub quick_reply: Option<QuickReplyBody>,
    #[serde(default)]
    pub attachments: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
pub struct QuickReplyBody {
    pub payload: String,
}

/// Event routed to the responder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Postback {
        sender: String,
        payload: String,
    },
    Message {
        sender: String,
        text: Option<String>,
        quick_reply: Option<String>,
        has_attachment: bool,
    },
}

impl InboundEvent {
    pub fn sender(&self) -> &str {
        match self {
            InboundEvent::Postback { sender, .. } | InboundEvent::Message { sender, .. } => sender,
        }
    }
}

/// Why a messaging event could not be turned into an [`InboundEvent`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventError {
    #[error("messaging event has no sender id")]
    MissingSender,
}

impl MessagingEvent {
    /// Unpack into an [`InboundEvent`]. `Ok(None)` when the event carries neither a postback
    /// payload nor a message (e.g. delivery or read receipts).
    pub fn into_inbound(self) -> Result<Option<InboundEvent>, EventError> {
        let sender = self
            .sender
            .map(|p| p.id)
            .filter(|id| !id.is_empty())
            .ok_or(EventError::MissingSender)?;
        if let Some(payload) = self
            .postback
            .and_then(|p| p.payload)
            .filter(|p| !p.is_empty())
        {
            return Ok(Some(InboundEvent::Postback { sender, payload }));
        }
        let Some(message) = self.message else {
            return Ok(None);
        };
        let text = message
            .text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
        Ok(Some(InboundEvent::Message {
            sender,
            text,
            quick_reply: message.quick_reply.map(|q| q.payload),
            has_attachment: message.attachments.is_some_and(|a| !a.is_empty()),
        }))
    }
}

impl WebhookBatch {
    /// True when the batch is addressed to a page subscription.
    pub fn is_page(&self) -> bool {
        self.object == "page"
    }

    /// First messaging event of each entry. Entries without events are skipped; events past the
    /// first in an entry are not processed.
    pub fn first_events(self) -> impl Iterator<Item = MessagingEvent> {
        self.entry
            .into_iter()
            .filter_map(|e| e.messaging.unwrap_or_default().into_iter().next())
    }
}
