//! Outbound message shapes and their Send API envelope.

use serde_json::{json, Value};

/// A (title, payload) pair used by quick replies and postback buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub title: String,
    pub payload: String,
}

impl Choice {
    pub fn new(title: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            payload: payload.into(),
        }
    }
}

/// One message the responder can send. Lengths and URLs are not validated locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundMessage {
    Text(String),
    QuickReplies { text: String, options: Vec<Choice> },
    Buttons { text: String, buttons: Vec<Choice> },
    Image { url: String },
    Audio { url: String },
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        OutboundMessage::Text(text.into())
    }

    /// Text carried by the message, if any (attachments have none).
    pub fn text_content(&self) -> Option<&str> {
        match self {
            OutboundMessage::Text(t) => Some(t),
            OutboundMessage::QuickReplies { text, .. } | OutboundMessage::Buttons { text, .. } => {
                Some(text)
            }
            OutboundMessage::Image { .. } | OutboundMessage::Audio { .. } => None,
        }
    }

    /// The `message` object of the Send API body.
    fn message_body(&self) -> Value {
        match self {
            OutboundMessage::Text(text) => json!({ "text": text }),
            OutboundMessage::QuickReplies { text, options } => json!({
                "text": text,
                "quick_replies": options
                    .iter()
                    .map(|o| json!({
                        "content_type": "text",
                        "title": o.title,
                        "payload": o.payload,
                    }))
                    .collect::<Vec<_>>(),
            }),
            OutboundMessage::Buttons { text, buttons } => json!({
                "attachment": {
                    "type": "template",
                    "payload": {
                        "template_type": "button",
                        "text": text,
                        "buttons": buttons
                            .iter()
                            .map(|b| json!({
                                "type": "postback",
                                "title": b.title,
                                "payload": b.payload,
                            }))
                            .collect::<Vec<_>>(),
                    }
                }
            }),
            OutboundMessage::Image { url } => json!({
                "attachment": {
                    "type": "image",
                    "payload": { "url": url, "is_reusable": true }
                }
            }),
            OutboundMessage::Audio { url } => json!({
                "attachment": {
                    "type": "audio",
                    "payload": { "url": url }
                }
            }),
        }
    }

    /// Full Send API body for `recipient`. Attachment messages carry no `messaging_type`.
    pub fn envelope(&self, recipient: &str) -> Value {
        let mut body = json!({
            "recipient": { "id": recipient },
            "message": self.message_body(),
        });
        if !matches!(
            self,
            OutboundMessage::Image { .. } | OutboundMessage::Audio { .. }
        ) {
            body["messaging_type"] = Value::String("RESPONSE".to_string());
        }
        body
    }
}
