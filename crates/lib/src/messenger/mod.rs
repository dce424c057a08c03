//! Messenger platform plumbing: inbound webhook payloads, outbound message shapes, and the
//! Send API client.

mod outbound;
mod send;
mod webhook;

pub use outbound::{Choice, OutboundMessage};
pub use send::{GraphSendClient, SendApi, SendError};
pub use webhook::{
    EventError, InboundEvent, MessageBody, MessagingEvent, Participant, PostbackBody,
    QuickReplyBody, WebhookBatch, WebhookEntry,
};
