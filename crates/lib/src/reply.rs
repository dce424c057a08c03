//! Reply composition: canned messages, the image pool, and the cosmetic variant draw applied to
//! completion replies.

use crate::intent::Intent;
use crate::messenger::{Choice, OutboundMessage};
use crate::profile::PLACEHOLDER_NAME;
use chrono::{DateTime, Local};

pub const IMAGE_POOL: &[&str] = &[
    "https://images.unsplash.com/photo-1500530855697-b586d89ba3ee?q=80&w=1200&auto=format",
    "https://images.unsplash.com/photo-1511988617509-a57c8a288659?q=80&w=1200&auto=format",
    "https://images.unsplash.com/photo-1500534314209-a25ddb2bd429?q=80&w=1200&auto=format",
];

/// Chance that a completion reply is followed by a pooled image.
pub const IMAGE_FOLLOW_UP_CHANCE: f64 = 0.20;
/// Chance, when no image follows, that the reply is wrapped in a button template.
pub const BUTTONS_CHANCE: f64 = 0.25;

pub const ATTACHMENT_ACK: &str = "Nice! Got your attachment 😄";
pub const UNKNOWN_POSTBACK_ACK: &str = "Got it! 😊";
pub const VOICE_NOT_CONFIGURED: &str = "Set VOICE_SAMPLE_URL in .env to send voice notes 🎙️";

/// Source of the random decisions behind reply variety.
pub trait Draw: Send + Sync {
    /// Uniform value in `[0, 1)`.
    fn roll(&self) -> f64;
    /// Uniform index in `0..len`. `len` is never zero.
    fn pick(&self, len: usize) -> usize;
}

/// [`Draw`] backed by the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandDraw;

impl Draw for RandDraw {
    fn roll(&self) -> f64 {
        rand::random::<f64>()
    }

    fn pick(&self, len: usize) -> usize {
        rand::random_range(0..len)
    }
}

/// [`Draw`] returning the same roll and index every time. Each roll is compared independently,
/// so one value selects one branch of [`chat_reply`]: below 0.20 image follow-up, 0.20..0.25
/// buttons, otherwise plain text.
#[derive(Debug, Clone, Copy)]
pub struct FixedDraw {
    pub roll: f64,
    pub index: usize,
}

impl Draw for FixedDraw {
    fn roll(&self) -> f64 {
        self.roll
    }

    fn pick(&self, len: usize) -> usize {
        self.index % len
    }
}

pub fn menu() -> OutboundMessage {
    OutboundMessage::QuickReplies {
        text: "Pick one, sweetie 💞".to_string(),
        options: vec![
            Choice::new("Cute Text", "CUTE"),
            Choice::new("Send Image", "IMAGE"),
            Choice::new("Voice Note", "VOICE"),
        ],
    }
}

pub fn name_prompt() -> OutboundMessage {
    OutboundMessage::QuickReplies {
        text: "Hey! তোমার নাম কী? (Type: ‘আমার নাম …’ or ‘My name is …’)".to_string(),
        options: vec![Choice::new("Skip", "SKIP_NAME")],
    }
}

pub fn name_captured(name: &str) -> OutboundMessage {
    OutboundMessage::QuickReplies {
        text: format!("Cute name, {}! 💖 Shall we start?", name),
        options: vec![
            Choice::new("Show Menu", "MENU"),
            Choice::new("Send Image", "IMAGE"),
        ],
    }
}

pub fn skip_name_ack() -> OutboundMessage {
    OutboundMessage::text(format!("Alright! I’ll call you {} 💖", PLACEHOLDER_NAME))
}

pub fn random_image(draw: &dyn Draw) -> OutboundMessage {
    OutboundMessage::Image {
        url: IMAGE_POOL[draw.pick(IMAGE_POOL.len())].to_string(),
    }
}

/// Audio reply when a sample URL is configured, otherwise a hint on how to configure one.
pub fn voice(sample_url: Option<&str>) -> OutboundMessage {
    match sample_url {
        Some(url) => OutboundMessage::Audio {
            url: url.to_string(),
        },
        None => OutboundMessage::text(VOICE_NOT_CONFIGURED),
    }
}

pub fn time_now(now: DateTime<Local>) -> OutboundMessage {
    OutboundMessage::text(format!("Time now: {} ⏰", now.format("%-I:%M:%S %p")))
}

pub fn date_today(now: DateTime<Local>) -> OutboundMessage {
    OutboundMessage::text(format!("Date: {} 📅", now.format("%-m/%-d/%Y")))
}

/// Canned reply for a keyword intent. `None` for [`Intent::Chat`], which needs a completion.
pub fn for_intent(
    intent: Intent,
    voice_sample_url: Option<&str>,
    draw: &dyn Draw,
    now: DateTime<Local>,
) -> Option<OutboundMessage> {
    match intent {
        Intent::Menu => Some(menu()),
        Intent::Time => Some(time_now(now)),
        Intent::Date => Some(date_today(now)),
        Intent::Image => Some(random_image(draw)),
        Intent::Voice => Some(voice(voice_sample_url)),
        Intent::Chat => None,
    }
}

/// Wrap completion text in one of three shapes: text then image, button template, or plain text.
pub fn chat_reply(text: String, draw: &dyn Draw) -> Vec<OutboundMessage> {
    if draw.roll() < IMAGE_FOLLOW_UP_CHANCE {
        return vec![OutboundMessage::Text(text), random_image(draw)];
    }
    if draw.roll() < BUTTONS_CHANCE {
        return vec![OutboundMessage::Buttons {
            text,
            buttons: vec![
                Choice::new("Send Image 📸", "IMAGE"),
                Choice::new("Voice Note 🎙️", "VOICE"),
            ],
        }];
    }
    vec![OutboundMessage::Text(text)]
}
