//! Free-text classification: name capture for unnamed users and keyword intents for named ones.
//!
//! Keyword matching is plain substring containment on the lowercased text, evaluated in the
//! order of [`KEYWORD_INTENTS`]; the first set with a hit wins. Bangla and English keywords in
//! one set are synonyms.

use regex::Regex;
use std::sync::OnceLock;

/// Longest captured name, in characters.
pub const MAX_NAME_CHARS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Menu,
    Time,
    Date,
    Image,
    Voice,
    /// No keyword matched; answer through the completion service.
    Chat,
}

/// Ordered keyword table. Some Bangla words appear twice because they have two common Unicode
/// spellings (precomposed and decomposed য়).
pub const KEYWORD_INTENTS: &[(Intent, &[&str])] = &[
    (Intent::Menu, &["menu", "মেনু"]),
    (Intent::Time, &["time", "\u{9b8}\u{9ae}\u{9df}", "\u{9b8}\u{9ae}\u{9af}\u{9bc}"]),
    (Intent::Date, &["date", "তারিখ"]),
    (Intent::Image, &["image", "ইমেজ", "photo", "ছবি"]),
    (
        Intent::Voice,
        &["voice", "\u{9ad}\u{9df}\u{9c7}\u{9b8}", "\u{9ad}\u{9af}\u{9bc}\u{9c7}\u{9b8}", "audio"],
    ),
];

/// Classify text from a user whose name is already known.
pub fn classify(text: &str) -> Intent {
    let lower = text.to_lowercase();
    KEYWORD_INTENTS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(intent, _)| *intent)
        .unwrap_or(Intent::Chat)
}

fn name_phrase() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        // Longer Bangla phrasing first so "আমার নামটা" is not read as "আমার নাম" + "টা".
        Regex::new(r"(?i)(?:my name is|আমার নামটা|আমার নাম|i am)\s+")
            .expect("name phrase pattern")
    })
}

/// Extract a display name from phrasings like "My name is Rupa!" or "আমার নাম রুপা।".
///
/// Takes the text after the last matching phrase, cuts it at the first `.`, `,` or `!`, trims it
/// and keeps at most [`MAX_NAME_CHARS`] characters. `None` when no phrase matches or the capture
/// is empty.
pub fn capture_name(text: &str) -> Option<String> {
    let last = name_phrase().find_iter(text).last()?;
    let rest = &text[last.end()..];
    let cut = rest.split(['.', ',', '!']).next().unwrap_or("").trim();
    let name: String = cut.chars().take(MAX_NAME_CHARS).collect();
    let name = name.trim_end().to_string();
    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
