//! Coarse intent classification of incoming messages.
//!
//! Classification is an ordered, total function: every string maps to exactly
//! one [`Intent`], and the first matching rule wins.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum::{AsRefStr, Display};

/// Fully-anchored `local@domain.tld` shape.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@]+@[^@]+\.[^@]+$").expect("email pattern is a valid regex")
});

/// Greetings and acknowledgements recognised as small talk.
pub const DEFAULT_SMALL_TALK: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "greetings",
    "good morning",
    "good afternoon",
    "good evening",
    "thanks",
    "thank you",
    "ok",
    "okay",
    "cool",
    "great",
    "bye",
    "goodbye",
];

/// Messages with fewer words than this are treated as short input.
const MIN_REQUEST_WORDS: usize = 3;

/// The classifier's categorical judgment of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Intent {
    SmallTalk,
    Email,
    ShortInput,
    FullRequest,
}

/// Maps raw text to an [`Intent`].
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    small_talk: HashSet<String>,
}

impl IntentClassifier {
    /// Creates a classifier with a custom small-talk vocabulary.
    ///
    /// Entries are normalized the same way as incoming text.
    pub fn new<I, S>(small_talk: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            small_talk: small_talk
                .into_iter()
                .map(|word| normalize(word.as_ref()))
                .filter(|word| !word.is_empty())
                .collect(),
        }
    }

    /// Classifies `text`.
    ///
    /// Rules, in order: small-talk vocabulary, email shape, fewer than three
    /// words, otherwise a full request.
    pub fn classify(&self, text: &str) -> Intent {
        let normalized = normalize(text);

        if self.small_talk.contains(&normalized) {
            return Intent::SmallTalk;
        }
        if EMAIL_PATTERN.is_match(&normalized) {
            return Intent::Email;
        }
        if normalized.split_whitespace().count() < MIN_REQUEST_WORDS {
            return Intent::ShortInput;
        }
        Intent::FullRequest
    }
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_SMALL_TALK)
    }
}

/// Classifies `text` with the default vocabulary.
pub fn classify(text: &str) -> Intent {
    static DEFAULT: Lazy<IntentClassifier> = Lazy::new(IntentClassifier::default);
    DEFAULT.classify(text)
}

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}
