#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// Who produced a turn. Internal roles are mapped to the provider's wire
/// roles at the gateway boundary, never stored in provider vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    /// Role name expected by the chat-completion API.
    pub fn provider_role(self) -> &'static str {
        match self {
            Speaker::User => "user",
            Speaker::Assistant => "assistant",
        }
    }
}

/// One message in the conversation. The upstream API models a message as one
/// or more text parts; all parts are concatenated for processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    pub speaker: Speaker,
    pub parts: Vec<String>,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            parts: vec![text.into()],
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            parts: vec![text.into()],
        }
    }

    /// All parts joined into the single string the rest of the system works with.
    pub fn text(&self) -> String {
        self.parts.join("\n")
    }
}

/// Ordered, append-only log of the conversation. Insertion order IS the
/// conversation order. Turns are never edited or truncated; the only
/// mutation is appending, so `turns()` hands out an immutable view.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transcript opened by the fixed assistant greeting, the state every
    /// session starts in.
    pub fn seeded(greeting: &str) -> Self {
        Self {
            turns: vec![Turn::assistant(greeting)],
        }
    }

    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
