use crate::models::message::{ChatMessage, Sender};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "New Chat";
pub const TITLE_MAX_CHARS: usize = 30;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatSession {
    pub id: String,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}

impl ChatSession {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: DEFAULT_TITLE.to_string(),
            messages: Vec::new(),
            created_at: now,
            last_updated: now,
        }
    }

    /// Replace the message sequence and recompute the title
    pub fn replace_messages(&mut self, messages: Vec<ChatMessage>) {
        self.title = derive_title(&messages);
        self.messages = messages;
        self.last_updated = Utc::now();
    }

    /// Append one message to the current sequence and recompute the title
    pub fn push_message(&mut self, message: ChatMessage) {
        self.messages.push(message);
        self.title = derive_title(&self.messages);
        self.last_updated = Utc::now();
    }
}

impl Default for ChatSession {
    fn default() -> Self {
        Self::new()
    }
}

/// Title from the first user message, cut at 30 characters with "..." appended
pub fn derive_title(messages: &[ChatMessage]) -> String {
    let Some(first) = messages.iter().find(|m| m.sender == Sender::User) else {
        return DEFAULT_TITLE.to_string();
    };

    let mut chars = first.text.chars();
    let head: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}
