use chrono::Utc;
use serde::{Deserialize, Serialize};

/// One transcript entry. Insertion order is the canonical conversation
/// order; transcripts are append-only and never reordered or truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl ChatMessage {
    pub fn now(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    /// Wire name used by the generation service API.
    pub fn as_wire(&self) -> &'static str {
        match self {
            ChatRole::User => "user",
            ChatRole::Assistant => "assistant",
        }
    }
}
