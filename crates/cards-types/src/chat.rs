use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::card::{CardId, FocusedCardContext};
use crate::timestamp::parse_timestamp;

/// The AI backend's classification of what a chat message asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Intent {
    NoAction,
    CreateNew,
    Update,
    #[serde(other)]
    Unknown,
}

impl Intent {
    /// Whether the backend changed the card collection while handling the message
    pub fn mutates_cards(&self) -> bool {
        matches!(self, Intent::CreateNew | Intent::Update)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Intent::NoAction => "No action",
            Intent::CreateNew => "Created card",
            Intent::Update => "Updated card",
            Intent::Unknown => "Unknown",
        }
    }
}

/// One entry of the chat transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChatMessage {
    User {
        text: String,
        timestamp: DateTime<Utc>,
    },
    Assistant {
        text: String,
        intent: Intent,
        /// Always within [0, 1]
        confidence: f32,
        reasoning: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        related_card_id: Option<CardId>,
        timestamp: DateTime<Utc>,
    },
    SystemError {
        text: String,
        timestamp: DateTime<Utc>,
    },
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        ChatMessage::User {
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn system_error(text: impl Into<String>) -> Self {
        ChatMessage::SystemError {
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    /// Build the assistant entry for a reply, clamping confidence into [0, 1]
    /// and falling back to the local clock when the reply timestamp is unreadable.
    pub fn from_reply(reply: &ChatReply) -> Self {
        let confidence = if reply.confidence.is_nan() {
            0.0
        } else {
            reply.confidence.clamp(0.0, 1.0)
        };
        ChatMessage::Assistant {
            text: reply.response.clone(),
            intent: reply.intent,
            confidence,
            reasoning: reply.reasoning.clone(),
            related_card_id: reply.card_id,
            timestamp: parse_timestamp(&reply.timestamp).unwrap_or_else(Utc::now),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            ChatMessage::User { text, .. }
            | ChatMessage::Assistant { text, .. }
            | ChatMessage::SystemError { text, .. } => text,
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            ChatMessage::User { timestamp, .. }
            | ChatMessage::Assistant { timestamp, .. }
            | ChatMessage::SystemError { timestamp, .. } => *timestamp,
        }
    }
}

/// Outbound chat payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub session_id: Option<String>,
    /// Omitted entirely when nothing is focused
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub focused_card: Option<FocusedCardContext>,
}

/// Successful reply from the AI backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub response: String,
    pub intent: Intent,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub card_id: Option<CardId>,
    #[serde(default)]
    pub timestamp: String,
}

impl ChatReply {
    /// Card mutated out-of-band by the backend, if any
    pub fn mutated_card(&self) -> Option<CardId> {
        if self.intent.mutates_cards() {
            self.card_id
        } else {
            None
        }
    }

    /// Newly created card that should receive focus once it shows up locally
    pub fn created_card(&self) -> Option<CardId> {
        match self.intent {
            Intent::CreateNew => self.card_id,
            _ => None,
        }
    }
}

/// Result of an AI health probe
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiHealth {
    pub available: bool,
    pub remote_memory_enabled: bool,
}

impl AiHealth {
    pub fn unavailable() -> Self {
        Self::default()
    }
}
