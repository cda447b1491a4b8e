use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Stable identifier assigned to a card by the card service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub i64);

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A knowledge card as returned by the card service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    #[serde(default)]
    pub title: String,
    /// HTML-bearing body
    #[serde(default)]
    pub content: String,
    /// ISO-8601, as emitted by the backend
    #[serde(default)]
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl Card {
    pub fn new(id: CardId, title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            content: content.into(),
            created_at: chrono::Utc::now().to_rfc3339(),
            metadata: None,
        }
    }

    /// Novelty tag ("High", "Medium", "Low") attached by the card generator
    pub fn novelty(&self) -> Option<&str> {
        self.metadata.as_ref()?.get("novelty")?.as_str()
    }
}

/// Partial update of a card. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl CardPatch {
    pub fn title(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.metadata.is_none()
    }
}

/// The slice of a card sent to the AI backend as conversational context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FocusedCardContext {
    pub id: CardId,
    pub title: String,
    pub content: String,
}

impl FocusedCardContext {
    /// Build the context, keeping at most `max_chars` characters of content.
    pub fn from_card(card: &Card, max_chars: usize) -> Self {
        Self {
            id: card.id,
            title: card.title.clone(),
            content: truncate_chars(&card.content, max_chars).to_string(),
        }
    }
}

/// Longest prefix of `text` holding at most `max_chars` characters.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
