use thiserror::Error;

use crate::card::CardId;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CardsError {
    #[error("Network error: {0}")]
    Transport(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Card {0} not found")]
    NotFound(CardId),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("AI assistant is unavailable")]
    Unavailable,

    #[error("A chat message is already awaiting a reply")]
    Busy,

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for CardsError {
    fn from(e: serde_json::Error) -> Self {
        CardsError::Serialization(e.to_string())
    }
}
