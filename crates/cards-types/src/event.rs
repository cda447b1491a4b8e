use serde::{Deserialize, Serialize};

use crate::card::CardId;
use crate::chat::Intent;

/// Why the focused card changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusReason {
    /// Viewport geometry pass
    Scroll,
    /// User clicked a card in the carousel
    Click,
    /// Card list replaced or shrunk
    CardsChanged,
    /// A card created by the assistant appeared in the list
    Created,
}

impl FocusReason {
    /// Programmatic focus that the carousel should scroll into view
    pub fn wants_scroll(&self) -> bool {
        matches!(self, FocusReason::Click | FocusReason::Created)
    }
}

/// Events emitted by the cards runtime.
/// UI subscribes to these for reactive updates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    /// Card list re-fetched from the card service
    CardsRefreshed { count: usize },
    CardCreated { id: CardId },
    CardUpdated { id: CardId },
    CardDeleted { id: CardId },
    FocusChanged { card_id: Option<CardId>, reason: FocusReason },
    /// A chat message went out and a reply is awaited
    ChatSent,
    ChatReplied { intent: Intent },
    ChatFailed { message: String },
    ChatCleared,
    AvailabilityChanged { available: bool, remote_memory_enabled: bool },
    /// Transient user-visible error
    Notice { message: String },
}
