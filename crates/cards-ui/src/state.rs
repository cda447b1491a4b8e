//! UI-level state that drives rendering.
//! A read-only projection of the cards runtime, refreshed each frame from
//! its snapshot after the EventBus has been drained.

use cards_core::conversation::ConversationState;
use cards_core::runtime::RuntimeSnapshot;
use cards_types::card::{Card, CardId};
use cards_types::event::AppEvent;

/// State visible to UI panels
pub struct UiState {
    /// Latest runtime read model
    pub snapshot: RuntimeSnapshot,
    /// Chat input field
    pub chat_input: String,
    /// Add-card form fields
    pub card_text: String,
    pub card_title: String,
    /// Rename buffer for the focused card
    pub rename_text: String,
    rename_for: Option<CardId>,
    /// Card the carousel should scroll to on the next frame
    pub scroll_target: Option<CardId>,
    /// Banner for failed card/AI operations
    pub notice: Option<String>,
    /// Whether settings panel is open
    pub show_settings: bool,
    /// Status line text
    pub status_text: String,
}

impl UiState {
    pub fn new() -> Self {
        Self {
            snapshot: RuntimeSnapshot::default(),
            chat_input: String::new(),
            card_text: String::new(),
            card_title: String::new(),
            rename_text: String::new(),
            rename_for: None,
            scroll_target: None,
            notice: None,
            show_settings: false,
            status_text: "Loading...".to_string(),
        }
    }

    /// Process events from the EventBus and update UI state
    pub fn process_events(&mut self, events: Vec<AppEvent>) {
        for event in events {
            match event {
                AppEvent::CardsRefreshed { count } => {
                    self.status_text = match count {
                        1 => "1 card".to_string(),
                        n => format!("{} cards", n),
                    };
                }
                AppEvent::CardCreated { id } => {
                    self.status_text = format!("Card {} created", id);
                }
                AppEvent::CardUpdated { id } => {
                    self.status_text = format!("Card {} saved", id);
                }
                AppEvent::CardDeleted { id } => {
                    self.status_text = format!("Card {} deleted", id);
                }
                AppEvent::FocusChanged { card_id, reason } => {
                    if reason.wants_scroll() {
                        self.scroll_target = card_id;
                    }
                }
                AppEvent::ChatSent => {
                    self.status_text = "Thinking...".to_string();
                }
                AppEvent::ChatReplied { intent } => {
                    self.status_text = if intent.mutates_cards() {
                        intent.label().to_string()
                    } else {
                        "Ready".to_string()
                    };
                }
                AppEvent::ChatFailed { message } => {
                    self.status_text = format!("Error: {}", message);
                }
                AppEvent::ChatCleared => {
                    self.status_text = "Ready".to_string();
                }
                AppEvent::AvailabilityChanged { available, .. } => {
                    self.status_text = if available {
                        "AI online".to_string()
                    } else {
                        "AI offline".to_string()
                    };
                }
                AppEvent::Notice { message } => {
                    self.notice = Some(message);
                }
            }
        }
    }

    /// Replace the read model. The rename buffer follows the focused card.
    pub fn apply_snapshot(&mut self, snapshot: RuntimeSnapshot) {
        self.snapshot = snapshot;
        let focused = self.snapshot.focused;
        if focused != self.rename_for {
            self.rename_for = focused;
            self.rename_text = self
                .snapshot
                .focused_card()
                .map(|c| c.title.clone())
                .unwrap_or_default();
        }
    }

    pub fn focused_card(&self) -> Option<&Card> {
        self.snapshot.focused_card()
    }

    pub fn is_busy(&self) -> bool {
        self.snapshot.conversation == ConversationState::AwaitingReply
    }

    pub fn ai_available(&self) -> bool {
        self.snapshot.availability.available
    }

    /// Chat input is accepted only with the assistant up and nothing in flight
    pub fn can_send(&self) -> bool {
        self.ai_available() && !self.is_busy() && !self.chat_input.trim().is_empty()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}
