//! Port traits: the hexagonal architecture boundary.
//!
//! These traits are defined here in `cards-core` (pure Rust).
//! Implementations live in `cards-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use async_trait::async_trait;
use futures::future::LocalBoxFuture;
use cards_types::{
    Result,
    card::{Card, CardId, CardPatch, FocusedCardContext},
    chat::{AiHealth, ChatReply, ChatRequest},
};

// ─── Card Port ───────────────────────────────────────────────

#[async_trait(?Send)]
pub trait CardPort {
    /// All cards, in carousel order
    async fn list_cards(&self) -> Result<Vec<Card>>;

    /// Turn free text into a new card; returns the id the service assigned
    async fn create_card(&self, text: &str, title: Option<&str>) -> Result<CardId>;

    /// Apply a partial update and return the updated card
    async fn update_card(&self, id: CardId, patch: &CardPatch) -> Result<Card>;

    async fn delete_card(&self, id: CardId) -> Result<()>;
}

// ─── AI Port ─────────────────────────────────────────────────

#[async_trait(?Send)]
pub trait AiPort {
    /// Probe the backend. `None` means unreachable or not healthy.
    async fn health(&self) -> Option<AiHealth>;

    async fn chat(&self, req: &ChatRequest) -> Result<ChatReply>;

    async fn set_session_focus(&self, session_id: &str, card: &FocusedCardContext) -> Result<()>;

    async fn clear_session_focus(&self, session_id: &str) -> Result<()>;
}

// ─── Viewport Port ───────────────────────────────────────────

/// Horizontal position of one laid-out card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardGeometry {
    pub id: CardId,
    pub center: f32,
}

/// Geometry of the scrollable card surface, sampled on demand.
pub trait ViewportPort {
    /// Card-list revision this layout was produced from
    fn revision(&self) -> u64;

    /// Center of the visible region, in the same coordinates as the cards
    fn center(&self) -> f32;

    /// Per-card geometry, in card-list order
    fn card_geometry(&self) -> Vec<CardGeometry>;
}

// ─── Task Port ───────────────────────────────────────────────

/// Detached task spawning and timers (single-threaded executor).
pub trait TaskPort {
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);

    fn sleep(&self, ms: u64) -> LocalBoxFuture<'static, ()>;
}
