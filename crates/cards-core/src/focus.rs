//! Focus tracking: which card sits nearest the center of the carousel.
//!
//! The viewport is authoritative: each geometry pass recomputes focus.
//! Programmatic focus (click, newly created card) is held for a few passes
//! while the carousel scrolls the card to the center.

use cards_types::card::CardId;
use cards_types::event::FocusReason;
use crate::ports::{CardGeometry, ViewportPort};
use crate::store::CardStore;

/// Geometry passes a programmatic focus survives before the viewport wins again
pub const PINNED_FOCUS_PASSES: u8 = 3;

/// Card whose center is nearest `viewport_center`.
///
/// Ties go to the earliest card in the sequence. Empty input yields `None`.
pub fn compute_focus(viewport_center: f32, cards: &[CardGeometry]) -> Option<CardId> {
    let mut best: Option<(CardId, f32)> = None;
    for g in cards {
        let distance = (g.center - viewport_center).abs();
        let closer = match best {
            None => true,
            Some((_, best_distance)) => distance < best_distance,
        };
        if closer {
            best = Some((g.id, distance));
        }
    }
    best.map(|(id, _)| id)
}

/// Owned copy of one viewport sample
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewportSnapshot {
    pub revision: u64,
    pub center: f32,
    pub cards: Vec<CardGeometry>,
}

impl ViewportSnapshot {
    pub fn capture(viewport: &dyn ViewportPort) -> Self {
        Self {
            revision: viewport.revision(),
            center: viewport.center(),
            cards: viewport.card_geometry(),
        }
    }
}

impl ViewportPort for ViewportSnapshot {
    fn revision(&self) -> u64 {
        self.revision
    }

    fn center(&self) -> f32 {
        self.center
    }

    fn card_geometry(&self) -> Vec<CardGeometry> {
        self.cards.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusChange {
    pub previous: Option<CardId>,
    pub current: Option<CardId>,
    pub reason: FocusReason,
}

#[derive(Debug, Clone, Copy)]
struct PinnedFocus {
    id: CardId,
    passes_left: u8,
}

#[derive(Debug, Default)]
pub struct FocusTracker {
    focused: Option<CardId>,
    pinned: Option<PinnedFocus>,
    last_viewport: Option<ViewportSnapshot>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focused(&self) -> Option<CardId> {
        self.focused
    }

    /// Recompute focus from a geometry pass.
    ///
    /// Passes laid out for a different card-list revision are discarded.
    pub fn on_viewport(&mut self, viewport: &dyn ViewportPort, store: &CardStore) -> Option<FocusChange> {
        if viewport.revision() != store.revision() {
            log::debug!(
                "discarding geometry for revision {} (store at {})",
                viewport.revision(),
                store.revision()
            );
            return None;
        }

        let snapshot = ViewportSnapshot::capture(viewport);
        let computed = compute_focus(snapshot.center, &snapshot.cards)
            .filter(|id| store.contains(*id));
        self.last_viewport = Some(snapshot);

        if let Some(pin) = self.pinned.as_mut() {
            if computed == Some(pin.id) || pin.passes_left == 0 {
                self.pinned = None;
            } else {
                pin.passes_left -= 1;
                return None;
            }
        }

        match computed {
            Some(id) => self.set(Some(id), FocusReason::Scroll),
            None => None,
        }
    }

    /// Re-derive focus after the card list changed structurally.
    ///
    /// Keeps the current focus when it survived; otherwise picks the nearest
    /// remaining card by the last known geometry, else the first card.
    pub fn on_cards_changed(&mut self, store: &CardStore) -> Option<FocusChange> {
        if let Some(pin) = self.pinned {
            if !store.contains(pin.id) {
                self.pinned = None;
            }
        }

        if store.is_empty() {
            self.pinned = None;
            return self.set(None, FocusReason::CardsChanged);
        }

        if let Some(id) = self.focused {
            if store.contains(id) {
                return None;
            }
        }

        let nearest = self.last_viewport.as_ref().and_then(|vp| {
            let remaining: Vec<CardGeometry> = vp
                .cards
                .iter()
                .copied()
                .filter(|g| store.contains(g.id))
                .collect();
            compute_focus(vp.center, &remaining)
        });
        let next = if self.focused.is_some() {
            nearest.or_else(|| store.first().map(|c| c.id))
        } else {
            // First load: focus the first card without waiting for geometry
            store.first().map(|c| c.id)
        };
        self.set(next, FocusReason::CardsChanged)
    }

    /// Focus a specific card and hold it while the carousel scrolls to it.
    /// Returns `None` when the card is unknown or already focused.
    pub fn focus(&mut self, id: CardId, store: &CardStore, reason: FocusReason) -> Option<FocusChange> {
        if !store.contains(id) {
            return None;
        }
        self.pinned = Some(PinnedFocus {
            id,
            passes_left: PINNED_FOCUS_PASSES,
        });
        self.set(Some(id), reason)
    }

    fn set(&mut self, next: Option<CardId>, reason: FocusReason) -> Option<FocusChange> {
        if next == self.focused {
            return None;
        }
        let change = FocusChange {
            previous: self.focused,
            current: next,
            reason,
        };
        self.focused = next;
        log::debug!("focus {:?} -> {:?} ({:?})", change.previous, change.current, reason);
        Some(change)
    }
}
