//! In-memory ordered card collection.
//!
//! Every structural change bumps `revision`, which is how the focus tracker
//! tells a fresh geometry snapshot from one laid out for an older list.

use cards_types::card::{Card, CardId};

#[derive(Debug, Default)]
pub struct CardStore {
    cards: Vec<Card>,
    revision: u64,
}

impl CardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &[Card] {
        &self.cards
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn first(&self) -> Option<&Card> {
        self.cards.first()
    }

    pub fn find_by_id(&self, id: CardId) -> Option<&Card> {
        self.cards.iter().find(|c| c.id == id)
    }

    pub fn contains(&self, id: CardId) -> bool {
        self.position(id).is_some()
    }

    pub fn position(&self, id: CardId) -> Option<usize> {
        self.cards.iter().position(|c| c.id == id)
    }

    /// Append a card, or replace the stored card with the same id in place.
    pub fn insert(&mut self, card: Card) {
        match self.position(card.id) {
            Some(idx) => self.cards[idx] = card,
            None => self.cards.push(card),
        }
        self.revision += 1;
    }

    pub fn remove(&mut self, id: CardId) -> Option<Card> {
        let idx = self.position(id)?;
        self.revision += 1;
        Some(self.cards.remove(idx))
    }

    /// Swap in a freshly fetched list
    pub fn replace_all(&mut self, cards: Vec<Card>) {
        self.cards = cards;
        self.revision += 1;
    }
}
