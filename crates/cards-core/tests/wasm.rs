//! WASM-target tests for cards-core.
//!
//! Runs the synchronous core (EventBus, CardStore, FocusTracker,
//! ConversationEngine) under wasm32-unknown-unknown via `wasm-pack test --node`.

use wasm_bindgen_test::*;

use cards_core::conversation::*;
use cards_core::event_bus::EventBus;
use cards_core::focus::*;
use cards_core::ports::CardGeometry;
use cards_core::store::CardStore;
use cards_types::card::{Card, CardId};
use cards_types::chat::{ChatReply, Intent};
use cards_types::event::{AppEvent, FocusReason};
use cards_types::CardsError;

fn card(id: i64) -> Card {
    Card::new(CardId(id), format!("Card {}", id), "<p>body</p>")
}

fn snapshot(revision: u64, center: f32, positions: &[(i64, f32)]) -> ViewportSnapshot {
    ViewportSnapshot {
        revision,
        center,
        cards: positions
            .iter()
            .map(|&(id, center)| CardGeometry { id: CardId(id), center })
            .collect(),
    }
}

// ─── EventBus Tests ──────────────────────────────────────

#[wasm_bindgen_test]
fn event_bus_emit_and_drain() {
    let bus = EventBus::new();
    bus.emit(AppEvent::ChatSent);
    bus.emit(AppEvent::CardsRefreshed { count: 3 });
    assert!(bus.has_pending());

    let events = bus.drain();
    assert_eq!(events.len(), 2);
    assert_eq!(events[1], AppEvent::CardsRefreshed { count: 3 });
    assert!(!bus.has_pending());
}

#[wasm_bindgen_test]
fn event_bus_multiple_emits() {
    let bus = EventBus::new();
    for i in 0..100 {
        bus.emit(AppEvent::CardDeleted { id: CardId(i) });
    }
    assert_eq!(bus.drain().len(), 100);
}

// ─── Focus Tests ─────────────────────────────────────────

#[wasm_bindgen_test]
fn compute_focus_nearest_and_ties() {
    let cards = snapshot(0, 0.0, &[(1, 0.0), (2, 200.0)]).cards;
    assert_eq!(compute_focus(190.0, &cards), Some(CardId(2)));
    assert_eq!(compute_focus(10.0, &cards), Some(CardId(1)));
    assert_eq!(compute_focus(100.0, &cards), Some(CardId(1)));
    assert_eq!(compute_focus(0.0, &[]), None);
}

#[wasm_bindgen_test]
fn tracker_follows_viewport_and_deletes() {
    let mut store = CardStore::new();
    store.replace_all(vec![card(1), card(2), card(3)]);
    let mut tracker = FocusTracker::new();
    tracker.on_cards_changed(&store);
    assert_eq!(tracker.focused(), Some(CardId(1)));

    let change = tracker
        .on_viewport(&snapshot(store.revision(), 210.0, &[(1, 0.0), (2, 200.0), (3, 400.0)]), &store)
        .unwrap();
    assert_eq!(change.current, Some(CardId(2)));
    assert_eq!(change.reason, FocusReason::Scroll);

    store.remove(CardId(2));
    assert_eq!(tracker.on_cards_changed(&store).unwrap().current, Some(CardId(3)));
}

#[wasm_bindgen_test]
fn tracker_ignores_stale_revision() {
    let mut store = CardStore::new();
    store.replace_all(vec![card(1), card(2)]);
    let mut tracker = FocusTracker::new();
    tracker.on_cards_changed(&store);
    let stale = store.revision();
    store.insert(card(3));

    assert!(tracker
        .on_viewport(&snapshot(stale, 200.0, &[(1, 0.0), (2, 200.0)]), &store)
        .is_none());
    assert_eq!(tracker.focused(), Some(CardId(1)));
}

// ─── ConversationEngine Tests ────────────────────────────

#[wasm_bindgen_test]
fn engine_round_trip() {
    let mut engine = ConversationEngine::new(500);
    let pending = engine.begin_send("hello", true, Some(&card(7))).unwrap();
    assert_eq!(pending.request.focused_card.as_ref().map(|c| c.id), Some(CardId(7)));
    assert_eq!(engine.begin_send("again", true, None).unwrap_err(), CardsError::Busy);

    let outcome = engine.complete_send(
        &pending,
        Ok(ChatReply {
            session_id: Some("s1".to_string()),
            response: "Hi".to_string(),
            intent: Intent::NoAction,
            confidence: 0.5,
            reasoning: String::new(),
            card_id: None,
            timestamp: String::new(),
        }),
    );
    assert!(matches!(outcome, ReplyOutcome::Applied(_)));
    assert_eq!(engine.transcript().len(), 2);
    assert_eq!(engine.session().session_id.as_deref(), Some("s1"));
    assert_eq!(engine.state(), ConversationState::Idle);
}

#[wasm_bindgen_test]
fn engine_rejections_leave_no_trace() {
    let mut engine = ConversationEngine::new(500);
    assert!(matches!(engine.begin_send("", true, None), Err(CardsError::Validation(_))));
    assert_eq!(engine.begin_send("hi", false, None).unwrap_err(), CardsError::Unavailable);
    assert!(engine.transcript().is_empty());
}
