//! Cards runtime: the operations the UI drives.
//!
//! Composes the card store, focus tracker, session context synchronizer,
//! conversation engine and availability probe. All state sits behind a
//! single RefCell; no borrow is held across an await, so scroll events keep
//! being processed while network calls are suspended.
//!
//! Background work (refocus poll, health polling) holds only a weak
//! reference and is aborted when the runtime is dropped or shut down.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::rc::{Rc, Weak};

use futures::future::{AbortHandle, Abortable};
use cards_types::{
    CardsError, Result,
    card::{Card, CardId, CardPatch},
    chat::{AiHealth, ChatMessage},
    config::AppConfig,
    event::{AppEvent, FocusReason},
    session::Session,
};
use crate::conversation::{ConversationEngine, ConversationState, ReplyOutcome};
use crate::event_bus::EventBus;
use crate::focus::{FocusChange, FocusTracker};
use crate::ports::*;
use crate::probe::AvailabilityProbe;
use crate::store::CardStore;
use crate::sync::SessionContextSynchronizer;

/// Read model handed to the UI
#[derive(Debug, Clone, Default)]
pub struct RuntimeSnapshot {
    pub cards: Vec<Card>,
    pub revision: u64,
    pub focused: Option<CardId>,
    pub transcript: Vec<ChatMessage>,
    pub session: Session,
    pub conversation: ConversationState,
    pub availability: AiHealth,
    pub last_error: Option<String>,
}

impl RuntimeSnapshot {
    pub fn focused_card(&self) -> Option<&Card> {
        let id = self.focused?;
        self.cards.iter().find(|c| c.id == id)
    }
}

struct RuntimeState {
    store: CardStore,
    focus: FocusTracker,
    conversation: ConversationEngine,
    availability: AiHealth,
    refresh_issued: u64,
    refresh_applied: u64,
}

impl RuntimeState {
    /// A local mutation is newer than any card list still in flight.
    fn invalidate_refreshes(&mut self) {
        self.refresh_issued += 1;
        self.refresh_applied = self.refresh_issued;
    }
}

struct Inner {
    config: AppConfig,
    state: RefCell<RuntimeState>,
    cards: Rc<dyn CardPort>,
    ai: Rc<dyn AiPort>,
    tasks: Rc<dyn TaskPort>,
    event_bus: EventBus,
    sync: SessionContextSynchronizer,
    probe: AvailabilityProbe,
    background: RefCell<HashMap<u64, AbortHandle>>,
    next_task_id: Cell<u64>,
}

impl Drop for Inner {
    fn drop(&mut self) {
        for (_, handle) in self.background.get_mut().drain() {
            handle.abort();
        }
    }
}

/// Shared handle: clone-cheap via Rc.
#[derive(Clone)]
pub struct CardsRuntime {
    inner: Rc<Inner>,
}

impl CardsRuntime {
    pub fn new(
        config: AppConfig,
        cards: Rc<dyn CardPort>,
        ai: Rc<dyn AiPort>,
        tasks: Rc<dyn TaskPort>,
        event_bus: EventBus,
    ) -> Self {
        let max_chars = config.context.max_content_chars;
        let state = RuntimeState {
            store: CardStore::new(),
            focus: FocusTracker::new(),
            conversation: ConversationEngine::new(max_chars),
            availability: AiHealth::unavailable(),
            refresh_issued: 0,
            refresh_applied: 0,
        };

        Self {
            inner: Rc::new(Inner {
                sync: SessionContextSynchronizer::new(ai.clone(), tasks.clone(), max_chars),
                probe: AvailabilityProbe::new(ai.clone()),
                config,
                state: RefCell::new(state),
                cards,
                ai,
                tasks,
                event_bus,
                background: RefCell::new(HashMap::new()),
                next_task_id: Cell::new(0),
            }),
        }
    }

    fn upgrade(weak: &Weak<Inner>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    // ─── Read model ──────────────────────────────────────────

    pub fn snapshot(&self) -> RuntimeSnapshot {
        let st = self.inner.state.borrow();
        RuntimeSnapshot {
            cards: st.store.list().to_vec(),
            revision: st.store.revision(),
            focused: st.focus.focused(),
            transcript: st.conversation.transcript().to_vec(),
            session: st.conversation.session().clone(),
            conversation: st.conversation.state(),
            availability: st.availability,
            last_error: st.conversation.last_error().map(str::to_string),
        }
    }

    pub fn focused_card_id(&self) -> Option<CardId> {
        self.inner.state.borrow().focus.focused()
    }

    pub fn focused_card(&self) -> Option<Card> {
        let st = self.inner.state.borrow();
        st.focus.focused().and_then(|id| st.store.find_by_id(id).cloned())
    }

    pub fn cards(&self) -> Vec<Card> {
        self.inner.state.borrow().store.list().to_vec()
    }

    pub fn card_revision(&self) -> u64 {
        self.inner.state.borrow().store.revision()
    }

    pub fn transcript(&self) -> Vec<ChatMessage> {
        self.inner.state.borrow().conversation.transcript().to_vec()
    }

    pub fn session(&self) -> Session {
        self.inner.state.borrow().conversation.session().clone()
    }

    pub fn conversation_state(&self) -> ConversationState {
        self.inner.state.borrow().conversation.state()
    }

    pub fn availability(&self) -> AiHealth {
        self.inner.state.borrow().availability
    }

    fn contains_card(&self, id: CardId) -> bool {
        self.inner.state.borrow().store.contains(id)
    }

    // ─── Lifecycle ───────────────────────────────────────────

    /// First mount: probe the assistant and fetch the cards.
    pub async fn load(&self) {
        self.check_health().await;
        if let Err(e) = self.refresh_cards().await {
            log::warn!("initial card fetch failed: {}", e);
        }
    }

    /// Abort background work (refocus poll, health polling).
    pub fn shutdown(&self) {
        for (_, handle) in self.inner.background.borrow_mut().drain() {
            handle.abort();
        }
    }

    pub fn background_tasks(&self) -> usize {
        self.inner.background.borrow().len()
    }

    // ─── Cards ───────────────────────────────────────────────

    /// Re-fetch the card list and re-derive focus against it.
    pub async fn refresh_cards(&self) -> Result<()> {
        self.fetch_cards(true).await
    }

    async fn fetch_cards(&self, report: bool) -> Result<()> {
        let ticket = {
            let mut st = self.inner.state.borrow_mut();
            st.refresh_issued += 1;
            st.refresh_issued
        };

        let cards = match self.inner.cards.list_cards().await {
            Ok(cards) => cards,
            Err(e) => {
                if report {
                    self.notice(format!("Failed to fetch cards: {}", e));
                }
                return Err(e);
            }
        };

        let count = cards.len();
        let change = {
            let mut st = self.inner.state.borrow_mut();
            if ticket < st.refresh_applied {
                log::debug!("dropping card list #{} (already applied #{})", ticket, st.refresh_applied);
                return Ok(());
            }
            st.refresh_applied = ticket;
            let RuntimeState { store, focus, .. } = &mut *st;
            store.replace_all(cards);
            focus.on_cards_changed(store)
        };

        self.emit(AppEvent::CardsRefreshed { count });
        if let Some(change) = change {
            self.publish_focus(change);
        }
        Ok(())
    }

    pub async fn add_card(&self, text: &str, title: Option<&str>) -> Result<CardId> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CardsError::Validation("card text is empty".to_string()));
        }
        let title = title.map(str::trim).filter(|t| !t.is_empty());

        match self.inner.cards.create_card(text, title).await {
            Ok(id) => {
                log::info!("card {} created", id);
                self.emit(AppEvent::CardCreated { id });
                // Failure is already reported as a notice
                let _ = self.refresh_cards().await;
                Ok(id)
            }
            Err(e) => {
                self.notice(format!("Failed to add card: {}", e));
                Err(e)
            }
        }
    }

    pub async fn update_card(&self, id: CardId, patch: CardPatch) -> Result<()> {
        if patch.is_empty() {
            return Err(CardsError::Validation(
                "at least one of title, content or metadata is required".to_string(),
            ));
        }
        if !self.contains_card(id) {
            return Err(CardsError::NotFound(id));
        }

        let updated = match self.inner.cards.update_card(id, &patch).await {
            Ok(card) => card,
            Err(e) => {
                self.notice(format!("Failed to update card: {}", e));
                return Err(e);
            }
        };

        let (change, still_focused) = {
            let mut st = self.inner.state.borrow_mut();
            st.invalidate_refreshes();
            let RuntimeState { store, focus, .. } = &mut *st;
            store.insert(updated);
            let change = focus.on_cards_changed(store);
            (change, focus.focused() == Some(id))
        };

        self.emit(AppEvent::CardUpdated { id });
        match change {
            Some(change) => self.publish_focus(change),
            // Same card, new content: refresh the remote context
            None if still_focused => self.push_session_context(),
            None => {}
        }
        Ok(())
    }

    /// Delete a card; if it was focused, focus moves to a remaining card.
    pub async fn delete_card(&self, id: CardId) -> Result<()> {
        if !self.contains_card(id) {
            return Err(CardsError::NotFound(id));
        }

        match self.inner.cards.delete_card(id).await {
            Ok(()) => {}
            Err(CardsError::NotFound(_)) => {
                log::info!("card {} was already gone on the server", id);
            }
            Err(e) => {
                self.notice(format!("Failed to delete card: {}", e));
                return Err(e);
            }
        }

        let change = {
            let mut st = self.inner.state.borrow_mut();
            st.invalidate_refreshes();
            let RuntimeState { store, focus, .. } = &mut *st;
            store.remove(id);
            focus.on_cards_changed(store)
        };

        self.emit(AppEvent::CardDeleted { id });
        if let Some(change) = change {
            self.publish_focus(change);
        }
        Ok(())
    }

    // ─── Focus ───────────────────────────────────────────────

    /// Geometry pass from the carousel.
    pub fn on_scroll(&self, viewport: &dyn ViewportPort) {
        let change = {
            let mut st = self.inner.state.borrow_mut();
            let RuntimeState { store, focus, .. } = &mut *st;
            focus.on_viewport(viewport, store)
        };
        if let Some(change) = change {
            self.publish_focus(change);
        }
    }

    pub fn on_card_clicked(&self, id: CardId) -> Result<()> {
        let change = {
            let mut st = self.inner.state.borrow_mut();
            let RuntimeState { store, focus, .. } = &mut *st;
            if !store.contains(id) {
                return Err(CardsError::NotFound(id));
            }
            focus.focus(id, store, FocusReason::Click)
        };
        if let Some(change) = change {
            self.publish_focus(change);
        }
        Ok(())
    }

    /// Focus a card the assistant created, if it has arrived locally.
    fn focus_created(&self, id: CardId) -> bool {
        let change = {
            let mut st = self.inner.state.borrow_mut();
            let RuntimeState { store, focus, .. } = &mut *st;
            if !store.contains(id) {
                return false;
            }
            focus.focus(id, store, FocusReason::Created)
        };
        if let Some(change) = change {
            self.publish_focus(change);
        }
        true
    }

    fn publish_focus(&self, change: FocusChange) {
        self.emit(AppEvent::FocusChanged {
            card_id: change.current,
            reason: change.reason,
        });
        self.push_session_context();
    }

    fn push_session_context(&self) {
        let st = self.inner.state.borrow();
        let card = st.focus.focused().and_then(|id| st.store.find_by_id(id));
        self.inner.sync.on_focus_changed(card, st.conversation.session());
    }

    // ─── Chat ────────────────────────────────────────────────

    /// Send a chat message, carrying the focused card as context.
    ///
    /// Blank input, an unavailable assistant, or an outstanding reply reject
    /// the send before anything is recorded or sent.
    pub async fn send_chat(&self, text: &str) -> Result<()> {
        let pending = {
            let mut st = self.inner.state.borrow_mut();
            let available = st.availability.available;
            let RuntimeState { store, focus, conversation, .. } = &mut *st;
            let focused = focus.focused().and_then(|id| store.find_by_id(id));
            conversation.begin_send(text, available, focused)?
        };
        self.emit(AppEvent::ChatSent);

        let result = self.inner.ai.chat(&pending.request).await;
        let outcome = self
            .inner
            .state
            .borrow_mut()
            .conversation
            .complete_send(&pending, result);

        match outcome {
            ReplyOutcome::Applied(effects) => {
                self.emit(AppEvent::ChatReplied { intent: effects.intent });
                if effects.refresh_cards {
                    if let Err(e) = self.refresh_cards().await {
                        log::warn!("card refresh after {:?} failed: {}", effects.intent, e);
                    }
                }
                if let Some(id) = effects.refocus {
                    self.schedule_refocus(id);
                }
                Ok(())
            }
            ReplyOutcome::Failed { error } => {
                log::error!("chat failed: {}", error);
                self.emit(AppEvent::ChatFailed { message: error.to_string() });
                Err(error)
            }
            ReplyOutcome::Discarded { refresh_cards } => {
                if refresh_cards {
                    let _ = self.refresh_cards().await;
                }
                Ok(())
            }
        }
    }

    pub fn clear_chat(&self) {
        self.inner.state.borrow_mut().conversation.clear();
        self.emit(AppEvent::ChatCleared);
    }

    /// Poll for a card the assistant created until it shows up locally.
    ///
    /// Bounded by the refocus policy; gives up silently, leaving focus as is.
    fn schedule_refocus(&self, id: CardId) {
        let weak = Rc::downgrade(&self.inner);
        let policy = self.inner.config.refocus.clone();
        let tasks = self.inner.tasks.clone();

        self.spawn_background(async move {
            for attempt in 0..policy.max_attempts {
                tasks.sleep(policy.delay_for(attempt)).await;
                let Some(runtime) = CardsRuntime::upgrade(&weak) else {
                    return;
                };
                if !runtime.contains_card(id) {
                    if let Err(e) = runtime.fetch_cards(false).await {
                        log::debug!("refocus poll for card {}: {}", id, e);
                    }
                }
                if runtime.focus_created(id) {
                    log::debug!("card {} focused after {} attempt(s)", id, attempt + 1);
                    return;
                }
            }
            log::info!(
                "card {} did not appear after {} attempts; focus unchanged",
                id,
                policy.max_attempts
            );
        });
    }

    // ─── Availability ────────────────────────────────────────

    pub async fn check_health(&self) -> AiHealth {
        let health = self.inner.probe.check().await;
        let changed = {
            let mut st = self.inner.state.borrow_mut();
            let changed = st.availability != health;
            st.availability = health;
            st.conversation.set_remote_memory(health.remote_memory_enabled);
            changed
        };
        if changed {
            log::info!(
                "AI available: {}, remote memory: {}",
                health.available,
                health.remote_memory_enabled
            );
            self.emit(AppEvent::AvailabilityChanged {
                available: health.available,
                remote_memory_enabled: health.remote_memory_enabled,
            });
        }
        health
    }

    /// Re-probe the assistant every `health.poll_interval_ms`.
    pub fn start_health_polling(&self) {
        let interval = self.inner.config.health.poll_interval_ms;
        if interval == 0 {
            return;
        }
        let weak = Rc::downgrade(&self.inner);
        let tasks = self.inner.tasks.clone();

        self.spawn_background(async move {
            loop {
                tasks.sleep(interval).await;
                let Some(runtime) = CardsRuntime::upgrade(&weak) else {
                    return;
                };
                runtime.check_health().await;
            }
        });
    }

    // ─── Helpers ─────────────────────────────────────────────

    fn spawn_background<F>(&self, fut: F)
    where
        F: Future<Output = ()> + 'static,
    {
        let id = self.inner.next_task_id.get();
        self.inner.next_task_id.set(id + 1);

        let (handle, registration) = AbortHandle::new_pair();
        self.inner.background.borrow_mut().insert(id, handle);

        let weak = Rc::downgrade(&self.inner);
        self.inner.tasks.spawn(Box::pin(async move {
            if Abortable::new(fut, registration).await.is_err() {
                log::debug!("background task {} aborted", id);
            }
            if let Some(inner) = weak.upgrade() {
                inner.background.borrow_mut().remove(&id);
            }
        }));
    }

    fn emit(&self, event: AppEvent) {
        self.inner.event_bus.emit(event);
    }

    fn notice(&self, message: String) {
        log::warn!("{}", message);
        self.emit(AppEvent::Notice { message });
    }
}
