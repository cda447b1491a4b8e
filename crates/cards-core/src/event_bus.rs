//! Runtime-to-UI event queue.
//!
//! The runtime emits from async continuations; the egui frame loop drains
//! once per frame and folds the batch into `UiState`.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use cards_types::event::AppEvent;

#[derive(Clone)]
pub struct EventBus {
    queue: Rc<RefCell<VecDeque<AppEvent>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            queue: Rc::new(RefCell::new(VecDeque::new())),
        }
    }

    pub fn emit(&self, event: AppEvent) {
        log::debug!("event: {:?}", event);
        self.queue.borrow_mut().push_back(event);
    }

    /// Take everything queued since the last frame.
    ///
    /// Only the newest `CardsRefreshed` of a batch survives; earlier counts
    /// describe lists that have already been replaced.
    pub fn drain(&self) -> Vec<AppEvent> {
        let events: Vec<AppEvent> = self.queue.borrow_mut().drain(..).collect();
        let latest_refresh = events
            .iter()
            .rposition(|e| matches!(e, AppEvent::CardsRefreshed { .. }));
        events
            .into_iter()
            .enumerate()
            .filter(|(i, e)| {
                !matches!(e, AppEvent::CardsRefreshed { .. }) || Some(*i) == latest_refresh
            })
            .map(|(_, e)| e)
            .collect()
    }

    pub fn has_pending(&self) -> bool {
        !self.queue.borrow().is_empty()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
