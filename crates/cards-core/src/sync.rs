//! Pushes the focused card into the remote AI session.
//!
//! Pushes are detached tasks: their failure is logged and otherwise ignored,
//! and nothing waits for them. A later focus change supersedes a failed push.

use std::rc::Rc;

use cards_types::card::{Card, FocusedCardContext};
use cards_types::session::Session;
use crate::ports::{AiPort, TaskPort};

pub struct SessionContextSynchronizer {
    ai: Rc<dyn AiPort>,
    tasks: Rc<dyn TaskPort>,
    max_content_chars: usize,
}

impl SessionContextSynchronizer {
    pub fn new(ai: Rc<dyn AiPort>, tasks: Rc<dyn TaskPort>, max_content_chars: usize) -> Self {
        Self {
            ai,
            tasks,
            max_content_chars,
        }
    }

    /// Dispatch a push (or a clear, when `card` is `None`) for the new focus.
    ///
    /// Returns whether anything was dispatched: without a session id or
    /// remote memory the focus only travels with the next chat message.
    pub fn on_focus_changed(&self, card: Option<&Card>, session: &Session) -> bool {
        let session_id = match (&session.session_id, session.remote_memory_enabled) {
            (Some(id), true) => id.clone(),
            _ => {
                log::debug!("session context push skipped: no remote session");
                return false;
            }
        };

        let context = card.map(|c| FocusedCardContext::from_card(c, self.max_content_chars));
        let ai = self.ai.clone();
        self.tasks.spawn(Box::pin(async move {
            let result = match &context {
                Some(ctx) => ai.set_session_focus(&session_id, ctx).await,
                None => ai.clear_session_focus(&session_id).await,
            };
            match result {
                Ok(()) => log::debug!(
                    "session focus updated: {:?}",
                    context.as_ref().map(|c| c.id)
                ),
                Err(e) => log::warn!("session focus push failed (ignored): {}", e),
            }
        }));
        true
    }
}
