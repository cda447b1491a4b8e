//! Conversation engine: the chat state machine.
//!
//! Pure state, no I/O: `begin_send` produces the outbound request and
//! `complete_send` folds the backend's answer back in, returning the side
//! effects (card refresh, refocus) the runtime must carry out.
//!
//! A reply to a request issued before the most recent `clear` is discarded.

use cards_types::{
    CardsError, Result,
    card::{Card, CardId, FocusedCardContext},
    chat::{ChatMessage, ChatReply, ChatRequest, Intent},
    session::Session,
};

pub const REPLY_FAILURE_TEXT: &str =
    "Sorry, I couldn't get a response from the assistant. Please try again.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingReply,
}

/// A send that has been accepted and is waiting for the backend
#[derive(Debug, Clone, PartialEq)]
pub struct PendingSend {
    epoch: u64,
    pub request: ChatRequest,
}

/// Follow-up work for an applied reply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyEffects {
    pub intent: Intent,
    /// Cards changed out-of-band; local list is stale
    pub refresh_cards: bool,
    /// Newly created card to focus once it shows up
    pub refocus: Option<CardId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReplyOutcome {
    Applied(ReplyEffects),
    Failed { error: CardsError },
    /// Request predates a clear; only the card refresh survives
    Discarded { refresh_cards: bool },
}

pub struct ConversationEngine {
    transcript: Vec<ChatMessage>,
    session: Session,
    state: ConversationState,
    last_error: Option<String>,
    epoch: u64,
    max_context_chars: usize,
}

impl ConversationEngine {
    pub fn new(max_context_chars: usize) -> Self {
        Self {
            transcript: Vec::new(),
            session: Session::default(),
            state: ConversationState::Idle,
            last_error: None,
            epoch: 0,
            max_context_chars,
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn state(&self) -> ConversationState {
        self.state
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn set_remote_memory(&mut self, enabled: bool) {
        self.session.remote_memory_enabled = enabled;
    }

    /// Accept a message for sending.
    ///
    /// Rejected without touching any state when the text is blank, the
    /// assistant is unavailable, or a reply is still outstanding.
    pub fn begin_send(
        &mut self,
        text: &str,
        ai_available: bool,
        focused: Option<&Card>,
    ) -> Result<PendingSend> {
        if text.trim().is_empty() {
            return Err(CardsError::Validation("message is empty".to_string()));
        }
        if !ai_available {
            return Err(CardsError::Unavailable);
        }
        if self.state == ConversationState::AwaitingReply {
            return Err(CardsError::Busy);
        }

        self.transcript.push(ChatMessage::user(text));
        self.state = ConversationState::AwaitingReply;
        self.last_error = None;

        Ok(PendingSend {
            epoch: self.epoch,
            request: ChatRequest {
                message: text.to_string(),
                session_id: self.session.session_id.clone(),
                focused_card: focused
                    .map(|c| FocusedCardContext::from_card(c, self.max_context_chars)),
            },
        })
    }

    /// Fold the backend's answer to `pending` into the conversation.
    pub fn complete_send(&mut self, pending: &PendingSend, result: Result<ChatReply>) -> ReplyOutcome {
        self.state = ConversationState::Idle;

        if pending.epoch != self.epoch {
            let refresh_cards = matches!(&result, Ok(reply) if reply.mutated_card().is_some());
            log::info!("discarding chat reply issued before the chat was cleared");
            return ReplyOutcome::Discarded { refresh_cards };
        }

        match result {
            Ok(reply) => {
                self.session.session_id = reply.session_id.clone();
                self.transcript.push(ChatMessage::from_reply(&reply));
                ReplyOutcome::Applied(ReplyEffects {
                    intent: reply.intent,
                    refresh_cards: reply.mutated_card().is_some(),
                    refocus: reply.created_card(),
                })
            }
            Err(error) => {
                self.transcript.push(ChatMessage::system_error(REPLY_FAILURE_TEXT));
                self.last_error = Some(error.to_string());
                ReplyOutcome::Failed { error }
            }
        }
    }

    /// Drop the transcript together with the session token.
    ///
    /// An outstanding send is not cancelled; its reply will be discarded.
    pub fn clear(&mut self) {
        self.transcript.clear();
        self.session.session_id = None;
        self.last_error = None;
        self.epoch += 1;
    }
}
