//! Knowledge-card core: card store, focus tracking, session context
//! synchronization and the conversation state machine.

pub mod ports;
pub mod event_bus;
pub mod store;
pub mod focus;
pub mod sync;
pub mod conversation;
pub mod probe;
pub mod runtime;
