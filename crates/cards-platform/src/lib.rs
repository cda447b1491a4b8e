//! Browser adapters for the cards-core ports.
//!
//! HTTP collaborators for the card and AI services (gloo-net), task
//! spawning and timers (wasm-bindgen-futures, gloo-timers) and settings
//! persistence in localStorage.

pub mod api;
pub mod settings;
pub mod tasks;

#[cfg(test)]
mod tests;

pub use api::{HttpAiApi, HttpCardApi};
pub use tasks::BrowserTasks;
