//! egui panels for the knowledge-cards app.
//!
//! Panels render from `UiState` and return actions; the app layer turns
//! actions into runtime calls.

pub mod format;
pub mod panels;
pub mod state;
pub mod theme;
