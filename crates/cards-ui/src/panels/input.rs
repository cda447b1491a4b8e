//! Add-card form: free text plus an optional title.

use egui::{self, RichText, Vec2};
use crate::state::UiState;
use crate::theme::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCard {
    pub text: String,
    pub title: Option<String>,
}

/// Render the form. Returns the card to create when the user submits.
pub fn add_card_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<NewCard> {
    let mut submitted = None;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.label(RichText::new("New card").color(ACCENT).strong());
            ui.add(
                egui::TextEdit::singleline(&mut state.card_title)
                    .hint_text("Title (optional)")
                    .desired_width(f32::INFINITY),
            );
            ui.add(
                egui::TextEdit::multiline(&mut state.card_text)
                    .hint_text("Paste notes, an article, anything worth remembering...")
                    .desired_rows(4)
                    .desired_width(f32::INFINITY),
            );

            let enabled = !state.card_text.trim().is_empty();
            let add = ui.add_enabled(
                enabled,
                egui::Button::new(RichText::new("Add card").color(TEXT_PRIMARY))
                    .fill(if enabled { ACCENT } else { BG_SURFACE })
                    .corner_radius(PANEL_ROUNDING)
                    .min_size(Vec2::new(90.0, 0.0)),
            );
            if add.clicked() {
                let title = state.card_title.trim();
                submitted = Some(NewCard {
                    text: state.card_text.trim().to_string(),
                    title: (!title.is_empty()).then(|| title.to_string()),
                });
                state.card_text.clear();
                state.card_title.clear();
            }
        });

    submitted
}
