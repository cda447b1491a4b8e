//! Detail panel: the focused card in full, with rename.

use egui::{self, RichText, ScrollArea, Vec2};
use cards_types::card::CardId;
use crate::format::{format_date, strip_html_tags};
use crate::state::UiState;
use crate::theme::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailAction {
    Rename { id: CardId, title: String },
}

pub fn detail_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<DetailAction> {
    let mut action = None;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            let Some(card) = state.snapshot.focused_card().cloned() else {
                ui.label(RichText::new("No card selected").color(TEXT_SECONDARY).italics());
                return;
            };

            ui.horizontal(|ui| {
                ui.heading(RichText::new(&card.title).color(TEXT_PRIMARY).strong());
                if let Some(novelty) = card.novelty() {
                    ui.label(
                        RichText::new(format!("{} Novelty", novelty))
                            .color(novelty_color(novelty))
                            .small()
                            .strong(),
                    );
                }
            });
            ui.label(
                RichText::new(format!("Created: {}", format_date(&card.created_at)))
                    .color(TEXT_SECONDARY)
                    .small(),
            );

            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.add(
                    egui::TextEdit::singleline(&mut state.rename_text)
                        .hint_text("Card title")
                        .desired_width(ui.available_width() - 80.0),
                );
                let title = state.rename_text.trim();
                let enabled = !title.is_empty() && title != card.title;
                let save = ui.add_enabled(
                    enabled,
                    egui::Button::new(RichText::new("Rename").color(TEXT_PRIMARY))
                        .fill(if enabled { ACCENT } else { BG_SURFACE })
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(70.0, 0.0)),
                );
                if save.clicked() {
                    action = Some(DetailAction::Rename {
                        id: card.id,
                        title: title.to_string(),
                    });
                }
            });

            ui.separator();
            ScrollArea::vertical()
                .id_salt("card_detail")
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    ui.label(RichText::new(strip_html_tags(&card.content)).color(TEXT_PRIMARY));
                });
        });

    action
}
