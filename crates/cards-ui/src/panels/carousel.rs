//! Carousel panel: horizontally scrolling card tiles.
//!
//! Besides drawing, the carousel is the viewport: every frame it reports the
//! center of the visible region and each tile's center, tagged with the
//! card-list revision the tiles were laid out from.

use egui::{self, Align, Layout, RichText, ScrollArea, Sense, Stroke, UiBuilder};
use cards_core::focus::ViewportSnapshot;
use cards_core::ports::CardGeometry;
use cards_types::card::{Card, CardId};
use crate::format::{format_date, preview, PREVIEW_CHARS};
use crate::state::UiState;
use crate::theme::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselAction {
    Select(CardId),
    Delete(CardId),
}

pub struct CarouselOutput {
    pub action: Option<CarouselAction>,
    /// Geometry of this frame, in screen coordinates
    pub viewport: ViewportSnapshot,
}

pub fn carousel_panel(ui: &mut egui::Ui, state: &mut UiState) -> CarouselOutput {
    let revision = state.snapshot.revision;

    if state.snapshot.cards.is_empty() {
        ui.vertical_centered(|ui| {
            ui.add_space(CARD_SIZE.y / 2.0);
            ui.label(
                RichText::new("No cards yet. Paste some text below to create one.")
                    .color(TEXT_SECONDARY),
            );
        });
        return CarouselOutput {
            action: None,
            viewport: ViewportSnapshot {
                revision,
                center: ui.max_rect().center().x,
                cards: Vec::new(),
            },
        };
    }

    let scroll_target = state.scroll_target.take();
    let focused = state.snapshot.focused;
    // Spacers let the first and last card reach the center
    let side = ((ui.available_width() - CARD_SIZE.x) / 2.0).max(0.0);
    let mut action = None;
    let mut geometry = Vec::with_capacity(state.snapshot.cards.len());

    let output = ScrollArea::horizontal()
        .id_salt("card_carousel")
        .auto_shrink([false, true])
        .animated(false)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = CARD_GAP;
                ui.add_space(side);
                for card in &state.snapshot.cards {
                    let (tile_action, response) = card_tile(ui, card, focused == Some(card.id));
                    if scroll_target == Some(card.id) {
                        log::debug!("scrolling card {} into view", card.id);
                        response.scroll_to_me(Some(Align::Center));
                    }
                    geometry.push(CardGeometry {
                        id: card.id,
                        center: response.rect.center().x,
                    });
                    if tile_action.is_some() {
                        action = tile_action;
                    }
                }
                ui.add_space(side);
            });
        });

    CarouselOutput {
        action,
        viewport: ViewportSnapshot {
            revision,
            center: output.inner_rect.center().x,
            cards: geometry,
        },
    }
}

fn card_tile(ui: &mut egui::Ui, card: &Card, focused: bool) -> (Option<CarouselAction>, egui::Response) {
    let (rect, response) = ui.allocate_exact_size(CARD_SIZE, Sense::click());
    let mut action = response.clicked().then_some(CarouselAction::Select(card.id));

    let (fill, stroke) = if focused {
        (BG_SURFACE, Stroke::new(2.0, ACCENT))
    } else {
        (BG_SECONDARY, Stroke::new(1.0, BG_SURFACE))
    };

    ui.scope_builder(UiBuilder::new().max_rect(rect), |ui| {
        egui::Frame::default()
            .fill(fill)
            .stroke(stroke)
            .corner_radius(CARD_ROUNDING)
            .inner_margin(10.0)
            .show(ui, |ui| {
                ui.set_min_size(rect.size() - egui::Vec2::splat(20.0));
                ui.horizontal(|ui| {
                    if ui
                        .small_button(RichText::new("✕").color(TEXT_SECONDARY))
                        .on_hover_text("Delete card")
                        .clicked()
                    {
                        action = Some(CarouselAction::Delete(card.id));
                    }
                    ui.add(
                        egui::Label::new(RichText::new(&card.title).color(TEXT_PRIMARY).strong())
                            .truncate(),
                    );
                });
                ui.add_space(4.0);
                ui.label(
                    RichText::new(preview(&card.content, PREVIEW_CHARS))
                        .color(TEXT_SECONDARY)
                        .small(),
                );
                ui.with_layout(Layout::bottom_up(Align::Min), |ui| {
                    ui.label(
                        RichText::new(format_date(&card.created_at))
                            .color(TEXT_SECONDARY)
                            .small(),
                    );
                });
            });
    });

    (action, response)
}
