//! Chat panel: transcript, focused-card context and input field.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use cards_types::chat::ChatMessage;
use crate::state::UiState;
use crate::theme::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatAction {
    Send(String),
    Clear,
}

/// Render the chat panel. Returns an action when the user submits or clears.
pub fn chat_panel(ui: &mut egui::Ui, state: &mut UiState) -> Option<ChatAction> {
    let mut action = None;

    egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.vertical(|ui| {
                // Header
                ui.horizontal(|ui| {
                    ui.heading(RichText::new("Assistant").color(TEXT_PRIMARY).strong());
                    let (dot, hint) = if state.ai_available() {
                        (SUCCESS, "online")
                    } else {
                        (ERROR, "offline")
                    };
                    ui.label(RichText::new("●").color(dot)).on_hover_text(hint);
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        if ui
                            .add_enabled(
                                !state.snapshot.transcript.is_empty(),
                                egui::Button::new(RichText::new("Clear").small()),
                            )
                            .clicked()
                        {
                            action = Some(ChatAction::Clear);
                        }
                        let status_color = if state.is_busy() { WARNING } else { SUCCESS };
                        ui.label(RichText::new(&state.status_text).color(status_color).small());
                    });
                });

                let context = match state.focused_card() {
                    Some(card) => format!("Talking about: {}", card.title),
                    None => "No card in focus".to_string(),
                };
                ui.label(RichText::new(context).color(TEXT_SECONDARY).small().italics());

                ui.separator();

                // Messages area
                let available_height = ui.available_height() - 60.0;
                ScrollArea::vertical()
                    .id_salt("chat_transcript")
                    .max_height(available_height)
                    .auto_shrink([false, false])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for message in &state.snapshot.transcript {
                            render_message(ui, message);
                            ui.add_space(4.0);
                        }
                        if state.is_busy() {
                            ui.label(RichText::new("▌").color(ACCENT).strong());
                        }
                    });

                ui.add_space(8.0);

                // Input area
                ui.horizontal(|ui| {
                    let available = state.ai_available();
                    let hint = if available {
                        "Ask about the focused card, or ask for a new one..."
                    } else {
                        "AI assistant is offline"
                    };
                    let input = egui::TextEdit::singleline(&mut state.chat_input)
                        .hint_text(hint)
                        .desired_width(ui.available_width() - 70.0)
                        .font(egui::FontId::proportional(14.0));
                    let response = ui.add_enabled(available, input);

                    let send_enabled = state.can_send();
                    let send_btn = ui.add_enabled(
                        send_enabled,
                        egui::Button::new(RichText::new("Send").color(TEXT_PRIMARY))
                            .fill(if send_enabled { ACCENT } else { BG_SURFACE })
                            .corner_radius(PANEL_ROUNDING)
                            .min_size(Vec2::new(60.0, 0.0)),
                    );

                    // Submit on Enter or button click
                    let enter = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                    if send_enabled && (enter || send_btn.clicked()) {
                        action = Some(ChatAction::Send(std::mem::take(&mut state.chat_input)));
                        response.request_focus();
                    }
                });
            });
        });

    action
}

fn render_message(ui: &mut egui::Ui, message: &ChatMessage) {
    let (label, label_color, bg) = match message {
        ChatMessage::User { .. } => ("You", ACCENT, BG_SECONDARY),
        ChatMessage::Assistant { .. } => ("Assistant", SUCCESS, BG_SECONDARY),
        ChatMessage::SystemError { .. } => ("Error", ERROR, ERROR_BG),
    };

    egui::Frame::default()
        .fill(bg)
        .corner_radius(PANEL_ROUNDING)
        .inner_margin(8.0)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new(label).color(label_color).strong().small());
                ui.label(
                    RichText::new(message.timestamp().format("%H:%M").to_string())
                        .color(TEXT_SECONDARY)
                        .small(),
                );
            });
            ui.label(RichText::new(message.text()).color(TEXT_PRIMARY));

            if let ChatMessage::Assistant { intent, confidence, reasoning, .. } = message {
                let meta = format!("{} · {:.0}% confidence", intent.label(), confidence * 100.0);
                let footer = ui.label(RichText::new(meta).color(TEXT_SECONDARY).small());
                if !reasoning.is_empty() {
                    footer.on_hover_text(reasoning.as_str());
                }
            }
        });
}
