//! Settings panel: backend URLs, focus context and polling policies.
//! Changes are applied only through the explicit Save button.

use egui::{self, RichText, Vec2};
use cards_types::config::AppConfig;
use crate::theme::*;

/// What the caller should do after rendering the settings panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsAction {
    /// Nothing changed
    None,
    /// A field of the draft was edited
    Changed,
    /// The user clicked the explicit Save button
    SaveClicked,
    /// Discard the draft and restore the defaults
    ResetClicked,
}

/// Save feedback passed in from the app layer
#[derive(Clone)]
pub struct SaveFeedback {
    pub message: String,
    pub success: bool,
}

/// Render the settings panel over a draft config. Returns an action for the caller to handle.
pub fn settings_panel(
    ui: &mut egui::Ui,
    config: &mut AppConfig,
    save_feedback: Option<&SaveFeedback>,
) -> SettingsAction {
    let mut changed = false;
    let mut save_clicked = false;
    let mut reset_clicked = false;

    egui::Frame::default()
        .fill(BG_SECONDARY)
        .inner_margin(PANEL_PADDING)
        .corner_radius(PANEL_ROUNDING)
        .show(ui, |ui| {
            ui.heading(RichText::new("Settings").color(TEXT_PRIMARY));
            ui.separator();

            // ── Backends ─────────────────────────────────────
            ui.label(RichText::new("Backends").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("Card service URL").color(TEXT_SECONDARY).small());
            changed |= ui
                .add(egui::TextEdit::singleline(&mut config.backend.cards_url).hint_text("http://localhost:5000"))
                .changed();

            ui.add_space(4.0);
            ui.label(RichText::new("AI service URL").color(TEXT_SECONDARY).small());
            changed |= ui
                .add(egui::TextEdit::singleline(&mut config.backend.ai_url).hint_text("http://localhost:8000"))
                .changed();

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(4.0);

            // ── Assistant ────────────────────────────────────
            ui.label(RichText::new("Assistant").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("Card content sent as context (chars)").color(TEXT_SECONDARY).small());
            changed |= ui
                .add(egui::Slider::new(&mut config.context.max_content_chars, 100..=4000))
                .changed();

            ui.label(RichText::new("Health check interval (ms, 0 = off)").color(TEXT_SECONDARY).small());
            changed |= ui
                .add(egui::DragValue::new(&mut config.health.poll_interval_ms).range(0..=600_000).speed(1000))
                .changed();

            ui.add_space(12.0);
            ui.separator();
            ui.add_space(4.0);

            // ── New-card focus ───────────────────────────────
            ui.label(RichText::new("New-card focus").color(ACCENT).strong());
            ui.add_space(2.0);

            ui.label(RichText::new("Attempts").color(TEXT_SECONDARY).small());
            changed |= ui
                .add(egui::Slider::new(&mut config.refocus.max_attempts, 1..=10))
                .changed();

            ui.label(RichText::new("First delay (ms)").color(TEXT_SECONDARY).small());
            changed |= ui
                .add(egui::Slider::new(&mut config.refocus.initial_delay_ms, 100..=5000))
                .changed();

            ui.label(RichText::new("Backoff factor").color(TEXT_SECONDARY).small());
            changed |= ui
                .add(egui::Slider::new(&mut config.refocus.backoff_factor, 1..=4))
                .changed();

            ui.label(RichText::new("Longest delay (ms)").color(TEXT_SECONDARY).small());
            changed |= ui
                .add(egui::Slider::new(&mut config.refocus.max_delay_ms, 500..=30_000))
                .changed();

            // ── Save Button ──────────────────────────────────
            ui.add_space(16.0);
            ui.separator();
            ui.add_space(8.0);

            ui.horizontal(|ui| {
                let btn = ui.add(
                    egui::Button::new(RichText::new("Save Settings").color(TEXT_PRIMARY).strong())
                        .fill(ACCENT)
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(120.0, 28.0)),
                );
                if btn.clicked() {
                    save_clicked = true;
                }
                if ui.button("Defaults").clicked() {
                    reset_clicked = true;
                }

                // Show save feedback
                if let Some(fb) = save_feedback {
                    let color = if fb.success { SUCCESS } else { ERROR };
                    ui.label(RichText::new(&fb.message).color(color).small());
                }
            });
        });

    if save_clicked {
        SettingsAction::SaveClicked
    } else if reset_clicked {
        SettingsAction::ResetClicked
    } else if changed {
        SettingsAction::Changed
    } else {
        SettingsAction::None
    }
}
