//! Main egui application: composes all panels and drives the cards runtime.

use std::rc::Rc;
use std::time::Duration;

use egui::{self, CentralPanel, RichText, SidePanel, TopBottomPanel, Vec2};

use cards_core::event_bus::EventBus;
use cards_core::ports::{AiPort, CardPort, TaskPort};
use cards_core::runtime::CardsRuntime;
use cards_platform::settings::{load_config, save_config};
use cards_platform::{BrowserTasks, HttpAiApi, HttpCardApi};
use cards_types::card::CardPatch;
use cards_types::config::AppConfig;
use cards_ui::panels::carousel::{self, CarouselAction};
use cards_ui::panels::chat::{self, ChatAction};
use cards_ui::panels::detail::{self, DetailAction};
use cards_ui::panels::input;
use cards_ui::panels::settings::{self, SaveFeedback, SettingsAction};
use cards_ui::state::UiState;
use cards_ui::theme;

/// Idle repaint cadence, so background results (polling, refocus) show up
const IDLE_REPAINT: Duration = Duration::from_millis(500);

/// The main application state
pub struct CardsApp {
    ui_state: UiState,
    config: AppConfig,
    /// Settings being edited; applied on Save
    draft: AppConfig,
    save_feedback: Option<SaveFeedback>,
    event_bus: EventBus,
    runtime: CardsRuntime,
    first_frame: bool,
}

impl CardsApp {
    pub fn new(_cc: &eframe::CreationContext<'_>) -> Self {
        let config = load_config();
        let event_bus = EventBus::new();
        let runtime = build_runtime(&config, &event_bus);
        log::info!(
            "cards service: {}, AI service: {}",
            config.backend.cards_base(),
            config.backend.ai_base()
        );

        Self {
            ui_state: UiState::new(),
            draft: config.clone(),
            config,
            save_feedback: None,
            event_bus,
            runtime,
            first_frame: true,
        }
    }

    /// Validate, persist and apply the draft settings.
    /// The runtime is rebuilt against the new backends.
    fn apply_settings(&mut self, ctx: &egui::Context) {
        match save_config(&self.draft) {
            Ok(()) => {
                self.config = self.draft.clone();
                self.runtime.shutdown();
                self.runtime = build_runtime(&self.config, &self.event_bus);
                start_runtime(&self.runtime, ctx);
                self.save_feedback = Some(SaveFeedback {
                    message: "Saved".to_string(),
                    success: true,
                });
            }
            Err(e) => {
                log::warn!("settings rejected: {}", e);
                self.save_feedback = Some(SaveFeedback {
                    message: e.to_string(),
                    success: false,
                });
            }
        }
    }
}

fn build_runtime(config: &AppConfig, event_bus: &EventBus) -> CardsRuntime {
    let cards: Rc<dyn CardPort> = Rc::new(HttpCardApi::new(&config.backend));
    let ai: Rc<dyn AiPort> = Rc::new(HttpAiApi::new(&config.backend));
    let tasks: Rc<dyn TaskPort> = Rc::new(BrowserTasks);
    CardsRuntime::new(config.clone(), cards, ai, tasks, event_bus.clone())
}

/// Mount: first health check and card fetch, then periodic health polling
fn start_runtime(runtime: &CardsRuntime, ctx: &egui::Context) {
    let rt = runtime.clone();
    let ctx = ctx.clone();
    wasm_bindgen_futures::spawn_local(async move {
        rt.load().await;
        ctx.request_repaint();
    });
    runtime.start_health_polling();
}

impl eframe::App for CardsApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            start_runtime(&self.runtime, ctx);
            self.first_frame = false;
        }

        // Drain events from the cards runtime
        let events = self.event_bus.drain();
        if !events.is_empty() {
            self.ui_state.process_events(events);
            ctx.request_repaint();
        }
        self.ui_state.apply_snapshot(self.runtime.snapshot());

        if self.ui_state.is_busy() {
            ctx.request_repaint();
        } else {
            ctx.request_repaint_after(IDLE_REPAINT);
        }

        // ── Top bar ──────────────────────────────────────────
        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("Knowledge Cards")
                        .strong()
                        .color(theme::ACCENT)
                        .size(16.0),
                );
                ui.separator();
                let availability = self.ui_state.snapshot.availability;
                let ai_text = match (availability.available, availability.remote_memory_enabled) {
                    (true, true) => "AI: online (session memory)",
                    (true, false) => "AI: online",
                    (false, _) => "AI: offline",
                };
                ui.label(RichText::new(ai_text).color(theme::TEXT_SECONDARY).small());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui
                        .selectable_label(self.ui_state.show_settings, "Settings")
                        .clicked()
                    {
                        self.ui_state.show_settings = !self.ui_state.show_settings;
                        self.draft = self.config.clone();
                        self.save_feedback = None;
                    }
                    if ui.button("Refresh").clicked() {
                        self.refresh_cards(ctx);
                    }
                });
            });
        });

        // ── Notice banner ────────────────────────────────────
        if let Some(notice) = self.ui_state.notice.clone() {
            TopBottomPanel::top("notice_bar").show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.label(RichText::new(notice).color(theme::ERROR));
                    if ui.small_button("Dismiss").clicked() {
                        self.ui_state.dismiss_notice();
                    }
                });
            });
        }

        // ── Settings side panel ──────────────────────────────
        if self.ui_state.show_settings {
            SidePanel::right("settings_panel")
                .min_width(280.0)
                .max_width(350.0)
                .show(ctx, |ui| {
                    match settings::settings_panel(ui, &mut self.draft, self.save_feedback.as_ref()) {
                        SettingsAction::SaveClicked => self.apply_settings(ctx),
                        SettingsAction::ResetClicked => {
                            self.draft = AppConfig::default();
                            self.save_feedback = None;
                        }
                        SettingsAction::Changed => self.save_feedback = None,
                        SettingsAction::None => {}
                    }
                });
        }

        // ── Chat side panel ──────────────────────────────────
        SidePanel::right("chat_panel")
            .default_width(380.0)
            .min_width(300.0)
            .show(ctx, |ui| match chat::chat_panel(ui, &mut self.ui_state) {
                Some(ChatAction::Send(text)) => self.dispatch_chat(text, ctx),
                Some(ChatAction::Clear) => self.runtime.clear_chat(),
                None => {}
            });

        // ── Cards ────────────────────────────────────────────
        CentralPanel::default().show(ctx, |ui| {
            let available = ui.available_size();

            ui.allocate_ui(Vec2::new(available.x, theme::CARD_SIZE.y + 24.0), |ui| {
                let output = carousel::carousel_panel(ui, &mut self.ui_state);
                self.runtime.on_scroll(&output.viewport);
                match output.action {
                    Some(CarouselAction::Select(id)) => {
                        if let Err(e) = self.runtime.on_card_clicked(id) {
                            log::debug!("click on card {} ignored: {}", id, e);
                        }
                    }
                    Some(CarouselAction::Delete(id)) => self.dispatch_delete(id, ctx),
                    None => {}
                }
            });

            ui.add_space(8.0);

            let form_height = 170.0;
            let detail_height = (ui.available_height() - form_height - 8.0).max(120.0);
            ui.allocate_ui(Vec2::new(available.x, detail_height), |ui| {
                if let Some(DetailAction::Rename { id, title }) = detail::detail_panel(ui, &mut self.ui_state) {
                    self.dispatch_rename(id, title, ctx);
                }
            });

            ui.add_space(8.0);

            if let Some(new_card) = input::add_card_panel(ui, &mut self.ui_state) {
                self.dispatch_add(new_card, ctx);
            }
        });
    }
}

impl Drop for CardsApp {
    fn drop(&mut self) {
        self.runtime.shutdown();
    }
}

impl CardsApp {
    /// Send a chat message through the runtime (async)
    fn dispatch_chat(&self, text: String, ctx: &egui::Context) {
        let runtime = self.runtime.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = runtime.send_chat(&text).await {
                log::debug!("chat send not completed: {}", e);
            }
            ctx.request_repaint();
        });
    }

    fn dispatch_add(&self, new_card: input::NewCard, ctx: &egui::Context) {
        let runtime = self.runtime.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = runtime.add_card(&new_card.text, new_card.title.as_deref()).await {
                log::debug!("add card not completed: {}", e);
            }
            ctx.request_repaint();
        });
    }

    fn dispatch_delete(&self, id: cards_types::card::CardId, ctx: &egui::Context) {
        let runtime = self.runtime.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = runtime.delete_card(id).await {
                log::debug!("delete of card {} not completed: {}", id, e);
            }
            ctx.request_repaint();
        });
    }

    fn dispatch_rename(&self, id: cards_types::card::CardId, title: String, ctx: &egui::Context) {
        let runtime = self.runtime.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            if let Err(e) = runtime.update_card(id, CardPatch::title(title)).await {
                log::debug!("rename of card {} not completed: {}", id, e);
            }
            ctx.request_repaint();
        });
    }

    fn refresh_cards(&self, ctx: &egui::Context) {
        let runtime = self.runtime.clone();
        let ctx = ctx.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let _ = runtime.refresh_cards().await;
            ctx.request_repaint();
        });
    }
}
