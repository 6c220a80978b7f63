use eframe::egui::{Align, Layout, RichText, ScrollArea, Spinner, Ui};

use crate::config::plot::PLOT_CONFIG;
use crate::domain::{LevelPosition, SupportLevel};
use crate::engine::{ActiveTier, DisplayState, SupportSink};
use crate::ui::styles::{DirectionColor, UiStyleExt};
use crate::ui::ui_config::UI_CONFIG;
use crate::ui::ui_text::UI_TEXT;
use crate::ui::utils::{
    distance_color, format_distance, format_level_badge, format_price, format_strength,
    format_time_ago, strength_color,
};

/// The right-hand support list. Holds the last snapshot the engine pushed
/// and draws it every frame.
#[derive(Debug, Default)]
pub struct SupportPanel {
    cards: Vec<SupportLevel>,
    active_count: usize,
    display: DisplayState,
}

impl SupportSink for SupportPanel {
    fn render(&mut self, levels: &[SupportLevel], active_count: usize) {
        self.cards = levels.to_vec();
        self.active_count = active_count;
        self.display = DisplayState::Populated;
    }

    fn show_empty(&mut self) {
        self.cards.clear();
        self.active_count = 0;
        self.display = DisplayState::Empty;
    }

    fn show_loading(&mut self) {
        self.display = DisplayState::Loading;
    }
}

impl SupportPanel {
    pub fn cards(&self) -> &[SupportLevel] {
        &self.cards
    }

    pub fn active_count(&self) -> usize {
        self.active_count
    }

    pub fn display(&self) -> DisplayState {
        self.display
    }

    pub fn tier(&self) -> ActiveTier {
        ActiveTier::from_count(self.active_count)
    }

    pub fn render_panel(&self, ui: &mut Ui, now_ms: i64) {
        ui.horizontal(|ui| {
            ui.heading(UI_TEXT.heading_supports);
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.badge(
                    format!("{} {}", self.active_count, UI_TEXT.label_active_count),
                    self.tier().color(),
                );
            });
        });
        ui.separator();

        match self.display {
            DisplayState::Loading => {
                ui.horizontal(|ui| {
                    ui.add(Spinner::new());
                    ui.label_subdued(UI_TEXT.loading_supports);
                });
            }
            DisplayState::Empty => {
                ui.add_space(12.0);
                ui.vertical_centered(|ui| ui.label_subdued(UI_TEXT.empty_supports));
            }
            DisplayState::Populated => {
                ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        for (i, level) in self.cards.iter().enumerate() {
                            render_card(ui, i, level, now_ms);
                            ui.add_space(6.0);
                        }
                    });
            }
        }
    }
}

fn render_card(ui: &mut Ui, index: usize, level: &SupportLevel, now_ms: i64) {
    UI_CONFIG.card_frame(level.is_active).show(ui, |ui| {
        ui.set_width(ui.available_width());

        ui.horizontal(|ui| {
            ui.label(RichText::new(format_price(level.price)).strong().size(16.0));
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                let badge_color = match level.position() {
                    LevelPosition::Active => PLOT_CONFIG.badge_alert,
                    LevelPosition::Below => PLOT_CONFIG.color_down,
                    LevelPosition::Above => PLOT_CONFIG.badge_info,
                };
                ui.badge(format_level_badge(level), badge_color);
                ui.label_subdued(format!("{} {}", UI_TEXT.label_level, index + 1));
            });
        });

        ui.horizontal(|ui| {
            ui.label_subdued(UI_TEXT.label_strength);
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(RichText::new(format_strength(level.strength)).small());
            });
        });
        ui.progress_strip((level.strength / 100.0) as f32, strength_color(level.strength));

        ui.add_space(4.0);
        ui.metric(
            UI_TEXT.label_distance,
            &format_distance(level.distance),
            distance_color(level.distance),
        );
        ui.metric(
            UI_TEXT.label_touches,
            &level.touches.to_string(),
            PLOT_CONFIG.color_text_neutral,
        );
        ui.metric(
            UI_TEXT.label_last_test,
            &format_time_ago(level.last_test, now_ms),
            PLOT_CONFIG.color_text_neutral,
        );
    });
}
