use eframe::egui::{Color32, CornerRadius, RichText, Sense, Ui, vec2};

use crate::chart::Direction;
use crate::config::plot::PLOT_CONFIG;
use crate::engine::ActiveTier;
use crate::ui::ui_config::UI_CONFIG;

pub(crate) fn colored_subsection_heading(text: impl Into<String>) -> RichText {
    RichText::new(text.into()).color(UI_CONFIG.colors.subsection_heading)
}

pub trait DirectionColor {
    fn color(&self) -> Color32;
}

impl DirectionColor for Direction {
    fn color(&self) -> Color32 {
        match self {
            Self::Up => PLOT_CONFIG.color_up,
            Self::Down => PLOT_CONFIG.color_down,
            Self::Flat => PLOT_CONFIG.color_text_neutral,
        }
    }
}

impl DirectionColor for ActiveTier {
    fn color(&self) -> Color32 {
        match self {
            Self::Neutral => PLOT_CONFIG.badge_neutral,
            Self::Info => PLOT_CONFIG.badge_info,
            Self::Alert => PLOT_CONFIG.badge_alert,
        }
    }
}

pub fn get_change_color(value: f64) -> Color32 {
    if value >= 0.0 {
        PLOT_CONFIG.color_up
    } else {
        PLOT_CONFIG.color_down
    }
}

pub(crate) trait UiStyleExt {
    fn label_subdued(&mut self, text: impl Into<String>);
    fn metric(&mut self, label: &str, value: &str, color: Color32);
    fn label_subheader(&mut self, text: impl Into<String>);
    /// Filled pill with white text.
    fn badge(&mut self, text: impl Into<String>, fill: Color32);
    /// Horizontal bar filled to `fraction` (0..=1).
    fn progress_strip(&mut self, fraction: f32, fill: Color32);
}

impl UiStyleExt for Ui {
    fn label_subdued(&mut self, text: impl Into<String>) {
        self.label(RichText::new(text).small().color(Color32::GRAY));
    }

    fn metric(&mut self, label: &str, value: &str, color: Color32) {
        self.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = 2.0; // Tight spacing
            ui.label_subdued(format!("{}:", label));
            ui.label(RichText::new(value).small().color(color));
        });
    }

    fn label_subheader(&mut self, text: impl Into<String>) {
        self.label(colored_subsection_heading(text));
    }

    fn badge(&mut self, text: impl Into<String>, fill: Color32) {
        eframe::egui::Frame::NONE
            .fill(fill)
            .corner_radius(CornerRadius::same(8))
            .inner_margin(eframe::egui::Margin::symmetric(6, 2))
            .show(self, |ui| {
                ui.label(RichText::new(text).small().strong().color(Color32::WHITE));
            });
    }

    fn progress_strip(&mut self, fraction: f32, fill: Color32) {
        let width = self.available_width();
        let (rect, _) = self.allocate_exact_size(
            vec2(width, UI_CONFIG.strength_bar_height),
            Sense::hover(),
        );
        if self.is_rect_visible(rect) {
            let radius = CornerRadius::same(3);
            self.painter()
                .rect_filled(rect, radius, Color32::from_gray(75));
            let mut filled = rect;
            filled.set_width(rect.width() * fraction.clamp(0.0, 1.0));
            self.painter().rect_filled(filled, radius, fill);
        }
    }
}
