//! Plot visualization configuration

use eframe::egui::Color32;

pub struct PlotConfig {
    // --- CANDLESTICKS ---
    pub candle_bullish_color: Color32,
    pub candle_bearish_color: Color32,
    pub candle_width_pct: f64,  // 0.0 to 1.0 (relative to time step)
    pub candle_wick_width: f32, // Pixels

    // --- VOLUME ---
    pub volume_opacity: f32,
    /// Fraction of the price axis the volume bars may occupy (bottom-anchored).
    pub volume_height_pct: f64,

    // --- SUPPORT BANDS ---
    pub band_active_color: Color32,
    pub band_active_opacity: f32,
    pub band_active_width: f32,
    pub band_inactive_color: Color32,
    pub band_inactive_opacity: f32,
    pub band_inactive_width: f32,
    pub band_dot_spacing: f32,

    pub plot_y_padding_pct: f64, // Y-Axis Padding factor (e.g. 0.05 = 5% padding top and bottom)

    // --- SEMANTIC COLORS ---
    pub color_up: Color32,
    pub color_down: Color32,
    pub color_text_neutral: Color32,
    pub color_text_subdued: Color32,

    // --- BADGE TIERS ---
    pub badge_neutral: Color32,
    pub badge_info: Color32,
    pub badge_alert: Color32,

    // --- STRENGTH BAR ---
    pub strength_high: Color32,
    pub strength_medium: Color32,
    pub strength_low: Color32,
}

pub const PLOT_CONFIG: PlotConfig = PlotConfig {
    candle_bullish_color: Color32::from_rgb(0, 200, 83),
    candle_bearish_color: Color32::from_rgb(255, 73, 118),
    candle_width_pct: 0.8, // 80% width leaves a small gap between candles
    candle_wick_width: 1.0,

    volume_opacity: 0.3,
    volume_height_pct: 0.2,

    // Active bands are brighter and thicker than the rest
    band_active_color: Color32::from_rgb(72, 187, 120),
    band_active_opacity: 0.7,
    band_active_width: 3.0,
    band_inactive_color: Color32::from_rgb(66, 153, 225),
    band_inactive_opacity: 0.5,
    band_inactive_width: 2.0,
    band_dot_spacing: 6.0,

    plot_y_padding_pct: 0.05,

    color_up: Color32::from_rgb(72, 187, 120),
    color_down: Color32::from_rgb(245, 101, 101),
    color_text_neutral: Color32::LIGHT_GRAY,
    color_text_subdued: Color32::GRAY,

    badge_neutral: Color32::from_rgb(75, 85, 99),
    badge_info: Color32::from_rgb(37, 99, 235),
    badge_alert: Color32::from_rgb(22, 163, 74),

    strength_high: Color32::from_rgb(34, 197, 94),
    strength_medium: Color32::from_rgb(59, 130, 246),
    strength_low: Color32::from_rgb(234, 179, 8),
};
