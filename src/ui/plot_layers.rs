use eframe::egui::{Color32, Stroke};
use egui_plot::{HLine, Line, LineStyle, PlotPoints, PlotUi, Polygon};

use crate::chart::{BandStyle, Trace, TraceBody, VolumeBar};
use crate::config::plot::PLOT_CONFIG;
use crate::domain::{Candle, CandleType};
use crate::utils::remap;

/// Context passed to every layer during rendering.
/// This prevents argument explosion.
pub struct LayerContext<'a> {
    pub traces: &'a [Trace],
    /// Body width in x units (epoch ms).
    pub candle_width_ms: f64,
    /// (min, max) of the visible price axis.
    pub y_bounds: (f64, f64),
    pub current_price: Option<f64>,
}

impl LayerContext<'_> {
    fn candles(&self) -> Option<&[Candle]> {
        self.traces.iter().find_map(|t| match &t.body {
            TraceBody::Candlestick(c) if t.visible => Some(c.as_slice()),
            _ => None,
        })
    }

    fn volume(&self) -> Option<&[VolumeBar]> {
        self.traces.iter().find_map(|t| match &t.body {
            TraceBody::Volume(v) if t.visible => Some(v.as_slice()),
            _ => None,
        })
    }
}

/// A standardized layer in the plot stack.
pub trait PlotLayer {
    fn render(&self, ui: &mut PlotUi, ctx: &LayerContext);
}

// ============================================================================
// 1. VOLUME LAYER (bottom-anchored, behind everything)
// ============================================================================
pub struct VolumeLayer;

impl PlotLayer for VolumeLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        let Some(bars) = ctx.volume() else { return };
        let max_volume = bars.iter().map(|b| b.volume).fold(0.0_f64, f64::max);
        if max_volume <= 0.0 {
            return;
        }

        let (y_min, y_max) = ctx.y_bounds;
        let band_height = (y_max - y_min) * PLOT_CONFIG.volume_height_pct;

        for bar in bars {
            let top = remap(bar.volume, 0.0, max_volume, y_min, y_min + band_height);
            let base = if bar.rising {
                PLOT_CONFIG.candle_bullish_color
            } else {
                PLOT_CONFIG.candle_bearish_color
            };
            draw_body_rect(
                plot_ui,
                bar.timestamp_ms as f64,
                ctx.candle_width_ms,
                top,
                y_min,
                base.linear_multiply(PLOT_CONFIG.volume_opacity),
            );
        }
    }
}

// ============================================================================
// 2. SUPPORT BAND LAYER
// ============================================================================
pub struct SupportBandLayer;

impl PlotLayer for SupportBandLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        for trace in ctx.traces.iter().filter(|t| t.visible) {
            if let TraceBody::Band { x, price, style } = &trace.body {
                draw_band(plot_ui, &trace.name, *x, *price, style);
            }
        }
    }
}

fn draw_band(plot_ui: &mut PlotUi, name: &str, x: [i64; 2], price: f64, style: &BandStyle) {
    let line_style = if style.dotted {
        LineStyle::Dotted {
            spacing: PLOT_CONFIG.band_dot_spacing,
        }
    } else {
        LineStyle::Solid
    };

    // Empty chart: both ends are "now", a segment would be invisible
    if x[0] == x[1] {
        plot_ui.hline(
            HLine::new(name, price)
                .color(style.color)
                .width(style.width)
                .style(line_style),
        );
        return;
    }

    plot_ui.line(
        Line::new(
            name,
            PlotPoints::new(vec![[x[0] as f64, price], [x[1] as f64, price]]),
        )
        .color(style.color)
        .width(style.width)
        .style(line_style),
    );
}

// ============================================================================
// 3. CANDLESTICK LAYER
// ============================================================================
pub struct CandlestickLayer;

impl PlotLayer for CandlestickLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        let Some(candles) = ctx.candles() else { return };
        for candle in candles {
            draw_candle(plot_ui, candle, ctx.candle_width_ms);
        }
    }
}

fn draw_candle(ui: &mut PlotUi, candle: &Candle, width: f64) {
    let color = match candle.get_type() {
        CandleType::Bullish => PLOT_CONFIG.candle_bullish_color,
        CandleType::Bearish => PLOT_CONFIG.candle_bearish_color,
    };
    let x = candle.timestamp_ms as f64;

    if candle.high > candle.low {
        draw_wick_line(ui, x, candle.high, candle.low, color);
    }

    let (body_bot, body_top_raw) = candle.body_range();
    // Doji check
    let body_top = if (body_top_raw - body_bot).abs() < f64::EPSILON {
        body_bot * 1.0001
    } else {
        body_top_raw
    };
    draw_body_rect(ui, x, width, body_top, body_bot, color);
}

// ============================================================================
// 4. PRICE LINE LAYER
// ============================================================================
pub struct PriceLineLayer;

impl PlotLayer for PriceLineLayer {
    fn render(&self, plot_ui: &mut PlotUi, ctx: &LayerContext) {
        if let Some(price) = ctx.current_price {
            plot_ui.hline(
                HLine::new("Current Price", price)
                    .color(PLOT_CONFIG.color_text_subdued)
                    .width(1.0)
                    .style(LineStyle::dashed_loose()),
            );
        }
    }
}

// ============================================================================
// HELPER FUNCTIONS (Private to this module)
// ============================================================================

#[inline]
fn draw_wick_line(ui: &mut PlotUi, x: f64, top: f64, bottom: f64, color: Color32) {
    ui.line(
        Line::new("", PlotPoints::new(vec![[x, bottom], [x, top]]))
            .color(color)
            .width(PLOT_CONFIG.candle_wick_width),
    );
}

#[inline]
fn draw_body_rect(ui: &mut PlotUi, x: f64, width: f64, top: f64, bottom: f64, color: Color32) {
    let half_w = width / 2.0;
    let pts = vec![
        [x - half_w, bottom],
        [x + half_w, bottom],
        [x + half_w, top],
        [x - half_w, top],
    ];

    // No stroke, thin bodies blur with one
    ui.polygon(
        Polygon::new("", PlotPoints::new(pts))
            .fill_color(color)
            .stroke(Stroke::NONE),
    );
}
