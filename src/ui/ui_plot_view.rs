use eframe::egui::{RichText, Ui};
use egui_plot::{Axis, AxisHints, HPlacement, Plot, VPlacement};

use crate::chart::{ChartSurface, Trace, TraceBody, TraceStore};
use crate::config::plot::PLOT_CONFIG;
use crate::domain::Timeframe;
use crate::ui::plot_layers::{
    CandlestickLayer, LayerContext, PlotLayer, PriceLineLayer, SupportBandLayer, VolumeLayer,
};
use crate::ui::ui_text::UI_TEXT;
use crate::ui::utils::format_price;
use crate::utils::epoch_ms_to_axis_label;

/// Draws a [`TraceStore`] with egui_plot, one layer per trace kind.
#[derive(Default)]
pub struct PlotView;

/// First and last x over every price point.
fn price_x_extent(traces: &[Trace]) -> Option<(i64, i64)> {
    traces.iter().find_map(|t| match &t.body {
        TraceBody::Candlestick(c) if !c.is_empty() => {
            Some((c[0].timestamp_ms, c[c.len() - 1].timestamp_ms))
        }
        _ => None,
    })
}

/// Low/high of candles inside `window`, widened to include visible bands
/// and padded.
fn y_bounds(traces: &[Trace], window: (i64, i64)) -> Option<(f64, f64)> {
    let (start, end) = window;
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;

    for trace in traces.iter().filter(|t| t.visible) {
        match &trace.body {
            TraceBody::Candlestick(candles) => {
                for c in candles.iter().filter(|c| (start..=end).contains(&c.timestamp_ms)) {
                    lo = lo.min(c.low);
                    hi = hi.max(c.high);
                }
            }
            TraceBody::Band { price, .. } => {
                lo = lo.min(*price);
                hi = hi.max(*price);
            }
            TraceBody::Volume(_) => {}
        }
    }

    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    let range = (hi - lo).max(hi.abs() * 0.001);
    let pad = range * PLOT_CONFIG.plot_y_padding_pct;
    Some(((lo - pad).max(0.0), hi + pad))
}

fn create_time_axis() -> AxisHints<'static> {
    AxisHints::new(Axis::X)
        .label(UI_TEXT.plot_x_axis)
        .formatter(|mark, _range| epoch_ms_to_axis_label(mark.value as i64))
        .placement(VPlacement::Bottom)
}

fn create_y_axis(pair_name: &str) -> AxisHints<'static> {
    let label = format!("{}  {}", pair_name, UI_TEXT.plot_y_axis);
    AxisHints::new_y()
        .label(label)
        .formatter(|grid_mark, _range| format_price(grid_mark.value))
        .placement(HPlacement::Right)
}

impl PlotView {
    pub fn new() -> Self {
        Self
    }

    pub fn show_my_plot(
        &mut self,
        ui: &mut Ui,
        store: &TraceStore,
        pair_name: &str,
        timeframe: Timeframe,
        current_price: Option<f64>,
    ) {
        let traces = store.traces();
        let Some(extent) = price_x_extent(traces) else {
            ui.centered_and_justified(|ui| {
                ui.label(RichText::new(UI_TEXT.plot_waiting).color(PLOT_CONFIG.color_text_subdued));
            });
            return;
        };

        let window = store.x_range().unwrap_or(extent);
        let half_step = timeframe.interval_ms() as f64 / 2.0;
        let x_bounds = (window.0 as f64 - half_step)..=(window.1 as f64 + half_step);
        let y_range = y_bounds(traces, window);

        Plot::new("price_chart")
            .custom_x_axes(vec![create_time_axis()])
            .custom_y_axes(vec![create_y_axis(pair_name)])
            .label_formatter(|_, _| String::new())
            .allow_double_click_reset(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds_x(x_bounds);
                if let Some((lo, hi)) = y_range {
                    plot_ui.set_plot_bounds_y(lo..=hi);
                }

                let ctx = LayerContext {
                    traces,
                    candle_width_ms: timeframe.interval_ms() as f64 * PLOT_CONFIG.candle_width_pct,
                    y_bounds: y_range.unwrap_or((0.0, 1.0)),
                    current_price,
                };

                // Volume at the back, candles on top
                let layers: [&dyn PlotLayer; 4] = [
                    &VolumeLayer,
                    &SupportBandLayer,
                    &PriceLineLayer,
                    &CandlestickLayer,
                ];
                for layer in layers {
                    layer.render(plot_ui, &ctx);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Candle, SupportLevel};

    fn traces() -> Vec<Trace> {
        let candles = vec![
            Candle::new(0, 100.0, 110.0, 90.0, 105.0, 1.0),
            Candle::new(60_000, 105.0, 130.0, 100.0, 120.0, 1.0),
        ];
        vec![
            Trace::price(&candles),
            Trace::volume(&candles, true),
            Trace::band(&SupportLevel::new(80.0, 50.0, 1, None), [0, 60_000]),
        ]
    }

    #[test]
    fn extent_spans_price_trace() {
        assert_eq!(price_x_extent(&traces()), Some((0, 60_000)));
        assert_eq!(price_x_extent(&[Trace::price(&[])]), None);
    }

    #[test]
    fn y_bounds_include_bands_and_respect_window() {
        let (lo, hi) = y_bounds(&traces(), (0, 60_000)).unwrap();
        assert!(lo < 80.0);
        assert!(hi > 130.0);

        // Second candle out of window: only the first candle and the band count
        let (_, hi) = y_bounds(&traces(), (0, 0)).unwrap();
        assert!(hi < 130.0);
    }
}
