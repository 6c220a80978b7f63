use eframe::egui::Color32;

use crate::config::constants::trace;
use crate::config::plot::PLOT_CONFIG;
use crate::domain::{Candle, SupportLevel};

/// Stroke used for a support band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandStyle {
    pub color: Color32,
    pub width: f32,
    pub dotted: bool,
}

impl BandStyle {
    pub fn for_level(level: &SupportLevel) -> Self {
        if level.is_active {
            Self {
                color: PLOT_CONFIG
                    .band_active_color
                    .linear_multiply(PLOT_CONFIG.band_active_opacity),
                width: PLOT_CONFIG.band_active_width,
                dotted: true,
            }
        } else {
            Self {
                color: PLOT_CONFIG
                    .band_inactive_color
                    .linear_multiply(PLOT_CONFIG.band_inactive_opacity),
                width: PLOT_CONFIG.band_inactive_width,
                dotted: true,
            }
        }
    }
}

/// A single volume bar. Direction decides its color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeBar {
    pub timestamp_ms: i64,
    pub volume: f64,
    pub rising: bool,
}

impl From<&Candle> for VolumeBar {
    fn from(c: &Candle) -> Self {
        Self {
            timestamp_ms: c.timestamp_ms,
            volume: c.volume,
            rising: c.close >= c.open,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TraceBody {
    Candlestick(Vec<Candle>),
    Volume(Vec<VolumeBar>),
    /// Horizontal line from `x[0]` to `x[1]` (epoch ms) at `price`.
    Band {
        x: [i64; 2],
        price: f64,
        style: BandStyle,
    },
}

/// One named series on the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace {
    pub name: String,
    pub visible: bool,
    pub body: TraceBody,
}

impl Trace {
    pub fn price(series: &[Candle]) -> Self {
        Self {
            name: trace::PRICE.to_string(),
            visible: true,
            body: TraceBody::Candlestick(series.to_vec()),
        }
    }

    pub fn volume(series: &[Candle], visible: bool) -> Self {
        Self {
            name: trace::VOLUME.to_string(),
            visible,
            body: TraceBody::Volume(series.iter().map(VolumeBar::from).collect()),
        }
    }

    pub fn band(level: &SupportLevel, x: [i64; 2]) -> Self {
        Self {
            name: trace::band_name(level.price),
            visible: true,
            body: TraceBody::Band {
                x,
                price: level.price,
                style: BandStyle::for_level(level),
            },
        }
    }

    /// Price and volume are the permanent series. Everything else is a band.
    pub fn is_base(&self) -> bool {
        self.name == trace::PRICE || self.name == trace::VOLUME
    }

    pub fn len(&self) -> usize {
        match &self.body {
            TraceBody::Candlestick(c) => c.len(),
            TraceBody::Volume(v) => v.len(),
            TraceBody::Band { .. } => 2,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Timestamps carried by the trace, in order.
    pub fn x_values(&self) -> Vec<i64> {
        match &self.body {
            TraceBody::Candlestick(c) => c.iter().map(|p| p.timestamp_ms).collect(),
            TraceBody::Volume(v) => v.iter().map(|b| b.timestamp_ms).collect(),
            TraceBody::Band { x, .. } => x.to_vec(),
        }
    }
}
