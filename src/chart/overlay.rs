use crate::config::MAX_CHART_POINTS;
use crate::config::constants::trace as trace_names;
use crate::domain::{Candle, SupportLevel};
use crate::engine::OverlayTarget;
use crate::utils::now_timestamp_ms;

#[cfg(debug_assertions)]
use crate::config::DF;

use super::surface::{ChartError, ChartSurface};
use super::trace::{Trace, TraceBody};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Flat,
}

/// Newest candle summary for the stat row under the chart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartStatistics {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub direction: Direction,
}

impl From<&Candle> for ChartStatistics {
    fn from(c: &Candle) -> Self {
        let direction = if c.close > c.open {
            Direction::Up
        } else if c.close < c.open {
            Direction::Down
        } else {
            Direction::Flat
        };
        Self {
            open: c.open,
            high: c.high,
            low: c.low,
            close: c.close,
            direction,
        }
    }
}

/// Keeps the chart's trace list equal to price + volume + one band per level.
///
/// Surface failures are logged here and never reach the caller.
pub struct ChartOverlaySync<S: ChartSurface> {
    surface: S,
    volume_visible: bool,
}

impl<S: ChartSurface> ChartOverlaySync<S> {
    /// Seeds empty price and volume traces so appends work before any data.
    pub fn new(surface: S, volume_visible: bool) -> Self {
        let mut sync = Self {
            surface,
            volume_visible,
        };
        let seed = vec![Trace::price(&[]), Trace::volume(&[], volume_visible)];
        sync.contain("seed", |s| s.react(seed));
        sync
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn volume_visible(&self) -> bool {
        self.volume_visible
    }

    /// Full price/volume load followed by a band sync.
    pub fn initialize(&mut self, series: &[Candle], overlay_visible: bool, levels: &[SupportLevel]) {
        let base = vec![Trace::price(series), Trace::volume(series, self.volume_visible)];
        self.contain("initialize", |s| s.react(base));
        self.contain("reset window", |s| s.relayout_x_range(None));
        self.sync_overlay(levels, overlay_visible);
    }

    /// Replaces price and volume data. Existing bands are carried over as-is
    /// and the x-window is cleared.
    pub fn rebuild(&mut self, series: &[Candle]) {
        let mut traces = vec![Trace::price(series), Trace::volume(series, self.volume_visible)];
        traces.extend(self.band_traces());
        self.contain("rebuild", |s| s.react(traces));
        self.contain("reset window", |s| s.relayout_x_range(None));
    }

    /// Extends price (and volume when shown). Bands are left alone.
    pub fn append_point(&mut self, candle: &Candle) {
        let Some(price_idx) = self.index_of(trace_names::PRICE) else {
            log::error!("Chart has no price trace, dropping point at {}", candle.timestamp_ms);
            return;
        };

        if !self.contain("extend price", |s| s.extend_trace(price_idx, candle)) {
            return;
        }

        if self.volume_visible {
            if let Some(volume_idx) = self.index_of(trace_names::VOLUME) {
                self.contain("extend volume", |s| s.extend_trace(volume_idx, candle));
            }
        }

        let xs = self.price_x_values();
        let len = xs.len();
        if len > MAX_CHART_POINTS {
            let window = (xs[len - MAX_CHART_POINTS], xs[len - 1]);
            self.contain("window", |s| s.relayout_x_range(Some(window)));
        }
    }

    pub fn set_volume_visible(&mut self, show: bool) {
        self.volume_visible = show;

        let Some(volume_idx) = self.index_of(trace_names::VOLUME) else {
            log::warn!("Chart has no volume trace to toggle");
            return;
        };

        // Appends skip volume while hidden, so catch it up before showing.
        if show && self.volume_len() != self.price_candles().len() {
            let mut traces = self.surface.traces().to_vec();
            traces[volume_idx] = Trace::volume(&self.price_candles(), true);
            self.contain("refill volume", |s| s.react(traces));
        }

        self.contain("toggle volume", |s| s.restyle_visibility(volume_idx, show));
    }

    pub fn statistics(&self) -> Option<ChartStatistics> {
        self.price_candles().last().map(ChartStatistics::from)
    }

    /// Price points inside the current x-window.
    pub fn visible_point_count(&self) -> usize {
        let xs = self.price_x_values();
        match self.surface.x_range() {
            Some((start, end)) => xs.iter().filter(|x| (start..=end).contains(*x)).count(),
            None => xs.len(),
        }
    }

    pub fn band_count(&self) -> usize {
        self.surface.traces().iter().filter(|t| !t.is_base()).count()
    }

    pub fn price_len(&self) -> usize {
        self.index_of(trace_names::PRICE)
            .map(|i| self.surface.traces()[i].len())
            .unwrap_or(0)
    }

    fn volume_len(&self) -> usize {
        self.index_of(trace_names::VOLUME)
            .map(|i| self.surface.traces()[i].len())
            .unwrap_or(0)
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.surface.traces().iter().position(|t| t.name == name)
    }

    fn price_candles(&self) -> Vec<Candle> {
        self.surface
            .traces()
            .iter()
            .find_map(|t| match &t.body {
                TraceBody::Candlestick(c) if t.name == trace_names::PRICE => Some(c.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    fn price_x_values(&self) -> Vec<i64> {
        self.index_of(trace_names::PRICE)
            .map(|i| self.surface.traces()[i].x_values())
            .unwrap_or_default()
    }

    fn base_traces(&self) -> Vec<Trace> {
        let mut base: Vec<Trace> = self
            .surface
            .traces()
            .iter()
            .filter(|t| t.is_base())
            .cloned()
            .collect();
        if self.index_of(trace_names::PRICE).is_none() {
            base.insert(0, Trace::price(&[]));
        }
        if self.index_of(trace_names::VOLUME).is_none() {
            base.push(Trace::volume(&[], self.volume_visible));
        }
        base
    }

    fn band_traces(&self) -> Vec<Trace> {
        self.surface
            .traces()
            .iter()
            .filter(|t| !t.is_base())
            .cloned()
            .collect()
    }

    /// First and last price x. Both ends are "now" on an empty chart.
    fn band_span(&self) -> [i64; 2] {
        let xs = self.price_x_values();
        match (xs.first(), xs.last()) {
            (Some(first), Some(last)) => [*first, *last],
            _ => {
                let now = now_timestamp_ms();
                [now, now]
            }
        }
    }

    fn contain<F>(&mut self, op: &str, f: F) -> bool
    where
        F: FnOnce(&mut S) -> Result<(), ChartError>,
    {
        match f(&mut self.surface) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Chart {} failed: {}", op, e);
                false
            }
        }
    }
}

impl<S: ChartSurface> OverlayTarget for ChartOverlaySync<S> {
    fn sync_overlay(&mut self, levels: &[SupportLevel], overlay_visible: bool) {
        let mut traces = self.base_traces();

        if overlay_visible {
            let span = self.band_span();
            traces.extend(levels.iter().map(|level| Trace::band(level, span)));
        }

        #[cfg(debug_assertions)]
        if DF.log_overlay_sync {
            log::info!(
                "OVERLAY: {} traces ({} bands, visible={})",
                traces.len(),
                traces.len().saturating_sub(2),
                overlay_visible
            );
        }

        self.contain("overlay sync", |s| s.react(traces));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::TraceStore;

    fn series(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let p = 100.0 + i as f64;
                Candle::new(i as i64 * 60_000, p, p + 1.0, p - 1.0, p + 0.5, 10.0)
            })
            .collect()
    }

    fn levels() -> Vec<SupportLevel> {
        let mut active = SupportLevel::new(103.0, 90.0, 4, None);
        active.is_active = true;
        vec![active, SupportLevel::new(95.0, 40.0, 2, None)]
    }

    #[test]
    fn toggling_overlay_keeps_price_points() {
        let mut overlay = ChartOverlaySync::new(TraceStore::new(), true);
        overlay.initialize(&series(10), true, &levels());
        assert_eq!(overlay.surface().traces().len(), 4);

        overlay.sync_overlay(&[], false);
        assert_eq!(overlay.surface().traces().len(), 2);
        overlay.sync_overlay(&[], false);
        assert_eq!(overlay.surface().traces().len(), 2);

        overlay.sync_overlay(&levels(), true);
        assert_eq!(overlay.band_count(), 2);
        assert_eq!(overlay.price_len(), 10);
    }

    #[test]
    fn bands_span_price_domain() {
        let mut overlay = ChartOverlaySync::new(TraceStore::new(), true);
        overlay.initialize(&series(5), true, &levels());
        let band = &overlay.surface().traces()[2];
        assert_eq!(band.name, "Support $103.00");
        match band.body {
            TraceBody::Band { x, price, style } => {
                assert_eq!(x, [0, 4 * 60_000]);
                assert_eq!(price, 103.0);
                assert!(style.dotted);
            }
            _ => panic!("expected band"),
        }
    }

    #[test]
    fn bands_on_empty_chart_collapse_to_now() {
        let mut overlay = ChartOverlaySync::new(TraceStore::new(), true);
        overlay.sync_overlay(&levels(), true);
        match overlay.surface().traces()[2].body {
            TraceBody::Band { x, .. } => assert_eq!(x[0], x[1]),
            _ => panic!("expected band"),
        }
    }

    #[test]
    fn append_past_cap_windows_to_last_500() {
        let mut overlay = ChartOverlaySync::new(TraceStore::new(), true);
        let data = series(501);
        for c in &data {
            overlay.append_point(c);
        }
        assert_eq!(overlay.price_len(), 501);
        assert_eq!(overlay.visible_point_count(), 500);
        assert_eq!(
            overlay.surface().x_range(),
            Some((data[1].timestamp_ms, data[500].timestamp_ms))
        );
    }

    #[test]
    fn append_never_touches_bands() {
        let mut overlay = ChartOverlaySync::new(TraceStore::new(), true);
        overlay.initialize(&series(3), true, &levels());
        let bands_before: Vec<Trace> = overlay.surface().traces()[2..].to_vec();
        overlay.append_point(&Candle::flat(10 * 60_000, 104.0, 1.0));
        assert_eq!(overlay.surface().traces()[2..].to_vec(), bands_before);
        assert_eq!(overlay.price_len(), 4);
    }

    #[test]
    fn hidden_volume_skips_appends_and_refills_on_show() {
        let mut overlay = ChartOverlaySync::new(TraceStore::new(), false);
        overlay.initialize(&series(3), false, &[]);
        overlay.append_point(&Candle::flat(10 * 60_000, 104.0, 1.0));
        assert_eq!(overlay.volume_len(), 3);

        overlay.set_volume_visible(true);
        assert_eq!(overlay.volume_len(), 4);
        assert!(overlay.surface().traces()[1].visible);
    }

    #[test]
    fn rebuild_keeps_bands_and_clears_window() {
        let mut overlay = ChartOverlaySync::new(TraceStore::new(), true);
        for c in &series(501) {
            overlay.append_point(c);
        }
        overlay.sync_overlay(&levels(), true);
        overlay.rebuild(&series(20));
        assert_eq!(overlay.price_len(), 20);
        assert_eq!(overlay.band_count(), 2);
        assert_eq!(overlay.surface().x_range(), None);
    }

    #[test]
    fn statistics_follow_last_candle() {
        let mut overlay = ChartOverlaySync::new(TraceStore::new(), true);
        assert_eq!(overlay.statistics(), None);
        overlay.append_point(&Candle::new(0, 10.0, 12.0, 9.0, 9.5, 1.0));
        let stats = overlay.statistics().unwrap();
        assert_eq!(stats.close, 9.5);
        assert_eq!(stats.direction, Direction::Down);
    }

    struct BrokenSurface {
        inner: TraceStore,
        fail: bool,
    }

    impl ChartSurface for BrokenSurface {
        fn traces(&self) -> &[Trace] {
            self.inner.traces()
        }
        fn react(&mut self, traces: Vec<Trace>) -> Result<(), ChartError> {
            if self.fail {
                return Err(ChartError::InvalidTrace {
                    name: "any".to_string(),
                    reason: "surface offline".to_string(),
                });
            }
            self.inner.react(traces)
        }
        fn restyle_visibility(&mut self, index: usize, visible: bool) -> Result<(), ChartError> {
            self.inner.restyle_visibility(index, visible)
        }
        fn extend_trace(&mut self, index: usize, candle: &Candle) -> Result<(), ChartError> {
            self.inner.extend_trace(index, candle)
        }
        fn relayout_x_range(&mut self, range: Option<(i64, i64)>) -> Result<(), ChartError> {
            self.inner.relayout_x_range(range)
        }
        fn x_range(&self) -> Option<(i64, i64)> {
            self.inner.x_range()
        }
    }

    #[test]
    fn surface_failure_is_contained() {
        let surface = BrokenSurface {
            inner: TraceStore::new(),
            fail: false,
        };
        let mut overlay = ChartOverlaySync::new(surface, true);
        overlay.initialize(&series(4), true, &levels());
        let before = overlay.surface().traces().to_vec();

        overlay.surface.fail = true;
        overlay.sync_overlay(&[], false);
        assert_eq!(overlay.surface().traces(), before.as_slice());
    }
}
