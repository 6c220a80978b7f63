use crate::chart::{ChartOverlaySync, ChartSurface};
use crate::domain::{SortType, TickerStats, Timeframe};
use crate::engine::{OverlayTarget, SupportLevelEngine, SupportSink};
use crate::transport::{
    ChartPayload, InboundEvent, InitialData, OutboundRequest, PriceData, PriceTick,
};
use crate::utils::now_timestamp_ms;

#[cfg(debug_assertions)]
use crate::config::DF;

/// User choices a session starts from (restored from storage).
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub pair: String,
    pub timeframe: Timeframe,
    pub sort_type: SortType,
    pub overlay_visible: bool,
    pub volume_visible: bool,
}

/// One dashboard: the engine, the chart overlay and the panel sink, fed by
/// inbound events in arrival order.
pub struct Session<S: ChartSurface, K: SupportSink> {
    engine: SupportLevelEngine,
    overlay: ChartOverlaySync<S>,
    sink: K,
    pair: String,
    timeframe: Timeframe,
    ticker: Option<TickerStats>,
    last_price: Option<f64>,
    connected: bool,
    last_event_ms: Option<i64>,
}

impl<S: ChartSurface, K: SupportSink> Session<S, K> {
    pub fn new(surface: S, sink: K, settings: SessionSettings) -> Self {
        Self {
            engine: SupportLevelEngine::with_preferences(settings.sort_type, settings.overlay_visible),
            overlay: ChartOverlaySync::new(surface, settings.volume_visible),
            sink,
            pair: settings.pair,
            timeframe: settings.timeframe,
            ticker: None,
            last_price: None,
            connected: false,
            last_event_ms: None,
        }
    }

    pub fn dispatch(&mut self, event: InboundEvent) {
        #[cfg(debug_assertions)]
        if DF.log_dispatch {
            log::info!("DISPATCH: {}", event.kind());
        }

        self.last_event_ms = Some(now_timestamp_ms());

        match event {
            InboundEvent::Connected => self.connected = true,
            InboundEvent::Disconnected => self.connected = false,
            InboundEvent::InitialData(data) => self.apply_initial_data(data),
            // Measured against the latest tick of the selected pair
            InboundEvent::SupportUpdate(levels) => {
                self.engine
                    .update(levels, self.last_price, &mut self.sink, &mut self.overlay);
            }
            InboundEvent::PriceUpdate(tick) => self.apply_price_tick(tick),
            InboundEvent::ChartUpdate(payload) => self.apply_chart_update(payload),
        }
    }

    fn apply_initial_data(&mut self, data: InitialData) {
        if let Some(pair) = data.pair {
            self.pair = pair;
        }
        if let Some(tf) = data.timeframe {
            self.timeframe = tf;
        }

        let price = data.price_data.last_price();
        if let PriceData::Ticker(t) = &data.price_data {
            self.ticker = Some(t.clone());
        }
        if price.is_some() {
            self.last_price = price;
        }

        self.overlay.rebuild(data.price_data.candles());
        self.engine
            .update(data.support_levels, price, &mut self.sink, &mut self.overlay);
    }

    /// Ticks only move the header price and extend the chart. Levels keep
    /// their last computed distances until the next support update.
    fn apply_price_tick(&mut self, tick: PriceTick) {
        if let Some(p) = tick.last_price() {
            self.last_price = Some(p);
        }
        if let Some(point) = tick.chart_point(now_timestamp_ms()) {
            self.overlay.append_point(&point);
        }
        if let Some(ticker) = tick.ticker {
            self.ticker = Some(ticker);
        }
    }

    fn apply_chart_update(&mut self, payload: ChartPayload) {
        self.overlay.rebuild(&payload.series);
        match payload.supports {
            Some(levels) => {
                self.engine
                    .update(Some(levels), None, &mut self.sink, &mut self.overlay);
            }
            // New time domain, same levels: stretch the bands over it.
            None => {
                if self.engine.overlay_visible() {
                    self.overlay.sync_overlay(self.engine.levels(), true);
                }
            }
        }
    }

    /// Switches pair. The panel shows loading until the server answers.
    pub fn select_pair(&mut self, pair: &str) -> Option<OutboundRequest> {
        if pair == self.pair {
            return None;
        }
        self.pair = pair.to_string();
        self.ticker = None;
        self.last_price = None;
        self.engine.reset_price();
        // Old pair's candles would share an axis with the new pair's ticks
        self.overlay.rebuild(&[]);
        self.engine.begin_refresh(&mut self.sink);
        Some(OutboundRequest::ChangePair {
            pair: self.pair.clone(),
        })
    }

    pub fn select_timeframe(&mut self, timeframe: Timeframe) -> Option<OutboundRequest> {
        if timeframe == self.timeframe {
            return None;
        }
        self.timeframe = timeframe;
        Some(OutboundRequest::ChangeTimeframe { timeframe })
    }

    /// Applies a pair and timeframe choice together. A pair change also asks
    /// for the chart again, since the server only answers it with a price
    /// and a support update.
    pub fn select(&mut self, pair: &str, timeframe: Timeframe) -> Vec<OutboundRequest> {
        let pair_request = self.select_pair(pair);
        let timeframe_changed = self.select_timeframe(timeframe).is_some();

        match pair_request {
            Some(request) => vec![
                request,
                OutboundRequest::ChangeTimeframe {
                    timeframe: self.timeframe,
                },
            ],
            None if timeframe_changed => vec![OutboundRequest::ChangeTimeframe {
                timeframe: self.timeframe,
            }],
            None => Vec::new(),
        }
    }

    /// Re-applies the user's choice after `initial_data`. The server greets
    /// with a ticker rather than candles, so an empty chart asks for them.
    pub fn restore(&mut self, pair: &str, timeframe: Timeframe) -> Vec<OutboundRequest> {
        let mut requests = self.select(pair, timeframe);
        let chart_requested = requests
            .iter()
            .any(|r| matches!(r, OutboundRequest::ChangeTimeframe { .. }));
        if !chart_requested && self.overlay.price_len() == 0 {
            requests.push(OutboundRequest::ChangeTimeframe {
                timeframe: self.timeframe,
            });
        }
        requests
    }

    pub fn refresh_supports(&mut self) -> OutboundRequest {
        self.engine.begin_refresh(&mut self.sink);
        OutboundRequest::RequestSupportUpdate {
            pair: self.pair.clone(),
        }
    }

    pub fn set_sort_type(&mut self, sort_type: SortType) {
        self.engine.set_sort_type(sort_type, &mut self.sink);
    }

    pub fn set_overlay_visible(&mut self, visible: bool) {
        self.engine.set_overlay_visible(visible, &mut self.overlay);
    }

    pub fn set_volume_visible(&mut self, visible: bool) {
        self.overlay.set_volume_visible(visible);
    }

    pub fn engine(&self) -> &SupportLevelEngine {
        &self.engine
    }

    pub fn overlay(&self) -> &ChartOverlaySync<S> {
        &self.overlay
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn pair(&self) -> &str {
        &self.pair
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    pub fn ticker(&self) -> Option<&TickerStats> {
        self.ticker.as_ref()
    }

    pub fn last_price(&self) -> Option<f64> {
        self.last_price
    }

    pub fn connected(&self) -> bool {
        self.connected
    }

    pub fn last_event_ms(&self) -> Option<i64> {
        self.last_event_ms
    }

    pub fn settings(&self) -> SessionSettings {
        SessionSettings {
            pair: self.pair.clone(),
            timeframe: self.timeframe,
            sort_type: self.engine.sort_type(),
            overlay_visible: self.engine.overlay_visible(),
            volume_visible: self.overlay.volume_visible(),
        }
    }
}
