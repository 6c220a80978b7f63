//! Typed inbound events and outbound requests, plus the channel table that
//! maps Socket.IO event names onto decoders.

use serde_json::{Value, json};

use crate::domain::{Candle, SupportLevel, TickerStats, Timeframe};
use crate::utils::parse_timestamp_value;

use super::codec::Packet;

/// Series or ticker, whichever the server sent as `price_data`.
#[derive(Debug, Clone, PartialEq)]
pub enum PriceData {
    Candles(Vec<Candle>),
    Ticker(TickerStats),
    Missing,
}

impl PriceData {
    pub fn candles(&self) -> &[Candle] {
        match self {
            PriceData::Candles(c) => c,
            _ => &[],
        }
    }

    /// Ticker price, else the last close.
    pub fn last_price(&self) -> Option<f64> {
        match self {
            PriceData::Ticker(t) => Some(t.price),
            PriceData::Candles(c) => c.last().map(|c| c.close),
            PriceData::Missing => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitialData {
    pub pair: Option<String>,
    pub timeframe: Option<Timeframe>,
    pub price_data: PriceData,
    pub support_levels: Option<Vec<SupportLevel>>,
}

/// One `price_update`. Either part may be missing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceTick {
    pub candle: Option<Candle>,
    pub ticker: Option<TickerStats>,
}

impl PriceTick {
    pub fn last_price(&self) -> Option<f64> {
        self.ticker
            .as_ref()
            .map(|t| t.price)
            .or_else(|| self.candle.map(|c| c.close))
            .filter(|p| p.is_finite())
    }

    /// The chart point for this tick. A bare ticker becomes a flat candle
    /// stamped with its own timestamp, or `now_ms` when it has none.
    pub fn chart_point(&self, now_ms: i64) -> Option<Candle> {
        if let Some(c) = self.candle {
            return Some(c);
        }
        let ticker = self.ticker.as_ref()?;
        if !ticker.price.is_finite() || ticker.price <= 0.0 {
            return None;
        }
        Some(Candle::flat(ticker.timestamp.unwrap_or(now_ms), ticker.price, 0.0))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartPayload {
    pub series: Vec<Candle>,
    /// Present only when the server bundled levels with the chart.
    pub supports: Option<Vec<SupportLevel>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InboundEvent {
    Connected,
    Disconnected,
    InitialData(InitialData),
    /// None when the payload was not a list.
    SupportUpdate(Option<Vec<SupportLevel>>),
    PriceUpdate(PriceTick),
    ChartUpdate(ChartPayload),
}

impl InboundEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            InboundEvent::Connected => "connect",
            InboundEvent::Disconnected => "disconnect",
            InboundEvent::InitialData(_) => "initial_data",
            InboundEvent::SupportUpdate(_) => "support_update",
            InboundEvent::PriceUpdate(_) => "price_update",
            InboundEvent::ChartUpdate(_) => "chart_update",
        }
    }
}

type Decoder = fn(Value) -> Option<InboundEvent>;

pub struct InboundChannel {
    pub name: &'static str,
    decode: Decoder,
}

pub static INBOUND_CHANNELS: &[InboundChannel] = &[
    InboundChannel {
        name: "connect",
        decode: decode_connect,
    },
    InboundChannel {
        name: "disconnect",
        decode: decode_disconnect,
    },
    InboundChannel {
        name: "initial_data",
        decode: decode_initial_data,
    },
    InboundChannel {
        name: "support_update",
        decode: decode_support_update,
    },
    InboundChannel {
        name: "price_update",
        decode: decode_price_update,
    },
    InboundChannel {
        name: "chart_update",
        decode: decode_chart_update,
    },
];

/// Looks `name` up in [`INBOUND_CHANNELS`]. Unknown channels and unusable
/// payloads are logged and yield None.
pub fn decode_event(name: &str, payload: Value) -> Option<InboundEvent> {
    let Some(channel) = INBOUND_CHANNELS.iter().find(|c| c.name == name) else {
        log::debug!("Ignoring unknown channel '{}'", name);
        return None;
    };
    let event = (channel.decode)(payload);
    if event.is_none() {
        log::warn!("Dropping '{}' event with unusable payload", name);
    }
    event
}

/// A non-array payload is None. Elements that don't parse, or whose price
/// isn't finite and positive, are dropped.
pub fn parse_levels(value: &Value) -> Option<Vec<SupportLevel>> {
    let items = value.as_array()?;
    let levels = items
        .iter()
        .filter_map(|item| match serde_json::from_value::<SupportLevel>(item.clone()) {
            Ok(level) if level.is_valid() => Some(level),
            Ok(level) => {
                log::warn!("Dropping support level with price {}", level.price);
                None
            }
            Err(e) => {
                log::warn!("Dropping malformed support level: {}", e);
                None
            }
        })
        .collect();
    Some(levels)
}

pub fn parse_candles(value: &Value) -> Vec<Candle> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };
    items
        .iter()
        .filter_map(|item| match serde_json::from_value::<Candle>(item.clone()) {
            Ok(c) if c.is_finite() => Some(c),
            Ok(c) => {
                log::warn!("Dropping non-finite candle at {}", c.timestamp_ms);
                None
            }
            Err(e) => {
                log::warn!("Dropping malformed candle: {}", e);
                None
            }
        })
        .collect()
}

fn parse_price_data(value: &Value) -> PriceData {
    match value {
        Value::Array(_) => PriceData::Candles(parse_candles(value)),
        Value::Object(map) => match map.get("price") {
            Some(series @ Value::Array(_)) => PriceData::Candles(parse_candles(series)),
            Some(Value::Number(_)) => parse_ticker(value).map_or(PriceData::Missing, PriceData::Ticker),
            _ => PriceData::Missing,
        },
        _ => PriceData::Missing,
    }
}

fn parse_ticker(value: &Value) -> Option<TickerStats> {
    match serde_json::from_value::<TickerStats>(value.clone()) {
        Ok(t) if t.price.is_finite() => Some(t),
        Ok(_) => None,
        Err(e) => {
            log::warn!("Malformed ticker: {}", e);
            None
        }
    }
}

fn has_ohlc(map: &serde_json::Map<String, Value>) -> bool {
    ["open", "high", "low", "close"]
        .iter()
        .all(|k| map.get(*k).is_some_and(Value::is_number))
        && map.get("timestamp").and_then(parse_timestamp_value).is_some()
}

fn decode_connect(_: Value) -> Option<InboundEvent> {
    Some(InboundEvent::Connected)
}

fn decode_disconnect(_: Value) -> Option<InboundEvent> {
    Some(InboundEvent::Disconnected)
}

fn decode_support_update(value: Value) -> Option<InboundEvent> {
    Some(InboundEvent::SupportUpdate(parse_levels(&value)))
}

fn decode_initial_data(value: Value) -> Option<InboundEvent> {
    let map = value.as_object()?;
    let pair = map.get("pair").and_then(Value::as_str).map(str::to_string);
    let timeframe = map
        .get("timeframe")
        .and_then(Value::as_str)
        .and_then(Timeframe::parse);
    let price_data = map
        .get("price_data")
        .map(parse_price_data)
        .unwrap_or(PriceData::Missing);
    let support_levels = map.get("support_levels").and_then(parse_levels);

    Some(InboundEvent::InitialData(InitialData {
        pair,
        timeframe,
        price_data,
        support_levels,
    }))
}

fn decode_price_update(value: Value) -> Option<InboundEvent> {
    let map = value.as_object()?;

    let candle = if has_ohlc(map) {
        serde_json::from_value::<Candle>(value.clone())
            .ok()
            .filter(Candle::is_finite)
    } else {
        None
    };
    let ticker = match map.get("price") {
        Some(Value::Number(_)) => parse_ticker(&value),
        _ => None,
    };

    if candle.is_none() && ticker.is_none() {
        return None;
    }
    Some(InboundEvent::PriceUpdate(PriceTick { candle, ticker }))
}

fn decode_chart_update(value: Value) -> Option<InboundEvent> {
    let (series, supports) = match &value {
        Value::Array(_) => (parse_candles(&value), None),
        Value::Object(map) => {
            let series = map.get("price").map(parse_candles).unwrap_or_default();
            let supports = map
                .get("supports")
                .or_else(|| map.get("support_levels"))
                .and_then(parse_levels);
            (series, supports)
        }
        _ => return None,
    };
    Some(InboundEvent::ChartUpdate(ChartPayload { series, supports }))
}

/// Requests the client emits to the server.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundRequest {
    RequestSupportUpdate { pair: String },
    ChangePair { pair: String },
    ChangeTimeframe { timeframe: Timeframe },
}

impl OutboundRequest {
    pub fn channel(&self) -> &'static str {
        match self {
            OutboundRequest::RequestSupportUpdate { .. } => "request_support_update",
            OutboundRequest::ChangePair { .. } => "change_pair",
            OutboundRequest::ChangeTimeframe { .. } => "change_timeframe",
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            OutboundRequest::RequestSupportUpdate { pair } | OutboundRequest::ChangePair { pair } => {
                json!({ "pair": pair })
            }
            OutboundRequest::ChangeTimeframe { timeframe } => {
                json!({ "timeframe": timeframe.as_str() })
            }
        }
    }

    pub fn to_packet(&self) -> Packet {
        Packet::event(self.channel(), self.payload())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_channel_is_registered_once() {
        let mut names: Vec<&str> = INBOUND_CHANNELS.iter().map(|c| c.name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), INBOUND_CHANNELS.len());
    }

    #[test]
    fn initial_data_with_ticker() {
        let payload = json!({
            "pair": "ETHUSDT",
            "timeframe": "4h",
            "price_data": {
                "symbol": "ETHUSDT", "price": 3000.5, "change_24h": -1.2,
                "volume_24h": 10.0, "high_24h": 3100.0, "low_24h": 2900.0,
                "timestamp": 1_714_557_600_000_i64
            },
            "support_levels": [
                {"price": 2950.0, "strength": 75, "touches": 3, "lastTest": "2024-05-01T10:00:00"}
            ]
        });
        let Some(InboundEvent::InitialData(data)) = decode_event("initial_data", payload) else {
            panic!("expected initial data");
        };
        assert_eq!(data.pair.as_deref(), Some("ETHUSDT"));
        assert_eq!(data.timeframe, Some(Timeframe::H4));
        assert_eq!(data.price_data.last_price(), Some(3000.5));
        let levels = data.support_levels.unwrap();
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].last_test, Some(1_714_557_600_000));
    }

    #[test]
    fn initial_data_with_series() {
        let payload = json!({
            "price_data": {"price": [
                {"timestamp": "2024-05-01T10:00:00", "open": 1.0, "high": 2.0, "low": 0.5, "close": 1.5, "volume": 3.0}
            ]},
            "support_levels": "nope"
        });
        let Some(InboundEvent::InitialData(data)) = decode_event("initial_data", payload) else {
            panic!("expected initial data");
        };
        assert_eq!(data.price_data.candles().len(), 1);
        assert_eq!(data.price_data.last_price(), Some(1.5));
        assert_eq!(data.support_levels, None);
    }

    #[test]
    fn support_update_drops_bad_elements() {
        let payload = json!([
            {"price": 100.0, "strength": 50},
            {"price": -1.0},
            {"strength": 90},
            "junk"
        ]);
        let Some(InboundEvent::SupportUpdate(Some(levels))) = decode_event("support_update", payload)
        else {
            panic!("expected levels");
        };
        assert_eq!(levels.len(), 1);
        assert_eq!(levels[0].price, 100.0);
    }

    #[test]
    fn support_update_non_array_is_none() {
        assert_eq!(
            decode_event("support_update", json!({"error": "x"})),
            Some(InboundEvent::SupportUpdate(None))
        );
        assert_eq!(
            decode_event("support_update", Value::Null),
            Some(InboundEvent::SupportUpdate(None))
        );
    }

    #[test]
    fn price_update_ticker_only_becomes_flat_point() {
        let payload = json!({"symbol": "BTCUSDT", "price": 65000.0, "change_24h": 2.5});
        let Some(InboundEvent::PriceUpdate(tick)) = decode_event("price_update", payload) else {
            panic!("expected tick");
        };
        assert!(tick.candle.is_none());
        assert_eq!(tick.last_price(), Some(65000.0));
        let point = tick.chart_point(42).unwrap();
        assert_eq!(point.timestamp_ms, 42);
        assert_eq!(point.open, 65000.0);
        assert_eq!(point.close, 65000.0);
    }

    #[test]
    fn price_update_with_ohlc() {
        let payload = json!({
            "timestamp": 1_000, "open": 10.0, "high": 12.0, "low": 9.0, "close": 11.0, "volume": 4.0
        });
        let Some(InboundEvent::PriceUpdate(tick)) = decode_event("price_update", payload) else {
            panic!("expected tick");
        };
        assert_eq!(tick.chart_point(0), Some(Candle::new(1_000, 10.0, 12.0, 9.0, 11.0, 4.0)));
        assert_eq!(tick.last_price(), Some(11.0));
    }

    #[test]
    fn price_update_without_price_is_dropped() {
        assert_eq!(decode_event("price_update", json!({"symbol": "X"})), None);
        assert_eq!(decode_event("price_update", json!(5)), None);
    }

    #[test]
    fn chart_update_with_and_without_supports() {
        let candles = json!([
            {"timestamp": 0, "open": 1.0, "high": 1.0, "low": 1.0, "close": 1.0},
            {"timestamp": 60_000, "open": 1.0, "high": 2.0, "low": 1.0, "close": 2.0}
        ]);
        let Some(InboundEvent::ChartUpdate(plain)) =
            decode_event("chart_update", json!({"price": candles.clone(), "volume_profile": []}))
        else {
            panic!("expected chart");
        };
        assert_eq!(plain.series.len(), 2);
        assert_eq!(plain.supports, None);

        let Some(InboundEvent::ChartUpdate(bundled)) = decode_event(
            "chart_update",
            json!({"price": candles, "supports": [{"price": 1.5}]}),
        ) else {
            panic!("expected chart");
        };
        assert_eq!(bundled.supports.map(|s| s.len()), Some(1));
    }

    #[test]
    fn unknown_channel_is_ignored() {
        assert_eq!(decode_event("volume_profile", json!({})), None);
    }

    #[test]
    fn outbound_payloads() {
        let req = OutboundRequest::ChangeTimeframe {
            timeframe: Timeframe::D1,
        };
        assert_eq!(req.to_packet().encode(), r#"42["change_timeframe",{"timeframe":"1d"}]"#);

        let req = OutboundRequest::RequestSupportUpdate {
            pair: "BTCUSDT".to_string(),
        };
        assert_eq!(req.channel(), "request_support_update");
        assert_eq!(req.payload(), json!({"pair": "BTCUSDT"}));
    }
}
