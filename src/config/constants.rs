// Top Level Constants

/// A level within this percentage of the current price counts as "active".
pub const ACTIVE_THRESHOLD_PCT: f64 = 3.0;

/// Point cap for the visible chart window. Older points stay in the trace
/// but scroll out of view.
pub const MAX_CHART_POINTS: usize = 500;

pub const DEFAULT_PAIR: &str = "BTCUSDT";

pub mod trace {
    /// Stable trace names. Bands are found and removed by exclusion from these.
    pub const PRICE: &str = "Price";
    pub const VOLUME: &str = "Volume";

    pub fn band_name(price: f64) -> String {
        format!("Support ${:.2}", price)
    }
}

pub mod badge {
    /// Active-count thresholds for the badge tiers.
    pub const INFO_MIN: usize = 1;
    pub const ALERT_MIN: usize = 3;
}

pub mod strength {
    /// Strength bar color bands.
    pub const HIGH: f64 = 80.0;
    pub const MEDIUM: f64 = 50.0;
}

/// Pairs offered in the pair selector.
pub const PAIRS: &[&str] = &["BTCUSDT", "ETHUSDT", "BNBUSDT", "SOLUSDT", "XRPUSDT"];
