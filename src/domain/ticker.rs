use serde::{Deserialize, Serialize};

use crate::utils::time_utils::serde_timestamp;

/// Rolling 24h ticker for the selected pair (header price display).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TickerStats {
    #[serde(default)]
    pub symbol: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub change_24h: f64,
    #[serde(default)]
    pub high_24h: f64,
    #[serde(default)]
    pub low_24h: f64,
    #[serde(default)]
    pub volume_24h: f64,
    #[serde(default, deserialize_with = "serde_timestamp::optional")]
    pub timestamp: Option<i64>,
}

impl TickerStats {
    pub fn is_up(&self) -> bool {
        self.change_24h >= 0.0
    }
}
