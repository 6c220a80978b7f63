use serde::{Deserialize, Serialize};

use crate::utils::time_utils::serde_timestamp;
use crate::utils::{calculate_percent_diff, round2};

/// Where a level sits relative to the current price, for badge text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelPosition {
    Active,
    Below,
    Above,
}

/// A price support candidate as delivered by the server, augmented with
/// analytics relative to the current price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportLevel {
    pub price: f64,

    /// Confidence score, 0..=100.
    #[serde(default)]
    pub strength: f64,

    #[serde(default)]
    pub touches: u32,

    /// Epoch ms of the last test. None means never tested.
    #[serde(
        default,
        alias = "lastTest",
        deserialize_with = "serde_timestamp::optional"
    )]
    pub last_test: Option<i64>,

    /// Signed percent offset from the current price, two decimals.
    #[serde(default)]
    pub distance: f64,

    #[serde(default, rename = "isActive", alias = "is_active")]
    pub is_active: bool,
}

impl SupportLevel {
    pub fn new(price: f64, strength: f64, touches: u32, last_test: Option<i64>) -> Self {
        Self {
            price,
            strength,
            touches,
            last_test,
            distance: 0.0,
            is_active: false,
        }
    }

    /// Only positive, finite prices can be plotted or measured against.
    pub fn is_valid(&self) -> bool {
        self.price.is_finite() && self.price > 0.0
    }

    /// Recomputes `distance` and `is_active` against `current_price`.
    /// Leaves the level untouched and returns false if the price can't be divided by.
    pub fn apply_price(&mut self, current_price: f64, threshold_pct: f64) -> bool {
        let Some(raw) = calculate_percent_diff(self.price, current_price) else {
            return false;
        };
        self.distance = round2(raw);
        self.is_active = self.distance.abs() <= threshold_pct;
        true
    }

    pub fn position(&self) -> LevelPosition {
        if self.is_active {
            LevelPosition::Active
        } else if self.distance < 0.0 {
            LevelPosition::Below
        } else {
            LevelPosition::Above
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_server_shape() {
        let level: SupportLevel = serde_json::from_value(json!({
            "price": 20000.0,
            "strength": 85.5,
            "touches": 7,
            "last_test": "2024-05-01T10:00:00.000000"
        }))
        .unwrap();
        assert_eq!(level.touches, 7);
        assert_eq!(level.last_test, Some(1_714_557_600_000));
        assert_eq!(level.distance, 0.0);
        assert!(!level.is_active);
    }

    #[test]
    fn missing_optional_fields_default() {
        let level: SupportLevel =
            serde_json::from_value(json!({"price": 19500.0, "last_test": null})).unwrap();
        assert_eq!(level.strength, 0.0);
        assert_eq!(level.touches, 0);
        assert_eq!(level.last_test, None);
    }

    #[test]
    fn apply_price_sets_distance_and_activity() {
        let mut above = SupportLevel::new(103.0, 90.0, 3, None);
        assert!(above.apply_price(100.0, 3.0));
        assert_eq!(above.distance, 3.0);
        assert!(above.is_active);
        assert_eq!(above.position(), LevelPosition::Active);

        let mut below = SupportLevel::new(95.0, 40.0, 1, None);
        assert!(below.apply_price(100.0, 3.0));
        assert_eq!(below.distance, -5.0);
        assert!(!below.is_active);
        assert_eq!(below.position(), LevelPosition::Below);
    }

    #[test]
    fn apply_price_zero_guard_keeps_prior_values() {
        let mut level = SupportLevel::new(95.0, 40.0, 1, None);
        level.distance = -1.5;
        level.is_active = true;
        assert!(!level.apply_price(0.0, 3.0));
        assert_eq!(level.distance, -1.5);
        assert!(level.is_active);
    }
}
