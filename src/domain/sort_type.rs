use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Ordering criteria for the support list.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum SortType {
    /// Strongest first
    #[strum(to_string = "Strength")]
    #[default]
    Strength,
    /// Highest price first
    #[strum(to_string = "Price")]
    Price,
    /// Closest to the current price first
    #[strum(to_string = "Distance")]
    Distance,
    /// Most recently tested first
    #[strum(to_string = "Recent")]
    Recent,
}
