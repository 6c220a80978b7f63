use crate::config::constants::badge;

/// What the support panel is currently showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayState {
    /// Waiting on the server (startup or manual refresh).
    #[default]
    Loading,
    /// No levels, or the last payload was unusable.
    Empty,
    /// A sorted, classified list is on screen.
    Populated,
}

/// Visual tier of the active-level badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveTier {
    Neutral,
    Info,
    Alert,
}

impl ActiveTier {
    pub fn from_count(count: usize) -> Self {
        if count >= badge::ALERT_MIN {
            Self::Alert
        } else if count >= badge::INFO_MIN {
            Self::Info
        } else {
            Self::Neutral
        }
    }
}
