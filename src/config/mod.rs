//! Configuration module for the support tracker.

mod debug;
mod persistence;
mod socket;

// Public
pub mod constants;

// Can't be private because we don't re-export it
pub mod plot;

// Re-export commonly used items
pub use constants::{ACTIVE_THRESHOLD_PCT, DEFAULT_PAIR, MAX_CHART_POINTS, PAIRS};
pub use debug::DF;
pub use persistence::PERSISTENCE;
pub use socket::{SOCKET, SocketConfig, socket_url};
