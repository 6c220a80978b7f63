mod core;
mod sink;
mod sort;
mod state;

pub use self::core::SupportLevelEngine;
pub use sink::{OverlayTarget, SupportSink};
pub use sort::sort_levels;
pub use state::{ActiveTier, DisplayState};
