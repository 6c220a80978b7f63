// Domain types and value objects
mod candle;
mod sort_type;
mod support_level;
mod ticker;
mod timeframe;

// Re-export commonly used types to the world
pub use candle::{Candle, CandleType};
pub use sort_type::SortType;
pub use support_level::{LevelPosition, SupportLevel};
pub use ticker::TickerStats;
pub use timeframe::Timeframe;
