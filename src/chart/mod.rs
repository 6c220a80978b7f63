mod overlay;
mod surface;
mod trace;

pub use overlay::{ChartOverlaySync, ChartStatistics, Direction};
pub use surface::{ChartError, ChartSurface, TraceStore};
pub use trace::{BandStyle, Trace, TraceBody, VolumeBar};
