use crate::domain::SupportLevel;

/// Presentation side of the engine. Receives the already sorted view.
pub trait SupportSink {
    fn render(&mut self, levels: &[SupportLevel], active_count: usize);
    fn show_empty(&mut self);
    fn show_loading(&mut self);
}

/// Chart side of the engine. Implemented by the chart overlay.
pub trait OverlayTarget {
    fn sync_overlay(&mut self, levels: &[SupportLevel], overlay_visible: bool);
}
