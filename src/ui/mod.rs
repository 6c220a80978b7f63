mod plot_layers;
mod styles;
mod ui_config;
mod ui_panels;
mod ui_plot_view;
mod ui_render;
mod ui_text;
pub mod utils;

pub use ui_config::UI_CONFIG;
pub use ui_panels::SupportPanel;
pub use ui_plot_view::PlotView;
pub use ui_text::UI_TEXT;
pub use utils::setup_custom_visuals;
