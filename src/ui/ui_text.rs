/// Every user-facing string in one place.
pub struct UiText {
    // Window / headings
    pub app_title: &'static str,
    pub heading_supports: &'static str,
    pub heading_chart: &'static str,

    // Toolbar
    pub label_pair: &'static str,
    pub label_timeframe: &'static str,
    pub label_sort: &'static str,
    pub toggle_overlay: &'static str,
    pub toggle_volume: &'static str,
    pub button_refresh: &'static str,

    // Ticker header
    pub label_change_24h: &'static str,
    pub label_high_24h: &'static str,
    pub label_low_24h: &'static str,
    pub label_volume_24h: &'static str,

    // Support cards
    pub label_strength: &'static str,
    pub label_distance: &'static str,
    pub label_touches: &'static str,
    pub label_last_test: &'static str,
    pub label_level: &'static str,
    pub label_active_count: &'static str,
    pub badge_active: &'static str,
    pub badge_below: &'static str,
    pub badge_above: &'static str,
    pub never: &'static str,
    pub just_now: &'static str,
    pub empty_supports: &'static str,
    pub loading_supports: &'static str,

    // Status bar
    pub status_connected: &'static str,
    pub status_connecting: &'static str,
    pub status_disconnected: &'static str,
    pub stat_open: &'static str,
    pub stat_high: &'static str,
    pub stat_low: &'static str,
    pub stat_close: &'static str,
    pub stat_points: &'static str,
    pub stat_last_event: &'static str,

    // Plot
    pub plot_x_axis: &'static str,
    pub plot_y_axis: &'static str,
    pub plot_waiting: &'static str,
}

pub static UI_TEXT: UiText = UiText {
    app_title: "Support Tracker",
    heading_supports: "Support Levels",
    heading_chart: "Price Chart",

    label_pair: "Pair",
    label_timeframe: "Timeframe",
    label_sort: "Sort by",
    toggle_overlay: "Show supports",
    toggle_volume: "Show volume",
    button_refresh: "⟳ Refresh",

    label_change_24h: "24h",
    label_high_24h: "High",
    label_low_24h: "Low",
    label_volume_24h: "Vol",

    label_strength: "Strength",
    label_distance: "Distance",
    label_touches: "Touches",
    label_last_test: "Last Test",
    label_level: "Level",
    label_active_count: "active",
    badge_active: "Active",
    badge_below: "Below",
    badge_above: "Above",
    never: "Never",
    just_now: "Just now",
    empty_supports: "No support levels found",
    loading_supports: "Loading support levels...",

    status_connected: "● Connected",
    status_connecting: "◌ Connecting",
    status_disconnected: "○ Disconnected",
    stat_open: "O",
    stat_high: "H",
    stat_low: "L",
    stat_close: "C",
    stat_points: "points",
    stat_last_event: "last event",

    plot_x_axis: "Time",
    plot_y_axis: "Price",
    plot_waiting: "Waiting for price data...",
};
