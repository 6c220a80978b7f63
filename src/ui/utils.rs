use eframe::egui::{Context, Visuals};

use crate::config::plot::PLOT_CONFIG;
use crate::domain::{LevelPosition, SupportLevel};
use crate::ui::ui_config::UI_CONFIG;
use crate::ui::ui_text::UI_TEXT;

/// Formats a price with "Trader Precision".
/// - Large (>=1000): 2 decimals ($95,123.50)
/// - Medium (1-1000): 2 to 4 decimals ($12.4829)
/// - Small (<1): 2 to 8 decimals ($0.00000231)
pub fn format_price(price: f64) -> String {
    if !price.is_finite() {
        return "$-".to_string();
    }
    let abs_price = price.abs();
    let max_decimals = if abs_price >= 1000.0 {
        2
    } else if abs_price >= 1.0 {
        4
    } else {
        8
    };
    let body = group_thousands(&trim_decimals(abs_price, max_decimals, 2));
    if price < 0.0 {
        format!("-${}", body)
    } else {
        format!("${}", body)
    }
}

/// Signed percentage with two decimals. Positive values get a "+".
pub fn format_percent(value: f64) -> String {
    if value > 0.0 {
        format!("+{:.2}%", value)
    } else {
        format!("{:.2}%", value)
    }
}

pub fn format_volume(volume: f64) -> String {
    if !volume.is_finite() {
        return "-".to_string();
    }
    let body = group_thousands(&format!("{:.2}", volume.abs()));
    if volume < 0.0 { format!("-{}", body) } else { body }
}

/// "3 hours ago" style label. `None` means the level was never tested.
pub fn format_time_ago(last_test_ms: Option<i64>, now_ms: i64) -> String {
    let Some(ts) = last_test_ms else {
        return UI_TEXT.never.to_string();
    };

    const UNITS: [(&str, i64); 6] = [
        ("year", 31_536_000),
        ("month", 2_592_000),
        ("week", 604_800),
        ("day", 86_400),
        ("hour", 3_600),
        ("minute", 60),
    ];

    let seconds = (now_ms - ts) / 1000;
    for (unit, secs_in_unit) in UNITS {
        let n = seconds / secs_in_unit;
        if n >= 1 {
            let plural = if n == 1 { "" } else { "s" };
            return format!("{} {}{} ago", n, unit, plural);
        }
    }
    UI_TEXT.just_now.to_string()
}

/// Badge text next to each support card.
pub fn format_level_badge(level: &SupportLevel) -> String {
    match level.position() {
        LevelPosition::Active => UI_TEXT.badge_active.to_string(),
        LevelPosition::Below => format!("{:.1}% {}", level.distance.abs(), UI_TEXT.badge_below),
        LevelPosition::Above => format!("{:.1}% {}", level.distance, UI_TEXT.badge_above),
    }
}

/// Unsigned distance for the card's Distance row. The sign is carried by
/// [`distance_color`].
pub fn format_distance(distance: f64) -> String {
    format!("{:.2}%", distance.abs())
}

pub fn distance_color(distance: f64) -> eframe::egui::Color32 {
    if distance < 0.0 {
        PLOT_CONFIG.color_down
    } else {
        PLOT_CONFIG.color_up
    }
}

pub fn format_strength(strength: f64) -> String {
    format!("{:.1}%", strength)
}

pub fn strength_color(strength: f64) -> eframe::egui::Color32 {
    use crate::config::constants::strength;
    if strength >= strength::HIGH {
        PLOT_CONFIG.strength_high
    } else if strength >= strength::MEDIUM {
        PLOT_CONFIG.strength_medium
    } else {
        PLOT_CONFIG.strength_low
    }
}

fn trim_decimals(value: f64, max_decimals: usize, min_decimals: usize) -> String {
    let s = format!("{:.*}", max_decimals, value);
    let Some(dot) = s.find('.') else {
        return s;
    };
    let keep_at_least = dot + 1 + min_decimals;
    let trimmed = s.trim_end_matches('0');
    if trimmed.len() < keep_at_least {
        s[..keep_at_least].to_string()
    } else {
        trimmed.to_string()
    }
}

fn group_thousands(num: &str) -> String {
    let (int_part, frac_part) = match num.find('.') {
        Some(i) => (&num[..i], &num[i..]),
        None => (num, ""),
    };
    let len = int_part.len();
    let mut out = String::with_capacity(len + len / 3 + frac_part.len());
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.push_str(frac_part);
    out
}

/// Sets up custom visuals for the entire application
pub fn setup_custom_visuals(ctx: &Context) {
    let mut visuals = Visuals::dark();

    visuals.window_fill = UI_CONFIG.colors.central_panel;
    visuals.panel_fill = UI_CONFIG.colors.side_panel;

    // Make the widgets stand out a bit more
    visuals.widgets.noninteractive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.inactive.fg_stroke.color = UI_CONFIG.colors.label;
    visuals.widgets.hovered.fg_stroke.color = UI_CONFIG.colors.heading;
    visuals.widgets.active.fg_stroke.color = UI_CONFIG.colors.heading;

    ctx.set_visuals(visuals);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_precision_by_magnitude() {
        assert_eq!(format_price(65432.1), "$65,432.10");
        assert_eq!(format_price(1234567.891), "$1,234,567.89");
        assert_eq!(format_price(12.5), "$12.50");
        assert_eq!(format_price(12.48291), "$12.4829");
        assert_eq!(format_price(0.00000231), "$0.00000231");
        assert_eq!(format_price(0.5), "$0.50");
    }

    #[test]
    fn percent_sign() {
        assert_eq!(format_percent(2.5), "+2.50%");
        assert_eq!(format_percent(-1.234), "-1.23%");
        assert_eq!(format_percent(0.0), "0.00%");
    }

    #[test]
    fn volume_grouping() {
        assert_eq!(format_volume(1234.5), "1,234.50");
        assert_eq!(format_volume(12.0), "12.00");
    }

    #[test]
    fn time_ago_units() {
        let now = 1_000_000_000_000;
        assert_eq!(format_time_ago(None, now), "Never");
        assert_eq!(format_time_ago(Some(now), now), "Just now");
        assert_eq!(format_time_ago(Some(now - 59_000), now), "Just now");
        assert_eq!(format_time_ago(Some(now - 60_000), now), "1 minute ago");
        assert_eq!(format_time_ago(Some(now - 3 * 3_600_000), now), "3 hours ago");
        assert_eq!(format_time_ago(Some(now - 86_400_000), now), "1 day ago");
        assert_eq!(format_time_ago(Some(now - 400 * 86_400_000), now), "1 year ago");
    }

    #[test]
    fn badges() {
        let mut level = SupportLevel::new(95.0, 40.0, 2, None);
        level.distance = -5.0;
        assert_eq!(format_level_badge(&level), "5.0% Below");
        level.is_active = true;
        assert_eq!(format_level_badge(&level), "Active");
        level.is_active = false;
        level.distance = 4.0;
        assert_eq!(format_level_badge(&level), "4.0% Above");
    }

    #[test]
    fn distance_row_is_unsigned_and_colored_by_side() {
        assert_eq!(format_distance(-5.0), "5.00%");
        assert_eq!(format_distance(1.666), "1.67%");
        assert_eq!(distance_color(-0.01), PLOT_CONFIG.color_down);
        assert_eq!(distance_color(3.2), PLOT_CONFIG.color_up);
        assert_eq!(distance_color(0.0), PLOT_CONFIG.color_up);
    }

    #[test]
    fn strength_keeps_one_decimal() {
        assert_eq!(format_strength(72.46), "72.5%");
        assert_eq!(format_strength(90.0), "90.0%");
    }

    #[test]
    fn strength_tiers() {
        assert_eq!(strength_color(80.0), PLOT_CONFIG.strength_high);
        assert_eq!(strength_color(50.0), PLOT_CONFIG.strength_medium);
        assert_eq!(strength_color(49.9), PLOT_CONFIG.strength_low);
    }
}
