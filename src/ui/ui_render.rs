use eframe::egui::{CentralPanel, ComboBox, Context, RichText, SidePanel, TopBottomPanel, Ui};
use strum::IntoEnumIterator;

use crate::app::App;
use crate::config::PAIRS;
use crate::config::plot::PLOT_CONFIG;
use crate::domain::{SortType, TickerStats, Timeframe};
use crate::transport::ConnectionStatus;
use crate::ui::styles::{DirectionColor, UiStyleExt, get_change_color};
use crate::ui::ui_config::UI_CONFIG;
use crate::ui::ui_text::UI_TEXT;
use crate::ui::utils::{format_percent, format_price, format_volume};
use crate::utils::{format_duration, now_timestamp_ms};

impl App {
    pub(crate) fn render_top_panel(&mut self, ctx: &Context) {
        let frame = UI_CONFIG.top_panel_frame();
        TopBottomPanel::top("top_toolbar")
            .frame(frame)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(UI_TEXT.app_title);
                    ui.separator();
                    self.render_controls(ui);
                });
                ui.add_space(4.0);
                self.render_ticker_header(ui);
            });
    }

    fn render_controls(&mut self, ui: &mut Ui) {
        let Some(session) = &mut self.session else { return };

        let mut pair = session.pair().to_string();
        ui.label(UI_TEXT.label_pair);
        ComboBox::from_id_salt("pair_selector")
            .selected_text(&pair)
            .show_ui(ui, |ui| {
                for p in PAIRS {
                    ui.selectable_value(&mut pair, p.to_string(), *p);
                }
            });

        let mut timeframe = session.timeframe();
        ui.label(UI_TEXT.label_timeframe);
        ComboBox::from_id_salt("timeframe_selector")
            .selected_text(timeframe.as_str())
            .show_ui(ui, |ui| {
                for tf in Timeframe::iter() {
                    ui.selectable_value(&mut timeframe, tf, tf.as_str());
                }
            });

        let mut sort_type = session.engine().sort_type();
        ui.label(UI_TEXT.label_sort);
        ComboBox::from_id_salt("sort_selector")
            .selected_text(sort_type.to_string())
            .show_ui(ui, |ui| {
                for st in SortType::iter() {
                    ui.selectable_value(&mut sort_type, st, st.to_string());
                }
            });

        let mut overlay = session.engine().overlay_visible();
        ui.checkbox(&mut overlay, UI_TEXT.toggle_overlay);
        let mut volume = session.overlay().volume_visible();
        ui.checkbox(&mut volume, UI_TEXT.toggle_volume);
        let refresh = ui.button(UI_TEXT.button_refresh).clicked();

        // Apply after drawing so the widgets never see a half-updated session
        let mut requests = session.select(&pair, timeframe);
        if sort_type != session.engine().sort_type() {
            session.set_sort_type(sort_type);
        }
        if overlay != session.engine().overlay_visible() {
            session.set_overlay_visible(overlay);
        }
        if volume != session.overlay().volume_visible() {
            session.set_volume_visible(volume);
        }
        if refresh {
            requests.push(session.refresh_supports());
        }

        for req in requests {
            self.send(req);
        }
    }

    fn render_ticker_header(&self, ui: &mut Ui) {
        let Some(session) = &self.session else { return };

        ui.horizontal(|ui| {
            ui.label(RichText::new(session.pair()).strong().size(18.0));
            match (session.ticker(), session.last_price()) {
                (Some(ticker), _) => render_ticker_stats(ui, ticker),
                (None, Some(price)) => {
                    ui.label(RichText::new(format_price(price)).strong().size(18.0));
                }
                (None, None) => {
                    ui.label(RichText::new(format_price(f64::NAN)).size(18.0));
                }
            }
        });
    }

    pub(crate) fn render_side_panel(&mut self, ctx: &Context) {
        let Some(session) = &self.session else { return };
        let frame = UI_CONFIG.side_panel_frame();
        SidePanel::right("support_panel")
            .frame(frame)
            .resizable(true)
            .default_width(UI_CONFIG.side_panel_width)
            .show(ctx, |ui| {
                session.sink().render_panel(ui, now_timestamp_ms());
            });
    }

    pub(crate) fn render_central_panel(&mut self, ctx: &Context) {
        let frame = UI_CONFIG.central_panel_frame();
        CentralPanel::default().frame(frame).show(ctx, |ui| {
            let Some(session) = &self.session else { return };
            ui.label_subheader(UI_TEXT.heading_chart);
            self.plot_view.show_my_plot(
                ui,
                session.overlay().surface(),
                session.pair(),
                session.timeframe(),
                session.last_price(),
            );
        });
    }

    pub(crate) fn render_status_bar(&mut self, ctx: &Context) {
        let frame = UI_CONFIG.bottom_panel_frame();
        TopBottomPanel::bottom("status_bar")
            .frame(frame)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    let status = self
                        .client
                        .as_ref()
                        .map(|c| c.status())
                        .unwrap_or(ConnectionStatus::Disconnected);
                    let (text, color) = match status {
                        ConnectionStatus::Connected => (UI_TEXT.status_connected, PLOT_CONFIG.color_up),
                        ConnectionStatus::Connecting => {
                            (UI_TEXT.status_connecting, PLOT_CONFIG.color_text_neutral)
                        }
                        ConnectionStatus::Disconnected => {
                            (UI_TEXT.status_disconnected, PLOT_CONFIG.color_down)
                        }
                    };
                    ui.label(RichText::new(text).small().strong().color(color));

                    let Some(session) = &self.session else { return };
                    ui.separator();

                    if let Some(stats) = session.overlay().statistics() {
                        let color = stats.direction.color();
                        ui.metric(UI_TEXT.stat_open, &format_price(stats.open), color);
                        ui.metric(UI_TEXT.stat_high, &format_price(stats.high), color);
                        ui.metric(UI_TEXT.stat_low, &format_price(stats.low), color);
                        ui.metric(UI_TEXT.stat_close, &format_price(stats.close), color);
                        ui.separator();
                    }

                    ui.metric(
                        UI_TEXT.stat_points,
                        &session.overlay().visible_point_count().to_string(),
                        PLOT_CONFIG.color_text_neutral,
                    );

                    let last = match session.last_event_ms() {
                        Some(ts) => format_duration((now_timestamp_ms() - ts).max(0)),
                        None => UI_TEXT.never.to_string(),
                    };
                    ui.metric(UI_TEXT.stat_last_event, &last, PLOT_CONFIG.color_text_neutral);
                });
            });
    }
}

fn render_ticker_stats(ui: &mut Ui, ticker: &TickerStats) {
    ui.label(RichText::new(format_price(ticker.price)).strong().size(18.0));
    ui.label(
        RichText::new(format!(
            "{} {}",
            format_percent(ticker.change_24h),
            UI_TEXT.label_change_24h
        ))
            .strong()
            .color(get_change_color(ticker.change_24h)),
    );
    ui.separator();
    ui.metric(UI_TEXT.label_high_24h, &format_price(ticker.high_24h), PLOT_CONFIG.color_text_neutral);
    ui.metric(UI_TEXT.label_low_24h, &format_price(ticker.low_24h), PLOT_CONFIG.color_text_neutral);
    ui.metric(
        UI_TEXT.label_volume_24h,
        &format_volume(ticker.volume_24h),
        PLOT_CONFIG.color_text_neutral,
    );
}
