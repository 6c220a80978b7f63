use {
    eframe::{
        Frame, Storage,
        egui::Context,
    },
    serde::{Deserialize, Serialize},
    std::sync::{mpsc, mpsc::Receiver},
};

use crate::{
    Cli,
    app::{Session, SessionSettings},
    chart::TraceStore,
    config::{DEFAULT_PAIR, socket_url},
    domain::{SortType, Timeframe},
    transport::{InboundEvent, OutboundRequest, SocketClient},
    ui::{PlotView, SupportPanel, setup_custom_visuals},
};

#[cfg(debug_assertions)]
use crate::config::DF;

pub(crate) type DashboardSession = Session<TraceStore, SupportPanel>;

#[derive(Deserialize, Serialize)]
#[serde(default)]
pub struct App {
    // Persisted user choices
    pub(crate) pair: String,
    pub(crate) timeframe: Timeframe,
    pub(crate) sort_type: SortType,
    pub(crate) overlay_visible: bool,
    pub(crate) volume_visible: bool,

    #[serde(skip)]
    pub(crate) session: Option<DashboardSession>,
    #[serde(skip)]
    pub(crate) client: Option<SocketClient>,
    #[serde(skip)]
    pub(crate) event_rx: Option<Receiver<InboundEvent>>,
    #[serde(skip)]
    pub(crate) plot_view: PlotView,
}

impl Default for App {
    fn default() -> Self {
        Self {
            pair: DEFAULT_PAIR.to_string(),
            timeframe: Timeframe::default(),
            sort_type: SortType::default(),
            overlay_visible: true,
            volume_visible: true,
            session: None,
            client: None,
            event_rx: None,
            plot_view: PlotView::new(),
        }
    }
}

impl App {
    pub(crate) fn new(cc: &eframe::CreationContext<'_>, args: Cli) -> Self {
        let mut app: App = if let Some(storage) = cc.storage {
            eframe::get_value(storage, eframe::APP_KEY).unwrap_or_default()
        } else {
            Self::default()
        };

        // Command line wins over whatever was persisted
        if let Some(pair) = args.pair {
            app.pair = pair.to_uppercase();
        }
        if let Some(tf) = args.timeframe {
            app.timeframe = tf;
        }

        setup_custom_visuals(&cc.egui_ctx);

        app.session = Some(Session::new(
            TraceStore::new(),
            SupportPanel::default(),
            app.settings(),
        ));

        match socket_url(&args.server) {
            Ok(url) => {
                let (event_tx, event_rx) = mpsc::channel();
                log::info!("Connecting to support server at {}", url);
                app.client = Some(SocketClient::spawn(url, event_tx, Some(cc.egui_ctx.clone())));
                app.event_rx = Some(event_rx);
            }
            // Still show the window, the status bar reports Disconnected
            Err(e) => log::error!("Cannot connect: {:#}", e),
        }

        app
    }

    pub(crate) fn settings(&self) -> SessionSettings {
        SessionSettings {
            pair: self.pair.clone(),
            timeframe: self.timeframe,
            sort_type: self.sort_type,
            overlay_visible: self.overlay_visible,
            volume_visible: self.volume_visible,
        }
    }

    pub(crate) fn send(&self, request: OutboundRequest) {
        match &self.client {
            Some(client) => client.send(request),
            None => log::warn!("No socket client, dropping {}", request.channel()),
        }
    }

    /// Applies every queued event in arrival order.
    fn drain_events(&mut self) {
        let Some(rx) = &self.event_rx else { return };
        let events: Vec<InboundEvent> = rx.try_iter().collect();
        for event in events {
            self.handle_event(event);
        }
    }

    fn handle_event(&mut self, event: InboundEvent) {
        // The server pushes its own current pair/timeframe on connect.
        // Ask it to switch back to the user's choice afterwards.
        let restore = matches!(event, InboundEvent::InitialData(_));
        if restore {
            self.capture_settings();
        }

        let Some(session) = &mut self.session else { return };
        session.dispatch(event);
        if !restore {
            return;
        }

        let requests = session.restore(&self.pair, self.timeframe);

        #[cfg(debug_assertions)]
        if DF.log_dispatch && !requests.is_empty() {
            log::info!("Restoring selection {} {}", self.pair, self.timeframe);
        }

        for req in requests {
            self.send(req);
        }
    }

    /// Copies the session's live choices back into the persisted fields.
    fn capture_settings(&mut self) {
        if let Some(session) = &self.session {
            let s = session.settings();
            self.pair = s.pair;
            self.timeframe = s.timeframe;
            self.sort_type = s.sort_type;
            self.overlay_visible = s.overlay_visible;
            self.volume_visible = s.volume_visible;
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        self.drain_events();

        self.render_top_panel(ctx);
        self.render_status_bar(ctx);
        self.render_side_panel(ctx);
        self.render_central_panel(ctx);

        // Keeps "x minutes ago" labels fresh without a server push
        ctx.request_repaint_after(std::time::Duration::from_secs(1));
    }

    fn save(&mut self, storage: &mut dyn Storage) {
        self.capture_settings();
        eframe::set_value(storage, eframe::APP_KEY, self);
    }
}
