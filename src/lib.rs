#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod app;
pub mod chart;
pub mod config;
pub mod domain;
pub mod engine;
pub mod transport;
pub mod ui;
pub mod utils;

// Re-export commonly used types outside of crate (for main.rs)
pub use app::App;
pub use config::PERSISTENCE;
pub use domain::Timeframe;

// CLI argument parsing
use clap::Parser;

use crate::config::SOCKET;

fn parse_timeframe(raw: &str) -> Result<Timeframe, String> {
    Timeframe::parse(raw).ok_or_else(|| format!("unknown timeframe '{raw}' (try 1m, 5m, 15m, 1h, 4h, 1d, 1w)"))
}

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Support server to connect to (http://, https://, ws:// or wss://)
    #[arg(long, default_value = SOCKET.server.base_url)]
    pub server: String,

    /// Start on this pair instead of the last one used
    #[arg(long)]
    pub pair: Option<String>,

    /// Start on this chart timeframe instead of the last one used
    #[arg(long, value_parser = parse_timeframe)]
    pub timeframe: Option<Timeframe>,
}

/// Main application entry point - creates the GUI app
/// This is the public API for the binary to call
pub fn run_app(cc: &eframe::CreationContext<'_>, args: Cli) -> App {
    App::new(cc, args)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_defaults_and_overrides() {
        let args = Cli::parse_from(["support-tracker"]);
        assert_eq!(args.server, SOCKET.server.base_url);
        assert!(args.pair.is_none());
        assert!(args.timeframe.is_none());

        let args = Cli::parse_from([
            "support-tracker",
            "--server",
            "http://10.0.0.5:5000",
            "--pair",
            "ethusdt",
            "--timeframe",
            "4h",
        ]);
        assert_eq!(args.server, "http://10.0.0.5:5000");
        assert_eq!(args.pair.as_deref(), Some("ethusdt"));
        assert_eq!(args.timeframe, Some(Timeframe::H4));
    }

    #[test]
    fn cli_rejects_unknown_timeframe() {
        assert!(Cli::try_parse_from(["support-tracker", "--timeframe", "2h"]).is_err());
    }
}
