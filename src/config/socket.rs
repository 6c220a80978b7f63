//! Push-channel (Socket.IO) connection settings.

use anyhow::{Result, anyhow, bail};

pub struct WsConfig {
    /// Appended to the server base URL to reach the websocket transport.
    pub socket_path: &'static str,
    pub max_reconnect_delay_sec: u64,
    pub initial_reconnect_delay_sec: u64,
}

pub struct ServerDefaults {
    pub base_url: &'static str,
}

pub struct SocketConfig {
    pub ws: WsConfig,
    pub server: ServerDefaults,
}

pub const SOCKET: SocketConfig = SocketConfig {
    ws: WsConfig {
        socket_path: "/socket.io/?EIO=4&transport=websocket",
        max_reconnect_delay_sec: 60,
        initial_reconnect_delay_sec: 1,
    },
    server: ServerDefaults {
        base_url: "ws://127.0.0.1:5000",
    },
};

/// Builds the websocket endpoint for a server given as `http(s)://` or `ws(s)://`.
/// A bare `host:port` is taken as plain `ws://`.
pub fn socket_url(server: &str) -> Result<String> {
    let trimmed = server.trim();
    if trimmed.is_empty() {
        bail!("server address is empty");
    }

    let (scheme, rest) = match trimmed.split_once("://") {
        Some(("https", rest)) => ("wss", rest),
        Some(("http", rest)) => ("ws", rest),
        Some((scheme @ ("ws" | "wss"), rest)) => (scheme, rest),
        Some((scheme, _)) => bail!("unsupported scheme '{scheme}' in server address '{server}'"),
        None => ("ws", trimmed),
    };

    let host = rest.trim_end_matches('/');
    if host.is_empty() {
        return Err(anyhow!("server address '{server}' has no host"));
    }

    Ok(format!("{}://{}{}", scheme, host, SOCKET.ws.socket_path))
}
