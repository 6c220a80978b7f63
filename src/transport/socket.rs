use std::sync::mpsc::{SendError, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use eframe::egui::Context;
use futures::{SinkExt, StreamExt};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tokio::time::sleep;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::config::SOCKET;

#[cfg(debug_assertions)]
use crate::config::DF;

use super::codec::{Packet, TransportError};
use super::events::{InboundEvent, OutboundRequest, decode_event};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnected,
}

/// How one websocket session ended.
enum SessionEnd {
    /// Server went away. Reconnect.
    Closed,
    /// The app dropped its side of a channel. Stop for good.
    ClientGone,
}

/// Background Socket.IO client. Runs its own tokio runtime on a dedicated
/// thread and reconnects with exponential backoff.
pub struct SocketClient {
    status: Arc<Mutex<ConnectionStatus>>,
    outbound_tx: UnboundedSender<OutboundRequest>,
}

impl SocketClient {
    /// Starts the connection loop. Decoded events go to `event_tx`; `repaint`
    /// is poked after each one so the UI wakes up.
    pub fn spawn(url: String, event_tx: Sender<InboundEvent>, repaint: Option<Context>) -> Self {
        let status = Arc::new(Mutex::new(ConnectionStatus::Connecting));
        let (outbound_tx, outbound_rx) = unbounded_channel();

        let status_arc = status.clone();
        thread::spawn(move || {
            let rt = match Runtime::new() {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("Failed to create socket runtime: {}", e);
                    set_status(&status_arc, ConnectionStatus::Disconnected);
                    return;
                }
            };
            rt.block_on(run_with_reconnect(url, status_arc, event_tx, outbound_rx, repaint));
        });

        Self { status, outbound_tx }
    }

    pub fn status(&self) -> ConnectionStatus {
        match self.status.lock() {
            Ok(guard) => *guard,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Queues a request. Requests made while disconnected go out after the
    /// next successful connect.
    pub fn send(&self, request: OutboundRequest) {
        if self.outbound_tx.send(request).is_err() {
            log::warn!("Socket task has stopped, request dropped");
        }
    }
}

fn set_status(status: &Mutex<ConnectionStatus>, value: ConnectionStatus) {
    match status.lock() {
        Ok(mut guard) => *guard = value,
        Err(poisoned) => *poisoned.into_inner() = value,
    }
}

async fn run_with_reconnect(
    url: String,
    status: Arc<Mutex<ConnectionStatus>>,
    event_tx: Sender<InboundEvent>,
    mut outbound_rx: UnboundedReceiver<OutboundRequest>,
    repaint: Option<Context>,
) {
    let mut reconnect_delay = SOCKET.ws.initial_reconnect_delay_sec;

    loop {
        set_status(&status, ConnectionStatus::Connecting);

        #[cfg(debug_assertions)]
        if DF.log_socket_frames {
            log::info!("Connecting to {}", url);
        }

        let mut forwarder = Forwarder {
            event_tx: &event_tx,
            repaint: repaint.as_ref(),
            status: &status,
            connected: false,
        };

        let outcome = run_session(&url, &mut forwarder, &mut outbound_rx).await;
        let was_connected = forwarder.connected;
        reconnect_delay = retry_delay(reconnect_delay, was_connected);

        match outcome {
            Ok(SessionEnd::ClientGone) => {
                log::info!("Socket client shutting down");
                set_status(&status, ConnectionStatus::Disconnected);
                return;
            }
            Ok(SessionEnd::Closed) => {
                log::warn!("Socket closed by server. Reconnecting...");
                reconnect_delay = SOCKET.ws.initial_reconnect_delay_sec;
            }
            Err(e) => {
                log::error!(
                    "Socket connection failed: {}. Retrying in {}s...",
                    e,
                    reconnect_delay
                );
            }
        }

        set_status(&status, ConnectionStatus::Disconnected);
        if was_connected && forwarder_send(&event_tx, repaint.as_ref(), InboundEvent::Disconnected).is_err() {
            return;
        }

        sleep(Duration::from_secs(reconnect_delay)).await;
        reconnect_delay = grow_delay(reconnect_delay);
    }
}

/// A session that got through the namespace handshake starts the backoff over.
fn retry_delay(current: u64, was_connected: bool) -> u64 {
    if was_connected {
        SOCKET.ws.initial_reconnect_delay_sec
    } else {
        current
    }
}

fn grow_delay(delay: u64) -> u64 {
    (delay * 2).min(SOCKET.ws.max_reconnect_delay_sec)
}

/// Pushes decoded events to the UI thread and tracks the namespace handshake.
struct Forwarder<'a> {
    event_tx: &'a Sender<InboundEvent>,
    repaint: Option<&'a Context>,
    status: &'a Mutex<ConnectionStatus>,
    connected: bool,
}

impl Forwarder<'_> {
    fn forward(&mut self, event: InboundEvent) -> Result<(), SendError<InboundEvent>> {
        if event == InboundEvent::Connected {
            self.connected = true;
            set_status(self.status, ConnectionStatus::Connected);
        }
        forwarder_send(self.event_tx, self.repaint, event)
    }
}

fn forwarder_send(
    tx: &Sender<InboundEvent>,
    repaint: Option<&Context>,
    event: InboundEvent,
) -> Result<(), SendError<InboundEvent>> {
    tx.send(event)?;
    if let Some(ctx) = repaint {
        ctx.request_repaint();
    }
    Ok(())
}

/// What to do after one inbound frame.
enum FrameAction {
    Continue,
    Reply(Packet),
    Forward(InboundEvent),
    End,
}

fn handle_frame(text: &str) -> Result<FrameAction, TransportError> {
    let packet = match Packet::decode(text) {
        Ok(p) => p,
        Err(TransportError::UnsupportedPacket(kind)) => {
            log::debug!("Skipping unsupported packet type {}", kind);
            return Ok(FrameAction::Continue);
        }
        Err(e @ (TransportError::MalformedEvent(_) | TransportError::Json(_))) => {
            log::warn!("Dropping bad frame: {}", e);
            return Ok(FrameAction::Continue);
        }
        Err(e) => return Err(e),
    };

    let action = match packet {
        Packet::Open(_) => FrameAction::Reply(Packet::Connect),
        Packet::Ping => FrameAction::Reply(Packet::Pong),
        Packet::Pong | Packet::Noop => FrameAction::Continue,
        Packet::Close | Packet::Disconnect => FrameAction::End,
        Packet::Connect => decode_event("connect", serde_json::Value::Null)
            .map_or(FrameAction::Continue, FrameAction::Forward),
        Packet::Event { name, payload } => {
            decode_event(&name, payload).map_or(FrameAction::Continue, FrameAction::Forward)
        }
        Packet::ConnectError(v) => return Err(TransportError::ConnectRefused(v.to_string())),
    };
    Ok(action)
}

async fn run_session(
    url: &str,
    forwarder: &mut Forwarder<'_>,
    outbound_rx: &mut UnboundedReceiver<OutboundRequest>,
) -> Result<SessionEnd, TransportError> {
    let (ws_stream, _) = connect_async(url).await?;
    let (mut write, mut read) = ws_stream.split();

    loop {
        tokio::select! {
            msg = read.next() => {
                let text = match msg {
                    Some(Ok(Message::Text(text))) => text,
                    Some(Ok(Message::Close(_))) | None => return Ok(SessionEnd::Closed),
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Err(e.into()),
                };

                #[cfg(debug_assertions)]
                if DF.log_socket_frames {
                    log::info!("<< {}", text.as_str());
                }

                match handle_frame(text.as_str())? {
                    FrameAction::Continue => {}
                    FrameAction::Reply(packet) => {
                        write.send(Message::text(packet.encode())).await?;
                    }
                    FrameAction::Forward(event) => {
                        if forwarder.forward(event).is_err() {
                            return Ok(SessionEnd::ClientGone);
                        }
                    }
                    FrameAction::End => return Ok(SessionEnd::Closed),
                }
            }
            // Held back until the namespace handshake completes
            request = outbound_rx.recv(), if forwarder.connected => {
                let Some(request) = request else {
                    return Ok(SessionEnd::ClientGone);
                };
                let frame = request.to_packet().encode();

                #[cfg(debug_assertions)]
                if DF.log_socket_frames {
                    log::info!(">> {}", frame);
                }

                write.send(Message::text(frame)).await?;
            }
        }
    }
}
