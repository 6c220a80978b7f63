//! Engine.IO v4 / Socket.IO v5 text frame codec.
//!
//! Only the subset the dashboard needs: handshake, heartbeat, namespace
//! connect/disconnect and JSON events. Binary attachments are not supported.

use serde_json::Value;

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("empty frame")]
    EmptyFrame,
    #[error("unsupported packet type '{0}'")]
    UnsupportedPacket(String),
    #[error("malformed event: {0}")]
    MalformedEvent(String),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("server refused namespace connect: {0}")]
    ConnectRefused(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Packet {
    /// `0{sid, pingInterval, ...}`
    Open(Value),
    /// `1`
    Close,
    /// `2`
    Ping,
    /// `3`
    Pong,
    /// `6`
    Noop,
    /// `40`
    Connect,
    /// `41`
    Disconnect,
    /// `42[name, payload]`
    Event { name: String, payload: Value },
    /// `44{message}`
    ConnectError(Value),
}

impl Packet {
    pub fn event(name: &str, payload: Value) -> Self {
        Packet::Event {
            name: name.to_string(),
            payload,
        }
    }

    pub fn decode(frame: &str) -> Result<Self, TransportError> {
        let mut chars = frame.chars();
        let engine_type = chars.next().ok_or(TransportError::EmptyFrame)?;
        let rest = chars.as_str();

        match engine_type {
            '0' => Ok(Packet::Open(parse_json_or_null(rest)?)),
            '1' => Ok(Packet::Close),
            '2' => Ok(Packet::Ping),
            '3' => Ok(Packet::Pong),
            '6' => Ok(Packet::Noop),
            '4' => decode_socket_packet(rest),
            other => Err(TransportError::UnsupportedPacket(other.to_string())),
        }
    }

    pub fn encode(&self) -> String {
        match self {
            Packet::Open(v) => format!("0{}", v),
            Packet::Close => "1".to_string(),
            Packet::Ping => "2".to_string(),
            Packet::Pong => "3".to_string(),
            Packet::Noop => "6".to_string(),
            Packet::Connect => "40".to_string(),
            Packet::Disconnect => "41".to_string(),
            Packet::Event { name, payload } => {
                let body = Value::Array(vec![Value::String(name.clone()), payload.clone()]);
                format!("42{}", body)
            }
            Packet::ConnectError(v) => format!("44{}", v),
        }
    }
}

fn parse_json_or_null(s: &str) -> Result<Value, TransportError> {
    if s.trim().is_empty() {
        Ok(Value::Null)
    } else {
        Ok(serde_json::from_str(s)?)
    }
}

/// Strips an optional `/namespace,` prefix and a numeric ack id.
fn strip_namespace_and_ack(s: &str) -> &str {
    let s = if s.starts_with('/') {
        match s.find(',') {
            Some(i) => &s[i + 1..],
            // Bare namespace with no payload, e.g. "40/admin"
            None => "",
        }
    } else {
        s
    };
    s.trim_start_matches(|c: char| c.is_ascii_digit())
}

fn decode_socket_packet(rest: &str) -> Result<Packet, TransportError> {
    let mut chars = rest.chars();
    let socket_type = chars.next().ok_or(TransportError::EmptyFrame)?;
    let body = strip_namespace_and_ack(chars.as_str());

    match socket_type {
        '0' => Ok(Packet::Connect),
        '1' => Ok(Packet::Disconnect),
        '2' => decode_event(body),
        '4' => Ok(Packet::ConnectError(parse_json_or_null(body)?)),
        other => Err(TransportError::UnsupportedPacket(format!("4{}", other))),
    }
}

fn decode_event(body: &str) -> Result<Packet, TransportError> {
    let value: Value = serde_json::from_str(body)?;
    let Value::Array(mut items) = value else {
        return Err(TransportError::MalformedEvent("event body is not an array".to_string()));
    };
    if items.is_empty() {
        return Err(TransportError::MalformedEvent("event array is empty".to_string()));
    }

    let name = match items.remove(0) {
        Value::String(s) => s,
        other => {
            return Err(TransportError::MalformedEvent(format!("event name {}", other)));
        }
    };
    let payload = if items.is_empty() {
        Value::Null
    } else {
        items.remove(0)
    };

    Ok(Packet::Event { name, payload })
}
