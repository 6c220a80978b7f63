//! Debugging feature flags.

#[allow(dead_code)]
pub struct LogFlags {
    /// Emit every raw Socket.IO frame received/sent.
    pub log_socket_frames: bool,

    /// Log each engine transition (Empty/Populated/Loading) with counts.
    pub log_engine_updates: bool,

    /// Log band rebuilds and x-window changes on the chart overlay.
    pub log_overlay_sync: bool,

    /// Anything about dispatching inbound events in the session.
    pub log_dispatch: bool,
}

pub const DF: LogFlags = LogFlags {
    log_socket_frames: false,
    log_engine_updates: true,
    log_overlay_sync: false,
    log_dispatch: true,
};
