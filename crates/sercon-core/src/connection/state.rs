use std::fmt;

/// Lifecycle state of a `Connection`.
///
/// Only the connection itself (or the `ResilientConnection` wrapping it)
/// changes this; callers observe it through `Connection::state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Errored,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
            ConnectionState::Errored => "errored",
        };
        f.write_str(s)
    }
}
