//! Error type returned across the driver boundary.

use std::io;

/// Structured cause of a driver failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverErrorKind {
    /// Device is held by another process or temporarily unavailable.
    Busy,
    /// Operation did not complete within the configured timeout.
    Timeout,
    /// Device does not exist (may be unplugged and reattached later).
    NotFound,
    /// Remote side refused the connection (network-backed ports).
    Refused,
    /// Access denied.
    Permission,
    /// Anything else; classification may fall back to the message text.
    Unknown,
}

/// Failure reported by a `ChannelDriver`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct DriverError {
    pub kind: DriverErrorKind,
    pub message: String,
}

impl DriverError {
    pub fn new(kind: DriverErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind == DriverErrorKind::Timeout
    }
}

impl From<io::Error> for DriverError {
    fn from(e: io::Error) -> Self {
        let kind = match e.kind() {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => DriverErrorKind::Timeout,
            io::ErrorKind::NotFound => DriverErrorKind::NotFound,
            io::ErrorKind::PermissionDenied => DriverErrorKind::Permission,
            io::ErrorKind::ConnectionRefused => DriverErrorKind::Refused,
            _ => DriverErrorKind::Unknown,
        };
        Self::new(kind, e.to_string())
    }
}

impl From<serialport::Error> for DriverError {
    fn from(e: serialport::Error) -> Self {
        let kind = match e.kind() {
            serialport::ErrorKind::NoDevice => DriverErrorKind::NotFound,
            serialport::ErrorKind::Io(io_kind) => {
                DriverError::from(io::Error::from(io_kind)).kind
            }
            serialport::ErrorKind::InvalidInput | serialport::ErrorKind::Unknown => {
                DriverErrorKind::Unknown
            }
        };
        Self::new(kind, e.description)
    }
}
