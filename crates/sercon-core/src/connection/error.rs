use crate::driver::DriverError;
use crate::port::ValidationError;

/// Errors from single operations on a `Connection`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConnectionError {
    #[error("invalid connection config: {0}")]
    Invalid(#[from] ValidationError),
    #[error("connection is not open")]
    NotOpen,
    #[error("connection is already open")]
    AlreadyOpen,
    /// One attempt to open the channel failed.
    #[error("failed to open channel: {0}")]
    Open(#[source] DriverError),
    #[error("channel I/O failed: {0}")]
    Io(#[source] DriverError),
    /// Releasing the handle failed; the handle has been dropped regardless.
    #[error("failed to close channel: {0}")]
    Close(#[source] DriverError),
}

impl ConnectionError {
    /// The underlying driver error, if this error carries one.
    pub fn driver_error(&self) -> Option<&DriverError> {
        match self {
            ConnectionError::Open(e) | ConnectionError::Io(e) | ConnectionError::Close(e) => {
                Some(e)
            }
            _ => None,
        }
    }
}
