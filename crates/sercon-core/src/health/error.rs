use crate::connection::ConnectionError;

/// Liveness check failures. None of these trigger a reconnect by themselves.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HealthError {
    #[error("health check requires an open connection")]
    NotOpen,
    #[error("failed to write health probe: {0}")]
    ProbeWriteFailed(#[source] ConnectionError),
    #[error("failed to apply probe timeout: {0}")]
    TimeoutOverrideFailed(#[source] ConnectionError),
    #[error("failed to restore read timeout after probe: {0}")]
    TimeoutRestoreFailed(#[source] ConnectionError),
    #[error("failed to read probe response: {0}")]
    ProbeReadFailed(#[source] ConnectionError),
    #[error("probe response length mismatch: expected {expected} bytes, got {actual}")]
    ResponseLengthMismatch { expected: usize, actual: usize },
    #[error(
        "probe response mismatch at byte {index}: expected {expected:#04x}, got {actual:#04x}"
    )]
    ResponseContentMismatch { index: usize, expected: u8, actual: u8 },
}
