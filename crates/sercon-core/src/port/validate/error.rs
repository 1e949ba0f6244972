//! Error type for connection parameter validation.

use std::fmt;

/// A connection parameter that failed a validation rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Endpoint identifier is empty.
    EmptyEndpoint,
    /// Baud rate is zero.
    InvalidBaudRate(u32),
    /// Data bits outside 5..=8.
    InvalidDataBits(u8),
    /// Stop bits other than 1 or 2.
    InvalidStopBits(u8),
    /// Parity is not one of none, odd, even, mark, space.
    InvalidParity(String),
    /// Timeout below zero.
    NegativeTimeout(i64),
    /// Endpoint not in the configured allow-list.
    EndpointNotAllowed(String),
    /// Baud rate not in the configured allow-list.
    BaudRateNotAllowed(u32),
    /// A non-zero timeout is required.
    ZeroTimeout,
    /// Timeout above the configured cap.
    TimeoutTooLarge { timeout_ms: i64, max_ms: u64 },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::EmptyEndpoint => write!(f, "endpoint id must not be empty"),
            ValidationError::InvalidBaudRate(rate) => {
                write!(f, "invalid baud rate {}: must be positive", rate)
            }
            ValidationError::InvalidDataBits(bits) => {
                write!(f, "invalid data bits {}: must be between 5 and 8", bits)
            }
            ValidationError::InvalidStopBits(bits) => {
                write!(f, "invalid stop bits {}: must be 1 or 2", bits)
            }
            ValidationError::InvalidParity(p) => write!(
                f,
                "invalid parity {:?}: expected none, odd, even, mark or space",
                p
            ),
            ValidationError::NegativeTimeout(ms) => {
                write!(f, "invalid timeout {} ms: must not be negative", ms)
            }
            ValidationError::EndpointNotAllowed(id) => {
                write!(f, "endpoint {:?} is not in the allowed list", id)
            }
            ValidationError::BaudRateNotAllowed(rate) => {
                write!(f, "baud rate {} is not in the allowed list", rate)
            }
            ValidationError::ZeroTimeout => write!(f, "a non-zero timeout is required"),
            ValidationError::TimeoutTooLarge { timeout_ms, max_ms } => write!(
                f,
                "timeout {} ms exceeds the maximum of {} ms",
                timeout_ms, max_ms
            ),
        }
    }
}

impl std::error::Error for ValidationError {}
