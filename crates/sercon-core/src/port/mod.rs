//! Connection parameters for a serial endpoint.
//!
//! `ConnectionConfig` is the value callers hand to the connection layer. It is
//! deliberately loose (parity as text, timeout as signed milliseconds) so that
//! values coming from a config file or the command line can be checked by
//! `validate` and rejected as a whole.

mod parity;
mod validate;

use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use parity::Parity;
pub use validate::{validate_config, ExtendedValidator, ValidationError};

/// Baud rates commonly supported by UARTs and USB-serial adapters.
pub const STANDARD_BAUD_RATES: &[u32] = &[
    50, 75, 110, 134, 150, 200, 300, 600, 1200, 1800, 2400, 4800, 9600, 19200, 38400, 57600,
    115200,
];

/// High-speed rates supported by many (not all) adapters.
pub const SPECIAL_BAUD_RATES: &[u32] = &[
    230400, 460800, 500000, 576000, 921600, 1000000, 1152000, 1500000, 2000000, 2500000, 3000000,
    3500000, 4000000,
];

/// True if `rate` is in the standard or special reference set.
///
/// Rates outside the set are still accepted by validation; this is informational.
pub fn is_standard_baud_rate(rate: u32) -> bool {
    STANDARD_BAUD_RATES.contains(&rate) || SPECIAL_BAUD_RATES.contains(&rate)
}

/// Parameters identifying and configuring one serial channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Port identifier, e.g. `/dev/ttyUSB0` or `COM3`.
    pub endpoint_id: String,
    pub baud_rate: u32,
    /// Data bits per character (5–8).
    pub data_bits: u8,
    /// Stop bits (1 or 2).
    pub stop_bits: u8,
    /// One of none, odd, even, mark, space.
    pub parity: String,
    /// Read/write timeout in milliseconds. Must not be negative.
    pub timeout_ms: i64,
}

impl ConnectionConfig {
    /// 8N1 at the given baud rate with a one second timeout.
    pub fn new(endpoint_id: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            endpoint_id: endpoint_id.into(),
            baud_rate,
            data_bits: 8,
            stop_bits: 1,
            parity: Parity::None.to_string(),
            timeout_ms: 1000,
        }
    }

    pub fn with_data_bits(mut self, data_bits: u8) -> Self {
        self.data_bits = data_bits;
        self
    }

    pub fn with_stop_bits(mut self, stop_bits: u8) -> Self {
        self.stop_bits = stop_bits;
        self
    }

    pub fn with_parity(mut self, parity: impl Into<String>) -> Self {
        self.parity = parity.into();
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: i64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Timeout as a `Duration`; negative values (rejected by validation) clamp to zero.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(0) as u64)
    }

    /// Parsed parity, or `None` if the text is not a known parity.
    pub fn parity_mode(&self) -> Option<Parity> {
        self.parity.parse().ok()
    }
}
