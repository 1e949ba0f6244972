//! Static validation of connection parameters. No I/O.

mod error;
mod extended;

use super::{is_standard_baud_rate, ConnectionConfig, Parity};

pub use error::ValidationError;
pub use extended::ExtendedValidator;

/// Returns Ok(()) if every field of `config` is within its allowed range.
///
/// Rules are checked in field order and the first failure is returned. A
/// positive baud rate outside the standard/special reference set is accepted
/// and only logged.
pub fn validate_config(config: &ConnectionConfig) -> Result<(), ValidationError> {
    if config.endpoint_id.is_empty() {
        return Err(ValidationError::EmptyEndpoint);
    }

    if config.baud_rate == 0 {
        return Err(ValidationError::InvalidBaudRate(config.baud_rate));
    }
    if !is_standard_baud_rate(config.baud_rate) {
        tracing::debug!(
            endpoint = %config.endpoint_id,
            baud_rate = config.baud_rate,
            "non-standard baud rate"
        );
    }

    if !(5..=8).contains(&config.data_bits) {
        return Err(ValidationError::InvalidDataBits(config.data_bits));
    }

    if config.stop_bits != 1 && config.stop_bits != 2 {
        return Err(ValidationError::InvalidStopBits(config.stop_bits));
    }

    if config.parity.parse::<Parity>().is_err() {
        return Err(ValidationError::InvalidParity(config.parity.clone()));
    }

    if config.timeout_ms < 0 {
        return Err(ValidationError::NegativeTimeout(config.timeout_ms));
    }

    Ok(())
}
