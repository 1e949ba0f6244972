//! Optional policy layers applied after the base rules.

use super::{validate_config, ValidationError};
use crate::port::ConnectionConfig;

/// Validator that runs the base rules and then any configured allow-lists and
/// timeout limits. The default instance applies the base rules only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtendedValidator {
    allowed_endpoints: Option<Vec<String>>,
    allowed_baud_rates: Option<Vec<u32>>,
    require_timeout: bool,
    max_timeout_ms: Option<u64>,
}

impl ExtendedValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only these endpoint ids are accepted.
    pub fn allow_endpoints<I, S>(mut self, endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_endpoints = Some(endpoints.into_iter().map(Into::into).collect());
        self
    }

    /// Only these baud rates are accepted.
    pub fn allow_baud_rates(mut self, rates: impl IntoIterator<Item = u32>) -> Self {
        self.allowed_baud_rates = Some(rates.into_iter().collect());
        self
    }

    /// Reject a zero timeout (which would make reads non-blocking on most drivers).
    pub fn require_timeout(mut self, required: bool) -> Self {
        self.require_timeout = required;
        self
    }

    /// Reject timeouts above `max_ms`.
    pub fn max_timeout_ms(mut self, max_ms: u64) -> Self {
        self.max_timeout_ms = Some(max_ms);
        self
    }

    pub fn validate(&self, config: &ConnectionConfig) -> Result<(), ValidationError> {
        validate_config(config)?;

        if let Some(allowed) = &self.allowed_endpoints {
            if !allowed.iter().any(|e| e == &config.endpoint_id) {
                return Err(ValidationError::EndpointNotAllowed(
                    config.endpoint_id.clone(),
                ));
            }
        }

        if let Some(allowed) = &self.allowed_baud_rates {
            if !allowed.contains(&config.baud_rate) {
                return Err(ValidationError::BaudRateNotAllowed(config.baud_rate));
            }
        }

        if self.require_timeout && config.timeout_ms == 0 {
            return Err(ValidationError::ZeroTimeout);
        }

        if let Some(max_ms) = self.max_timeout_ms {
            // timeout_ms is non-negative here: validate_config rejected negatives.
            if config.timeout_ms as u64 > max_ms {
                return Err(ValidationError::TimeoutTooLarge {
                    timeout_ms: config.timeout_ms,
                    max_ms,
                });
            }
        }

        Ok(())
    }
}
