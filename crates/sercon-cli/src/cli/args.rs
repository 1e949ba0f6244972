//! Argument groups shared by subcommands, and their conversion into core types.

use anyhow::{bail, Context, Result};
use clap::Args;
use sercon_core::{ConnectionConfig, HealthCheckSpec, RetryPolicy};
use std::time::Duration;

/// Which port to open and its line settings.
#[derive(Debug, Clone, Args)]
pub struct PortArgs {
    /// Serial endpoint, e.g. /dev/ttyUSB0 or COM3.
    pub endpoint: String,
    /// Baud rate.
    #[arg(short, long, default_value_t = 9600)]
    pub baud: u32,
    /// Data bits (5-8).
    #[arg(long, default_value_t = 8)]
    pub data_bits: u8,
    /// Stop bits (1 or 2).
    #[arg(long, default_value_t = 1)]
    pub stop_bits: u8,
    /// Parity: none, odd, even, mark or space.
    #[arg(long, default_value = "none")]
    pub parity: String,
    /// Read/write timeout in milliseconds.
    #[arg(long, default_value_t = 1000, allow_negative_numbers = true)]
    pub timeout_ms: i64,
}

impl PortArgs {
    pub fn to_config(&self) -> ConnectionConfig {
        ConnectionConfig::new(self.endpoint.clone(), self.baud)
            .with_data_bits(self.data_bits)
            .with_stop_bits(self.stop_bits)
            .with_parity(self.parity.clone())
            .with_timeout_ms(self.timeout_ms)
    }
}

/// Overrides for the configured retry policy.
#[derive(Debug, Clone, Default, Args)]
pub struct RetryArgs {
    /// Retries after the first attempt.
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,
    /// Wait before the first retry, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub base_interval_ms: Option<u64>,
    /// Multiplier applied to the wait after each retry.
    #[arg(long, value_name = "FACTOR")]
    pub backoff_factor: Option<f64>,
    /// Upper bound on a single wait, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub max_interval_ms: Option<u64>,
}

impl RetryArgs {
    pub fn apply(&self, mut policy: RetryPolicy) -> RetryPolicy {
        if let Some(n) = self.retries {
            policy.max_retries = n;
        }
        if let Some(ms) = self.base_interval_ms {
            policy.base_interval = Duration::from_millis(ms);
        }
        if let Some(f) = self.backoff_factor {
            policy.backoff_factor = f;
        }
        if let Some(ms) = self.max_interval_ms {
            policy.max_interval = Duration::from_millis(ms);
        }
        policy
    }
}

/// Health probe given on the command line (hex payloads).
#[derive(Debug, Clone, Default, Args)]
pub struct ProbeArgs {
    /// Probe bytes to write, as hex (e.g. 0d0a).
    #[arg(long, value_name = "HEX")]
    pub probe: Option<String>,
    /// Exact response expected, as hex.
    #[arg(long, value_name = "HEX")]
    pub expect: Option<String>,
    /// How long to wait for the response, in milliseconds.
    #[arg(long, value_name = "MS")]
    pub probe_timeout_ms: Option<u64>,
}

impl ProbeArgs {
    /// Probe from the flags, else `fallback` (from config). The timeout flag
    /// applies to either.
    pub fn to_spec(&self, fallback: Option<HealthCheckSpec>) -> Result<Option<HealthCheckSpec>> {
        let spec = match (&self.probe, &self.expect) {
            (Some(probe), Some(expect)) => Some(HealthCheckSpec::new(
                hex::decode(probe.trim()).context("--probe is not valid hex")?,
                hex::decode(expect.trim()).context("--expect is not valid hex")?,
                Duration::from_millis(500),
            )),
            (None, None) => fallback,
            _ => bail!("--probe and --expect must be given together"),
        };
        Ok(spec.map(|mut s| {
            if let Some(ms) = self.probe_timeout_ms {
                s.probe_timeout = Duration::from_millis(ms);
            }
            s
        }))
    }
}
