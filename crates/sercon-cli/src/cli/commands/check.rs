//! `sercon check` – open with retry, optionally probe, then close.

use anyhow::Result;
use sercon_core::config::SerconConfig;
use sercon_core::{HealthChecker, ResilientConnection, SerialDriver};

use crate::cli::{PortArgs, ProbeArgs, RetryArgs};

pub fn run_check(
    cfg: &SerconConfig,
    port: &PortArgs,
    retry: &RetryArgs,
    probe: &ProbeArgs,
) -> Result<()> {
    let config = port.to_config();
    let policy = retry.apply(cfg.retry_policy());
    let spec = probe.to_spec(cfg.health_spec()?)?;

    let mut conn = ResilientConnection::new(SerialDriver::new()).with_validator(cfg.validator());
    let attempts = conn.open_with_retry(&config, policy)?;
    println!(
        "{}: connected after {} attempt(s)",
        config.endpoint_id, attempts
    );

    if let Some(spec) = spec {
        let checker = HealthChecker::new(spec);
        if let Err(e) = conn.check_health(&checker) {
            // Report the probe failure, not a secondary close error.
            if let Err(close_err) = conn.close() {
                tracing::warn!(error = %close_err, "close after failed health check");
            }
            return Err(e.into());
        }
        println!("{}: health check passed", config.endpoint_id);
    }

    conn.close()?;
    Ok(())
}
