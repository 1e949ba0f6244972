//! `sercon validate` – check parameters against the base rules and site policy.

use anyhow::Result;
use sercon_core::config::SerconConfig;
use sercon_core::port::is_standard_baud_rate;

use crate::cli::PortArgs;

pub fn run_validate(cfg: &SerconConfig, port: &PortArgs) -> Result<()> {
    let config = port.to_config();
    cfg.validator().validate(&config)?;
    println!(
        "{}: {} baud, {} data bits, {} parity, {} stop bit(s), timeout {} ms: ok",
        config.endpoint_id,
        config.baud_rate,
        config.data_bits,
        config.parity.trim().to_ascii_lowercase(),
        config.stop_bits,
        config.timeout_ms
    );
    if !is_standard_baud_rate(config.baud_rate) {
        println!(
            "note: {} is not a standard baud rate; the adapter may not support it",
            config.baud_rate
        );
    }
    Ok(())
}
