//! `sercon ports` – list serial endpoints.

use anyhow::Result;
use sercon_core::{ChannelDriver, SerialDriver};

pub fn run_ports() -> Result<()> {
    let ports = SerialDriver::new().list_endpoints()?;
    if ports.is_empty() {
        println!("No serial ports found.");
    } else {
        for p in ports {
            println!("{}", p);
        }
    }
    Ok(())
}
