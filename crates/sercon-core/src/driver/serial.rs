//! `ChannelDriver` backed by the `serialport` crate.

use std::io::{Read, Write};
use std::time::Duration;

use serialport::SerialPort;

use super::{ChannelDriver, DriverError, DriverErrorKind};
use crate::port::{ConnectionConfig, Parity};

/// Driver for local serial ports (`/dev/tty*`, `COM*`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SerialDriver;

impl SerialDriver {
    pub fn new() -> Self {
        Self
    }
}

fn data_bits(bits: u8) -> Result<serialport::DataBits, DriverError> {
    match bits {
        5 => Ok(serialport::DataBits::Five),
        6 => Ok(serialport::DataBits::Six),
        7 => Ok(serialport::DataBits::Seven),
        8 => Ok(serialport::DataBits::Eight),
        other => Err(DriverError::new(
            DriverErrorKind::Unknown,
            format!("unsupported data bits {}", other),
        )),
    }
}

fn stop_bits(bits: u8) -> Result<serialport::StopBits, DriverError> {
    match bits {
        1 => Ok(serialport::StopBits::One),
        2 => Ok(serialport::StopBits::Two),
        other => Err(DriverError::new(
            DriverErrorKind::Unknown,
            format!("unsupported stop bits {}", other),
        )),
    }
}

fn parity(config: &ConnectionConfig) -> Result<serialport::Parity, DriverError> {
    match config.parity_mode() {
        Some(Parity::None) => Ok(serialport::Parity::None),
        Some(Parity::Odd) => Ok(serialport::Parity::Odd),
        Some(Parity::Even) => Ok(serialport::Parity::Even),
        // serialport exposes no mark/space setting.
        Some(p @ (Parity::Mark | Parity::Space)) => Err(DriverError::new(
            DriverErrorKind::Unknown,
            format!("{} parity is not supported by the serial backend", p),
        )),
        None => Err(DriverError::new(
            DriverErrorKind::Unknown,
            format!("unknown parity {:?}", config.parity),
        )),
    }
}

impl ChannelDriver for SerialDriver {
    type Handle = Box<dyn SerialPort>;

    fn open(&mut self, config: &ConnectionConfig) -> Result<Self::Handle, DriverError> {
        let port = serialport::new(&config.endpoint_id, config.baud_rate)
            .data_bits(data_bits(config.data_bits)?)
            .stop_bits(stop_bits(config.stop_bits)?)
            .parity(parity(config)?)
            .timeout(config.timeout())
            .open()?;
        Ok(port)
    }

    fn close(&mut self, mut handle: Self::Handle) -> Result<(), DriverError> {
        // The port closes when the handle drops; flushing first surfaces
        // write errors that would otherwise be lost.
        handle.flush()?;
        Ok(())
    }

    fn read(&mut self, handle: &mut Self::Handle, buf: &mut [u8]) -> Result<usize, DriverError> {
        Ok(handle.read(buf)?)
    }

    fn write(&mut self, handle: &mut Self::Handle, data: &[u8]) -> Result<usize, DriverError> {
        Ok(handle.write(data)?)
    }

    fn set_read_timeout(
        &mut self,
        handle: &mut Self::Handle,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        Ok(handle.set_timeout(timeout)?)
    }

    fn list_endpoints(&self) -> Result<Vec<String>, DriverError> {
        let ports = serialport::available_ports()?;
        Ok(ports.into_iter().map(|p| p.port_name).collect())
    }
}
