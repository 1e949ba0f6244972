//! Boundary to the raw channel driver.
//!
//! The connection layer never touches a device directly. It goes through a
//! `ChannelDriver`, which opens a handle for a validated `ConnectionConfig` and
//! performs blocking reads and writes on it. Errors crossing this boundary
//! carry a small closed set of kinds so retry classification does not depend
//! on driver message text.

mod error;
mod serial;

use std::time::Duration;

use crate::port::ConnectionConfig;

pub use error::{DriverError, DriverErrorKind};
pub use serial::SerialDriver;

/// Minimal contract the connection layer needs from a device driver.
///
/// All calls block the current thread until the driver returns or its
/// configured timeout elapses.
pub trait ChannelDriver {
    /// An open channel. Dropping it without `close` must still release the device.
    type Handle;

    fn open(&mut self, config: &ConnectionConfig) -> Result<Self::Handle, DriverError>;

    fn close(&mut self, handle: Self::Handle) -> Result<(), DriverError>;

    /// Read up to `buf.len()` bytes. `Ok(0)` means end of stream.
    fn read(&mut self, handle: &mut Self::Handle, buf: &mut [u8]) -> Result<usize, DriverError>;

    /// Write some prefix of `data`; returns how many bytes were accepted.
    fn write(&mut self, handle: &mut Self::Handle, data: &[u8]) -> Result<usize, DriverError>;

    fn set_read_timeout(
        &mut self,
        handle: &mut Self::Handle,
        timeout: Duration,
    ) -> Result<(), DriverError>;

    /// Identifiers of endpoints currently present on the system.
    fn list_endpoints(&self) -> Result<Vec<String>, DriverError>;
}
