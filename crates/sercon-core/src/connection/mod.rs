//! A single channel to one endpoint and its lifecycle state.
//!
//! `Connection` owns at most one open driver handle. It remembers the last
//! configuration that opened successfully (so it can be reopened later), the
//! current `ConnectionState`, the error that put it into `Errored`, and the
//! read timeout currently applied to the handle.

mod error;
mod state;

use std::time::Duration;

use crate::driver::{ChannelDriver, DriverError, DriverErrorKind};
use crate::port::{validate_config, ConnectionConfig};

pub use error::ConnectionError;
pub use state::ConnectionState;

pub struct Connection<D: ChannelDriver> {
    driver: D,
    handle: Option<D::Handle>,
    config: Option<ConnectionConfig>,
    state: ConnectionState,
    last_error: Option<DriverError>,
    read_timeout: Duration,
}

impl<D: ChannelDriver> Connection<D> {
    /// New connection in `Disconnected` with no config.
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            handle: None,
            config: None,
            state: ConnectionState::Disconnected,
            last_error: None,
            read_timeout: Duration::ZERO,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// True while a driver handle is held (state is `Connected`).
    pub fn is_open(&self) -> bool {
        self.handle.is_some()
    }

    /// Last configuration that opened successfully. Kept after `close`.
    pub fn config(&self) -> Option<&ConnectionConfig> {
        self.config.as_ref()
    }

    /// Error that caused the `Errored` state; `None` in every other state.
    pub fn last_error(&self) -> Option<&DriverError> {
        self.last_error.as_ref()
    }

    /// Read timeout currently applied to the open handle.
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn list_endpoints(&self) -> Result<Vec<String>, DriverError> {
        self.driver.list_endpoints()
    }

    /// Validate `config` and make one attempt to open it.
    ///
    /// Fails with `AlreadyOpen` (leaving the current handle untouched) if a
    /// channel is already open. Validation failures do not change state.
    pub fn open(&mut self, config: &ConnectionConfig) -> Result<(), ConnectionError> {
        validate_config(config)?;
        if self.is_open() {
            return Err(ConnectionError::AlreadyOpen);
        }
        self.begin_connecting();
        self.attempt_open(config).map_err(|e| {
            self.mark_errored(e.clone());
            ConnectionError::Open(e)
        })
    }

    /// Release the handle and return to `Disconnected`.
    ///
    /// If the driver fails to release it the state becomes `Errored` and the
    /// error is returned; the handle is dropped either way.
    pub fn close(&mut self) -> Result<(), ConnectionError> {
        let handle = self.handle.take().ok_or(ConnectionError::NotOpen)?;
        match self.driver.close(handle) {
            Ok(()) => {
                self.mark_disconnected();
                tracing::debug!(endpoint = self.endpoint(), "connection closed");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(endpoint = self.endpoint(), error = %e, "close failed");
                self.mark_errored(e.clone());
                Err(ConnectionError::Close(e))
            }
        }
    }

    pub fn read(&mut self, buf: &mut [u8]) -> Result<usize, ConnectionError> {
        let handle = self.handle.as_mut().ok_or(ConnectionError::NotOpen)?;
        self.driver.read(handle, buf).map_err(ConnectionError::Io)
    }

    pub fn write(&mut self, data: &[u8]) -> Result<usize, ConnectionError> {
        let handle = self.handle.as_mut().ok_or(ConnectionError::NotOpen)?;
        self.driver.write(handle, data).map_err(ConnectionError::Io)
    }

    /// Write all of `data`, looping over partial writes.
    pub fn write_all(&mut self, mut data: &[u8]) -> Result<(), ConnectionError> {
        while !data.is_empty() {
            match self.write(data)? {
                0 => {
                    return Err(ConnectionError::Io(DriverError::new(
                        DriverErrorKind::Unknown,
                        "channel accepted zero bytes",
                    )))
                }
                n => data = &data[n..],
            }
        }
        Ok(())
    }

    pub fn set_read_timeout(&mut self, timeout: Duration) -> Result<(), ConnectionError> {
        let handle = self.handle.as_mut().ok_or(ConnectionError::NotOpen)?;
        self.driver
            .set_read_timeout(handle, timeout)
            .map_err(ConnectionError::Io)?;
        self.read_timeout = timeout;
        Ok(())
    }

    /// One open attempt with no validation and no failure bookkeeping.
    /// On success the connection is `Connected` with `config` stored.
    pub(crate) fn attempt_open(&mut self, config: &ConnectionConfig) -> Result<(), DriverError> {
        let handle = self.driver.open(config)?;
        self.handle = Some(handle);
        self.config = Some(config.clone());
        self.last_error = None;
        self.read_timeout = config.timeout();
        self.state = ConnectionState::Connected;
        tracing::debug!(endpoint = %config.endpoint_id, "channel opened");
        Ok(())
    }

    pub(crate) fn begin_connecting(&mut self) {
        self.state = ConnectionState::Connecting;
        self.last_error = None;
    }

    pub(crate) fn mark_errored(&mut self, error: DriverError) {
        self.state = ConnectionState::Errored;
        self.last_error = Some(error);
    }

    pub(crate) fn mark_disconnected(&mut self) {
        self.state = ConnectionState::Disconnected;
        self.last_error = None;
    }

    fn endpoint(&self) -> &str {
        self.config
            .as_ref()
            .map(|c| c.endpoint_id.as_str())
            .unwrap_or("")
    }
}

impl<D: ChannelDriver> Drop for Connection<D> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(e) = self.driver.close(handle) {
                tracing::warn!(error = %e, "failed to release channel on drop");
            }
        }
    }
}
