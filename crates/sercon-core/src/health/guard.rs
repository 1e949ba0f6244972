//! RAII guard that restores a connection's read timeout.

use std::time::Duration;

use crate::connection::{Connection, ConnectionError};
use crate::driver::ChannelDriver;

/// Holds the connection with a temporary read timeout applied.
///
/// `restore` puts the previous timeout back and reports failure. If the guard
/// is dropped without `restore` (early return), drop restores it and can only
/// log a failure.
pub(super) struct ReadTimeoutGuard<'a, D: ChannelDriver> {
    connection: &'a mut Connection<D>,
    previous: Duration,
    restored: bool,
}

impl<'a, D: ChannelDriver> ReadTimeoutGuard<'a, D> {
    pub(super) fn acquire(
        connection: &'a mut Connection<D>,
        timeout: Duration,
    ) -> Result<Self, ConnectionError> {
        let previous = connection.read_timeout();
        connection.set_read_timeout(timeout)?;
        Ok(Self {
            connection,
            previous,
            restored: false,
        })
    }

    pub(super) fn connection(&mut self) -> &mut Connection<D> {
        &mut *self.connection
    }

    pub(super) fn restore(mut self) -> Result<(), ConnectionError> {
        self.restored = true;
        self.connection.set_read_timeout(self.previous)
    }
}

impl<D: ChannelDriver> Drop for ReadTimeoutGuard<'_, D> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        if let Err(e) = self.connection.set_read_timeout(self.previous) {
            tracing::warn!(
                previous_ms = self.previous.as_millis() as u64,
                error = %e,
                "failed to restore read timeout after health probe"
            );
        }
    }
}
