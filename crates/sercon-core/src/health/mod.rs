//! Application-level liveness probe over an open connection.
//!
//! A health check writes a caller-supplied probe, then reads back exactly as
//! many bytes as the expected response and compares them. The read runs under
//! a temporary probe timeout; the connection's own timeout is restored on
//! every exit path before the check returns, and a failed restore is an error.

mod error;
mod guard;

use std::time::Duration;

use crate::connection::{Connection, ConnectionError};
use crate::driver::ChannelDriver;

pub use error::HealthError;
use guard::ReadTimeoutGuard;

/// Probe bytes, the exact response expected, and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthCheckSpec {
    pub probe_payload: Vec<u8>,
    pub expected_response: Vec<u8>,
    pub probe_timeout: Duration,
}

impl HealthCheckSpec {
    pub fn new(
        probe_payload: impl Into<Vec<u8>>,
        expected_response: impl Into<Vec<u8>>,
        probe_timeout: Duration,
    ) -> Self {
        Self {
            probe_payload: probe_payload.into(),
            expected_response: expected_response.into(),
            probe_timeout,
        }
    }
}

/// Runs a `HealthCheckSpec` against connections. Stateless; reusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthChecker {
    spec: HealthCheckSpec,
}

impl HealthChecker {
    pub fn new(spec: HealthCheckSpec) -> Self {
        Self { spec }
    }

    pub fn spec(&self) -> &HealthCheckSpec {
        &self.spec
    }

    pub fn check_health<D: ChannelDriver>(
        &self,
        connection: &mut Connection<D>,
    ) -> Result<(), HealthError> {
        if !connection.is_open() {
            return Err(HealthError::NotOpen);
        }

        connection
            .write_all(&self.spec.probe_payload)
            .map_err(HealthError::ProbeWriteFailed)?;

        let mut guard = ReadTimeoutGuard::acquire(connection, self.spec.probe_timeout)
            .map_err(HealthError::TimeoutOverrideFailed)?;
        let read = read_response(guard.connection(), self.spec.expected_response.len());
        let response = match (read, guard.restore()) {
            (Ok(response), Ok(())) => response,
            (Ok(_), Err(e)) => return Err(HealthError::TimeoutRestoreFailed(e)),
            (Err(e), Ok(())) => return Err(e),
            (Err(e), Err(restore_err)) => {
                tracing::warn!(
                    error = %restore_err,
                    "failed to restore read timeout after health probe"
                );
                return Err(e);
            }
        };

        compare(&self.spec.expected_response, &response)?;
        tracing::debug!(bytes = response.len(), "health check passed");
        Ok(())
    }
}

/// Read until `len` bytes arrive, the stream ends, or a timeout interrupts a
/// partial response. A timeout before any byte arrives is a read failure.
fn read_response<D: ChannelDriver>(
    connection: &mut Connection<D>,
    len: usize,
) -> Result<Vec<u8>, HealthError> {
    let mut buf = vec![0u8; len];
    let mut filled = 0;
    while filled < len {
        match connection.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(ConnectionError::Io(e)) if e.is_timeout() && filled > 0 => break,
            Err(e) => return Err(HealthError::ProbeReadFailed(e)),
        }
    }
    buf.truncate(filled);
    Ok(buf)
}

fn compare(expected: &[u8], actual: &[u8]) -> Result<(), HealthError> {
    if expected.len() != actual.len() {
        return Err(HealthError::ResponseLengthMismatch {
            expected: expected.len(),
            actual: actual.len(),
        });
    }
    match expected.iter().zip(actual).position(|(e, a)| e != a) {
        Some(index) => Err(HealthError::ResponseContentMismatch {
            index,
            expected: expected[index],
            actual: actual[index],
        }),
        None => Ok(()),
    }
}
