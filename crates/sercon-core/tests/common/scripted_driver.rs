//! In-memory `ChannelDriver` for integration tests.
//!
//! Open outcomes and read chunks are queued up front; everything the
//! connection does (opens, writes, timeouts, closes) is recorded in a shared
//! `Script` the test keeps a handle to after the driver moves into a connection.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::time::Duration;

use sercon_core::port::ConnectionConfig;
use sercon_core::{ChannelDriver, DriverError, DriverErrorKind};

#[derive(Debug, Default)]
pub struct Script {
    /// Result of each open call in order; once empty, opens succeed.
    pub open_results: VecDeque<Result<(), DriverError>>,
    /// Chunks returned by successive reads; once empty, reads time out.
    pub reads: VecDeque<Result<Vec<u8>, DriverError>>,
    pub write_error: Option<DriverError>,
    /// Max bytes accepted per write call (None = all).
    pub write_chunk: Option<usize>,
    pub set_timeout_error: Option<DriverError>,
    /// Fail only the nth (1-based) `set_read_timeout` call.
    pub fail_timeout_call: Option<(u32, DriverError)>,
    pub close_error: Option<DriverError>,
    pub endpoints: Vec<String>,

    pub open_calls: u32,
    pub close_calls: u32,
    pub open_handles: u32,
    pub written: Vec<u8>,
    pub timeouts_set: Vec<Duration>,
    pub set_timeout_calls: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ScriptedDriver {
    script: Rc<RefCell<Script>>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shared handle to the script; stays valid after the driver is moved.
    pub fn script(&self) -> Rc<RefCell<Script>> {
        Rc::clone(&self.script)
    }

    pub fn fail_opens(self, n: usize, kind: DriverErrorKind, msg: &str) -> Self {
        for _ in 0..n {
            self.script
                .borrow_mut()
                .open_results
                .push_back(Err(DriverError::new(kind, msg)));
        }
        self
    }

    pub fn respond(self, bytes: &[u8]) -> Self {
        self.script.borrow_mut().reads.push_back(Ok(bytes.to_vec()));
        self
    }

    pub fn respond_err(self, err: DriverError) -> Self {
        self.script.borrow_mut().reads.push_back(Err(err));
        self
    }
}

pub fn busy() -> DriverError {
    DriverError::new(DriverErrorKind::Busy, "device busy")
}

impl ChannelDriver for ScriptedDriver {
    type Handle = u32;

    fn open(&mut self, _config: &ConnectionConfig) -> Result<u32, DriverError> {
        let mut s = self.script.borrow_mut();
        s.open_calls += 1;
        match s.open_results.pop_front() {
            Some(Err(e)) => Err(e),
            _ => {
                s.open_handles += 1;
                Ok(s.open_calls)
            }
        }
    }

    fn close(&mut self, _handle: u32) -> Result<(), DriverError> {
        let mut s = self.script.borrow_mut();
        s.close_calls += 1;
        s.open_handles -= 1;
        match s.close_error.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn read(&mut self, _handle: &mut u32, buf: &mut [u8]) -> Result<usize, DriverError> {
        let mut s = self.script.borrow_mut();
        match s.reads.pop_front() {
            None => Err(DriverError::new(DriverErrorKind::Timeout, "read timed out")),
            Some(Err(e)) => Err(e),
            Some(Ok(chunk)) => {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                if n < chunk.len() {
                    s.reads.push_front(Ok(chunk[n..].to_vec()));
                }
                Ok(n)
            }
        }
    }

    fn write(&mut self, _handle: &mut u32, data: &[u8]) -> Result<usize, DriverError> {
        let mut s = self.script.borrow_mut();
        if let Some(e) = s.write_error.clone() {
            return Err(e);
        }
        let n = s.write_chunk.map_or(data.len(), |c| c.min(data.len()));
        s.written.extend_from_slice(&data[..n]);
        Ok(n)
    }

    fn set_read_timeout(
        &mut self,
        _handle: &mut u32,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        let mut s = self.script.borrow_mut();
        s.set_timeout_calls += 1;
        if let Some(e) = s.set_timeout_error.clone() {
            return Err(e);
        }
        let call = s.set_timeout_calls;
        if let Some((_, e)) = s.fail_timeout_call.as_ref().filter(|(n, _)| *n == call) {
            return Err(e.clone());
        }
        s.timeouts_set.push(timeout);
        Ok(())
    }

    fn list_endpoints(&self) -> Result<Vec<String>, DriverError> {
        Ok(self.script.borrow().endpoints.clone())
    }
}
