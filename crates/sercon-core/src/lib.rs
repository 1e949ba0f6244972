//! Resilient serial channel connections.
//!
//! Layers, leaf to root: `port` (parameters and validation), `retry` (backoff
//! policy, error classification, retry loop), `connection` (one channel and
//! its state), `resilient` (open-with-retry and reconnect), `health`
//! (probe/response liveness checks). `driver` is the boundary to the device.

pub mod cancel;
pub mod config;
pub mod connection;
pub mod driver;
pub mod health;
pub mod logging;
pub mod port;
pub mod resilient;
pub mod retry;

pub use cancel::CancelToken;
pub use connection::{Connection, ConnectionError, ConnectionState};
pub use driver::{ChannelDriver, DriverError, DriverErrorKind, SerialDriver};
pub use health::{HealthCheckSpec, HealthChecker, HealthError};
pub use port::{ConnectionConfig, ExtendedValidator, Parity, ValidationError};
pub use resilient::{ConnectError, ResilientConnection};
pub use retry::{ErrorClassifier, PolicyError, RetryPolicy};
