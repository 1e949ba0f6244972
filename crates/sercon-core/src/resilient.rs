//! Open-with-retry and reconnect on top of a plain `Connection`.
//!
//! `ResilientConnection` owns a `Connection` and the policy objects that steer
//! it: a `RetryPolicy` for attempt count and backoff, an `ErrorClassifier` for
//! deciding which failures are transient, and an `ExtendedValidator` for the
//! static config rules. Backoff waits go through an injectable sleeper so the
//! loop can be driven without real delays.

use std::time::Duration;

use crate::cancel::CancelToken;
use crate::connection::{Connection, ConnectionError, ConnectionState};
use crate::driver::{ChannelDriver, DriverError};
use crate::health::{HealthChecker, HealthError};
use crate::port::{ConnectionConfig, ExtendedValidator, ValidationError};
use crate::retry::{
    run_with_retry, Attempted, ErrorClassifier, PolicyError, RetryError, RetryPolicy,
};

/// Why `open_with_retry` or `reconnect` did not produce an open channel.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConnectError {
    #[error("invalid connection config: {0}")]
    Invalid(#[from] ValidationError),
    #[error("invalid retry policy: {0}")]
    Policy(#[from] PolicyError),
    #[error("connection is already open")]
    AlreadyOpen,
    #[error("no configuration has been applied yet; open before reconnecting")]
    NoPriorConfig,
    #[error("non-recoverable error after {attempts} attempt(s): {source}")]
    NonRecoverable { attempts: u32, source: DriverError },
    #[error("gave up after {attempts} attempt(s): {source}")]
    RetryExhausted { attempts: u32, source: DriverError },
    #[error("cancelled after {attempts} attempt(s)")]
    Cancelled { attempts: u32 },
    #[error(transparent)]
    Connection(#[from] ConnectionError),
}

impl ConnectError {
    /// Attempts made before giving up, for loop outcomes.
    pub fn attempts(&self) -> Option<u32> {
        match self {
            ConnectError::NonRecoverable { attempts, .. }
            | ConnectError::RetryExhausted { attempts, .. }
            | ConnectError::Cancelled { attempts } => Some(*attempts),
            _ => None,
        }
    }
}

type Sleeper = Box<dyn FnMut(Duration)>;

pub struct ResilientConnection<D: ChannelDriver> {
    connection: Connection<D>,
    policy: RetryPolicy,
    classifier: ErrorClassifier,
    validator: ExtendedValidator,
    cancel: Option<CancelToken>,
    sleeper: Sleeper,
}

impl<D: ChannelDriver> ResilientConnection<D> {
    /// Default policy, classifier and base-only validation; sleeps the thread between attempts.
    pub fn new(driver: D) -> Self {
        Self {
            connection: Connection::new(driver),
            policy: RetryPolicy::default(),
            classifier: ErrorClassifier::default(),
            validator: ExtendedValidator::default(),
            cancel: None,
            sleeper: Box::new(std::thread::sleep),
        }
    }

    /// Policy used by `reconnect` until the next `open_with_retry` replaces it.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_classifier(mut self, classifier: ErrorClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_validator(mut self, validator: ExtendedValidator) -> Self {
        self.validator = validator;
        self
    }

    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Replace the backoff wait (defaults to `std::thread::sleep`).
    pub fn with_sleeper(mut self, sleeper: impl FnMut(Duration) + 'static) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    pub fn connection(&self) -> &Connection<D> {
        &self.connection
    }

    /// Direct access for reads and writes on the open channel.
    pub fn connection_mut(&mut self) -> &mut Connection<D> {
        &mut self.connection
    }

    pub fn state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Open `config`, retrying recoverable failures as `policy` allows.
    ///
    /// Returns the number of attempts made. Validation errors return before any
    /// attempt and leave the state unchanged. `policy` becomes the current
    /// policy for later `reconnect` calls.
    pub fn open_with_retry(
        &mut self,
        config: &ConnectionConfig,
        policy: RetryPolicy,
    ) -> Result<u32, ConnectError> {
        self.validator.validate(config)?;
        policy.validate()?;
        if self.connection.is_open() {
            return Err(ConnectError::AlreadyOpen);
        }
        self.policy = policy;

        tracing::debug!(
            endpoint = %config.endpoint_id,
            max_retries = policy.max_retries,
            "opening channel"
        );
        self.connection.begin_connecting();

        let connection = &mut self.connection;
        let result = run_with_retry(
            &self.policy,
            &self.classifier,
            self.cancel.as_ref(),
            &mut self.sleeper,
            |attempt| {
                tracing::debug!(endpoint = %config.endpoint_id, attempt, "open attempt");
                connection.attempt_open(config)
            },
        );

        match result {
            Ok(Attempted { attempts, .. }) => {
                tracing::info!(endpoint = %config.endpoint_id, attempts, "connected");
                Ok(attempts)
            }
            Err(RetryError::NonRecoverable { attempts, source }) => {
                tracing::warn!(
                    endpoint = %config.endpoint_id,
                    attempts,
                    error = %source,
                    "non-recoverable open failure"
                );
                self.connection.mark_errored(source.clone());
                Err(ConnectError::NonRecoverable { attempts, source })
            }
            Err(RetryError::Exhausted { attempts, source }) => {
                tracing::warn!(
                    endpoint = %config.endpoint_id,
                    attempts,
                    error = %source,
                    "retries exhausted"
                );
                self.connection.mark_errored(source.clone());
                Err(ConnectError::RetryExhausted { attempts, source })
            }
            Err(RetryError::Cancelled { attempts, .. }) => {
                tracing::info!(endpoint = %config.endpoint_id, attempts, "open cancelled");
                self.connection.mark_disconnected();
                Err(ConnectError::Cancelled { attempts })
            }
        }
    }

    /// Close the channel. See `Connection::close`.
    pub fn close(&mut self) -> Result<(), ConnectionError> {
        self.connection.close()
    }

    /// Close if open, then reopen the last successfully applied config with the
    /// current policy. A failed release is logged and does not stop the reopen.
    pub fn reconnect(&mut self) -> Result<u32, ConnectError> {
        let config = self
            .connection
            .config()
            .cloned()
            .ok_or(ConnectError::NoPriorConfig)?;
        // The handle is gone even when release fails, so reopen regardless.
        if self.connection.is_open() {
            if let Err(e) = self.connection.close() {
                tracing::warn!(
                    endpoint = %config.endpoint_id,
                    error = %e,
                    "release failed before reconnect"
                );
            }
        }
        tracing::debug!(endpoint = %config.endpoint_id, "reconnecting");
        let policy = self.policy;
        self.open_with_retry(&config, policy)
    }

    /// Run a liveness probe on the open channel. Never reconnects on failure.
    pub fn check_health(&mut self, checker: &HealthChecker) -> Result<(), HealthError> {
        checker.check_health(&mut self.connection)
    }
}
