//! Retry loop: run an operation until success, a fatal error, exhaustion or cancel.

use std::time::Duration;

use super::classify::ErrorClassifier;
use super::policy::RetryPolicy;
use crate::cancel::CancelToken;
use crate::driver::DriverError;

/// Successful result plus the number of attempts it took.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempted<T> {
    pub value: T,
    pub attempts: u32,
}

/// How the retry loop gave up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryError {
    /// The classifier marked the error fatal; remaining attempts were not used.
    NonRecoverable { attempts: u32, source: DriverError },
    /// Every permitted attempt failed.
    Exhausted { attempts: u32, source: DriverError },
    /// The cancel token was set before the next attempt.
    Cancelled {
        attempts: u32,
        last_error: Option<DriverError>,
    },
}

/// Runs `f` until it succeeds or the policy/classifier says to stop.
///
/// `f` receives the 0-based attempt index. Between attempts the loop calls
/// `sleep` with the next backoff wait. The policy is assumed to be validated.
pub fn run_with_retry<T, F, S>(
    policy: &RetryPolicy,
    classifier: &ErrorClassifier,
    cancel: Option<&CancelToken>,
    mut sleep: S,
    mut f: F,
) -> Result<Attempted<T>, RetryError>
where
    F: FnMut(u32) -> Result<T, DriverError>,
    S: FnMut(Duration),
{
    let mut waits = policy.backoff();
    let mut attempts = 0u32;
    let mut last_error = None;
    loop {
        if cancel.is_some_and(CancelToken::is_cancelled) {
            return Err(RetryError::Cancelled {
                attempts,
                last_error,
            });
        }

        let attempt = attempts;
        attempts += 1;
        match f(attempt) {
            Ok(value) => return Ok(Attempted { value, attempts }),
            Err(e) => {
                if !classifier.is_recoverable(&e) {
                    return Err(RetryError::NonRecoverable {
                        attempts,
                        source: e,
                    });
                }
                match waits.next() {
                    None => {
                        return Err(RetryError::Exhausted {
                            attempts,
                            source: e,
                        })
                    }
                    Some(wait) => {
                        tracing::warn!(
                            attempt,
                            wait_ms = wait.as_millis() as u64,
                            error = %e,
                            "attempt failed, retrying"
                        );
                        last_error = Some(e);
                        sleep(wait);
                    }
                }
            }
        }
    }
}
