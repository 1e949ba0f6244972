//! Retry and backoff policy.
//!
//! This module holds the backoff arithmetic, the recoverable/fatal error
//! classification, and the generic retry loop. `ResilientConnection` drives
//! opens through it; nothing here performs I/O except the caller's closure.

mod classify;
mod policy;
mod run;

pub use classify::{ErrorClassifier, DEFAULT_RECOVERABLE_SIGNATURES};
pub use policy::{Backoff, PolicyError, RetryPolicy};
pub use run::{run_with_retry, Attempted, RetryError};
