//! Cooperative cancellation for the retry loop.
//!
//! A `CancelToken` is shared between the thread running `open_with_retry` and
//! any other thread (signal handler, UI) that wants to stop it. The loop checks
//! the token before each attempt, so a cancel takes effect at the next
//! suspension point: right away if the loop is between attempts, or after the
//! current backoff wait or blocking open returns.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Shared flag; clones observe the same state.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Clear the flag so the token can be reused for the next open.
    pub fn reset(&self) {
        self.cancelled.store(false, Ordering::Relaxed);
    }
}
