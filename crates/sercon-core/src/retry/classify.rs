//! Classify driver errors as recoverable (worth retrying) or fatal.

use crate::driver::{DriverError, DriverErrorKind};

/// Message fragments treated as transient when the driver could not give a
/// structured kind. Matched case-insensitively.
pub const DEFAULT_RECOVERABLE_SIGNATURES: &[&str] = &[
    "device busy",
    "resource busy",
    "resource temporarily unavailable",
    "timeout",
    "timed out",
    "connection refused",
    "no such device",
];

/// Decides which open failures the retry loop may retry.
///
/// Structured kinds are checked first. Only `DriverErrorKind::Unknown` errors
/// fall back to message matching, so a permission error whose text happens to
/// mention a timeout is still fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorClassifier {
    recoverable_kinds: Vec<DriverErrorKind>,
    signatures: Vec<String>,
}

impl Default for ErrorClassifier {
    fn default() -> Self {
        Self::new([
            DriverErrorKind::Busy,
            DriverErrorKind::Timeout,
            DriverErrorKind::NotFound,
            DriverErrorKind::Refused,
        ])
    }
}

impl ErrorClassifier {
    /// Classifier with the given recoverable kinds and the default signatures.
    pub fn new(recoverable_kinds: impl IntoIterator<Item = DriverErrorKind>) -> Self {
        Self {
            recoverable_kinds: recoverable_kinds.into_iter().collect(),
            signatures: DEFAULT_RECOVERABLE_SIGNATURES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Drop all message signatures; only structured kinds count.
    pub fn without_signatures(mut self) -> Self {
        self.signatures.clear();
        self
    }

    /// Add a recoverable message fragment.
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signatures.push(signature.into().to_ascii_lowercase());
        self
    }

    pub fn is_recoverable(&self, error: &DriverError) -> bool {
        if self.recoverable_kinds.contains(&error.kind) {
            return true;
        }
        match error.kind {
            DriverErrorKind::Unknown => self.matches_signature(&error.message),
            _ => false,
        }
    }

    fn matches_signature(&self, message: &str) -> bool {
        let message = message.to_ascii_lowercase();
        self.signatures.iter().any(|s| message.contains(s.as_str()))
    }
}
