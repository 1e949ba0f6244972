use std::time::Duration;

/// Why a `RetryPolicy` was rejected.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    /// Factor below 1.0 (or not finite) would shrink waits toward zero.
    #[error("backoff factor {0} must be a finite value of at least 1.0")]
    BackoffFactorTooSmall(f64),
    #[error("max interval {max:?} is below base interval {base:?}")]
    MaxIntervalBelowBase { base: Duration, max: Duration },
}

/// Exponential backoff policy with a cap.
///
/// The first attempt is immediate. Before attempt `n > 0` the loop waits the
/// current interval, which starts at `base_interval` and is multiplied by
/// `backoff_factor` after each wait, never exceeding `max_interval`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; total attempts are `max_retries + 1`.
    pub max_retries: u32,
    pub base_interval: Duration,
    pub backoff_factor: f64,
    pub max_interval: Duration,
}

impl Default for RetryPolicy {
    /// Used only when the caller supplies no policy: 3 retries, 100ms doubling up to 5s.
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_interval: Duration::from_millis(100),
            backoff_factor: 2.0,
            max_interval: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no waiting.
    pub fn no_retry() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), PolicyError> {
        if !self.backoff_factor.is_finite() || self.backoff_factor < 1.0 {
            return Err(PolicyError::BackoffFactorTooSmall(self.backoff_factor));
        }
        if self.max_interval < self.base_interval {
            return Err(PolicyError::MaxIntervalBelowBase {
                base: self.base_interval,
                max: self.max_interval,
            });
        }
        Ok(())
    }

    /// Interval to use after waiting `previous` before attempt `attempt_index`.
    ///
    /// Attempt 0 never waits, so it yields zero. Otherwise returns
    /// `min(previous * backoff_factor, max_interval)`, never less than
    /// `previous` (the f64 product can round below it).
    pub fn next_interval(&self, attempt_index: u32, previous: Duration) -> Duration {
        if attempt_index == 0 {
            return Duration::ZERO;
        }
        let scaled = previous.as_secs_f64() * self.backoff_factor;
        Duration::try_from_secs_f64(scaled)
            .unwrap_or(self.max_interval)
            .max(previous)
            .min(self.max_interval)
    }

    /// Waits inserted before attempts 1..=max_retries, in order.
    pub fn backoff(&self) -> Backoff {
        Backoff {
            policy: *self,
            attempt: 1,
            interval: self.base_interval.min(self.max_interval),
        }
    }
}

/// Iterator over the backoff waits of a policy. Yields `max_retries` items.
#[derive(Debug, Clone)]
pub struct Backoff {
    policy: RetryPolicy,
    attempt: u32,
    interval: Duration,
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        if self.attempt > self.policy.max_retries {
            return None;
        }
        let wait = self.interval;
        self.interval = self.policy.next_interval(self.attempt, wait);
        self.attempt += 1;
        Some(wait)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.policy.max_retries + 1).saturating_sub(self.attempt) as usize;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Backoff {}

#[cfg(test)]
mod tests {
    use super::*;

    fn policy(max_retries: u32, base_ms: u64, factor: f64, max_ms: u64) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_interval: Duration::from_millis(base_ms),
            backoff_factor: factor,
            max_interval: Duration::from_millis(max_ms),
        }
    }

    #[test]
    fn default_is_valid() {
        assert!(RetryPolicy::default().validate().is_ok());
        assert!(RetryPolicy::no_retry().validate().is_ok());
    }

    #[test]
    fn factor_below_one_rejected() {
        let p = policy(3, 100, 0.5, 1000);
        assert_eq!(p.validate(), Err(PolicyError::BackoffFactorTooSmall(0.5)));
        assert!(policy(3, 100, f64::NAN, 1000).validate().is_err());
        assert!(policy(3, 100, f64::INFINITY, 1000).validate().is_err());
    }

    #[test]
    fn max_below_base_rejected() {
        let p = policy(3, 500, 2.0, 100);
        assert!(matches!(
            p.validate(),
            Err(PolicyError::MaxIntervalBelowBase { .. })
        ));
    }

    #[test]
    fn first_attempt_never_waits() {
        let p = policy(3, 100, 2.0, 1000);
        assert_eq!(p.next_interval(0, Duration::from_millis(100)), Duration::ZERO);
    }

    #[test]
    fn interval_grows_and_is_capped() {
        let p = policy(10, 100, 2.0, 1000);
        let mut prev = p.base_interval;
        for attempt in 1..10 {
            let next = p.next_interval(attempt, prev);
            assert!(next >= prev, "attempt {}: {:?} < {:?}", attempt, next, prev);
            assert!(next <= p.max_interval);
            prev = next;
        }
        assert_eq!(prev, p.max_interval);
    }

    #[test]
    fn factor_one_keeps_interval_constant() {
        let p = policy(4, 250, 1.0, 250);
        let waits: Vec<_> = p.backoff().collect();
        assert_eq!(waits, vec![Duration::from_millis(250); 4]);
    }

    #[test]
    fn float_rounding_never_shrinks_interval() {
        let big = Duration::new(1 << 40, 1);
        let p = RetryPolicy {
            max_retries: 3,
            base_interval: big,
            backoff_factor: 1.0,
            max_interval: big,
        };
        assert_eq!(p.next_interval(1, big), big);
        assert!(p.backoff().all(|w| w == big));

        let p = RetryPolicy {
            backoff_factor: 1.000_000_000_000_1,
            max_interval: Duration::MAX,
            ..p
        };
        assert!(p.next_interval(1, big) >= big);
    }

    #[test]
    fn backoff_sequence_matches_scenario() {
        let p = policy(4, 100, 2.0, 1000);
        let waits: Vec<u128> = p.backoff().map(|d| d.as_millis()).collect();
        assert_eq!(waits, vec![100, 200, 400, 800]);
    }

    #[test]
    fn backoff_yields_max_retries_items() {
        assert_eq!(policy(0, 100, 2.0, 1000).backoff().count(), 0);
        assert_eq!(policy(3, 100, 2.0, 1000).backoff().len(), 3);
    }

    #[test]
    fn huge_factor_saturates_at_max() {
        let p = policy(5, 100, 1e300, 2000);
        let waits: Vec<_> = p.backoff().collect();
        assert_eq!(waits[0], Duration::from_millis(100));
        assert!(waits[1..].iter().all(|w| *w == Duration::from_secs(2)));
    }
}
