//! Bounded retry for unreachable backends.

use std::time::Duration;
use tokio_retry2::strategy::jitter;

/// Retry configuration for the send phase of a request.
///
/// Delays double from `initial_backoff_ms`, are capped at `max_delay_ms`
/// and jittered.
///
/// # Examples
///
/// ```
/// use edugenie_models::RetryPolicy;
///
/// let policy = RetryPolicy::new(3, 250);
/// assert_eq!(policy.strategy().count(), 3);
/// assert_eq!(RetryPolicy::none().strategy().count(), 0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_getters::Getters)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    attempts: usize,
    /// First delay in milliseconds
    initial_backoff_ms: u64,
    /// Upper bound for any single delay in milliseconds
    max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            initial_backoff_ms: 250,
            max_delay_ms: 4000,
        }
    }
}

impl RetryPolicy {
    /// A policy with the given retry count and first delay.
    pub fn new(attempts: usize, initial_backoff_ms: u64) -> Self {
        Self {
            attempts,
            initial_backoff_ms,
            ..Self::default()
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self::new(0, 0)
    }

    /// The un-jittered delays: `initial`, `2 * initial`, `4 * initial`, ...
    /// each capped at `max_delay_ms`.
    pub fn delays(&self) -> impl Iterator<Item = Duration> + use<> {
        let (initial, max) = (self.initial_backoff_ms, self.max_delay_ms);
        (0..self.attempts).map(move |retry| {
            let doubled = initial.saturating_mul(1u64 << retry.min(63));
            Duration::from_millis(doubled.min(max))
        })
    }

    /// The delays to wait between attempts, jittered.
    pub fn strategy(&self) -> impl Iterator<Item = Duration> + use<> {
        self.delays().map(jitter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn millis(policy: RetryPolicy) -> Vec<u64> {
        policy.delays().map(|d| d.as_millis() as u64).collect()
    }

    #[test]
    fn delays_double_from_the_initial_backoff() {
        assert_eq!(millis(RetryPolicy::new(3, 1)), vec![1, 2, 4]);
        assert_eq!(millis(RetryPolicy::new(4, 250)), vec![250, 500, 1000, 2000]);
        assert_eq!(millis(RetryPolicy::new(2, 0)), vec![0, 0]);
    }

    #[test]
    fn delays_are_capped() {
        assert_eq!(millis(RetryPolicy::new(3, 3000)), vec![3000, 4000, 4000]);
        assert_eq!(millis(RetryPolicy::new(70, u64::MAX)).last(), Some(&4000));
    }

    #[test]
    fn jitter_never_exceeds_the_delay() {
        let policy = RetryPolicy::new(5, 100);
        for (jittered, delay) in policy.strategy().zip(policy.delays()) {
            assert!(jittered <= delay);
        }
        assert_eq!(RetryPolicy::none().strategy().count(), 0);
    }
}
