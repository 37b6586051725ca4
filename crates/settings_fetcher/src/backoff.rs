//! Retry policy for settings fetching.
//!
//! The delay before retry `n` (0-indexed) is `first × factor^n`, clamped to
//! `max`. The base is derived from the attempt number alone, so delays never
//! shrink over a long outage.

use std::time::Duration;

use contracts::RetryConfig;

/// Exponential backoff between fetch attempts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay before the first retry.
    pub first: Duration,
    /// Maximum delay cap.
    pub max: Duration,
    /// Multiplicative growth factor (`>= 1.0`).
    pub factor: f64,
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self {
            first: Duration::from_millis(100),
            max: Duration::from_secs(30),
            factor: 2.0,
        }
    }
}

impl BackoffPolicy {
    /// Delay before retry number `attempt` (0-indexed).
    pub fn next(&self, attempt: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let clamped_exp = attempt.min(i32::MAX as u32) as i32;
        let unclamped_secs = self.first.as_secs_f64() * self.factor.powi(clamped_exp);

        if !unclamped_secs.is_finite() || unclamped_secs < 0.0 || unclamped_secs > max_secs {
            self.max
        } else {
            Duration::from_secs_f64(unclamped_secs)
        }
    }
}

/// Backoff plus an optional attempt cap.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RetryPolicy {
    pub backoff: BackoffPolicy,
    /// `None` retries until success or cancellation.
    pub max_attempts: Option<u32>,
}

impl RetryPolicy {
    /// Give up after `max_attempts` failed attempts.
    pub fn bounded(backoff: BackoffPolicy, max_attempts: u32) -> Self {
        Self {
            backoff,
            max_attempts: Some(max_attempts),
        }
    }

    /// Whether `failures` failed attempts exhaust the policy.
    pub fn is_exhausted(&self, failures: u32) -> bool {
        self.max_attempts.is_some_and(|max| failures >= max)
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        Self {
            backoff: BackoffPolicy {
                first: Duration::from_millis(config.first_delay_ms),
                max: Duration::from_millis(config.max_delay_ms),
                factor: config.factor,
            },
            max_attempts: config.max_attempts,
        }
    }
}
