//! # Backoff policy for retried operations.
//!
//! [`BackoffPolicy`] controls how retry delays grow after repeated failures.
//! It is parameterized by:
//! - [`BackoffPolicy::factor`] the multiplicative growth factor;
//! - [`BackoffPolicy::first`] the initial delay;
//! - [`BackoffPolicy::max`] the maximum delay cap.
//!
//! The delay for retry `n` (zero-based) is `first × factor^n`, clamped to `max`,
//! then jitter is applied. The base delay is derived purely from the retry index, so
//! jitter output never feeds back into later delays.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use taskguard::{BackoffPolicy, DelayPolicy, JitterPolicy};
//!
//! let backoff = BackoffPolicy::exponential(Duration::from_millis(100), 2.0, Duration::from_secs(10));
//!
//! // Retry 0 - uses 'first' (100ms)
//! assert_eq!(backoff.delay(0), Duration::from_millis(100));
//!
//! // Retry 1 - first × factor^1 = 200ms
//! assert_eq!(backoff.delay(1), Duration::from_millis(200));
//!
//! // Retry 10 - 100ms × 2^10 = 102_400ms → capped at max=10s
//! assert_eq!(backoff.delay(10), Duration::from_secs(10));
//!
//! assert_eq!(backoff.with_jitter(JitterPolicy::Equal).jitter, JitterPolicy::Equal);
//! ```

use std::time::Duration;

use crate::policies::delay::DelayPolicy;
use crate::policies::jitter::JitterPolicy;

/// Retry backoff policy.
///
/// Encapsulates parameters that determine how retry delays grow:
/// - [`BackoffPolicy::factor`] - multiplicative growth factor;
/// - [`BackoffPolicy::first`] - the initial delay;
/// - [`BackoffPolicy::max`] - the maximum delay cap.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BackoffPolicy {
    /// Delay before the first retry.
    pub first: Duration,
    /// Maximum delay cap for retries.
    pub max: Duration,
    /// Multiplicative growth factor (`>= 1.0` recommended).
    pub factor: f64,
    /// Jitter policy to prevent thundering herd.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Returns a strategy with:
    /// - `factor = 1.0` (constant delay);
    /// - `first = 100ms`;
    /// - `max = 30s`.
    fn default() -> Self {
        Self {
            first: Duration::from_millis(100),
            max: Duration::from_secs(30),
            jitter: JitterPolicy::None,
            factor: 1.0,
        }
    }
}

impl BackoffPolicy {
    /// Constant delay `d` before every retry.
    pub fn fixed(d: Duration) -> Self {
        Self {
            first: d,
            max: d,
            factor: 1.0,
            jitter: JitterPolicy::None,
        }
    }

    /// No delay at all: retries run back to back.
    pub fn none() -> Self {
        Self::fixed(Duration::ZERO)
    }

    /// Exponential growth `first × factor^n`, capped at `max`.
    pub fn exponential(first: Duration, factor: f64, max: Duration) -> Self {
        Self {
            first,
            max,
            factor,
            jitter: JitterPolicy::None,
        }
    }

    /// Returns the same policy with the given jitter.
    pub fn with_jitter(mut self, jitter: JitterPolicy) -> Self {
        self.jitter = jitter;
        self
    }

    /// Base delay for `retry` before jitter, clamped to [`BackoffPolicy::max`].
    ///
    /// # Notes
    /// - If `factor` is less than 1.0, delays decrease with higher retries (not typical).
    /// - If `factor` equals 1.0, delay remains constant at `first` (up to `max`).
    /// - Non-finite or negative intermediate values clamp to `max`.
    pub fn base(&self, retry: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let clamped_exp = retry.min(i32::MAX as u32) as i32;
        let unclamped_secs = self.first.as_secs_f64() * self.factor.powi(clamped_exp);

        if !unclamped_secs.is_finite() || unclamped_secs < 0.0 || unclamped_secs > max_secs {
            self.max
        } else {
            Duration::from_secs_f64(unclamped_secs)
        }
    }
}

impl DelayPolicy for BackoffPolicy {
    fn delay(&self, retry: u32) -> Duration {
        let base = self.base(retry);
        match self.jitter {
            JitterPolicy::Decorrelated => {
                self.jitter
                    .apply_decorrelated(self.first.min(self.max), base, self.max)
            }
            _ => self.jitter.apply(base),
        }
    }
}
