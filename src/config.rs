//! # Runtime configuration.
//!
//! Provides two plain settings structs:
//! - [`GroupConfig`] for [`TaskGroup`](crate::TaskGroup) construction;
//! - [`RetryConfig`] bundling an attempt budget with a [`BackoffPolicy`].
//!
//! ## Sentinel values
//! - `max_concurrent = 0` → unlimited (no semaphore created)

use crate::policies::BackoffPolicy;
use crate::retry::Retry;

/// Settings for a supervised task group.
///
/// ## Field semantics
/// - `max_concurrent`: number of workers allowed to run at once (`0` = unlimited)
/// - `cancel_on_failure`: cancel the group's token when the first worker fails
///
/// All fields are public. Prefer the helper accessors over sprinkling sentinel
/// checks (`0`) across the codebase.
#[derive(Clone, Debug, Default)]
pub struct GroupConfig {
    /// Maximum number of workers running simultaneously.
    ///
    /// - `0` = unlimited (no semaphore)
    /// - `n > 0` = at most `n` workers execute at once; the rest wait for a permit
    ///
    /// Waiting workers still count as in-flight for [`TaskGroup::wait`](crate::TaskGroup::wait).
    pub max_concurrent: usize,

    /// Cancel the token handed to workers as soon as any worker fails.
    ///
    /// Only the group's own child token is cancelled; a parent token supplied through
    /// [`TaskGroupBuilder::with_token`](crate::TaskGroupBuilder::with_token) is never touched.
    pub cancel_on_failure: bool,
}

impl GroupConfig {
    /// Returns the concurrency limit as an `Option`.
    ///
    /// - `None` → unlimited (no semaphore)
    /// - `Some(n)` → at most `n` concurrent workers
    #[inline]
    pub fn concurrency_limit(&self) -> Option<usize> {
        if self.max_concurrent == 0 {
            None
        } else {
            Some(self.max_concurrent)
        }
    }
}

/// Attempt budget plus delay policy for [`Retry`].
///
/// ## Example
/// ```
/// use std::time::Duration;
/// use taskguard::{BackoffPolicy, RetryConfig};
///
/// let cfg = RetryConfig {
///     max_attempts: 5,
///     backoff: BackoffPolicy::fixed(Duration::from_millis(50)),
/// };
/// let retry = cfg.retry();
/// assert_eq!(retry.max_attempts(), 5);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RetryConfig {
    /// Total number of attempts, including the first one (must be `> 0`).
    pub max_attempts: u32,
    /// Delay policy applied between attempts.
    pub backoff: BackoffPolicy,
}

impl RetryConfig {
    /// Builds a [`Retry`] executor from this configuration.
    ///
    /// # Panics
    /// If `max_attempts` is zero.
    pub fn retry(&self) -> Retry<BackoffPolicy> {
        Retry::new(self.max_attempts, self.backoff)
    }
}

impl Default for RetryConfig {
    /// Default configuration:
    ///
    /// - `max_attempts = 3`
    /// - `backoff = BackoffPolicy::default()` (constant 100ms)
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: BackoffPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_means_unlimited() {
        let cfg = GroupConfig::default();
        assert_eq!(cfg.concurrency_limit(), None);
        assert!(!cfg.cancel_on_failure);

        let cfg = GroupConfig {
            max_concurrent: 4,
            ..GroupConfig::default()
        };
        assert_eq!(cfg.concurrency_limit(), Some(4));
    }

    #[test]
    fn default_retry_config_builds_executor() {
        let retry = RetryConfig::default().retry();
        assert_eq!(retry.max_attempts(), 3);
        assert_eq!(*retry.policy(), BackoffPolicy::default());
    }

    #[test]
    #[should_panic(expected = "max_attempts must be greater than zero")]
    fn zero_attempts_is_rejected() {
        let cfg = RetryConfig {
            max_attempts: 0,
            ..RetryConfig::default()
        };
        let _ = cfg.retry();
    }
}
