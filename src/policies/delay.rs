//! # Delay policy capability.
//!
//! [`DelayPolicy`] maps a zero-based retry index to a wait duration. The index is the
//! number of failures observed so far minus one, so `delay(0)` is the wait before the
//! first retry.
//!
//! Implementations must be pure: the same index always yields the same base delay
//! (randomized jitter aside), and no state is mutated. This is what lets one policy value
//! be shared by many concurrent retry loops.
//!
//! ## Implementations
//! - [`BackoffPolicy`](crate::BackoffPolicy): fixed / exponential with optional jitter
//! - [`Duration`]: constant delay
//! - `Fn(u32) -> Duration` closures
//! - `Arc<P>` for any `P: DelayPolicy`

use std::sync::Arc;
use std::time::Duration;

/// Pure mapping from zero-based retry index to wait duration.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use taskguard::DelayPolicy;
///
/// let linear = |retry: u32| Duration::from_millis(10 * (u64::from(retry) + 1));
/// assert_eq!(linear.delay(0), Duration::from_millis(10));
/// assert_eq!(linear.delay(2), Duration::from_millis(30));
///
/// let constant = Duration::from_millis(100);
/// assert_eq!(constant.delay(7), Duration::from_millis(100));
/// ```
pub trait DelayPolicy: Send + Sync {
    /// Returns the wait before retry number `retry + 1`.
    fn delay(&self, retry: u32) -> Duration;
}

impl DelayPolicy for Duration {
    fn delay(&self, _retry: u32) -> Duration {
        *self
    }
}

impl<F> DelayPolicy for F
where
    F: Fn(u32) -> Duration + Send + Sync,
{
    fn delay(&self, retry: u32) -> Duration {
        self(retry)
    }
}

impl<P: DelayPolicy + ?Sized> DelayPolicy for Arc<P> {
    fn delay(&self, retry: u32) -> Duration {
        (**self).delay(retry)
    }
}
