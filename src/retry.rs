//! # Retry executor.
//!
//! Runs a fallible async action under a [`DelayPolicy`] until it succeeds or the
//! attempt budget is spent.
//!
//! ## Flow
//! ```text
//! attempt := 0
//! loop {
//!   ├─► attempt += 1
//!   ├─► action().await
//!   │       ├─ Ok(v)  ──► return Ok(v)
//!   │       └─ Err(e) ──► attempt == max_attempts?
//!   │                       ├─ yes ──► return Exhausted { attempts, last: e }
//!   │                       └─ no  ──► sleep(policy.delay(attempt - 1))
//!   └─► continue
//! }
//! ```
//!
//! ## Rules
//! - Attempts run **sequentially**; attempt `k + 1` starts only after attempt `k`
//!   returned and its delay elapsed.
//! - The policy index is **zero-based**: `delay(0)` is the wait before the first retry.
//! - No sleep after the final failed attempt; zero delays skip the timer entirely.
//! - The executor consults no cancellation source. An action that observes
//!   cancellation should return an error promptly; that error consumes budget like any
//!   other failure.

use std::fmt;
use std::future::Future;

use tokio::time;
use tracing::{debug, warn};

use crate::error::RetryError;
use crate::policies::DelayPolicy;

/// Retry executor: an attempt budget and a delay policy.
///
/// The executor holds no per-run state, so one value can drive any number of
/// concurrent [`run`](Retry::run) calls.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use taskguard::{BackoffPolicy, Retry, RetryError};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let retry = Retry::new(3, BackoffPolicy::none());
///
/// let res: Result<(), RetryError<&str>> = retry.run(|| async { Err("boom") }).await;
/// let err = res.unwrap_err();
/// assert_eq!(err.attempts(), 3);
/// assert_eq!(err.to_string(), "operation failed permanently after 3 attempts: boom");
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Retry<P> {
    max_attempts: u32,
    policy: P,
}

impl<P: DelayPolicy> Retry<P> {
    /// Creates an executor making at most `max_attempts` attempts.
    ///
    /// # Panics
    /// If `max_attempts` is zero.
    pub fn new(max_attempts: u32, policy: P) -> Self {
        assert_attempts(max_attempts);
        Self {
            max_attempts,
            policy,
        }
    }

    /// Total number of attempts, including the first one.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay policy applied between attempts.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Runs `action` until it succeeds or the attempt budget is spent.
    ///
    /// Returns the first success value, or [`RetryError::Exhausted`] carrying the
    /// attempt count and the last failure.
    pub async fn run<F, Fut, T, E>(&self, action: F) -> Result<T, RetryError<E>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        run_attempts(self.max_attempts, &self.policy, action).await
    }
}

/// Runs `action` at most `max_attempts` times under `policy`.
///
/// Borrowing counterpart of [`Retry::run`], handy when the policy is shared.
///
/// # Panics
/// If `max_attempts` is zero.
pub async fn retry<P, F, Fut, T, E>(
    max_attempts: u32,
    policy: &P,
    action: F,
) -> Result<T, RetryError<E>>
where
    P: DelayPolicy + ?Sized,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    assert_attempts(max_attempts);
    run_attempts(max_attempts, policy, action).await
}

fn assert_attempts(max_attempts: u32) {
    assert!(max_attempts > 0, "max_attempts must be greater than zero");
}

async fn run_attempts<P, F, Fut, T, E>(
    max_attempts: u32,
    policy: &P,
    mut action: F,
) -> Result<T, RetryError<E>>
where
    P: DelayPolicy + ?Sized,
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;

        match action().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt >= max_attempts => {
                warn!(attempts = attempt, error = %e, "all attempts failed");
                return Err(RetryError::Exhausted {
                    attempts: attempt,
                    last: e,
                });
            }
            Err(e) => {
                let delay = policy.delay(attempt - 1);
                debug!(attempt, ?delay, error = %e, "attempt failed; retrying");

                if !delay.is_zero() {
                    time::sleep(delay).await;
                }
            }
        }
    }
}
