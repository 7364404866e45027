//! Retry delay policies.
//!
//! This module groups the knobs that control **how long** a retry loop waits between
//! attempts.
//!
//! ## Contents
//! - [`DelayPolicy`]   capability: zero-based retry index → wait duration
//! - [`BackoffPolicy`] fixed / exponential delays (first / factor / max + jitter)
//! - [`JitterPolicy`]  randomization strategy to avoid thundering herd
//!
//! ## Quick wiring
//! ```text
//! Retry { max_attempts, policy: impl DelayPolicy }
//!      └─► after failed attempt k (< max): sleep(policy.delay(k - 1))
//! ```
//!
//! ## Defaults
//! - `BackoffPolicy::default()` → first=100ms, factor=1.0 (constant), max=30s, jitter=None.
//! - `JitterPolicy::None` by default; consider `Equal` for balanced randomness.

mod backoff;
mod delay;
mod jitter;

pub use backoff::BackoffPolicy;
pub use delay::DelayPolicy;
pub use jitter::JitterPolicy;
