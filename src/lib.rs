//! # taskguard
//!
//! **taskguard** is a small reliability toolkit for async Rust on tokio.
//!
//! It provides two orthogonal building blocks:
//! - a **retry executor** that re-runs a fallible action under a pluggable delay policy
//!   until it succeeds or an attempt budget is spent;
//! - a **supervised task group** that runs workers concurrently, turns worker panics
//!   into ordinary failures (after notifying a fault handler), and reports the first
//!   failure once every worker has finished.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   Retry { max_attempts, policy }                 TaskGroup (Open → Draining → Closed)
//!   ┌─────────────────────────────┐     ┌──────────────────────────────────────────────┐
//!   │ loop {                      │     │ go(name, f) / submit(task) / GroupHandle     │
//!   │   attempt += 1              │     │        │ spawn (JoinSet, optional semaphore) │
//!   │   action().await ─ Ok ─► ✓  │     │        ▼                                     │
//!   │        └ Err ─ last? ─► ✗   │     │   run_worker: catch_unwind(fut)              │
//!   │   sleep(policy.delay(k-1))  │     │        ├─ Ok / Err(e) ──────────────┐        │
//!   │ }                           │     │        └─ panic ─► "panic: <msg>"   │        │
//!   └─────────────────────────────┘     │             └─► FaultHandler        │        │
//!                                       │                                     ▼        │
//!                                       │ wait(): join all, earliest failure wins      │
//!                                       └──────────────────────────────────────────────┘
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                               |
//! |-------------------|--------------------------------------------------------------|--------------------------------------------------|
//! | **Retry**         | Bounded retries with zero-based delay policies.              | [`Retry`], [`retry`], [`RetryError`]             |
//! | **Policies**      | Fixed, exponential and jittered delays.                      | [`DelayPolicy`], [`BackoffPolicy`], [`JitterPolicy`] |
//! | **Supervision**   | Concurrent workers, panic interception, first failure.       | [`TaskGroup`], [`GroupHandle`], [`FaultHandler`] |
//! | **Errors**        | Typed errors for workers, retries and submissions.           | [`TaskError`], [`RetryError`], [`SubmitError`]   |
//! | **Tasks**         | Define workers as functions or trait objects.                | [`Task`], [`TaskFn`], [`TaskRef`]                |
//! | **Configuration** | Plain settings structs with defaults.                        | [`GroupConfig`], [`RetryConfig`]                 |
//!
//! ## Logging
//! The crate logs through [`tracing`] and never installs a subscriber.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicU32, Ordering};
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use taskguard::{BackoffPolicy, LogFaults, Retry, TaskError, TaskGroup};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), TaskError> {
//!     let group = TaskGroup::new(LogFaults);
//!     let calls = Arc::new(AtomicU32::new(0));
//!
//!     group.go("flaky", move |_ctx: CancellationToken| async move {
//!         let retry = Retry::new(5, BackoffPolicy::fixed(Duration::from_millis(10)));
//!         retry
//!             .run(|| {
//!                 let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
//!                 async move { if n < 3 { Err("not yet") } else { Ok(()) } }
//!             })
//!             .await
//!             .map_err(TaskError::from)
//!     });
//!
//!     group.wait().await
//! }
//! ```

mod config;
mod error;
mod group;
mod policies;
mod retry;
mod tasks;

// ---- Public re-exports ----

pub use config::{GroupConfig, RetryConfig};
pub use error::{RetryError, SubmitError, TaskError};
pub use group::{FaultHandler, GroupHandle, GroupState, LogFaults, TaskGroup, TaskGroupBuilder};
pub use policies::{BackoffPolicy, DelayPolicy, JitterPolicy};
pub use retry::{Retry, retry};
pub use tasks::{BoxTaskFuture, Task, TaskFn, TaskRef};
