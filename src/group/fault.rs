//! # Fault handlers
//!
//! [`FaultHandler`] is the extension point notified when a worker panics. The group
//! calls it from inside the failing worker, exactly once per panic, after the panic has
//! been converted into [`TaskError::Panicked`].
//!
//! ## Contract
//! - Handlers may be invoked **concurrently** from several workers; any side effect they
//!   perform must be thread-safe.
//! - The group discards whatever the handler does; `wait` still reports the panic.
//! - A panic inside the handler is caught and logged, it never escapes the worker.
//!
//! Plain closures `Fn(&str, &TaskError)` are handlers too:
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use taskguard::{FaultHandler, TaskError};
//!
//! let faults = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&faults);
//! let handler = move |_task: &str, _err: &TaskError| {
//!     counter.fetch_add(1, Ordering::SeqCst);
//! };
//! # fn assert_handler<H: FaultHandler>(_: &H) {}
//! # assert_handler(&handler);
//! ```

use async_trait::async_trait;
use tracing::error;

use crate::error::TaskError;

/// Receiver of worker panics.
#[async_trait]
pub trait FaultHandler: Send + Sync + 'static {
    /// Handles one intercepted panic.
    ///
    /// # Parameters
    /// - `task`: name of the worker that panicked
    /// - `err`: the synthesized failure (always [`TaskError::Panicked`])
    async fn on_fault(&self, task: &str, err: &TaskError);

    /// Human-readable name (for logs).
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[async_trait]
impl<F> FaultHandler for F
where
    F: Fn(&str, &TaskError) + Send + Sync + 'static,
{
    async fn on_fault(&self, task: &str, err: &TaskError) {
        self(task, err)
    }
}

/// Handler that records the panic through `tracing` at `error` level.
///
/// Default handler of [`TaskGroupBuilder`](crate::TaskGroupBuilder).
///
/// ## Example output
/// ```text
/// ERROR taskguard::group::fault: worker fault task="fetch" error=panic: nil deref
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct LogFaults;

impl LogFaults {
    /// Construct a new [`LogFaults`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FaultHandler for LogFaults {
    async fn on_fault(&self, task: &str, err: &TaskError) {
        error!(task, error = %err, "worker fault");
    }

    fn name(&self) -> &'static str {
        "LogFaults"
    }
}
