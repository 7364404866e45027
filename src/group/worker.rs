//! # Run one worker of a task group.
//!
//! Executes a single worker future with panic interception and reports its outcome.
//!
//! ## Flow
//! ```text
//! acquire permit (if the group is bounded)
//!   └─► catch_unwind(worker future)
//!         ├─ Ok(Ok(()))  ──► debug "worker finished"
//!         ├─ Ok(Err(e))  ──► warn  "worker failed"
//!         └─ Err(panic)  ──► payload → TaskError::Panicked
//!                            error "worker panicked" (+ panic-site backtrace)
//!                            handler.on_fault(name, &err)
//!   on failure: cancel the group token (only if cancel_on_failure)
//! ```
//!
//! ## Rules
//! - The handler runs **inside** the failing worker, exactly once per panic.
//! - `AssertUnwindSafe` is used: a worker that panics while holding a lock on shared
//!   state may leave that state inconsistent.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::Semaphore;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

use crate::error::TaskError;
use crate::group::fault::FaultHandler;
use crate::group::panic_trace::{self, Traced};
use crate::tasks::BoxTaskFuture;

/// Group-wide parameters handed to every worker.
#[derive(Clone)]
pub(crate) struct WorkerParams {
    /// Receiver of intercepted panics.
    pub handler: Arc<dyn FaultHandler>,
    /// Optional concurrency limiter.
    pub semaphore: Option<Arc<Semaphore>>,
    /// Token cancelled on the first failure (set only with `cancel_on_failure`).
    pub cancel_on_failure: Option<CancellationToken>,
}

/// Runs `fut` to completion, converting a panic into [`TaskError::Panicked`].
pub(crate) async fn run_worker(
    name: Arc<str>,
    fut: BoxTaskFuture,
    params: WorkerParams,
) -> Result<(), TaskError> {
    let _permit = match &params.semaphore {
        Some(sem) => match Arc::clone(sem).acquire_owned().await {
            Ok(permit) => Some(permit),
            Err(_closed) => return Err(TaskError::Canceled),
        },
        None => None,
    };

    panic_trace::install_hook_once();
    debug!(task = %name, "worker starting");
    let res = match AssertUnwindSafe(Traced::new(fut)).catch_unwind().await {
        Ok(Ok(())) => {
            debug!(task = %name, "worker finished");
            Ok(())
        }
        Ok(Err(e)) => {
            warn!(task = %name, error = %e, "worker failed");
            Err(e)
        }
        Err(panic) => {
            let payload = panic_message(panic.as_ref());
            match panic_trace::take() {
                Some(trace) => error!(task = %name, %payload, "worker panicked\n{trace}"),
                None => error!(task = %name, %payload, "worker panicked (no backtrace captured)"),
            }

            let err = TaskError::Panicked { payload };
            notify(params.handler.as_ref(), &name, &err).await;
            Err(err)
        }
    };

    if let (Err(_), Some(token)) = (&res, &params.cancel_on_failure) {
        token.cancel();
    }
    res
}

/// Invokes the fault handler, isolating a panic raised by the handler itself.
async fn notify(handler: &dyn FaultHandler, name: &str, err: &TaskError) {
    let fut = handler.on_fault(name, err);
    if let Err(panic) = AssertUnwindSafe(fut).catch_unwind().await {
        error!(
            handler = handler.name(),
            task = name,
            payload = %panic_message(panic.as_ref()),
            "fault handler panicked"
        );
    }
}

/// Maps a join failure to a worker failure.
///
/// Workers catch their own panics, so this only sees tasks torn down by the runtime.
pub(crate) fn from_join_error(err: JoinError) -> TaskError {
    if err.is_panic() {
        TaskError::Panicked {
            payload: panic_message(err.into_panic().as_ref()),
        }
    } else {
        TaskError::Canceled
    }
}

/// Renders a panic payload as text.
pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
