//! # TaskGroup: concurrent workers with panic supervision and first-failure reporting.
//!
//! A [`TaskGroup`] spawns workers on the tokio runtime as they are submitted, and
//! [`TaskGroup::wait`] joins every one of them, returning the first failure observed.
//!
//! ## Architecture
//! ```text
//! submit(task) / go(name, f)          GroupHandle::submit / go
//!          │                                   │ (Err(Closed) unless Open)
//!          └───────────────┬───────────────────┘
//!                          ▼
//!              Mutex<Inner { state, JoinSet }>
//!                          │ spawn
//!          ┌───────────────┼───────────────┐
//!          ▼               ▼               ▼
//!     run_worker      run_worker      run_worker      (catch_unwind → FaultHandler)
//!          │               │               │
//!          └───────────────┴───────┬───────┘
//!                                  ▼
//!                  wait(): take JoinSet, join all,
//!                  keep the earliest completed failure
//! ```
//!
//! ## State machine
//! ```text
//! Open ──wait()──► Draining ──all joined──► Closed
//! ```
//! - `Open`: accepting submissions.
//! - `Draining`: inside `wait()`; handle submissions are refused.
//! - `Closed`: `wait()` returned (or the group was dropped).
//!
//! ## Rules
//! - `wait` returns the failure of the **earliest completed** failing worker.
//! - No success is reported while any worker is still running.
//! - Dropping a group without waiting aborts its in-flight workers.
//! - Spawning requires a tokio runtime context.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::GroupConfig;
use crate::error::{SubmitError, TaskError};
use crate::group::builder::TaskGroupBuilder;
use crate::group::fault::FaultHandler;
use crate::group::handle::GroupHandle;
use crate::group::worker::{WorkerParams, from_join_error, run_worker};
use crate::tasks::{BoxTaskFuture, TaskRef};

/// Lifecycle state of a [`TaskGroup`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroupState {
    /// Accepting submissions.
    Open,
    /// `wait` in progress; new submissions are refused.
    Draining,
    /// All workers joined; the group is finished.
    Closed,
}

/// Worker bookkeeping guarded by the group mutex.
struct Inner {
    state: GroupState,
    workers: JoinSet<Result<(), TaskError>>,
}

/// State shared by the group and its handles.
pub(crate) struct Shared {
    inner: Mutex<Inner>,
    params: WorkerParams,
    /// Parent of every worker token.
    token: CancellationToken,
}

impl Shared {
    pub(crate) fn new(params: WorkerParams, token: CancellationToken) -> Self {
        Self {
            inner: Mutex::new(Inner {
                state: GroupState::Open,
                workers: JoinSet::new(),
            }),
            params,
            token,
        }
    }

    /// Locks the bookkeeping. Worker panics never happen under this lock, so a
    /// poisoned mutex still holds consistent data.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub(crate) fn state(&self) -> GroupState {
        self.lock().state
    }

    pub(crate) fn len(&self) -> usize {
        self.lock().workers.len()
    }

    /// Spawns a worker if the group is still open.
    pub(crate) fn try_go<F, Fut>(&self, name: Arc<str>, f: F) -> Result<(), SubmitError>
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        let mut inner = self.lock();
        if inner.state != GroupState::Open {
            return Err(SubmitError::Closed);
        }

        let ctx = self.token.child_token();
        // `f` is called on first poll, so a panic while building the future is caught too.
        let fut: BoxTaskFuture = Box::pin(async move { f(ctx).await });

        debug!(task = %name, "worker submitted");
        inner
            .workers
            .spawn(run_worker(name, fut, self.params.clone()));
        Ok(())
    }

    /// Moves to `Draining` and hands the workers over to the caller.
    fn drain(&self) -> JoinSet<Result<(), TaskError>> {
        let mut inner = self.lock();
        inner.state = GroupState::Draining;
        std::mem::replace(&mut inner.workers, JoinSet::new())
    }

    /// Moves to `Closed`, aborting anything still owned by the group.
    fn close(&self) {
        let orphaned = {
            let mut inner = self.lock();
            inner.state = GroupState::Closed;
            std::mem::replace(&mut inner.workers, JoinSet::new())
        };
        // Dropping a JoinSet aborts its tasks.
        drop(orphaned);
    }
}

/// Supervised group of concurrent workers.
///
/// # Example
/// ```rust
/// use tokio_util::sync::CancellationToken;
/// use taskguard::{TaskError, TaskGroup};
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let group = TaskGroup::new(|task: &str, err: &TaskError| {
///         eprintln!("worker {task} crashed: {err}");
///     });
///
///     group.go("ok", |_ctx: CancellationToken| async { Ok(()) });
///     group.go("bad", |_ctx: CancellationToken| async { Err(TaskError::fail("fB")) });
///
///     assert_eq!(group.wait().await, Err(TaskError::fail("fB")));
/// }
/// ```
pub struct TaskGroup {
    shared: Arc<Shared>,
}

impl TaskGroup {
    /// Creates an empty, unbounded group reporting panics to `handler`.
    pub fn new(handler: impl FaultHandler) -> Self {
        Self::builder().with_handler(handler).build()
    }

    /// Creates an empty group with explicit configuration.
    pub fn with_config(cfg: GroupConfig, handler: impl FaultHandler) -> Self {
        Self::builder().with_config(cfg).with_handler(handler).build()
    }

    /// Returns a builder for fine-grained construction.
    pub fn builder() -> TaskGroupBuilder {
        TaskGroupBuilder::new()
    }

    pub(crate) fn from_shared(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Spawns a worker running one execution of `task`.
    ///
    /// # Panics
    /// If called outside a tokio runtime.
    pub fn submit(&self, task: TaskRef) {
        let name: Arc<str> = Arc::from(task.name());
        self.go(name, move |ctx| task.spawn(ctx));
    }

    /// Spawns a worker running `f` once.
    ///
    /// `f` receives a child of the group token and should return promptly once it is
    /// cancelled.
    ///
    /// # Panics
    /// If called outside a tokio runtime.
    pub fn go<F, Fut>(&self, name: impl Into<Arc<str>>, f: F)
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        let name: Arc<str> = name.into();
        if let Err(e) = self.shared.try_go(Arc::clone(&name), f) {
            warn!(task = %name, error = %e, "worker not spawned");
        }
    }

    /// Returns a cloneable handle that can submit workers from other tasks.
    pub fn handle(&self) -> GroupHandle {
        GroupHandle::new(Arc::clone(&self.shared))
    }

    /// Current lifecycle state.
    pub fn state(&self) -> GroupState {
        self.shared.state()
    }

    /// Number of submitted workers not yet joined.
    pub fn len(&self) -> usize {
        self.shared.len()
    }

    /// True if no worker is in flight.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Waits for every worker to terminate and returns the first failure observed.
    ///
    /// Workers are joined in completion order; the earliest completed failure wins.
    /// Later failures are logged at `debug` and discarded. Returns `Ok(())` when no
    /// worker failed, including for an empty group.
    pub async fn wait(self) -> Result<(), TaskError> {
        let mut workers = self.shared.drain();
        let mut first: Option<TaskError> = None;

        while let Some(joined) = workers.join_next().await {
            let res = joined.unwrap_or_else(|e| Err(from_join_error(e)));
            if let Err(e) = res {
                if first.is_none() {
                    first = Some(e);
                } else {
                    debug!(error = %e, "additional worker failure");
                }
            }
        }

        self.shared.close();
        match first {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl Drop for TaskGroup {
    fn drop(&mut self) {
        self.shared.close();
    }
}
