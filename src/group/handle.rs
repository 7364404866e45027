//! # Cloneable submission handle.
//!
//! [`GroupHandle`] lets workers (or any other task) add siblings to a running
//! [`TaskGroup`](crate::TaskGroup). Unlike the group itself, a handle can outlive
//! `wait`, so its submissions are fallible: once the group is draining or closed they
//! return [`SubmitError::Closed`].

use std::future::Future;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::{SubmitError, TaskError};
use crate::group::task_group::{GroupState, Shared};
use crate::tasks::TaskRef;

/// Cloneable handle for submitting workers to a [`TaskGroup`](crate::TaskGroup).
#[derive(Clone)]
pub struct GroupHandle {
    shared: Arc<Shared>,
}

impl GroupHandle {
    pub(crate) fn new(shared: Arc<Shared>) -> Self {
        Self { shared }
    }

    /// Spawns a worker running one execution of `task`.
    ///
    /// # Errors
    /// [`SubmitError::Closed`] if the group is no longer open.
    pub fn submit(&self, task: TaskRef) -> Result<(), SubmitError> {
        let name: Arc<str> = Arc::from(task.name());
        self.shared.try_go(name, move |ctx| task.spawn(ctx))
    }

    /// Spawns a worker running `f` once.
    ///
    /// # Errors
    /// [`SubmitError::Closed`] if the group is no longer open.
    pub fn go<F, Fut>(&self, name: impl Into<Arc<str>>, f: F) -> Result<(), SubmitError>
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), TaskError>> + Send + 'static,
    {
        self.shared.try_go(name.into(), f)
    }

    /// Current lifecycle state of the group.
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
}
