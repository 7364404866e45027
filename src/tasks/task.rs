//! # Task abstraction.
//!
//! A [`Task`] is a named factory of worker futures. Each call to [`Task::spawn`] produces
//! a fresh future that receives a [`CancellationToken`] and should check it to stop
//! cooperatively.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::TaskError;

/// Boxed future returned by [`Task::spawn`].
pub type BoxTaskFuture = Pin<Box<dyn Future<Output = Result<(), TaskError>> + Send + 'static>>;

/// Shared handle to a task (`Arc<dyn Task>`).
pub type TaskRef = Arc<dyn Task>;

/// # Named, cancelable unit of work.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use taskguard::{BoxTaskFuture, Task, TaskError};
///
/// struct Ping;
///
/// impl Task for Ping {
///     fn name(&self) -> &str { "ping" }
///
///     fn spawn(&self, ctx: CancellationToken) -> BoxTaskFuture {
///         Box::pin(async move {
///             if ctx.is_cancelled() {
///                 return Err(TaskError::Canceled);
///             }
///             Ok(())
///         })
///     }
/// }
/// ```
pub trait Task: Send + Sync + 'static {
    /// Returns a stable, human-readable task name.
    fn name(&self) -> &str;

    /// Creates a new future for one execution of this task.
    fn spawn(&self, ctx: CancellationToken) -> BoxTaskFuture;
}
