//! # Worker abstractions.
//!
//! - [`Task`] - trait for named, cancelable units of work
//! - [`TaskFn`] - function-backed task implementation
//! - [`TaskRef`] - shared reference to a task (`Arc<dyn Task>`)
//! - [`BoxTaskFuture`] - the future a task produces per spawn

mod task;
mod task_fn;

pub use task::{BoxTaskFuture, Task, TaskRef};
pub use task_fn::TaskFn;
