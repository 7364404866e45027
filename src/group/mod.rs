//! Supervised task groups.
//!
//! A [`TaskGroup`] runs workers concurrently, converts worker panics into ordinary
//! failures (notifying a [`FaultHandler`]), and reports the first failure from
//! [`TaskGroup::wait`].
//!
//! Internal modules:
//! - [`worker`]: runs one worker with panic interception and handler notification;
//! - [`task_group`]: bookkeeping, state machine and `wait`;
//! - [`handle`]: fallible submissions from other tasks;
//! - [`builder`]: configuration, tokens and concurrency limit;
//! - [`fault`]: handler trait and the logging handler;
//! - [`panic_trace`]: backtraces recorded at the panic site.

mod builder;
mod fault;
mod handle;
mod panic_trace;
mod task_group;
mod worker;

pub use builder::TaskGroupBuilder;
pub use fault::{FaultHandler, LogFaults};
pub use handle::GroupHandle;
pub use task_group::{GroupState, TaskGroup};
