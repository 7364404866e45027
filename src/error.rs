//! Error types used by the retry executor and task groups.
//!
//! This module defines three error enums:
//!
//! - [`TaskError`] - errors raised by individual workers of a [`TaskGroup`](crate::TaskGroup).
//! - [`RetryError`] - the terminal outcome of [`Retry::run`](crate::Retry::run) once every attempt failed.
//! - [`SubmitError`] - a submission through a [`GroupHandle`](crate::GroupHandle) was refused.
//!
//! [`TaskError`] and [`RetryError`] provide helper methods (`as_label`, `as_message`)
//! for logging/metrics.

use std::fmt;

use thiserror::Error;

/// # Errors produced by worker execution.
///
/// A worker either returns one of these itself (`Fail`, `Canceled`) or the group
/// synthesizes one for it (`Panicked`) when the worker panicked.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    /// Worker execution failed.
    #[error("execution failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Worker observed cancellation and gave up.
    #[error("context cancelled")]
    Canceled,

    /// Worker panicked; the panic was intercepted at the worker boundary.
    ///
    /// The `panic: ` prefix of the display form is stable and may be matched by log processors.
    #[error("panic: {payload}")]
    Panicked {
        /// The panic payload rendered as text.
        payload: String,
    },
}

impl TaskError {
    /// Shorthand for [`TaskError::Fail`].
    ///
    /// # Example
    /// ```
    /// use taskguard::TaskError;
    ///
    /// let err = TaskError::fail("boom");
    /// assert_eq!(err.to_string(), "execution failed: boom");
    /// ```
    pub fn fail(error: impl Into<String>) -> Self {
        TaskError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use taskguard::TaskError;
    ///
    /// let err = TaskError::Panicked { payload: "nil deref".into() };
    /// assert_eq!(err.as_label(), "task_panicked");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fail { .. } => "task_failed",
            TaskError::Canceled => "task_canceled",
            TaskError::Panicked { .. } => "task_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            TaskError::Fail { error } => format!("error: {error}"),
            TaskError::Canceled => "context cancelled".to_string(),
            TaskError::Panicked { payload } => format!("panic: {payload}"),
        }
    }

    /// True if the worker panicked.
    pub fn is_panic(&self) -> bool {
        matches!(self, TaskError::Panicked { .. })
    }
}

impl<E: fmt::Display> From<RetryError<E>> for TaskError {
    /// Lets a worker use `?` on a retried operation.
    fn from(err: RetryError<E>) -> Self {
        TaskError::Fail {
            error: err.to_string(),
        }
    }
}

/// # Terminal outcome of a retried operation.
///
/// Returned by [`Retry::run`](crate::Retry::run) only after the attempt budget is spent.
/// Transient failures never surface on their own, so receiving this value always means
/// "gave up", as opposed to an error returned by a single un-retried call.
///
/// # Example
/// ```
/// use taskguard::RetryError;
///
/// let err = RetryError::Exhausted { attempts: 3, last: "boom" };
/// assert_eq!(err.to_string(), "operation failed permanently after 3 attempts: boom");
/// assert_eq!(err.attempts(), 3);
/// assert_eq!(*err.last(), "boom");
/// ```
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetryError<E> {
    /// Every attempt failed.
    #[error("operation failed permanently after {attempts} attempts: {last}")]
    Exhausted {
        /// Number of attempts made (equals the configured maximum).
        attempts: u32,
        /// Failure returned by the final attempt.
        last: E,
    },
}

impl<E> RetryError<E> {
    /// Number of attempts made before giving up.
    pub fn attempts(&self) -> u32 {
        match self {
            RetryError::Exhausted { attempts, .. } => *attempts,
        }
    }

    /// Failure returned by the final attempt.
    pub fn last(&self) -> &E {
        match self {
            RetryError::Exhausted { last, .. } => last,
        }
    }

    /// Consumes the record and returns the final failure.
    pub fn into_last(self) -> E {
        match self {
            RetryError::Exhausted { last, .. } => last,
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RetryError::Exhausted { .. } => "retry_exhausted",
        }
    }
}

impl<E: fmt::Display> RetryError<E> {
    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RetryError::Exhausted { attempts, last } => {
                format!("exhausted after {attempts} attempts; last={last}")
            }
        }
    }
}

/// Error returned by [`GroupHandle::submit`](crate::GroupHandle::submit).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitError {
    /// The group is draining or closed; it no longer accepts workers.
    #[error("task group closed")]
    Closed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_display_has_stable_prefix() {
        let err = TaskError::Panicked {
            payload: "nil deref".into(),
        };
        assert_eq!(err.to_string(), "panic: nil deref");
        assert!(err.is_panic());
    }

    #[test]
    fn retry_error_converts_into_task_error() {
        let err = RetryError::Exhausted {
            attempts: 2,
            last: TaskError::fail("refused"),
        };
        let task_err: TaskError = err.into();
        assert_eq!(
            task_err,
            TaskError::fail("operation failed permanently after 2 attempts: execution failed: refused")
        );
    }

    #[test]
    fn into_last_returns_final_failure() {
        let err = RetryError::Exhausted {
            attempts: 5,
            last: String::from("e5"),
        };
        assert_eq!(err.as_label(), "retry_exhausted");
        assert_eq!(err.as_message(), "exhausted after 5 attempts; last=e5");
        assert_eq!(err.into_last(), "e5");
    }
}
