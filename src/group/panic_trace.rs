//! # Backtraces captured at the panic site.
//!
//! By the time `catch_unwind` returns, the stack of the faulting code is gone. This
//! module chains a process-wide panic hook that records a backtrace into a
//! thread-local slot, but only while a worker future is being polled on that thread.
//! The worker takes the slot right after `catch_unwind` reports the panic; the hook
//! and the catch run on the same thread, inside the same `poll` call.
//!
//! ```text
//! Traced::poll ── enter scope ──► worker.poll() ── panic! ──► hook: slot = Backtrace
//!      ▲                                                          │ previous hook
//!      └── catch_unwind ◄───────── unwind (scope guard drops) ◄───┘
//!             └─► take() → trace of the faulting frames
//! ```

use std::backtrace::Backtrace;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::sync::Once;
use std::task::{Context, Poll};

use crate::error::TaskError;
use crate::tasks::BoxTaskFuture;

thread_local! {
    /// Nesting depth of worker polls on this thread.
    static ACTIVE: Cell<u32> = const { Cell::new(0) };
    /// Backtrace of the most recent worker panic on this thread.
    static LAST_TRACE: RefCell<Option<Backtrace>> = const { RefCell::new(None) };
}

/// Installs the capturing hook, chained in front of whatever hook was set before.
///
/// Idempotent. Hooks installed later by the application replace this one; traces
/// are then simply not captured.
pub(crate) fn install_hook_once() {
    static INSTALLED: Once = Once::new();
    INSTALLED.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            let active = ACTIVE.try_with(Cell::get).unwrap_or(0) > 0;
            if active {
                let _ = LAST_TRACE.try_with(|slot| {
                    *slot.borrow_mut() = Some(Backtrace::force_capture());
                });
            }
            previous(info);
        }));
    });
}

/// Takes the backtrace recorded for the last worker panic on this thread.
pub(crate) fn take() -> Option<Backtrace> {
    LAST_TRACE.try_with(|slot| slot.borrow_mut().take()).ok().flatten()
}

/// Marks the current thread as polling a worker until dropped.
struct Scope;

impl Scope {
    fn enter() -> Self {
        ACTIVE.with(|depth| {
            if depth.get() == 0 {
                // A panic caught inside the worker itself must not leak into a later report.
                LAST_TRACE.with(|slot| slot.borrow_mut().take());
            }
            depth.set(depth.get() + 1);
        });
        Scope
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        let _ = ACTIVE.try_with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// Worker future whose panics leave a backtrace behind for [`take`].
pub(crate) struct Traced {
    inner: BoxTaskFuture,
}

impl Traced {
    pub(crate) fn new(inner: BoxTaskFuture) -> Self {
        Self { inner }
    }
}

impl Future for Traced {
    type Output = Result<(), TaskError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let _scope = Scope::enter();
        self.inner.as_mut().poll(cx)
    }
}
