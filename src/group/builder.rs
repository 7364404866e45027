use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;

use crate::config::GroupConfig;
use crate::group::fault::{FaultHandler, LogFaults};
use crate::group::task_group::{Shared, TaskGroup};
use crate::group::worker::WorkerParams;

/// Builder for constructing a [`TaskGroup`] with optional features.
pub struct TaskGroupBuilder {
    cfg: GroupConfig,
    handler: Option<Arc<dyn FaultHandler>>,
    token: Option<CancellationToken>,
}

impl TaskGroupBuilder {
    /// Creates a builder with default configuration and no handler.
    pub fn new() -> Self {
        Self {
            cfg: GroupConfig::default(),
            handler: None,
            token: None,
        }
    }

    /// Replaces the whole configuration.
    pub fn with_config(mut self, cfg: GroupConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Limits how many workers run at once (`0` = unlimited).
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.cfg.max_concurrent = n;
        self
    }

    /// Cancels the worker tokens when the first worker fails.
    pub fn cancel_on_failure(mut self, enabled: bool) -> Self {
        self.cfg.cancel_on_failure = enabled;
        self
    }

    /// Sets the handler notified of worker panics.
    ///
    /// Defaults to [`LogFaults`].
    pub fn with_handler(mut self, handler: impl FaultHandler) -> Self {
        self.handler = Some(Arc::new(handler));
        self
    }

    /// Derives every worker token from `parent`.
    ///
    /// Cancelling `parent` cancels all workers; the group itself never cancels `parent`.
    pub fn with_token(mut self, parent: CancellationToken) -> Self {
        self.token = Some(parent);
        self
    }

    /// Builds an empty, open group.
    pub fn build(self) -> TaskGroup {
        let token = match self.token {
            Some(parent) => parent.child_token(),
            None => CancellationToken::new(),
        };

        let semaphore = self
            .cfg
            .concurrency_limit()
            .map(Semaphore::new)
            .map(Arc::new);

        let params = WorkerParams {
            handler: self.handler.unwrap_or_else(|| Arc::new(LogFaults)),
            semaphore,
            cancel_on_failure: self.cfg.cancel_on_failure.then(|| token.clone()),
        };

        TaskGroup::from_shared(Arc::new(Shared::new(params, token)))
    }
}

impl Default for TaskGroupBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::TaskError;

    #[tokio::test(start_paused = true)]
    async fn concurrency_limit_is_respected() {
        let running = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));
        let group = TaskGroup::builder().with_max_concurrent(2).build();

        for i in 0..6 {
            let running = Arc::clone(&running);
            let peak = Arc::clone(&peak);
            group.go(format!("w{i}"), move |_ctx| async move {
                let now = running.fetch_add(1, Ordering::SeqCst) + 1;
                peak.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(10)).await;
                running.fetch_sub(1, Ordering::SeqCst);
                Ok(())
            });
        }

        assert_eq!(group.len(), 6);
        assert_eq!(group.wait().await, Ok(()));
        assert_eq!(peak.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn parent_token_reaches_workers() {
        let parent = CancellationToken::new();
        let group = TaskGroup::builder().with_token(parent.clone()).build();

        group.go("waiter", |ctx| async move {
            ctx.cancelled().await;
            Err(TaskError::Canceled)
        });
        parent.cancel();

        assert_eq!(group.wait().await, Err(TaskError::Canceled));
    }

    #[tokio::test]
    async fn first_failure_cancels_siblings_when_enabled() {
        let parent = CancellationToken::new();
        let group = TaskGroup::builder()
            .with_token(parent.clone())
            .cancel_on_failure(true)
            .build();

        group.go("waiter", |ctx| async move {
            ctx.cancelled().await;
            Ok(())
        });
        group.go("failing", |_ctx| async { Err(TaskError::fail("boom")) });

        assert_eq!(group.wait().await, Err(TaskError::fail("boom")));
        assert!(!parent.is_cancelled());
    }

    #[tokio::test(start_paused = true)]
    async fn siblings_keep_running_by_default() {
        let group = TaskGroup::builder().build();

        group.go("sleeper", |ctx| async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            if ctx.is_cancelled() {
                Err(TaskError::Canceled)
            } else {
                Ok(())
            }
        });
        group.go("failing", |_ctx| async { Err(TaskError::fail("boom")) });

        assert_eq!(group.wait().await, Err(TaskError::fail("boom")));
    }
}
