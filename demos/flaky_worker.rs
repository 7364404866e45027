//! # Example: flaky_worker
//!
//! Demonstrates how [`Retry`] absorbs transient failures inside a supervised worker.
//!
//! The `flaky` worker fails twice before succeeding; the `doomed` worker never
//! succeeds and exhausts its budget, which is what `wait` reports.
//!
//! ## Flow
//! ```text
//! TaskGroup::go("flaky")
//!   ├─► attempt 1 → Err("boom #1") → sleep(policy.delay(0) ≈ 100ms)
//!   ├─► attempt 2 → Err("boom #2") → sleep(policy.delay(1) ≈ 200ms)
//!   └─► attempt 3 → Ok(())
//! TaskGroup::go("doomed")
//!   └─► 3 attempts → Exhausted → TaskError::Fail
//! wait() → Err("operation failed permanently after 3 attempts: ...")
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=debug cargo run --example flaky_worker
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use taskguard::{BackoffPolicy, JitterPolicy, LogFaults, RetryConfig, TaskError, TaskGroup};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    // 1. Exponential backoff with equal jitter
    let cfg = RetryConfig {
        max_attempts: 3,
        backoff: BackoffPolicy::exponential(Duration::from_millis(100), 2.0, Duration::from_secs(2))
            .with_jitter(JitterPolicy::Equal),
    };

    // 2. Group with the logging fault handler
    let group = TaskGroup::new(LogFaults);

    // 3. Worker that recovers on the third attempt
    let calls = Arc::new(AtomicU32::new(0));
    group.go("flaky", move |ctx: CancellationToken| async move {
        cfg.retry()
            .run(|| {
                let attempt = calls.fetch_add(1, Ordering::SeqCst) + 1;
                let cancelled = ctx.is_cancelled();
                async move {
                    if cancelled {
                        return Err(TaskError::Canceled);
                    }
                    if attempt <= 2 {
                        println!("[flaky] simulated failure #{attempt}");
                        Err(TaskError::fail(format!("boom #{attempt}")))
                    } else {
                        println!("[flaky] success on attempt {attempt}");
                        Ok(())
                    }
                }
            })
            .await
            .map_err(TaskError::from)
    });

    // 4. Worker that never recovers
    group.go("doomed", move |_ctx: CancellationToken| async move {
        cfg.retry()
            .run(|| async { Err::<(), _>("connection refused") })
            .await
            .map_err(TaskError::from)
    });

    // 5. Join everything
    match group.wait().await {
        Ok(()) => println!("[main] all workers succeeded"),
        Err(e) => println!("[main] group failed: {e}"),
    }
    Ok(())
}
