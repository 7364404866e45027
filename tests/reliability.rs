use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use taskguard::{
    BackoffPolicy, DelayPolicy, Retry, RetryConfig, RetryError, TaskError, TaskFn, TaskGroup,
    TaskRef, retry,
};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Fault handler that records every call.
fn recording_handler() -> (
    Arc<Mutex<Vec<(String, TaskError)>>>,
    impl Fn(&str, &TaskError) + Send + Sync + 'static,
) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let handler = move |task: &str, err: &TaskError| {
        sink.lock().unwrap().push((task.to_string(), err.clone()));
    };
    (seen, handler)
}

#[tokio::test(start_paused = true)]
async fn exhausted_retries_report_count_and_last_failure() {
    let calls = AtomicU32::new(0);
    let res: Result<(), RetryError<&str>> = retry(3, &BackoffPolicy::none(), || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err("boom") }
    })
    .await;

    let err = res.unwrap_err();
    assert_eq!(err.attempts(), 3);
    assert_eq!(*err.last(), "boom");
    assert_eq!(
        err.to_string(),
        "operation failed permanently after 3 attempts: boom"
    );
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn fixed_delay_separates_failure_and_success() {
    let calls = AtomicU32::new(0);
    let retry = Retry::new(5, BackoffPolicy::fixed(Duration::from_millis(100)));

    let start = Instant::now();
    let res: Result<(), RetryError<&str>> = retry
        .run(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            async move { if n == 1 { Err("first") } else { Ok(()) } }
        })
        .await;
    let waited = start.elapsed();

    assert_eq!(res, Ok(()));
    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(waited >= Duration::from_millis(100), "waited {waited:?}");
    assert!(waited < Duration::from_millis(200), "waited {waited:?}");
}

#[tokio::test(start_paused = true)]
async fn single_attempt_success_never_waits() {
    let calls = AtomicU32::new(0);
    let start = Instant::now();

    let res: Result<(), RetryError<&str>> = retry(1, &Duration::from_secs(60), || {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Ok(()) }
    })
    .await;

    assert_eq!(res, Ok(()));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn single_attempt_failure_is_permanent_without_delay() {
    let start = Instant::now();
    let res: Result<(), RetryError<String>> =
        retry(1, &Duration::from_secs(60), || async { Err("nope".to_string()) }).await;

    assert_eq!(
        res,
        Err(RetryError::Exhausted {
            attempts: 1,
            last: "nope".to_string()
        })
    );
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn total_delay_is_sum_of_consulted_policy_values() {
    let policy = BackoffPolicy::exponential(Duration::from_millis(10), 2.0, Duration::from_secs(1));
    let calls = AtomicU32::new(0);

    let start = Instant::now();
    let res: Result<u32, RetryError<&str>> = retry(6, &policy, || {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        async move { if n < 4 { Err("down") } else { Ok(n) } }
    })
    .await;
    let waited = start.elapsed();

    // Succeeds on attempt 4: delays 0..=2 are awaited.
    let expected: Duration = (0..3).map(|i| policy.delay(i)).sum();
    assert_eq!(res, Ok(4));
    assert!(waited >= expected, "waited {waited:?}, expected {expected:?}");
    assert!(waited < expected + Duration::from_millis(5), "waited {waited:?}");
}

#[tokio::test(start_paused = true)]
async fn retry_config_drives_executor() {
    let cfg = RetryConfig {
        max_attempts: 2,
        backoff: BackoffPolicy::none(),
    };
    let res: Result<(), RetryError<&str>> = cfg.retry().run(|| async { Err("x") }).await;
    assert_eq!(res.unwrap_err().attempts(), 2);
}

#[tokio::test]
async fn group_reports_worker_failure_without_calling_handler() {
    let (seen, handler) = recording_handler();
    let group = TaskGroup::new(handler);

    group.go("a", |_ctx| async { Ok(()) });
    group.go("b", |_ctx| async { Err(TaskError::fail("fB")) });
    group.go("c", |_ctx| async { Ok(()) });

    assert_eq!(group.wait().await, Err(TaskError::fail("fB")));
    assert!(seen.lock().unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn group_recovers_panicking_worker() {
    let (seen, handler) = recording_handler();
    let group = TaskGroup::new(handler);

    group.go("a", |_ctx| async {
        let missing: Option<u32> = None;
        if missing.is_none() {
            panic!("nil deref");
        }
        Ok(())
    });
    group.go("b", |_ctx| async { Ok(()) });

    let err = group.wait().await.unwrap_err();
    assert!(err.to_string().starts_with("panic: nil deref"), "got {err}");

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "a");
    assert_eq!(seen[0].1, err);
}

#[tokio::test]
async fn group_with_failure_and_panic_reports_either() {
    let (seen, handler) = recording_handler();
    let group = TaskGroup::new(handler);

    group.go("e1", |_ctx| async { Err(TaskError::fail("e1")) });
    group.go("p2", |_ctx| async {
        let divisor = std::hint::black_box(0_u32);
        let _ = 10 / divisor;
        Ok(())
    });

    let err = group.wait().await.unwrap_err();
    assert!(
        err == TaskError::fail("e1") || err.to_string().starts_with("panic: "),
        "got {err}"
    );

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "p2");
    assert!(seen[0].1.to_string().contains("divide by zero"));
}

#[tokio::test]
async fn every_panic_is_reported_once() {
    let (seen, handler) = recording_handler();
    let group = TaskGroup::new(handler);

    for i in 0..5 {
        group.go(format!("p{i}"), move |_ctx| async move {
            if i % 2 == 0 {
                panic!("worker {i} exploded");
            }
            Ok(())
        });
    }

    let err = group.wait().await.unwrap_err();
    assert!(err.is_panic());

    let mut names: Vec<String> = seen.lock().unwrap().iter().map(|(n, _)| n.clone()).collect();
    names.sort();
    assert_eq!(names, vec!["p0", "p2", "p4"]);
}

#[tokio::test(start_paused = true)]
async fn retried_action_inside_supervised_worker() {
    let group = TaskGroup::new(taskguard::LogFaults);
    let attempts = Arc::new(AtomicU32::new(0));

    let counter = Arc::clone(&attempts);
    let task: TaskRef = TaskFn::arc("fetch", move |ctx: CancellationToken| {
        let counter = Arc::clone(&counter);
        async move {
            let res: Result<(), RetryError<TaskError>> = retry(4, &Duration::from_millis(5), || {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                let cancelled = ctx.is_cancelled();
                async move {
                    if cancelled {
                        Err(TaskError::Canceled)
                    } else if n < 4 {
                        Err(TaskError::fail("unavailable"))
                    } else {
                        Ok(())
                    }
                }
            })
            .await;
            res.map_err(TaskError::from)
        }
    });
    group.submit(task);

    assert_eq!(group.wait().await, Ok(()));
    assert_eq!(attempts.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn exhausted_retry_surfaces_through_group() {
    let group = TaskGroup::new(taskguard::LogFaults);

    group.go("doomed", |_ctx| async {
        let res: Result<(), RetryError<&str>> =
            retry(2, &BackoffPolicy::none(), || async { Err("refused") }).await;
        res.map_err(TaskError::from)
    });

    assert_eq!(
        group.wait().await,
        Err(TaskError::fail(
            "operation failed permanently after 2 attempts: refused"
        ))
    );
}
