//! # Example: panicking_worker
//!
//! Shows how a [`TaskGroup`] survives a worker panic: the panic is intercepted,
//! reported to the fault handler as `panic: <message>`, and returned by `wait`
//! while the sibling workers run to completion.
//!
//! ## Run
//! ```bash
//! cargo run --example panicking_worker
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use taskguard::{FaultHandler, GroupConfig, TaskError, TaskGroup};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{EnvFilter, fmt};

/// Counts faults and prints them, standing in for an alerting hook.
struct Alerts {
    fired: Arc<AtomicUsize>,
}

#[async_trait]
impl FaultHandler for Alerts {
    async fn on_fault(&self, task: &str, err: &TaskError) {
        let n = self.fired.fetch_add(1, Ordering::SeqCst) + 1;
        println!("[alert #{n}] worker={task} {err}");
    }

    fn name(&self) -> &'static str {
        "alerts"
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let fired = Arc::new(AtomicUsize::new(0));
    let alerts = Alerts {
        fired: Arc::clone(&fired),
    };
    let cfg = GroupConfig {
        max_concurrent: 2,
        ..GroupConfig::default()
    };
    let group = TaskGroup::with_config(cfg, alerts);

    for i in 0..4u64 {
        group.go(format!("worker-{i}"), move |ctx: CancellationToken| async move {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_millis(100 * (i + 1))) => {}
                _ = ctx.cancelled() => return Err(TaskError::Canceled),
            }
            if i == 2 {
                let slots: Vec<u64> = Vec::new();
                println!("[worker-{i}] reading slot {}", slots[i as usize]);
            }
            println!("[worker-{i}] done");
            Ok(())
        });
    }

    let res = group.wait().await;
    println!(
        "[main] wait returned {res:?}; alerts fired: {}",
        fired.load(Ordering::SeqCst)
    );
    Ok(())
}
