//! Single-slot runner around the evaluation cycle

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use chrono::Utc;
use tokio::sync::{Mutex, RwLock};
use tracing::{error, info};

use crate::jobs::context::JobContext;
use crate::jobs::cycle::run_cycle;
use crate::jobs::types::{CycleOutcome, CycleStatus};
use crate::signals::decision::failure_message;

/// Owns the job context and guarantees that at most one cycle runs at a time,
/// whether triggered by the scheduler or on demand.
pub struct AlertRuntime {
    context: JobContext,
    cycle_lock: Mutex<()>,
    running: AtomicBool,
    last_status: RwLock<Option<CycleStatus>>,
}

/// Clears the running flag when the cycle ends, including by panic.
struct RunningGuard<'a>(&'a AtomicBool);

impl<'a> RunningGuard<'a> {
    fn set(flag: &'a AtomicBool) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self(flag)
    }
}

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl AlertRuntime {
    pub fn new(context: JobContext) -> Self {
        Self {
            context,
            cycle_lock: Mutex::new(()),
            running: AtomicBool::new(false),
            last_status: RwLock::new(None),
        }
    }

    pub fn context(&self) -> &JobContext {
        &self.context
    }

    /// Run one cycle, waiting for any cycle already in flight to finish first.
    /// Never fails: errors are logged, reported through the notifier and
    /// returned as [`CycleOutcome::Failed`].
    pub async fn run_evaluation_cycle(&self) -> CycleOutcome {
        let _guard = self.cycle_lock.lock().await;
        self.run_locked().await
    }

    /// Like [`Self::run_evaluation_cycle`] but returns `None` immediately when
    /// another cycle holds the slot.
    pub async fn try_run_evaluation_cycle(&self) -> Option<CycleOutcome> {
        let _guard = self.cycle_lock.try_lock().ok()?;
        Some(self.run_locked().await)
    }

    /// Read-only check; never contends for the cycle slot.
    pub fn is_cycle_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub async fn last_status(&self) -> Option<CycleStatus> {
        self.last_status.read().await.clone()
    }

    async fn run_locked(&self) -> CycleOutcome {
        let _running = RunningGuard::set(&self.running);
        let start = Instant::now();

        let outcome = match run_cycle(&self.context).await {
            Ok(report) => CycleOutcome::Completed(report),
            Err(e) => {
                error!(error = %e, "AlertRuntime: evaluation cycle failed");
                self.context.notify(&failure_message(&e.to_string())).await;
                CycleOutcome::Failed {
                    error: e.to_string(),
                }
            }
        };

        let elapsed = start.elapsed();
        if let Some(ref metrics) = self.context.metrics {
            metrics.evaluation_cycles_total.inc();
            if !outcome.is_completed() {
                metrics.evaluation_cycle_failures_total.inc();
            }
            metrics
                .evaluation_cycle_duration_seconds
                .observe(elapsed.as_secs_f64());
        }
        info!(
            duration_ms = elapsed.as_millis() as u64,
            "AlertRuntime: cycle finished ({})",
            outcome.summary()
        );

        *self.last_status.write().await = Some(CycleStatus {
            finished_at: Utc::now(),
            outcome: outcome.clone(),
        });
        outcome
    }
}
