//! Cron-based scheduler driving the evaluation cycle

use std::str::FromStr;
use std::sync::Arc;

use cron::Schedule;
use thiserror::Error;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::core::runtime::AlertRuntime;

#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("scheduler disabled: interval is 0")]
    Disabled,
    #[error("unsupported interval of {0} minutes: use a divisor of 60, or whole hours dividing 24")]
    UnsupportedInterval(u64),
    #[error("invalid cron expression '{expr}': {reason}")]
    InvalidCron { expr: String, reason: String },
}

/// Cron expression (second minute hour day month weekday) firing every
/// `interval_minutes`.
///
/// A `*/n` step restarts at every hour or day boundary, so only intervals that
/// divide the hour (or whole hours dividing the day) tick evenly.
pub fn cron_expression(interval_minutes: u64) -> Result<String, SchedulerError> {
    match interval_minutes {
        0 => Err(SchedulerError::Disabled),
        m if m < 60 && 60 % m == 0 => Ok(format!("0 */{} * * * *", m)),
        1440 => Ok("0 0 0 * * *".to_string()),
        m if m % 60 == 0 && 24 % (m / 60) == 0 => Ok(format!("0 0 */{} * * *", m / 60)),
        m => Err(SchedulerError::UnsupportedInterval(m)),
    }
}

/// Periodically triggers [`AlertRuntime::try_run_evaluation_cycle`].
///
/// A tick that finds a cycle still in flight is skipped rather than queued.
pub struct JobScheduler {
    runtime: Arc<AlertRuntime>,
    schedule: Schedule,
    interval_minutes: u64,
    handle: Arc<RwLock<Option<JoinHandle<()>>>>,
}

impl JobScheduler {
    pub fn new(runtime: Arc<AlertRuntime>, interval_minutes: u64) -> Result<Self, SchedulerError> {
        let expr = cron_expression(interval_minutes)?;
        let schedule = Schedule::from_str(&expr).map_err(|e| SchedulerError::InvalidCron {
            expr: expr.clone(),
            reason: e.to_string(),
        })?;

        info!(
            interval_minutes = interval_minutes,
            cron = %expr,
            "JobScheduler: created with interval {}m (cron: {})",
            interval_minutes,
            expr
        );

        Ok(Self {
            runtime,
            schedule,
            interval_minutes,
            handle: Arc::new(RwLock::new(None)),
        })
    }

    pub fn interval_minutes(&self) -> u64 {
        self.interval_minutes
    }

    /// Start ticking. Calling `start` on a running scheduler is a no-op.
    pub async fn start(&self) {
        let mut slot = self.handle.write().await;
        if slot.is_some() {
            warn!("JobScheduler: already running");
            return;
        }

        let runtime = self.runtime.clone();
        let schedule = self.schedule.clone();

        let handle = tokio::spawn(async move {
            info!("JobScheduler: started, waiting for cron schedule...");

            loop {
                let Some(next_tick) = schedule.upcoming(chrono::Utc).next() else {
                    tokio::time::sleep(tokio::time::Duration::from_secs(60)).await;
                    continue;
                };
                let now = chrono::Utc::now();
                if next_tick > now {
                    let duration = (next_tick - now).to_std().unwrap_or_default();
                    tokio::time::sleep(duration).await;
                }

                // A separate task keeps a panicking cycle from killing this loop,
                // and lets an in-flight cycle finish if the scheduler is stopped.
                let runtime = runtime.clone();
                let tick = tokio::spawn(async move { runtime.try_run_evaluation_cycle().await });
                match tick.await {
                    Ok(Some(_)) => {}
                    Ok(None) => {
                        warn!("JobScheduler: previous cycle still running, skipping tick");
                    }
                    Err(e) => {
                        error!(error = %e, "JobScheduler: evaluation task aborted");
                    }
                }
            }
        });

        *slot = Some(handle);
        info!("JobScheduler: started successfully");
    }

    /// Stop the scheduler
    pub async fn stop(&self) {
        let mut handle = self.handle.write().await;
        if let Some(h) = handle.take() {
            h.abort();
            info!("JobScheduler: stopped");
        }
    }

    /// Check if the scheduler is running
    pub async fn is_running(&self) -> bool {
        let handle = self.handle.read().await;
        handle.is_some()
    }
}
