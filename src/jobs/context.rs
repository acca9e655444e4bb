//! Job context for dependency injection

use std::sync::Arc;
use std::time::Duration;

use crate::config::{AppConfig, PartialCyclePolicy};
use crate::db::StateStore;
use crate::metrics::Metrics;
use crate::services::market_data::CandleSource;
use crate::services::notifier::Notifier;
use crate::signals::decision::AlertFormatter;
use crate::signals::engine::SnapshotEngine;

/// Candle interval every cycle evaluates.
pub const CANDLE_INTERVAL: &str = "1h";

#[derive(Debug, Clone)]
pub struct CycleSettings {
    /// Tracked coins in alert order.
    pub coins: Vec<String>,
    pub interval: String,
    pub candle_limit: usize,
    /// Pause between consecutive candle fetches.
    pub fetch_delay: Duration,
    pub partial_cycle_policy: PartialCyclePolicy,
}

impl CycleSettings {
    pub fn new(coins: Vec<String>) -> Self {
        Self {
            coins,
            interval: CANDLE_INTERVAL.to_string(),
            candle_limit: 500,
            fetch_delay: Duration::from_millis(250),
            partial_cycle_policy: PartialCyclePolicy::Proceed,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            coins: config.coins.clone(),
            interval: CANDLE_INTERVAL.to_string(),
            candle_limit: config.candle_limit,
            fetch_delay: config.fetch_delay,
            partial_cycle_policy: config.partial_cycle_policy,
        }
    }
}

/// Everything one evaluation cycle reads from or writes to.
///
/// The cycle owns the state store exclusively while it runs; the runtime
/// guarantees that at most one cycle holds a context at a time.
pub struct JobContext {
    pub data_provider: Arc<dyn CandleSource>,
    pub notifier: Arc<dyn Notifier>,
    pub store: Arc<dyn StateStore>,
    pub metrics: Option<Arc<Metrics>>,
    pub engine: SnapshotEngine,
    pub formatter: AlertFormatter,
    pub settings: CycleSettings,
}

impl JobContext {
    pub fn new(
        data_provider: Arc<dyn CandleSource>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn StateStore>,
        engine: SnapshotEngine,
        settings: CycleSettings,
    ) -> Self {
        let formatter = AlertFormatter::new(
            engine.direction(),
            *engine.params(),
            data_provider.name(),
        );
        Self {
            data_provider,
            notifier,
            store,
            metrics: None,
            engine,
            formatter,
            settings,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Send through the notifier and count the result.
    pub async fn notify(&self, text: &str) -> bool {
        let delivered = self.notifier.send(text).await;
        if let Some(ref metrics) = self.metrics {
            metrics.record_notification(delivered);
        }
        delivered
    }
}
