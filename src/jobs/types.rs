//! Cycle results and errors

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::db::StateStoreError;
use crate::services::market_data::MarketDataError;
use crate::signals::decision::{ChangeDecision, CoinSet};

#[derive(Debug, Error)]
pub enum CycleError {
    #[error("failed to load exchange symbols: {0}")]
    Universe(#[source] MarketDataError),
    #[error("candle fetch failed for {symbol}: {source}")]
    SymbolFetch {
        symbol: String,
        #[source]
        source: MarketDataError,
    },
    #[error(transparent)]
    State(#[from] StateStoreError),
}

/// Summary of a cycle that ran to completion.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub started_at: DateTime<Utc>,
    /// Coins whose candles were fetched and evaluated.
    pub checked: usize,
    /// Coins not listed on the exchange or with no candles.
    pub skipped: Vec<String>,
    /// Coins whose fetch errored.
    pub failed: Vec<String>,
    pub qualifying: CoinSet,
    pub alert_lines: Vec<String>,
    pub qualifying_change: ChangeDecision,
    pub universe_change: ChangeDecision,
    /// Whether the change summary reached the notifier successfully.
    pub change_notified: bool,
}

#[derive(Debug, Clone)]
pub enum CycleOutcome {
    Completed(CycleReport),
    Failed { error: String },
}

impl CycleOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, CycleOutcome::Completed(_))
    }

    pub fn summary(&self) -> String {
        match self {
            CycleOutcome::Completed(report) => format!(
                "{} coins checked, {} qualifying, {} skipped, {} failed",
                report.checked,
                report.qualifying.len(),
                report.skipped.len(),
                report.failed.len()
            ),
            CycleOutcome::Failed { error } => format!("failed: {}", error),
        }
    }
}

/// Last outcome as shown on the status page.
#[derive(Debug, Clone)]
pub struct CycleStatus {
    pub finished_at: DateTime<Utc>,
    pub outcome: CycleOutcome,
}
