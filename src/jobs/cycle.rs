//! One evaluation cycle.
//!
//! FETCH_UNIVERSE → per symbol {FETCH_CANDLES → COMPUTE → CLASSIFY}
//! → DIFF_AND_NOTIFY → PERSIST

use chrono::Utc;
use tracing::{debug, error, info, warn};

use crate::config::PartialCyclePolicy;
use crate::db::StateKey;
use crate::jobs::context::JobContext;
use crate::jobs::types::{CycleError, CycleReport};
use crate::models::alert::{AlertLogEntry, SymbolSnapshot};
use crate::signals::decision::{decide, qualifying_set, universe_message, ChangeDecision, CoinSet};

/// Runs the pipeline once. Per-symbol problems are logged and skipped unless
/// the context's policy says to abort; anything else comes back as an error
/// before state is persisted.
pub async fn run_cycle(ctx: &JobContext) -> Result<CycleReport, CycleError> {
    let started_at = Utc::now();
    let settings = &ctx.settings;
    info!(coins = settings.coins.len(), "Cycle: checking {} coins", settings.coins.len());

    let available = ctx
        .data_provider
        .list_available_symbols()
        .await
        .map_err(CycleError::Universe)?;

    let mut snapshots: Vec<SymbolSnapshot> = Vec::new();
    let mut skipped = Vec::new();
    let mut failed = Vec::new();
    let mut fetched_any = false;

    for coin in &settings.coins {
        let symbol = ctx.data_provider.market_symbol(coin);
        if !available.contains(&symbol) {
            warn!(coin = %coin, symbol = %symbol, "Cycle: {} not listed on {}", symbol, ctx.data_provider.name());
            skipped.push(coin.clone());
            continue;
        }

        if fetched_any && !settings.fetch_delay.is_zero() {
            tokio::time::sleep(settings.fetch_delay).await;
        }
        fetched_any = true;

        let candles = match ctx
            .data_provider
            .fetch_ohlcv(&symbol, &settings.interval, settings.candle_limit)
            .await
        {
            Ok(candles) => candles,
            Err(e) => {
                warn!(coin = %coin, symbol = %symbol, error = %e, "Cycle: failed to fetch candles for {}", symbol);
                if settings.partial_cycle_policy == PartialCyclePolicy::Abort {
                    return Err(CycleError::SymbolFetch { symbol, source: e });
                }
                failed.push(coin.clone());
                continue;
            }
        };

        match ctx.engine.evaluate(coin, &candles) {
            Some(snapshot) => {
                if snapshot.qualifies {
                    info!(
                        coin = %coin,
                        streak = snapshot.ma_streak.length,
                        "Cycle: {} meets MA condition for {}h",
                        coin,
                        snapshot.ma_streak.length
                    );
                }
                snapshots.push(snapshot);
            }
            None => {
                warn!(coin = %coin, symbol = %symbol, "Cycle: no candles returned for {}", symbol);
                skipped.push(coin.clone());
            }
        }
    }

    let qualifying = qualifying_set(&snapshots);
    let alert_lines: Vec<String> = snapshots
        .iter()
        .filter(|s| s.qualifies)
        .map(|s| ctx.formatter.alert_line(s))
        .collect();

    if let Some(ref metrics) = ctx.metrics {
        metrics
            .symbols_skipped_total
            .inc_by((skipped.len() + failed.len()) as u64);
        metrics.qualifying_symbols.set(qualifying.len() as f64);
    }
    info!(
        checked = snapshots.len(),
        qualifying = qualifying.len(),
        skipped = skipped.len(),
        failed = failed.len(),
        "Cycle: {} coins checked, {} qualifying",
        snapshots.len(),
        qualifying.len()
    );

    let previous = ctx.store.load(StateKey::QualifyingCoins).await?;
    let qualifying_change = decide(&previous, &qualifying);
    let mut change_notified = false;
    match &qualifying_change {
        ChangeDecision::Changed(diff) => {
            info!(added = ?diff.added, removed = ?diff.removed, "Cycle: qualifying set changed");
            let message = ctx
                .formatter
                .change_message(diff, qualifying.len(), &alert_lines);
            change_notified = ctx.notify(&message).await;
        }
        ChangeDecision::Bootstrap => {
            info!(count = qualifying.len(), "Cycle: previous qualifying set empty, recording silently");
        }
        ChangeDecision::Unchanged => {
            debug!("Cycle: qualifying set unchanged");
        }
    }

    let universe: CoinSet = settings.coins.iter().cloned().collect();
    let previous_universe = ctx.store.load(StateKey::CoinUniverse).await?;
    let universe_change = decide(&previous_universe, &universe);
    if let ChangeDecision::Changed(diff) = &universe_change {
        info!(added = ?diff.added, removed = ?diff.removed, "Cycle: coin list changed");
        ctx.notify(&universe_message(diff, universe.len())).await;
    }

    ctx.store.save(StateKey::QualifyingCoins, &qualifying).await?;
    // Notifications are already out; a stale universe only repeats the
    // coin list message next cycle.
    if let Err(e) = ctx.store.save(StateKey::CoinUniverse, &universe).await {
        error!(error = %e, "Cycle: failed to save coin list");
    }

    if change_notified {
        let now = Utc::now();
        let entries: Vec<AlertLogEntry> = alert_lines
            .iter()
            .map(|line| AlertLogEntry::new(now, line.clone()))
            .collect();
        if let Err(e) = ctx.store.append_alerts(&entries).await {
            error!(error = %e, "Cycle: failed to append alert log");
        }
    }

    Ok(CycleReport {
        started_at,
        checked: snapshots.len(),
        skipped,
        failed,
        qualifying,
        alert_lines,
        qualifying_change,
        universe_change,
        change_notified,
    })
}
