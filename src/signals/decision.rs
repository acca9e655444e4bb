//! Alert decisions: which symbols qualify, whether the qualifying set moved,
//! and the text sent when it did.

use std::collections::BTreeSet;

use crate::config::IndicatorParams;
use crate::models::alert::{SymbolSnapshot, TrendDirection};

pub type CoinSet = BTreeSet<String>;

/// Members gained and lost between two cycles, each sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetDiff {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl SetDiff {
    pub fn between(previous: &CoinSet, current: &CoinSet) -> Self {
        Self {
            added: current.difference(previous).cloned().collect(),
            removed: previous.difference(current).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChangeDecision {
    /// No previous members (first run or an empty record); stay silent and
    /// just record the set.
    Bootstrap,
    Unchanged,
    Changed(SetDiff),
}

impl ChangeDecision {
    pub fn should_notify(&self) -> bool {
        matches!(self, ChangeDecision::Changed(_))
    }
}

/// An empty `previous` set, whether never saved or saved empty, bootstraps.
pub fn decide(previous: &CoinSet, current: &CoinSet) -> ChangeDecision {
    if previous.is_empty() {
        return ChangeDecision::Bootstrap;
    }
    let diff = SetDiff::between(previous, current);
    if diff.is_empty() {
        ChangeDecision::Unchanged
    } else {
        ChangeDecision::Changed(diff)
    }
}

pub fn qualifying_set(snapshots: &[SymbolSnapshot]) -> CoinSet {
    snapshots
        .iter()
        .filter(|s| s.qualifies)
        .map(|s| s.symbol.clone())
        .collect()
}

/// Renders alert text for one configured direction and exchange.
#[derive(Debug, Clone)]
pub struct AlertFormatter {
    direction: TrendDirection,
    params: IndicatorParams,
    exchange: String,
}

impl AlertFormatter {
    pub fn new(direction: TrendDirection, params: IndicatorParams, exchange: impl Into<String>) -> Self {
        Self {
            direction,
            params,
            exchange: exchange.into(),
        }
    }

    /// e.g. `🔻 MA(7) < MA(25) 1H (MEXC):`
    pub fn header(&self) -> String {
        format!(
            "{} MA({}) {} MA({}) 1H ({}):",
            self.direction.emoji(),
            self.params.fast_window,
            self.direction.operator(),
            self.params.slow_window,
            self.exchange
        )
    }

    /// e.g. `BTC (14.10 08:00|12h) RSI:41⚪ HA:3🔴 -1.2%`
    pub fn alert_line(&self, snapshot: &SymbolSnapshot) -> String {
        let streak = &snapshot.ma_streak;
        let mut line = match streak.start_timestamp {
            Some(start) => format!(
                "{} ({}|{}h)",
                snapshot.symbol,
                start.format("%d.%m %H:%M"),
                streak.length
            ),
            None => format!("{} ({}h)", snapshot.symbol, streak.length),
        };

        let rsi = snapshot
            .rsi
            .map(|value| format!("{}{}", value.trunc() as i64, rsi_emoji(value)))
            .unwrap_or_else(|| "-".to_string());
        line.push_str(&format!(
            " RSI:{} HA:{}{}",
            rsi,
            snapshot.ha_streak_length,
            snapshot.ha_streak_color.emoji()
        ));

        if let Some(deviation) = snapshot.deviation_from_fast_pct() {
            line.push_str(&format!(" {:+.1}%", deviation));
        }
        line
    }

    pub fn change_message(&self, diff: &SetDiff, total: usize, alert_lines: &[String]) -> String {
        let mut lines = vec![self.header()];
        lines.extend(diff_lines(diff));
        lines.push(format!("Total: {}", total));
        if !alert_lines.is_empty() {
            lines.push(String::new());
            lines.extend(alert_lines.iter().cloned());
        }
        lines.join("\n")
    }
}

/// 🔴 overbought (>= 70), 🟢 oversold (<= 30), ⚪ otherwise.
pub fn rsi_emoji(rsi: f64) -> &'static str {
    if rsi >= 70.0 {
        "🔴"
    } else if rsi <= 30.0 {
        "🟢"
    } else {
        "⚪"
    }
}

pub fn universe_message(diff: &SetDiff, total: usize) -> String {
    let mut lines = vec!["📋 Coin list changed".to_string()];
    lines.extend(diff_lines(diff));
    lines.push(format!("Total: {}", total));
    lines.join("\n")
}

pub fn failure_message(error: &str) -> String {
    format!("⚠️ Bot error: {}", error)
}

fn diff_lines(diff: &SetDiff) -> Vec<String> {
    let mut lines = Vec::new();
    if !diff.added.is_empty() {
        lines.push(format!("➕ Added: {}", diff.added.join(", ")));
    }
    if !diff.removed.is_empty() {
        lines.push(format!("➖ Removed: {}", diff.removed.join(", ")));
    }
    lines
}
