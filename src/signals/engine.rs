//! Per-symbol evaluation: candles in, snapshot out.

use tracing::debug;

use crate::config::IndicatorParams;
use crate::indicators::compute_series;
use crate::models::alert::{HaColor, SymbolSnapshot, TrendDirection};
use crate::models::indicators::Candle;
use crate::signals::streak::{color_streak, condition_streak};

pub struct SnapshotEngine {
    params: IndicatorParams,
    direction: TrendDirection,
}

impl SnapshotEngine {
    pub fn new(params: IndicatorParams, direction: TrendDirection) -> Self {
        Self { params, direction }
    }

    pub fn direction(&self) -> TrendDirection {
        self.direction
    }

    pub fn params(&self) -> &IndicatorParams {
        &self.params
    }

    /// Returns `None` only for an empty candle sequence.
    pub fn evaluate(&self, symbol: &str, candles: &[Candle]) -> Option<SymbolSnapshot> {
        let last = candles.last()?;
        let series = compute_series(candles, &self.params);

        let conditions: Vec<bool> = series
            .sma_fast
            .iter()
            .zip(&series.sma_slow)
            .map(|(fast, slow)| self.direction.holds(*fast, *slow))
            .collect();
        let timestamps: Vec<_> = candles.iter().map(|c| c.timestamp).collect();
        let ma_streak = condition_streak(&conditions, &timestamps);

        let (ha_streak_color, ha_streak_length) =
            color_streak(&series.heikin_ashi).unwrap_or((HaColor::Red, 0));

        let sma_fast = series.last_sma_fast();
        let sma_slow = series.last_sma_slow();
        let snapshot = SymbolSnapshot {
            symbol: symbol.to_string(),
            price: last.close,
            sma_fast,
            sma_slow,
            rsi: series.last_rsi(),
            qualifies: self.direction.holds(sma_fast, sma_slow),
            ma_streak,
            ha_streak_length,
            ha_streak_color,
        };

        debug!(
            symbol = %symbol,
            candles = candles.len(),
            price = snapshot.price,
            sma_fast = ?snapshot.sma_fast,
            sma_slow = ?snapshot.sma_slow,
            rsi = ?snapshot.rsi,
            streak = snapshot.ma_streak.length,
            qualifies = snapshot.qualifies,
            "SnapshotEngine: evaluated {}",
            symbol
        );

        Some(snapshot)
    }
}
