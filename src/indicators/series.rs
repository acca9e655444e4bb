use crate::config::IndicatorParams;
use crate::indicators::momentum::rsi_series;
use crate::indicators::trend::{heikin_ashi, sma_series};
use crate::models::indicators::{Candle, IndicatorSeries};

/// Compute every derived series for a candle sequence in one pass over closes.
pub fn compute_series(candles: &[Candle], params: &IndicatorParams) -> IndicatorSeries {
    let closes: Vec<f64> = candles.iter().map(|c| c.close).collect();

    IndicatorSeries {
        sma_fast: sma_series(&closes, params.fast_window),
        sma_slow: sma_series(&closes, params.slow_window),
        rsi: rsi_series(&closes, params.rsi_period),
        heikin_ashi: heikin_ashi(candles),
    }
}
