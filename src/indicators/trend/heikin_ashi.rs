//! Heikin-Ashi candles

use crate::models::indicators::{Candle, HeikinAshiCandle};

/// Convert raw candles into Heikin-Ashi candles.
///
/// close = (O + H + L + C) / 4
/// open  = (O₀ + C₀) / 2 for the first bar, then (prev HA open + prev HA close) / 2
/// high  = max(H, HA open, HA close)
/// low   = min(L, HA open, HA close)
///
/// Each open depends on the previous bar, so this is a left-to-right fold.
pub fn heikin_ashi(candles: &[Candle]) -> Vec<HeikinAshiCandle> {
    let mut result: Vec<HeikinAshiCandle> = Vec::with_capacity(candles.len());
    let mut previous: Option<HeikinAshiCandle> = None;

    for candle in candles {
        let close = (candle.open + candle.high + candle.low + candle.close) / 4.0;
        let open = match previous {
            Some(prev) => (prev.open + prev.close) / 2.0,
            None => (candle.open + candle.close) / 2.0,
        };
        let ha = HeikinAshiCandle {
            open,
            high: candle.high.max(open).max(close),
            low: candle.low.min(open).min(close),
            close,
        };
        result.push(ha);
        previous = Some(ha);
    }

    result
}
