//! RSI (Relative Strength Index) indicator

use crate::indicators::trend::sma_series;

/// RSI value reported when the window saw neither gains nor losses.
pub const FLAT_RSI: f64 = 50.0;

/// RSI series over closes, aligned with the input.
///
/// RSI = 100 - (100 / (1 + RS)), RS = SMA(gain) / SMA(loss)
///
/// Deltas start at index 1, so `result[i]` is defined only for `i >= period`.
/// A window with no losses reports 100; a window with no movement at all
/// reports [`FLAT_RSI`].
pub fn rsi_series(closes: &[f64], period: usize) -> Vec<Option<f64>> {
    if closes.len() < 2 || period == 0 {
        return vec![None; closes.len()];
    }

    let mut gains = Vec::with_capacity(closes.len() - 1);
    let mut losses = Vec::with_capacity(closes.len() - 1);
    for pair in closes.windows(2) {
        let change = pair[1] - pair[0];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let avg_gains = sma_series(&gains, period);
    let avg_losses = sma_series(&losses, period);

    // delta index j corresponds to close index j + 1
    std::iter::once(None)
        .chain(
            avg_gains
                .into_iter()
                .zip(avg_losses)
                .map(|(gain, loss)| Some(rsi_from_averages(gain?, loss?))),
        )
        .collect()
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return if avg_gain > 0.0 { 100.0 } else { FLAT_RSI };
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}
