//! SMA (Simple Moving Average) indicator

/// Rolling arithmetic mean over `window` values.
///
/// `result[i]` is `None` for `i < window - 1`; the output always has the same
/// length as the input. A zero window yields all `None`.
pub fn sma_series(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut result = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return result;
    }

    for (offset, slice) in values.windows(window).enumerate() {
        let mean = slice.iter().sum::<f64>() / window as f64;
        result[offset + window - 1] = Some(mean);
    }
    result
}
