use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV bar. Sequences are ordered oldest-first with strictly increasing
/// timestamps; gaps between bars are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Heikin-Ashi rendition of a single bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeikinAshiCandle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
}

/// Derived series aligned by index with the candles they were computed from.
///
/// `None` marks "not enough history yet" and is never conflated with a
/// genuine zero.
#[derive(Debug, Clone, Default)]
pub struct IndicatorSeries {
    pub sma_fast: Vec<Option<f64>>,
    pub sma_slow: Vec<Option<f64>>,
    pub rsi: Vec<Option<f64>>,
    pub heikin_ashi: Vec<HeikinAshiCandle>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.heikin_ashi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heikin_ashi.is_empty()
    }

    pub fn last_sma_fast(&self) -> Option<f64> {
        self.sma_fast.last().copied().flatten()
    }

    pub fn last_sma_slow(&self) -> Option<f64> {
        self.sma_slow.last().copied().flatten()
    }

    pub fn last_rsi(&self) -> Option<f64> {
        self.rsi.last().copied().flatten()
    }
}
