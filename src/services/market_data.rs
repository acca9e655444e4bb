//! Candle source interface.

use std::collections::HashSet;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::indicators::Candle;

#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("exchange error {code}: {message}")]
    Exchange { code: i64, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("unsupported interval: {0}")]
    UnsupportedInterval(String),
}

#[async_trait]
pub trait CandleSource: Send + Sync {
    /// Short label used in alert headers, e.g. `MEXC`.
    fn name(&self) -> &str;

    /// Exchange symbol for a tracked coin, e.g. `BTC` -> `BTC_USDT`.
    fn market_symbol(&self, coin: &str) -> String;

    /// Every symbol the exchange currently lists.
    async fn list_available_symbols(&self) -> Result<HashSet<String>, MarketDataError>;

    /// Last `limit` candles for `symbol`, oldest first.
    async fn fetch_ohlcv(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError>;
}
