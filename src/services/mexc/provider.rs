//! MEXC perpetual futures candle source

use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use super::messages::{ApiResponse, ContractDetail, KlineData};
use crate::models::indicators::Candle;
use crate::services::market_data::{CandleSource, MarketDataError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct MexcClient {
    base_url: String,
    quote_asset: String,
    client: reqwest::Client,
}

impl MexcClient {
    pub fn new(
        base_url: impl Into<String>,
        quote_asset: impl Into<String>,
    ) -> Result<Self, MarketDataError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(base_url, quote_asset, client))
    }

    pub fn with_client(
        base_url: impl Into<String>,
        quote_asset: impl Into<String>,
        client: reqwest::Client,
    ) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            quote_asset: quote_asset.into(),
            client,
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, MarketDataError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.get(&url).query(query).send().await?;
        let body: ApiResponse<T> = response.error_for_status()?.json().await?;
        body.into_data()
    }
}

/// Maps the generic `1h`-style interval to MEXC's name and its length in seconds.
fn mexc_interval(interval: &str) -> Result<(&'static str, i64), MarketDataError> {
    let mapped = match interval {
        "1m" => ("Min1", 60),
        "5m" => ("Min5", 300),
        "15m" => ("Min15", 900),
        "30m" => ("Min30", 1_800),
        "1h" => ("Min60", 3_600),
        "4h" => ("Hour4", 14_400),
        "8h" => ("Hour8", 28_800),
        "1d" => ("Day1", 86_400),
        other => return Err(MarketDataError::UnsupportedInterval(other.to_string())),
    };
    Ok(mapped)
}

/// Turns column arrays into candles sorted oldest-first, one per timestamp.
pub fn candles_from_klines(data: KlineData) -> Result<Vec<Candle>, MarketDataError> {
    let len = data.time.len();
    let columns = [
        data.open.len(),
        data.high.len(),
        data.low.len(),
        data.close.len(),
        data.vol.len(),
    ];
    if columns.iter().any(|&n| n != len) {
        return Err(MarketDataError::Malformed(format!(
            "kline columns have mismatched lengths: time={} others={:?}",
            len, columns
        )));
    }

    let mut candles = Vec::with_capacity(len);
    for i in 0..len {
        let timestamp = DateTime::from_timestamp(data.time[i], 0).ok_or_else(|| {
            MarketDataError::Malformed(format!("invalid kline timestamp {}", data.time[i]))
        })?;
        candles.push(Candle::new(
            data.open[i],
            data.high[i],
            data.low[i],
            data.close[i],
            data.vol[i],
            timestamp,
        ));
    }

    candles.sort_by_key(|c| c.timestamp);
    candles.dedup_by_key(|c| c.timestamp);
    Ok(candles)
}

#[async_trait]
impl CandleSource for MexcClient {
    fn name(&self) -> &str {
        "MEXC"
    }

    fn market_symbol(&self, coin: &str) -> String {
        format!("{}_{}", coin.to_uppercase(), self.quote_asset)
    }

    async fn list_available_symbols(&self) -> Result<HashSet<String>, MarketDataError> {
        let contracts: Vec<ContractDetail> = self.get("/api/v1/contract/detail", &[]).await?;
        let symbols: HashSet<String> = contracts
            .into_iter()
            .filter(ContractDetail::is_tradable)
            .map(|c| c.symbol)
            .collect();

        debug!(count = symbols.len(), "MEXC: loaded {} contract symbols", symbols.len());
        Ok(symbols)
    }

    async fn fetch_ohlcv(
        &self,
        symbol: &str,
        interval: &str,
        limit: usize,
    ) -> Result<Vec<Candle>, MarketDataError> {
        let (mexc_interval, step) = mexc_interval(interval)?;
        let end = Utc::now().timestamp();
        let start = end - step * limit as i64;

        let data: KlineData = self
            .get(
                &format!("/api/v1/contract/kline/{}", symbol),
                &[
                    ("interval", mexc_interval.to_string()),
                    ("start", start.to_string()),
                    ("end", end.to_string()),
                ],
            )
            .await?;

        let mut candles = candles_from_klines(data)?;
        if candles.len() > limit {
            candles.drain(..candles.len() - limit);
        }

        debug!(
            symbol = %symbol,
            count = candles.len(),
            "MEXC: fetched {} candles for {}",
            candles.len(),
            symbol
        );
        Ok(candles)
    }
}
