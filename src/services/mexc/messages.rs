//! MEXC contract REST payloads.

use serde::Deserialize;

use crate::services::market_data::MarketDataError;

/// Envelope shared by every contract endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn into_data(self) -> Result<T, MarketDataError> {
        if !self.success {
            return Err(MarketDataError::Exchange {
                code: self.code,
                message: self.message.unwrap_or_else(|| "request rejected".to_string()),
            });
        }
        self.data
            .ok_or_else(|| MarketDataError::Malformed("missing data field".to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct ContractDetail {
    pub symbol: String,
    /// 0 = enabled; other values are delisted, paused, etc.
    #[serde(default)]
    pub state: Option<i64>,
}

impl ContractDetail {
    pub fn is_tradable(&self) -> bool {
        matches!(self.state, None | Some(0))
    }
}

/// Column-oriented kline payload; `time` is in seconds.
#[derive(Debug, Deserialize)]
pub struct KlineData {
    pub time: Vec<i64>,
    pub open: Vec<f64>,
    pub high: Vec<f64>,
    pub low: Vec<f64>,
    pub close: Vec<f64>,
    pub vol: Vec<f64>,
}
