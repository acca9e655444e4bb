//! Environment-driven configuration.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::models::alert::TrendDirection;

pub const DEFAULT_COINS: &[&str] = &[
    "PENGU", "PROM", "FUN", "QNT", "SYRUP", "HYPE", "BID", "SPX", "MKR", "AAVE", "BNT", "JST",
    "CAKE", "KAVA", "CHEEMS", "NEIROETH", "FARTCOIN", "SUN", "PENDLE", "AVA", "SEI", "JELLYJELLY",
    "BONK",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {reason}")]
    InvalidValue { name: &'static str, reason: String },
}

/// What to do with the results of a cycle in which some symbol fetches failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PartialCyclePolicy {
    /// Diff and persist using whatever symbols completed.
    Proceed,
    /// Fail the cycle before diffing; persisted state stays untouched.
    Abort,
}

impl FromStr for PartialCyclePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "proceed" => Ok(Self::Proceed),
            "abort" => Ok(Self::Abort),
            other => Err(format!("expected 'proceed' or 'abort', got '{}'", other)),
        }
    }
}

/// Window lengths feeding the indicator engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorParams {
    pub fast_window: usize,
    pub slow_window: usize,
    pub rsi_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            fast_window: 7,
            slow_window: 25,
            rsi_period: 14,
        }
    }
}

impl IndicatorParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fast_window == 0 || self.fast_window >= self.slow_window {
            return Err(ConfigError::InvalidValue {
                name: "SMA_FAST_WINDOW",
                reason: format!(
                    "fast window {} must be > 0 and below slow window {}",
                    self.fast_window, self.slow_window
                ),
            });
        }
        if self.rsi_period == 0 {
            return Err(ConfigError::InvalidValue {
                name: "RSI_PERIOD",
                reason: "must be > 0".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub environment: String,
    pub port: u16,
    pub telegram_token: Option<String>,
    pub telegram_chat_id: Option<String>,
    pub telegram_api_url: String,
    pub check_interval_minutes: u64,
    pub coins: Vec<String>,
    pub quote_asset: String,
    pub exchange_base_url: String,
    pub direction: TrendDirection,
    pub indicators: IndicatorParams,
    pub candle_limit: usize,
    pub fetch_delay: Duration,
    pub partial_cycle_policy: PartialCyclePolicy,
    pub state_dir: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let indicators = IndicatorParams {
            fast_window: env_parse("SMA_FAST_WINDOW", 7)?,
            slow_window: env_parse("SMA_SLOW_WINDOW", 25)?,
            rsi_period: env_parse("RSI_PERIOD", 14)?,
        };
        indicators.validate()?;

        let candle_limit: usize = env_parse("CANDLE_LIMIT", 500)?;
        if candle_limit < indicators.slow_window {
            return Err(ConfigError::InvalidValue {
                name: "CANDLE_LIMIT",
                reason: format!(
                    "{} is below the slow window {}",
                    candle_limit, indicators.slow_window
                ),
            });
        }

        let check_interval_minutes: u64 = env_parse("CHECK_INTERVAL_MINUTES", 1)?;
        if check_interval_minutes == 0 {
            return Err(ConfigError::InvalidValue {
                name: "CHECK_INTERVAL_MINUTES",
                reason: "must be > 0".to_string(),
            });
        }

        Ok(Self {
            environment: get_environment(),
            port: env_parse("PORT", 8080)?,
            telegram_token: env_opt("TELEGRAM_TOKEN"),
            telegram_chat_id: env_opt("TELEGRAM_CHAT_ID"),
            telegram_api_url: env_str("TELEGRAM_API_URL", "https://api.telegram.org"),
            check_interval_minutes,
            coins: env_opt("COINS")
                .map(|s| parse_coin_list(&s))
                .unwrap_or_else(default_coins),
            quote_asset: env_str("QUOTE_ASSET", "USDT").to_uppercase(),
            exchange_base_url: env_str("EXCHANGE_BASE_URL", "https://contract.mexc.com"),
            direction: env_parse("TREND_DIRECTION", TrendDirection::Down)?,
            indicators,
            candle_limit,
            fetch_delay: Duration::from_millis(env_parse("FETCH_DELAY_MS", 250)?),
            partial_cycle_policy: env_parse("PARTIAL_CYCLE_POLICY", PartialCyclePolicy::Proceed)?,
            state_dir: PathBuf::from(env_str("STATE_DIR", "state")),
        })
    }
}

pub fn get_environment() -> String {
    env_str("APP_ENV", "sandbox").to_lowercase()
}

pub fn default_coins() -> Vec<String> {
    DEFAULT_COINS.iter().map(|c| c.to_string()).collect()
}

/// Splits a comma separated list, uppercasing and dropping blanks and repeats.
pub fn parse_coin_list(raw: &str) -> Vec<String> {
    let mut coins: Vec<String> = Vec::new();
    for coin in raw.split(',').map(|c| c.trim().to_uppercase()) {
        if !coin.is_empty() && !coins.contains(&coin) {
            coins.push(coin);
        }
    }
    coins
}

fn env_opt(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_str(name: &str, default: &str) -> String {
    env_opt(name).unwrap_or_else(|| default.to_string())
}

fn env_parse<T>(name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env_opt(name) {
        Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
