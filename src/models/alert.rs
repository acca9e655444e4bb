//! Per-cycle evaluation results and persisted alert records.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which side of the slow average the fast average must sit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    /// fast > slow
    Up,
    /// fast < slow
    Down,
}

impl TrendDirection {
    /// Compares the two averages. Either side undefined means the condition
    /// does not hold.
    pub fn holds(&self, fast: Option<f64>, slow: Option<f64>) -> bool {
        match (fast, slow) {
            (Some(fast), Some(slow)) => match self {
                TrendDirection::Up => fast > slow,
                TrendDirection::Down => fast < slow,
            },
            _ => false,
        }
    }

    pub fn operator(&self) -> &'static str {
        match self {
            TrendDirection::Up => ">",
            TrendDirection::Down => "<",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            TrendDirection::Up => "🔺",
            TrendDirection::Down => "🔻",
        }
    }
}

impl fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrendDirection::Up => write!(f, "up"),
            TrendDirection::Down => write!(f, "down"),
        }
    }
}

impl FromStr for TrendDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "up" => Ok(Self::Up),
            "down" => Ok(Self::Down),
            other => Err(format!("expected 'up' or 'down', got '{}'", other)),
        }
    }
}

/// Unbroken run of a condition ending at the most recent bar.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StreakResult {
    pub length: usize,
    pub start_index: Option<usize>,
    pub start_timestamp: Option<DateTime<Utc>>,
}

impl StreakResult {
    pub fn is_active(&self) -> bool {
        self.length > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HaColor {
    Green,
    Red,
}

impl HaColor {
    /// Green only when close is strictly above open; a doji counts as red.
    pub fn of(open: f64, close: f64) -> Self {
        if close > open {
            HaColor::Green
        } else {
            HaColor::Red
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            HaColor::Green => "🟢",
            HaColor::Red => "🔴",
        }
    }
}

/// Evaluation of one symbol for one cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolSnapshot {
    pub symbol: String,
    pub price: f64,
    pub sma_fast: Option<f64>,
    pub sma_slow: Option<f64>,
    pub rsi: Option<f64>,
    pub ma_streak: StreakResult,
    pub ha_streak_length: usize,
    pub ha_streak_color: HaColor,
    pub qualifies: bool,
}

impl SymbolSnapshot {
    /// Signed distance of price from the fast average, in percent.
    pub fn deviation_from_fast_pct(&self) -> Option<f64> {
        self.sma_fast
            .filter(|sma| *sma != 0.0)
            .map(|sma| (self.price - sma) / sma * 100.0)
    }
}

/// One line of the durable alert log.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertLogEntry {
    pub timestamp: DateTime<Utc>,
    pub text: String,
}

impl AlertLogEntry {
    pub fn new(timestamp: DateTime<Utc>, text: impl Into<String>) -> Self {
        Self {
            timestamp,
            text: text.into(),
        }
    }

    pub fn to_line(&self) -> String {
        format!(
            "{}, {}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.text
        )
    }
}
