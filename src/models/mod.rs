//! Shared data models spanning the engine layers.

pub mod alert;
pub mod indicators;

pub use alert::{AlertLogEntry, HaColor, StreakResult, SymbolSnapshot, TrendDirection};
pub use indicators::{Candle, HeikinAshiCandle, IndicatorSeries};
