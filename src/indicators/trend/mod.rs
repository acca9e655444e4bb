//! Trend indicators: SMA, Heikin-Ashi

pub mod heikin_ashi;
pub mod sma;

pub use heikin_ashi::*;
pub use sma::*;
