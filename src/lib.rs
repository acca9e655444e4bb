//! Trend alert service: polls hourly candles, tracks moving-average and
//! Heikin-Ashi streaks, and notifies when the set of trending coins changes.

pub mod config;
pub mod core;
pub mod db;
pub mod indicators;
pub mod jobs;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
