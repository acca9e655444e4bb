//! Backward streak scans over condition and Heikin-Ashi color series.

use chrono::{DateTime, Utc};

use crate::models::alert::{HaColor, StreakResult};
use crate::models::indicators::HeikinAshiCandle;

/// Length of the run of `true` ending at the last index.
///
/// `timestamps` is aligned with `conditions`; a missing timestamp at the start
/// index leaves `start_timestamp` empty.
pub fn condition_streak(conditions: &[bool], timestamps: &[DateTime<Utc>]) -> StreakResult {
    let length = conditions.iter().rev().take_while(|held| **held).count();
    if length == 0 {
        return StreakResult::default();
    }

    let start_index = conditions.len() - length;
    StreakResult {
        length,
        start_index: Some(start_index),
        start_timestamp: timestamps.get(start_index).copied(),
    }
}

/// Current Heikin-Ashi color and how many bars it has lasted.
pub fn color_streak(candles: &[HeikinAshiCandle]) -> Option<(HaColor, usize)> {
    let mut colors = candles.iter().rev().map(|c| HaColor::of(c.open, c.close));
    let current = colors.next()?;
    let length = 1 + colors.take_while(|color| *color == current).count();
    Some((current, length))
}
