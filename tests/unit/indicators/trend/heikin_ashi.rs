//! Unit tests for Heikin-Ashi candles

use chrono::{Duration, TimeZone, Utc};
use trendwatch::indicators::trend::heikin_ashi;
use trendwatch::models::indicators::Candle;

fn sample_candles() -> Vec<Candle> {
    let base = Utc.with_ymd_and_hms(2024, 10, 14, 0, 0, 0).unwrap();
    let raw = [
        (10.0, 12.0, 9.0, 11.0),
        (11.0, 11.5, 8.0, 8.5),
        (8.5, 13.0, 8.4, 12.8),
        (12.8, 12.9, 12.1, 12.2),
        (12.2, 15.0, 12.0, 14.9),
    ];
    raw.iter()
        .enumerate()
        .map(|(i, &(o, h, l, c))| Candle::new(o, h, l, c, 500.0, base + Duration::hours(i as i64)))
        .collect()
}

#[test]
fn test_heikin_ashi_recurrence_reconstructs_from_raw_candles() {
    let candles = sample_candles();
    let ha = heikin_ashi(&candles);
    assert_eq!(ha.len(), candles.len());

    assert_eq!(ha[0].open, (candles[0].open + candles[0].close) / 2.0);
    for i in 0..candles.len() {
        let c = &candles[i];
        assert_eq!(ha[i].close, (c.open + c.high + c.low + c.close) / 4.0);
        if i > 0 {
            assert_eq!(ha[i].open, (ha[i - 1].open + ha[i - 1].close) / 2.0);
        }
    }
}

#[test]
fn test_heikin_ashi_high_low_envelope() {
    let candles = sample_candles();
    for (c, h) in candles.iter().zip(heikin_ashi(&candles)) {
        assert_eq!(h.high, c.high.max(h.open).max(h.close));
        assert_eq!(h.low, c.low.min(h.open).min(h.close));
        assert!(h.high >= h.open && h.high >= h.close);
        assert!(h.low <= h.open && h.low <= h.close);
    }
}

#[test]
fn test_heikin_ashi_empty_input() {
    assert!(heikin_ashi(&[]).is_empty());
}
