//! Unit tests for SMA indicator

use trendwatch::indicators::trend::sma_series;

#[test]
fn test_sma_constant_price_equals_price() {
    let values = vec![3.7; 40];
    for window in [1, 7, 25, 40] {
        let sma = sma_series(&values, window);
        assert_eq!(sma.len(), values.len());
        for (i, value) in sma.iter().enumerate() {
            if i + 1 < window {
                assert!(value.is_none(), "index {} should be undefined for window {}", i, window);
            } else {
                assert!((value.unwrap() - 3.7).abs() < 1e-12);
            }
        }
    }
}

#[test]
fn test_sma_defined_only_from_window_minus_one() {
    let mut closes = vec![10.0; 6];
    closes.push(20.0);

    let sma7 = sma_series(&closes, 7);
    assert!(sma7[..6].iter().all(Option::is_none));
    let last = sma7[6].unwrap();
    assert!((last - 80.0 / 7.0).abs() < 1e-9);
    assert!((last - 11.43).abs() < 0.01);

    let sma25 = sma_series(&closes, 25);
    assert_eq!(sma25.len(), 7);
    assert!(sma25.iter().all(Option::is_none));
}

#[test]
fn test_sma_zero_is_a_value_not_missing() {
    let sma = sma_series(&[0.0, 0.0, 0.0], 2);
    assert_eq!(sma, vec![None, Some(0.0), Some(0.0)]);
}

#[test]
fn test_sma_zero_window_is_all_undefined() {
    assert_eq!(sma_series(&[1.0, 2.0], 0), vec![None, None]);
}
