//! Integration tests for chart-pattern recognition

use bullscan::services::signals::patterns::*;
use bullscan::services::signals::Detector;
use bullscan::types::*;
use chrono::{Duration, NaiveDate};

fn day(offset: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2022, 1, 3).unwrap() + Duration::days(offset as i64)
}

/// Piecewise-linear closes through `(index, price)` points.
fn create_path(points: &[(usize, f64)]) -> PriceSeries {
    let mut closes = Vec::new();
    for pair in points.windows(2) {
        let (i0, p0) = pair[0];
        let (i1, p1) = pair[1];
        for i in i0..i1 {
            let t = (i - i0) as f64 / (i1 - i0) as f64;
            closes.push(p0 + (p1 - p0) * t);
        }
    }
    if let Some(&(_, p)) = points.last() {
        closes.push(p);
    }

    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &c)| PriceBar::flat(day(i), c, 10_000.0))
        .collect();
    PriceSeries::new(bars).unwrap()
}

// =============================================================================
// Extrema
// =============================================================================

#[test]
fn test_find_peaks_enforces_distance() {
    let values = [0.0, 5.0, 0.0, 6.0, 0.0, 0.0, 0.0, 4.0, 0.0];
    assert_eq!(find_peaks(&values, 1), vec![1, 3, 7]);
    assert_eq!(find_peaks(&values, 3), vec![3, 7]);
}

#[test]
fn test_find_peaks_tie_keeps_later() {
    assert_eq!(find_peaks(&[0.0, 5.0, 0.0, 5.0, 0.0], 3), vec![3]);
}

#[test]
fn test_find_troughs_mirrors_peaks() {
    let values = [5.0, 1.0, 5.0, 0.5, 5.0];
    assert_eq!(find_troughs(&values, 1), vec![1, 3]);
    assert_eq!(find_troughs(&values, 3), vec![3]);
}

// =============================================================================
// Patterns at the default 50-row spacing
// =============================================================================

#[test]
fn test_cup_and_handle_default_window() {
    let series = create_path(&[
        (0, 90.0),
        (100, 100.0),
        (200, 80.0),
        (300, 110.0),
        (350, 100.0),
        (400, 108.0),
        (500, 95.0),
    ]);
    let output = CupAndHandle::default().detect(&series, "CUP").unwrap();
    assert_eq!(output.signal_dates.dates(), &[day(400)]);
    assert_eq!(
        output.pattern_spans,
        vec![PatternMatch {
            start: day(100),
            end: day(400)
        }]
    );
}

#[test]
fn test_ascending_triangle_default_window() {
    let series = create_path(&[
        (0, 90.0),
        (100, 100.0),
        (250, 97.0),
        (400, 101.0),
        (500, 90.0),
    ]);
    let output = AscendingTriangle::default().detect(&series, "TRI").unwrap();
    assert_eq!(output.signal_dates.dates(), &[day(400)]);
    assert_eq!(output.pattern_spans.len(), 1);
}

#[test]
fn test_inverse_head_and_shoulders_default_window() {
    let series = create_path(&[
        (0, 100.0),
        (100, 90.0),
        (170, 98.0),
        (250, 80.0),
        (330, 99.0),
        (400, 88.0),
        (500, 100.0),
    ]);
    let output = InverseHeadAndShoulders::default()
        .detect(&series, "HS")
        .unwrap();
    assert_eq!(output.signal_dates.dates(), &[day(400)]);
    assert_eq!(
        output.pattern_spans,
        vec![PatternMatch {
            start: day(100),
            end: day(400)
        }]
    );
}

#[test]
fn test_patterns_closer_than_window_are_ignored() {
    // Same cup shape compressed to 5-row spacing cannot be seen with a 50-row window
    let series = create_path(&[
        (0, 90.0),
        (10, 100.0),
        (20, 80.0),
        (30, 110.0),
        (35, 100.0),
        (40, 108.0),
        (50, 95.0),
    ]);
    assert!(find_cup_and_handle(&series, 50).signal_dates.is_empty());
    assert_eq!(find_cup_and_handle(&series, 5).signal_dates.dates(), &[day(40)]);
}

#[test]
fn test_short_series_yields_empty_output() {
    let series = create_path(&[(0, 10.0), (2, 12.0)]);
    for output in [
        find_cup_and_handle(&series, 50),
        find_ascending_triangle(&series, 50),
        find_inverse_head_and_shoulders(&series, 50),
    ] {
        assert!(output.signal_dates.is_empty());
        assert!(output.pattern_spans.is_empty());
    }
}
