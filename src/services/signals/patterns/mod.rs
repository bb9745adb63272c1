//! Chart-pattern detectors built on a shared local-extrema finder.

pub mod ascending_triangle;
pub mod cup_and_handle;
pub mod head_and_shoulders;

pub use ascending_triangle::{find_ascending_triangle, AscendingTriangle};
pub use cup_and_handle::{find_cup_and_handle, CupAndHandle};
pub use head_and_shoulders::{find_inverse_head_and_shoulders, InverseHeadAndShoulders};

use crate::types::{PatternMatch, PriceSeries};

/// Indices of strict local maxima. A flat top counts once, at its middle,
/// when both sides of the plateau are lower. Endpoints are never peaks.
fn local_maxima(values: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if values.len() < 3 {
        return peaks;
    }

    let last = values.len() - 1;
    let mut i = 1;
    while i < last {
        if values[i - 1] < values[i] {
            let mut ahead = i + 1;
            while ahead < last && values[ahead] == values[i] {
                ahead += 1;
            }
            if values[ahead] < values[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}

/// Local maxima at least `distance` rows apart.
///
/// Peaks are visited highest first; each kept peak suppresses every other
/// peak closer than `distance`. Among equal heights the later peak wins.
pub fn find_peaks(values: &[f64], distance: usize) -> Vec<usize> {
    let peaks = local_maxima(values);
    if distance <= 1 || peaks.len() < 2 {
        return peaks;
    }

    let mut by_height: Vec<usize> = (0..peaks.len()).collect();
    by_height.sort_by(|&a, &b| values[peaks[a]].total_cmp(&values[peaks[b]]));

    let mut keep = vec![true; peaks.len()];
    for &j in by_height.iter().rev() {
        if !keep[j] {
            continue;
        }
        let mut k = j;
        while k > 0 && peaks[j] - peaks[k - 1] < distance {
            keep[k - 1] = false;
            k -= 1;
        }
        let mut k = j + 1;
        while k < peaks.len() && peaks[k] - peaks[j] < distance {
            keep[k] = false;
            k += 1;
        }
    }

    peaks
        .into_iter()
        .zip(keep)
        .filter_map(|(p, kept)| kept.then_some(p))
        .collect()
}

/// Local minima at least `distance` rows apart.
pub fn find_troughs(values: &[f64], distance: usize) -> Vec<usize> {
    let negated: Vec<f64> = values.iter().map(|v| -v).collect();
    find_peaks(&negated, distance)
}

fn span(series: &PriceSeries, start: usize, end: usize) -> PatternMatch {
    PatternMatch {
        start: series.date(start),
        end: series.date(end),
    }
}
