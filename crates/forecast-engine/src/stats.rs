//! Statistics utility for the baseline forecaster
//!
//! Pure functions over price series. The only non-deterministic step is
//! [`bootstrap_sample`], which draws from a caller-supplied random source.

use rand::Rng;

/// Smoothing window for a series of `len` points: `min(max_window, len / 3)`, at least 1
pub fn window_size(len: usize, max_window: usize) -> usize {
    max_window.min(len / 3).max(1)
}

/// Trailing moving average
///
/// For every index in `[window - 1, len)` averages the `window` values ending
/// there, producing `len - window + 1` outputs. Empty when the series is
/// shorter than the window. A window of 0 is treated as 1.
pub fn moving_average(series: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    if series.len() < window {
        return Vec::new();
    }

    series
        .windows(window)
        .map(|w| w.iter().sum::<f64>() / window as f64)
        .collect()
}

/// Linear slope over a smoothed series: `(last - first) / (count - 1)`, 0 below two points
pub fn trend(averaged: &[f64]) -> f64 {
    match averaged {
        [first, .., last] => (last - first) / (averaged.len() - 1) as f64,
        _ => 0.0,
    }
}

/// Noise model: each raw value from index 2 on minus the 3-point average ending at it
pub fn residuals(series: &[f64]) -> Vec<f64> {
    moving_average(series, 3)
        .iter()
        .zip(series.iter().skip(2))
        .map(|(avg, raw)| raw - avg)
        .collect()
}

/// Draw `n` residuals uniformly at random with replacement
///
/// Returns an empty sample when there is nothing to draw from.
pub fn bootstrap_sample<R: Rng + ?Sized>(residuals: &[f64], n: usize, rng: &mut R) -> Vec<f64> {
    if residuals.is_empty() {
        return Vec::new();
    }

    (0..n)
        .map(|_| residuals[rng.gen_range(0..residuals.len())])
        .collect()
}

/// Nearest-rank percentiles of a sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percentiles {
    pub p10: f64,
    pub p50: f64,
    pub p90: f64,
}

/// Sort ascending and pick the values at `floor(q * len)` for q in 0.1, 0.5, 0.9
///
/// No interpolation. `None` for an empty sample.
pub fn percentiles(values: &[f64]) -> Option<Percentiles> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let len = sorted.len();
    let rank = |q: f64| sorted[((q * len as f64).floor() as usize).min(len - 1)];

    Some(Percentiles {
        p10: rank(0.1),
        p50: rank(0.5),
        p90: rank(0.9),
    })
}
