//! Trailing-window extremes.
//!
//! ROLLING_MIN(n)[i] = min(x[i-n+1..=i]), same for max.
//! Warmup: the first (n-1) positions are `None`. A window containing a
//! non-finite value is also `None`.

pub fn rolling_min(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_fold(values, window, f64::INFINITY, f64::min)
}

pub fn rolling_max(values: &[f64], window: usize) -> Vec<Option<f64>> {
    rolling_fold(values, window, f64::NEG_INFINITY, f64::max)
}

fn rolling_fold(
    values: &[f64],
    window: usize,
    init: f64,
    pick: fn(f64, f64) -> f64,
) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    (0..values.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let slice = &values[i + 1 - window..=i];
            if slice.iter().any(|v| !v.is_finite()) {
                return None;
            }
            Some(slice.iter().copied().fold(init, pick))
        })
        .collect()
}
