//! Stochastic index over a trailing window.
//!
//! INDEX(n)[i] = (x[i] - LOWEST(n)[i]) / (HIGHEST(n)[i] - LOWEST(n)[i]) * 100
//! Undefined during the (n-1)-row warmup and whenever the range is flat.
//! Undefined values are left as they are: no back-fill, no interpolation.

use crate::domain::indicator::percent_of;
use crate::domain::indicator::rolling::{rolling_max, rolling_min};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StochasticPoint {
    pub lowest: Option<f64>,
    pub highest: Option<f64>,
    pub index: Option<f64>,
}

pub fn calculate_stochastic_index(values: &[f64], window: usize) -> Vec<StochasticPoint> {
    let lows = rolling_min(values, window);
    let highs = rolling_max(values, window);

    values
        .iter()
        .zip(lows.into_iter().zip(highs))
        .map(|(&value, (lowest, highest))| {
            let index = match (lowest, highest) {
                (Some(lo), Some(hi)) => percent_of(value - lo, hi - lo),
                _ => None,
            };
            StochasticPoint {
                lowest,
                highest,
                index,
            }
        })
        .collect()
}
