//! Per-category positioning figures.
//!
//! NET = LONG - SHORT
//! PCT_LONG = LONG / (LONG + SHORT) * 100, PCT_SHORT likewise
//! PCT_SPREAD = PCT_LONG - PCT_SHORT
//! Percentages are undefined when LONG + SHORT == 0.

use crate::domain::cot_record::CategoryPositions;
use crate::domain::indicator::percent_of;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PositioningStats {
    pub net: i64,
    pub pct_long: Option<f64>,
    pub pct_short: Option<f64>,
    pub pct_spread: Option<f64>,
}

pub fn calculate_positioning(positions: CategoryPositions) -> PositioningStats {
    let total = positions.total() as f64;
    let pct_long = percent_of(positions.long as f64, total);
    let pct_short = percent_of(positions.short as f64, total);
    let pct_spread = match (pct_long, pct_short) {
        (Some(l), Some(s)) => Some(l - s),
        _ => None,
    };

    PositioningStats {
        net: positions.net(),
        pct_long,
        pct_short,
        pct_spread,
    }
}

/// A commercial count as a percentage of open interest.
pub fn open_interest_ratio(count: i64, open_interest: i64) -> Option<f64> {
    percent_of(count as f64, open_interest as f64)
}
