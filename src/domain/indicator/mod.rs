//! Positioning indicators derived from COT records.
//!
//! - `positioning`: net position and long/short percentages per category
//! - `rolling`: trailing-window minimum and maximum
//! - `stochastic`: 0-100 index of a value inside its trailing range
//!
//! Undefined results (zero denominators, insufficient history) are `None`.

pub mod positioning;
pub mod rolling;
pub mod stochastic;

use std::fmt;

/// Trailing window of the stochastic indices: three years of weekly reports.
pub const DEFAULT_STOCHASTIC_WINDOW: usize = 156;

/// `numerator / denominator * 100`, or `None` when the denominator is zero
/// or the result is not finite.
pub fn percent_of(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    let value = numerator / denominator * 100.0;
    value.is_finite().then_some(value)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    CommercialIndex(usize),
    OpenInterestIndex(usize),
    CommercialLongToOi,
    CommercialShortToOi,
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::CommercialIndex(window) => write!(f, "Índice Com({})", window),
            IndicatorType::OpenInterestIndex(window) => write!(f, "Índice OI({})", window),
            IndicatorType::CommercialLongToOi => write!(f, "CL/OI"),
            IndicatorType::CommercialShortToOi => write!(f, "CS/OI"),
        }
    }
}
