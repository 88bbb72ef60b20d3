//! Indicator pipeline: appends derived columns to a positioning table.
//!
//! Enrichment is a single deterministic pass over the rows. Row count and
//! row order are preserved, passthrough columns are untouched, and
//! divisions by zero surface as `None` cells instead of errors.

use tracing::{debug, warn};

use crate::domain::cot_record::{CotRecord, CotTable, TraderCategory};
use crate::domain::indicator::positioning::{
    calculate_positioning, open_interest_ratio, PositioningStats,
};
use crate::domain::indicator::stochastic::{calculate_stochastic_index, StochasticPoint};

/// Derived columns of one row.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DerivedColumns {
    pub non_commercial: PositioningStats,
    pub commercial: PositioningStats,
    pub retail: PositioningStats,
    /// Stochastic index of the commercial net position.
    pub commercial_index: StochasticPoint,
    /// Stochastic index of open interest.
    pub open_interest_index: StochasticPoint,
    /// Com Long / OI * 100
    pub com_long_to_oi: Option<f64>,
    /// Com Short / OI * 100
    pub com_short_to_oi: Option<f64>,
}

impl DerivedColumns {
    pub fn positioning(&self, category: TraderCategory) -> &PositioningStats {
        match category {
            TraderCategory::NonCommercial => &self.non_commercial,
            TraderCategory::Commercial => &self.commercial,
            TraderCategory::Retail => &self.retail,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRow {
    pub record: CotRecord,
    pub derived: DerivedColumns,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTable {
    pub extra_columns: Vec<String>,
    pub rows: Vec<EnrichedRow>,
    pub window: usize,
}

impl EnrichedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The original table, without derived columns.
    pub fn records(&self) -> CotTable {
        CotTable::new(
            self.extra_columns.clone(),
            self.rows.iter().map(|r| r.record.clone()).collect(),
        )
    }

    /// Most recent row (the last one, given chronological input).
    pub fn latest(&self) -> Option<&EnrichedRow> {
        self.rows.last()
    }

    pub fn date_range(&self) -> Option<(chrono::NaiveDate, chrono::NaiveDate)> {
        let min = self.rows.iter().map(|r| r.record.date).min()?;
        let max = self.rows.iter().map(|r| r.record.date).max()?;
        Some((min, max))
    }
}

/// Compute every derived column of `table`, using `window` rows of trailing
/// history for the two stochastic indices.
pub fn enrich(table: CotTable, window: usize) -> EnrichedTable {
    if !table.is_chronological() {
        warn!(
            rows = table.len(),
            "rows are not in chronological order; rolling indices follow row order"
        );
    }

    let com_net: Vec<f64> = table
        .records
        .iter()
        .map(|r| r.commercial.net() as f64)
        .collect();
    let open_interest: Vec<f64> = table
        .records
        .iter()
        .map(|r| r.open_interest as f64)
        .collect();

    let com_index = calculate_stochastic_index(&com_net, window);
    let oi_index = calculate_stochastic_index(&open_interest, window);

    let rows: Vec<EnrichedRow> = table
        .records
        .into_iter()
        .zip(com_index.into_iter().zip(oi_index))
        .map(|(record, (commercial_index, open_interest_index))| {
            let derived = DerivedColumns {
                non_commercial: calculate_positioning(record.non_commercial),
                commercial: calculate_positioning(record.commercial),
                retail: calculate_positioning(record.retail),
                commercial_index,
                open_interest_index,
                com_long_to_oi: open_interest_ratio(record.commercial.long, record.open_interest),
                com_short_to_oi: open_interest_ratio(
                    record.commercial.short,
                    record.open_interest,
                ),
            };
            EnrichedRow { record, derived }
        })
        .collect();

    let indexed = rows
        .iter()
        .filter(|r| r.derived.commercial_index.index.is_some())
        .count();
    debug!(rows = rows.len(), window, indexed, "enriched positioning table");

    EnrichedTable {
        extra_columns: table.extra_columns,
        rows,
        window,
    }
}
