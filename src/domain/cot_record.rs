//! Weekly Commitment of Traders positioning records.
//!
//! A [`CotTable`] is an ordered sequence of [`CotRecord`]s, one per reporting
//! week. Rows are expected in chronological order; rolling indicators depend
//! on it and nothing here re-sorts.

use chrono::NaiveDate;
use std::fmt;

use crate::domain::error::CotError;

pub const COL_DATE: &str = "Fecha";
pub const COL_CLOSE: &str = "Cierre";
pub const COL_OPEN_INTEREST: &str = "OI";
pub const COL_NC_LONG: &str = "NC Long";
pub const COL_NC_SHORT: &str = "NC Short";
pub const COL_COM_LONG: &str = "Com Long";
pub const COL_COM_SHORT: &str = "Com Short";
pub const COL_RETAIL_LONG: &str = "Retail Long";
pub const COL_RETAIL_SHORT: &str = "Retail Short";

/// Input columns every table must carry, in canonical order.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    COL_DATE,
    COL_CLOSE,
    COL_OPEN_INTEREST,
    COL_NC_LONG,
    COL_NC_SHORT,
    COL_COM_LONG,
    COL_COM_SHORT,
    COL_RETAIL_LONG,
    COL_RETAIL_SHORT,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraderCategory {
    NonCommercial,
    Commercial,
    Retail,
}

impl TraderCategory {
    pub const ALL: [TraderCategory; 3] = [
        TraderCategory::NonCommercial,
        TraderCategory::Commercial,
        TraderCategory::Retail,
    ];

    /// Short label used in column names ("NC", "Com", "Retail").
    pub fn label(&self) -> &'static str {
        match self {
            TraderCategory::NonCommercial => "NC",
            TraderCategory::Commercial => "Com",
            TraderCategory::Retail => "Retail",
        }
    }
}

impl fmt::Display for TraderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Long and short contract counts for one trader category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CategoryPositions {
    pub long: i64,
    pub short: i64,
}

impl CategoryPositions {
    pub fn new(long: i64, short: i64) -> Self {
        Self { long, short }
    }

    /// long - short, saturating at the `i64` bounds. Loaded rows never
    /// reach them; see `checked`.
    pub fn net(&self) -> i64 {
        self.long.saturating_sub(self.short)
    }

    pub fn total(&self) -> i64 {
        self.long.saturating_add(self.short)
    }

    /// `None` unless both counts are non-negative and their sum fits in `i64`.
    pub fn checked(long: i64, short: i64) -> Option<Self> {
        (long >= 0 && short >= 0 && long.checked_add(short).is_some())
            .then_some(Self { long, short })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CotRecord {
    pub date: NaiveDate,
    pub close: f64,
    pub open_interest: i64,
    pub non_commercial: CategoryPositions,
    pub commercial: CategoryPositions,
    pub retail: CategoryPositions,
    /// Cells of the non-required columns, aligned with [`CotTable::extra_columns`].
    pub extra: Vec<String>,
}

impl CotRecord {
    pub fn positions(&self, category: TraderCategory) -> CategoryPositions {
        match category {
            TraderCategory::NonCommercial => self.non_commercial,
            TraderCategory::Commercial => self.commercial,
            TraderCategory::Retail => self.retail,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CotTable {
    /// Names of the passthrough columns, in their original order.
    pub extra_columns: Vec<String>,
    pub records: Vec<CotRecord>,
}

impl CotTable {
    pub fn new(extra_columns: Vec<String>, records: Vec<CotRecord>) -> Self {
        Self {
            extra_columns,
            records,
        }
    }

    /// A table without passthrough columns.
    pub fn from_records(records: Vec<CotRecord>) -> Self {
        Self::new(Vec::new(), records)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest report dates, or `None` for an empty table.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    /// True when every row is dated on or after the row before it.
    pub fn is_chronological(&self) -> bool {
        self.records.windows(2).all(|w| w[0].date <= w[1].date)
    }
}

/// Positions of the required columns within a header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub date: usize,
    pub close: usize,
    pub open_interest: usize,
    pub nc_long: usize,
    pub nc_short: usize,
    pub com_long: usize,
    pub com_short: usize,
    pub retail_long: usize,
    pub retail_short: usize,
    /// (index, name) of every other column, in header order.
    pub extra: Vec<(usize, String)>,
}

impl ColumnMap {
    /// Locate every required column in `headers`. Header names are compared
    /// after trimming surrounding whitespace.
    pub fn resolve<S: AsRef<str>>(headers: &[S]) -> Result<Self, CotError> {
        let names: Vec<&str> = headers.iter().map(|h| h.as_ref().trim()).collect();

        let find = |column: &str| -> Result<usize, CotError> {
            names
                .iter()
                .position(|&n| n == column)
                .ok_or_else(|| CotError::MissingColumn {
                    column: column.to_string(),
                })
        };

        let extra = names
            .iter()
            .enumerate()
            .filter(|(_, n)| !REQUIRED_COLUMNS.contains(*n))
            .map(|(i, n)| (i, n.to_string()))
            .collect();

        Ok(Self {
            date: find(COL_DATE)?,
            close: find(COL_CLOSE)?,
            open_interest: find(COL_OPEN_INTEREST)?,
            nc_long: find(COL_NC_LONG)?,
            nc_short: find(COL_NC_SHORT)?,
            com_long: find(COL_COM_LONG)?,
            com_short: find(COL_COM_SHORT)?,
            retail_long: find(COL_RETAIL_LONG)?,
            retail_short: find(COL_RETAIL_SHORT)?,
            extra,
        })
    }

    pub fn extra_names(&self) -> Vec<String> {
        self.extra.iter().map(|(_, n)| n.clone()).collect()
    }
}
