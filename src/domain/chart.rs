//! Dual-axis chart assembly over an enriched table.
//!
//! The closing price is drawn against a secondary right-hand axis; the
//! non-commercial and commercial net positions share the primary axis.
//! Series are aligned with `x` by row index after filtering.

use chrono::NaiveDate;
use tracing::debug;

use crate::domain::enrich::{EnrichedRow, EnrichedTable};

/// Date label format of the x-axis, e.g. `05 Jan 24`.
pub const DATE_LABEL_FORMAT: &str = "%d %b %y";

pub const DEFAULT_TITLE: &str = "Análisis Informe COT";
pub const X_AXIS_TITLE: &str = "Fecha";
pub const PRIMARY_AXIS_TITLE: &str = "Datos COT";
pub const SECONDARY_AXIS_TITLE: &str = "Cierre";

pub const CLOSE_SERIES: &str = "Cierre";
pub const NON_COMMERCIAL_SERIES: &str = "No Comerciales - Diferencial Largos/Cortos";
pub const COMMERCIAL_SERIES: &str = "Comerciales - Diferencial Largos/Cortos";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisSide {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpec {
    pub title: String,
    pub side: AxisSide,
    /// Drawn over the primary axis instead of beside it.
    pub overlaying: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub axis: Axis,
    pub values: Vec<Option<f64>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverMode {
    /// One tooltip per x position.
    X,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSpec {
    pub title: String,
    pub x_title: String,
    pub x: Vec<String>,
    pub series: Vec<Series>,
    pub primary_axis: AxisSpec,
    pub secondary_axis: AxisSpec,
    pub hover_mode: HoverMode,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ChartSpec {
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    pub fn series(&self, name: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.name == name)
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: Option<u32>, height: Option<u32>) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Rows whose date lies in `[start, end]`. Missing bounds default to the
/// earliest and latest dates of the table.
pub fn filter_rows(
    table: &EnrichedTable,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Vec<&EnrichedRow> {
    let Some((first, last)) = table.date_range() else {
        return Vec::new();
    };
    let start = start.unwrap_or(first);
    let end = end.unwrap_or(last);

    table
        .rows
        .iter()
        .filter(|r| r.record.date >= start && r.record.date <= end)
        .collect()
}

pub fn build_chart(
    table: &EnrichedTable,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> ChartSpec {
    let rows = filter_rows(table, start, end);
    debug!(
        total = table.len(),
        selected = rows.len(),
        ?start,
        ?end,
        "building chart"
    );

    let x = rows
        .iter()
        .map(|r| r.record.date.format(DATE_LABEL_FORMAT).to_string())
        .collect();

    let close = rows.iter().map(|r| finite(r.record.close)).collect();
    let nc_net = rows
        .iter()
        .map(|r| Some(r.derived.non_commercial.net as f64))
        .collect();
    let com_net = rows
        .iter()
        .map(|r| Some(r.derived.commercial.net as f64))
        .collect();

    ChartSpec {
        title: DEFAULT_TITLE.to_string(),
        x_title: X_AXIS_TITLE.to_string(),
        x,
        series: vec![
            Series {
                name: CLOSE_SERIES.to_string(),
                axis: Axis::Secondary,
                values: close,
            },
            Series {
                name: NON_COMMERCIAL_SERIES.to_string(),
                axis: Axis::Primary,
                values: nc_net,
            },
            Series {
                name: COMMERCIAL_SERIES.to_string(),
                axis: Axis::Primary,
                values: com_net,
            },
        ],
        primary_axis: AxisSpec {
            title: PRIMARY_AXIS_TITLE.to_string(),
            side: AxisSide::Left,
            overlaying: false,
        },
        secondary_axis: AxisSpec {
            title: SECONDARY_AXIS_TITLE.to_string(),
            side: AxisSide::Right,
            overlaying: true,
        },
        hover_mode: HoverMode::X,
        width: None,
        height: None,
    }
}

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
