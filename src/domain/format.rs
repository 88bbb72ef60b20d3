//! Display formatting of derived columns.
//!
//! Derived values stay numeric inside the pipeline; these helpers turn them
//! into strings only where a table is exported or printed.

use crate::domain::cot_record::TraderCategory;
use crate::domain::enrich::DerivedColumns;

/// `12.3456` -> `"12.35%"`. Undefined values render as an empty cell.
pub fn format_pct(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}%", v),
        None => String::new(),
    }
}

/// Plain number for rolling extremes; undefined renders empty.
pub fn format_level(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{:.0}", v),
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

/// Column names of the derived block, in export order.
pub fn derived_headers() -> Vec<String> {
    let mut headers = Vec::with_capacity(TraderCategory::ALL.len() * 4 + 8);
    for category in TraderCategory::ALL {
        let c = category.label();
        headers.push(format!("Posiciones Netas {c}"));
        headers.push(format!("% Largos {c}"));
        headers.push(format!("% Cortos {c}"));
        headers.push(format!("% Diferencial {c}"));
    }
    headers.extend(
        [
            "Lowest Com",
            "Highest Com",
            "Índice Com",
            "Lowest OI",
            "Highest OI",
            "Índice OI",
            "CL/OI",
            "CS/OI",
        ]
        .map(String::from),
    );
    headers
}

/// Cells of the derived block, aligned with [`derived_headers`].
pub fn derived_cells(derived: &DerivedColumns) -> Vec<String> {
    let mut cells = Vec::with_capacity(TraderCategory::ALL.len() * 4 + 8);
    for category in TraderCategory::ALL {
        let stats = derived.positioning(category);
        cells.push(stats.net.to_string());
        cells.push(format_pct(stats.pct_long));
        cells.push(format_pct(stats.pct_short));
        cells.push(format_pct(stats.pct_spread));
    }

    let com = &derived.commercial_index;
    let oi = &derived.open_interest_index;
    cells.push(format_level(com.lowest));
    cells.push(format_level(com.highest));
    cells.push(format_pct(com.index));
    cells.push(format_level(oi.lowest));
    cells.push(format_level(oi.highest));
    cells.push(format_pct(oi.index));
    cells.push(format_pct(derived.com_long_to_oi));
    cells.push(format_pct(derived.com_short_to_oi));
    cells
}
