#![allow(dead_code)]

use chrono::{Duration, NaiveDate};
use cotreport::domain::cot_record::{
    CategoryPositions, CotRecord, CotTable, REQUIRED_COLUMNS,
};
use cotreport::domain::error::CotError;
use cotreport::ports::data_port::CotDataPort;

pub struct MockDataPort {
    pub table: CotTable,
    pub error: Option<String>,
}

impl MockDataPort {
    pub fn new(table: CotTable) -> Self {
        Self { table, error: None }
    }

    pub fn failing(reason: &str) -> Self {
        Self {
            table: CotTable::default(),
            error: Some(reason.to_string()),
        }
    }
}

impl CotDataPort for MockDataPort {
    fn load_table(&self) -> Result<CotTable, CotError> {
        if let Some(reason) = &self.error {
            return Err(CotError::DataRead {
                reason: reason.clone(),
            });
        }
        Ok(self.table.clone())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_record(
    date_str: &str,
    close: f64,
    open_interest: i64,
    nc: (i64, i64),
    com: (i64, i64),
    retail: (i64, i64),
) -> CotRecord {
    CotRecord {
        date: NaiveDate::parse_from_str(date_str, "%Y-%m-%d").unwrap(),
        close,
        open_interest,
        non_commercial: CategoryPositions::new(nc.0, nc.1),
        commercial: CategoryPositions::new(com.0, com.1),
        retail: CategoryPositions::new(retail.0, retail.1),
        extra: Vec::new(),
    }
}

/// Weekly reports starting 2021-01-05 whose commercial net position is
/// `com_nets[i]`. Other counts are fixed and plausible.
pub fn weekly_table(com_nets: &[i64]) -> CotTable {
    let start = date(2021, 1, 5);
    let records = com_nets
        .iter()
        .enumerate()
        .map(|(i, &net)| {
            let com_short = 50_000;
            CotRecord {
                date: start + Duration::weeks(i as i64),
                close: 1800.0 + i as f64,
                open_interest: 400_000 + (i as i64 % 7) * 1_000,
                non_commercial: CategoryPositions::new(150_000 + i as i64, 60_000),
                commercial: CategoryPositions::new(com_short + net, com_short),
                retail: CategoryPositions::new(20_000, 25_000),
                extra: Vec::new(),
            }
        })
        .collect();
    CotTable::from_records(records)
}

/// `weeks` rows of smoothly varying synthetic data.
pub fn synthetic_table(weeks: usize) -> CotTable {
    let nets: Vec<i64> = (0..weeks)
        .map(|i| ((i as f64 * 0.2).sin() * 30_000.0).round() as i64)
        .collect();
    weekly_table(&nets)
}

pub fn sample_csv() -> String {
    let mut out = REQUIRED_COLUMNS.join(",");
    out.push_str(",Mercado\n");
    out.push_str("2024-01-02,2064.4,500000,250000,50000,100000,300000,30000,40000,Oro\n");
    out.push_str("2024-01-09,2030.2,510000,240000,60000,110000,290000,35000,45000,Oro\n");
    out.push_str("2024-01-16,2005.0,0,230000,70000,120000,280000,40000,40000,Oro\n");
    out
}
