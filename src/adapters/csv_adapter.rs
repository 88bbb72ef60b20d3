//! Delimited-file adapter: loads positioning tables and exports enriched ones.

use crate::domain::cot_record::{
    CategoryPositions, ColumnMap, CotRecord, CotTable, COL_CLOSE, COL_COM_LONG, COL_COM_SHORT,
    COL_DATE, COL_NC_LONG, COL_NC_SHORT, COL_OPEN_INTEREST, COL_RETAIL_LONG, COL_RETAIL_SHORT,
    REQUIRED_COLUMNS,
};
use crate::domain::enrich::EnrichedTable;
use crate::domain::error::CotError;
use crate::domain::format::{derived_cells, derived_headers};
use crate::domain::report_config::DEFAULT_DATE_FORMAT;
use crate::ports::data_port::CotDataPort;
use crate::ports::export_port::ExportPort;
use chrono::{NaiveDate, NaiveDateTime};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Formats tried after the configured one.
const FALLBACK_DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%d/%m/%Y"];
const FALLBACK_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug)]
pub struct CsvAdapter {
    path: PathBuf,
    delimiter: u8,
    date_format: String,
}

impl CsvAdapter {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            delimiter: b',',
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_date_format(mut self, date_format: impl Into<String>) -> Self {
        self.date_format = date_format.into();
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse a table from any reader using this adapter's settings.
    pub fn parse<R: Read>(&self, reader: R) -> Result<CotTable, CotError> {
        let mut rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = rdr
            .headers()
            .map_err(|e| CotError::DataRead {
                reason: format!("CSV header error: {}", e),
            })?
            .clone();
        let header_names: Vec<&str> = headers.iter().collect();
        let columns = ColumnMap::resolve(&header_names)?;
        debug!(
            columns = headers.len(),
            extra = columns.extra.len(),
            "resolved CSV header"
        );

        let mut records = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| CotError::DataRead {
                reason: format!("CSV parse error: {}", e),
            })?;
            let row = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(records.len() + 2);
            records.push(self.parse_record(&record, &columns, row)?);
        }

        Ok(CotTable::new(columns.extra_names(), records))
    }

    fn parse_record(
        &self,
        record: &csv::StringRecord,
        columns: &ColumnMap,
        row: usize,
    ) -> Result<CotRecord, CotError> {
        let cell = |index: usize, column: &str| {
            record
                .get(index)
                .map(str::trim)
                .ok_or_else(|| CotError::InvalidValue {
                    row,
                    column: column.to_string(),
                    reason: "missing cell".into(),
                })
        };
        let count = |index: usize, column: &str| -> Result<i64, CotError> {
            parse_count(cell(index, column)?).map_err(|reason| CotError::InvalidValue {
                row,
                column: column.to_string(),
                reason,
            })
        };

        let date_str = cell(columns.date, COL_DATE)?;
        let date = parse_report_date(date_str, &self.date_format).ok_or_else(|| {
            CotError::InvalidValue {
                row,
                column: COL_DATE.to_string(),
                reason: format!("invalid date '{}'", date_str),
            }
        })?;

        let close_str = cell(columns.close, COL_CLOSE)?;
        let close: f64 = close_str.parse().map_err(|e| CotError::InvalidValue {
            row,
            column: COL_CLOSE.to_string(),
            reason: format!("invalid close value '{}': {}", close_str, e),
        })?;

        let category =
            |long: (usize, &str), short: (usize, &str)| -> Result<CategoryPositions, CotError> {
                let (l, s) = (count(long.0, long.1)?, count(short.0, short.1)?);
                CategoryPositions::checked(l, s).ok_or_else(|| CotError::InvalidValue {
                    row,
                    column: long.1.to_string(),
                    reason: format!("{} + {} overflows the contract total", l, s),
                })
            };

        let extra = columns
            .extra
            .iter()
            .map(|(i, _)| record.get(*i).unwrap_or_default().to_string())
            .collect();

        Ok(CotRecord {
            date,
            close,
            open_interest: count(columns.open_interest, COL_OPEN_INTEREST)?,
            non_commercial: category(
                (columns.nc_long, COL_NC_LONG),
                (columns.nc_short, COL_NC_SHORT),
            )?,
            commercial: category(
                (columns.com_long, COL_COM_LONG),
                (columns.com_short, COL_COM_SHORT),
            )?,
            retail: category(
                (columns.retail_long, COL_RETAIL_LONG),
                (columns.retail_short, COL_RETAIL_SHORT),
            )?,
            extra,
        })
    }
}

/// Parse a report date, dropping any time-of-day component.
pub fn parse_report_date(value: &str, format: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, format) {
        return Some(date);
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
        return Some(dt.date());
    }
    FALLBACK_DATE_FORMATS
        .iter()
        .find_map(|f| NaiveDate::parse_from_str(value, f).ok())
        .or_else(|| {
            FALLBACK_DATETIME_FORMATS
                .iter()
                .find_map(|f| NaiveDateTime::parse_from_str(value, f).ok())
                .map(|dt| dt.date())
        })
}

/// Contract counts: non-negative integers, or floats with no fractional
/// part ("1200.0").
pub fn parse_count(value: &str) -> Result<i64, String> {
    if value.is_empty() {
        return Err("empty cell".into());
    }
    let count = match value.parse::<i64>() {
        Ok(v) => v,
        Err(_) => parse_integral_float(value)?,
    };
    if count < 0 {
        return Err(format!("negative contract count '{}'", value));
    }
    Ok(count)
}

fn parse_integral_float(value: &str) -> Result<i64, String> {
    match value.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Ok(v as i64),
        Ok(_) => Err(format!("'{}' is not a whole number of contracts", value)),
        Err(e) => Err(format!("invalid count '{}': {}", value, e)),
    }
}

impl CotDataPort for CsvAdapter {
    fn load_table(&self) -> Result<CotTable, CotError> {
        let file = File::open(&self.path).map_err(|e| CotError::DataRead {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;
        let table = self.parse(file)?;
        info!(
            path = %self.path.display(),
            rows = table.len(),
            "loaded COT table"
        );
        Ok(table)
    }
}

impl ExportPort for CsvAdapter {
    fn write_enriched(&self, table: &EnrichedTable, output_path: &Path) -> Result<(), CotError> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_path(output_path)
            .map_err(|e| CotError::Render {
                reason: format!("failed to create {}: {}", output_path.display(), e),
            })?;

        let mut header: Vec<String> = REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect();
        header.extend(table.extra_columns.iter().cloned());
        header.extend(derived_headers());
        write_row(&mut wtr, &header)?;

        for row in &table.rows {
            let r = &row.record;
            let mut cells = vec![
                r.date.format("%Y-%m-%d").to_string(),
                r.close.to_string(),
                r.open_interest.to_string(),
                r.non_commercial.long.to_string(),
                r.non_commercial.short.to_string(),
                r.commercial.long.to_string(),
                r.commercial.short.to_string(),
                r.retail.long.to_string(),
                r.retail.short.to_string(),
            ];
            cells.extend(r.extra.iter().cloned());
            cells.extend(derived_cells(&row.derived));
            write_row(&mut wtr, &cells)?;
        }

        wtr.flush()?;
        info!(
            path = %output_path.display(),
            rows = table.len(),
            "wrote enriched table"
        );
        Ok(())
    }
}

fn write_row<W: std::io::Write>(wtr: &mut csv::Writer<W>, cells: &[String]) -> Result<(), CotError> {
    wtr.write_record(cells).map_err(|e| CotError::Render {
        reason: format!("CSV write error: {}", e),
    })
}
