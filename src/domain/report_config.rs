//! Run settings for loading, enriching and charting a COT table.

use chrono::NaiveDate;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::domain::chart::DEFAULT_TITLE;
use crate::domain::indicator::DEFAULT_STOCHASTIC_WINDOW;

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartFormat {
    #[default]
    Json,
    Svg,
}

impl ChartFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ChartFormat::Json => "json",
            ChartFormat::Svg => "svg",
        }
    }
}

impl FromStr for ChartFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ChartFormat::Json),
            "svg" => Ok(ChartFormat::Svg),
            other => Err(format!("unknown chart format '{}' (expected json or svg)", other)),
        }
    }
}

impl fmt::Display for ChartFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportConfig {
    pub data_path: Option<PathBuf>,
    pub delimiter: u8,
    pub date_format: String,
    pub window: usize,
    pub title: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub format: ChartFormat,
    pub output: Option<PathBuf>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            data_path: None,
            delimiter: b',',
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            window: DEFAULT_STOCHASTIC_WINDOW,
            title: DEFAULT_TITLE.to_string(),
            start_date: None,
            end_date: None,
            format: ChartFormat::Json,
            output: None,
            width: None,
            height: None,
        }
    }
}

impl ReportConfig {
    /// Output path, falling back to `cot_chart.<ext>`.
    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format!("cot_chart.{}", self.format.extension())))
    }
}
