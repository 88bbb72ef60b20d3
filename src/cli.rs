//! CLI definition and dispatch.

use chrono::{NaiveDate, NaiveDateTime};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::chart_svg::SvgChartAdapter;
use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::plotly_json_adapter::PlotlyJsonAdapter;
use crate::domain::chart::{build_chart, ChartSpec};
use crate::domain::config_validation::{
    parse_delimiter, parse_dimension, parse_optional_date, parse_window, validate_config,
};
use crate::domain::cot_record::TraderCategory;
use crate::domain::enrich::{enrich, EnrichedTable};
use crate::domain::error::CotError;
use crate::domain::format::format_pct;
use crate::domain::indicator::IndicatorType;
use crate::domain::report_config::{ChartFormat, ReportConfig};
use crate::ports::chart_port::ChartPort;
use crate::ports::config_port::ConfigPort;
use crate::ports::data_port::CotDataPort;
use crate::ports::export_port::ExportPort;

#[derive(Parser, Debug)]
#[command(name = "cotreport", about = "Commitment of Traders positioning indicators and charts")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by every command that loads data.
#[derive(clap::Args, Debug, Default, Clone)]
pub struct DataArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Input table, overrides [data] path
    #[arg(short, long)]
    pub data: Option<PathBuf>,
    /// Stochastic window in rows, overrides [indicators] window
    #[arg(long)]
    pub window: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the positioning chart
    Chart {
        #[command(flatten)]
        args: DataArgs,
        /// First date to include (YYYY-MM-DD, any time of day is ignored)
        #[arg(long)]
        start: Option<String>,
        /// Last date to include (YYYY-MM-DD, any time of day is ignored)
        #[arg(long)]
        end: Option<String>,
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// json or svg
        #[arg(long)]
        format: Option<String>,
    },
    /// Write the table with its derived columns as CSV
    Enrich {
        #[command(flatten)]
        args: DataArgs,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Show the data range and latest indicator values
    Info {
        #[command(flatten)]
        args: DataArgs,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Chart {
            args,
            start,
            end,
            output,
            format,
        } => run_chart(&args, start.as_deref(), end.as_deref(), output, format.as_deref()),
        Command::Enrich { args, output } => run_enrich(&args, &output),
        Command::Info { args } => run_info(&args),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, CotError> {
    FileConfigAdapter::from_file(path).map_err(|e| CotError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Read every setting from `adapter`, falling back to defaults for absent keys.
pub fn build_report_config(adapter: &dyn ConfigPort) -> Result<ReportConfig, CotError> {
    validate_config(adapter)?;
    let defaults = ReportConfig::default();

    let delimiter = match adapter.get_string("data", "delimiter") {
        Some(d) => parse_delimiter(&d)?,
        None => defaults.delimiter,
    };
    let window = match non_blank(adapter, "indicators", "window") {
        Some(w) => parse_window(&w)?,
        None => defaults.window,
    };
    let format = match non_blank(adapter, "chart", "format") {
        Some(f) => f.parse::<ChartFormat>().map_err(|reason| CotError::ConfigInvalid {
            section: "chart".into(),
            key: "format".into(),
            reason,
        })?,
        None => defaults.format,
    };
    let width = non_blank(adapter, "chart", "width")
        .map(|w| parse_dimension(&w, "width"))
        .transpose()?;
    let height = non_blank(adapter, "chart", "height")
        .map(|h| parse_dimension(&h, "height"))
        .transpose()?;

    Ok(ReportConfig {
        data_path: adapter.get_path("data", "path"),
        delimiter,
        date_format: non_blank(adapter, "data", "date_format").unwrap_or(defaults.date_format),
        window,
        title: non_blank(adapter, "chart", "title").unwrap_or(defaults.title),
        start_date: parse_optional_date(adapter, "start_date")?,
        end_date: parse_optional_date(adapter, "end_date")?,
        format,
        output: adapter.get_path("chart", "output"),
        width,
        height,
    })
}

fn non_blank(adapter: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    adapter
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Config file settings with command-line overrides applied.
pub fn resolve_config(args: &DataArgs) -> Result<ReportConfig, CotError> {
    let mut config = match &args.config {
        Some(path) => {
            info!(path = %path.display(), "loading config");
            build_report_config(&load_config(path)?)?
        }
        None => ReportConfig::default(),
    };

    if let Some(data) = &args.data {
        config.data_path = Some(data.clone());
    }
    if let Some(window) = args.window {
        if window == 0 {
            return Err(CotError::ConfigInvalid {
                section: "indicators".into(),
                key: "window".into(),
                reason: "window must be a positive integer".into(),
            });
        }
        config.window = window;
    }
    Ok(config)
}

/// A chart bound: a date, or a date-time whose time of day is dropped.
pub fn parse_date_bound(value: &str) -> Result<NaiveDate, CotError> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Ok(date);
    }
    ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M"]
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(value, f).ok())
        .map(|dt| dt.date())
        .ok_or_else(|| CotError::InvalidDateBound {
            value: value.to_string(),
        })
}

pub fn data_adapter(config: &ReportConfig) -> Result<CsvAdapter, CotError> {
    let path = config
        .data_path
        .clone()
        .ok_or_else(|| CotError::ConfigMissing {
            section: "data".into(),
            key: "path".into(),
        })?;
    Ok(CsvAdapter::new(path)
        .with_delimiter(config.delimiter)
        .with_date_format(config.date_format.clone()))
}

pub fn chart_adapter(format: ChartFormat) -> Box<dyn ChartPort> {
    match format {
        ChartFormat::Json => Box::new(PlotlyJsonAdapter::new()),
        ChartFormat::Svg => Box::new(SvgChartAdapter::new()),
    }
}

/// Load and enrich a table through any data port.
pub fn load_enriched(
    data_port: &dyn CotDataPort,
    window: usize,
) -> Result<EnrichedTable, CotError> {
    let table = data_port.load_table()?;
    Ok(enrich(table, window))
}

/// Load, enrich, filter and assemble the chart described by `config`.
pub fn run_chart_pipeline(
    data_port: &dyn CotDataPort,
    config: &ReportConfig,
) -> Result<ChartSpec, CotError> {
    let enriched = load_enriched(data_port, config.window)?;
    let chart = build_chart(&enriched, config.start_date, config.end_date)
        .with_title(config.title.clone())
        .with_size(config.width, config.height);

    if chart.is_empty() {
        info!(
            start = ?config.start_date,
            end = ?config.end_date,
            "no rows in the requested range; chart is empty"
        );
    }
    Ok(chart)
}

fn run_chart(
    args: &DataArgs,
    start: Option<&str>,
    end: Option<&str>,
    output: Option<PathBuf>,
    format: Option<&str>,
) -> Result<(), CotError> {
    let mut config = resolve_config(args)?;
    if let Some(start) = start {
        config.start_date = Some(parse_date_bound(start)?);
    }
    if let Some(end) = end {
        config.end_date = Some(parse_date_bound(end)?);
    }
    if let Some(format) = format {
        config.format = format
            .parse::<ChartFormat>()
            .map_err(|reason| CotError::ConfigInvalid {
                section: "chart".into(),
                key: "format".into(),
                reason,
            })?;
    }
    if output.is_some() {
        config.output = output;
    }

    let data_port = data_adapter(&config)?;
    let chart = run_chart_pipeline(&data_port, &config)?;

    let output = config.output_path();
    chart_adapter(config.format).write(&chart, &output)?;
    info!(
        path = %output.display(),
        points = chart.x.len(),
        format = %config.format,
        "chart written"
    );
    println!("{}", output.display());
    Ok(())
}

fn run_enrich(args: &DataArgs, output: &Path) -> Result<(), CotError> {
    let config = resolve_config(args)?;
    let adapter = data_adapter(&config)?;
    let enriched = load_enriched(&adapter, config.window)?;
    adapter.write_enriched(&enriched, output)?;
    println!("{}", output.display());
    Ok(())
}

fn run_info(args: &DataArgs) -> Result<(), CotError> {
    let config = resolve_config(args)?;
    let adapter = data_adapter(&config)?;
    let enriched = load_enriched(&adapter, config.window)?;
    print!("{}", format_summary(&enriched));
    Ok(())
}

/// Row count, date range and the latest row's indicators.
pub fn format_summary(table: &EnrichedTable) -> String {
    let mut out = String::new();
    out.push_str(&format!("Rows:    {}\n", table.len()));

    let (Some((first, last)), Some(latest)) = (table.date_range(), table.latest()) else {
        out.push_str("No data.\n");
        return out;
    };
    out.push_str(&format!("Range:   {} to {}\n", first, last));
    out.push_str(&format!("Window:  {} rows\n", table.window));

    let d = &latest.derived;
    out.push_str(&format!("\n=== Latest report ({}) ===\n", latest.record.date));
    out.push_str(&format!("Cierre:  {}\n", latest.record.close));
    out.push_str(&format!("OI:      {}\n", latest.record.open_interest));
    for category in TraderCategory::ALL {
        let stats = d.positioning(category);
        out.push_str(&format!(
            "{:<7} net {:>10}  long {:>8}  short {:>8}  spread {:>8}\n",
            category.label(),
            stats.net,
            format_pct(stats.pct_long),
            format_pct(stats.pct_short),
            format_pct(stats.pct_spread),
        ));
    }

    let indicators = [
        (IndicatorType::CommercialIndex(table.window), d.commercial_index.index),
        (IndicatorType::OpenInterestIndex(table.window), d.open_interest_index.index),
        (IndicatorType::CommercialLongToOi, d.com_long_to_oi),
        (IndicatorType::CommercialShortToOi, d.com_short_to_oi),
    ];
    for (indicator, value) in indicators {
        let shown = match value {
            Some(_) => format_pct(value),
            None => "-".to_string(),
        };
        out.push_str(&format!("{}: {}\n", indicator, shown));
    }
    out
}

fn run_validate(config_path: &Path) -> Result<(), CotError> {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = load_config(config_path)?;
    let config = build_report_config(&adapter)?;

    match &config.data_path {
        Some(path) => eprintln!("  data:    {}", path.display()),
        None => eprintln!("  data:    (not set, pass --data)"),
    }
    eprintln!("  window:  {}", config.window);
    eprintln!("  format:  {}", config.format);
    if let (Some(start), Some(end)) = (config.start_date, config.end_date) {
        eprintln!("  range:   {} to {}", start, end);
    }
    eprintln!("\nConfiguration is valid.");
    Ok(())
}
