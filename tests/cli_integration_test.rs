//! CLI orchestration tests: config building, overrides, date bounds and the
//! chart pipeline against mock ports and real files on disk.

mod common;

use common::*;
use cotreport::adapters::file_config_adapter::FileConfigAdapter;
use cotreport::cli::{self, DataArgs};
use cotreport::domain::chart::COMMERCIAL_SERIES;
use cotreport::domain::enrich::enrich;
use cotreport::domain::error::CotError;
use cotreport::domain::report_config::{ChartFormat, ReportConfig};
use cotreport::ports::chart_port::ChartPort;
use cotreport::ports::data_port::CotDataPort;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

fn write_temp(content: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

const VALID_INI: &str = r#"
[data]
path = datos/Datos Informe COT.csv
delimiter = semicolon
date_format = %d/%m/%Y

[indicators]
window = 52

[chart]
title = Oro
start_date = 2004-01-01
end_date = 2024-12-31
format = svg
output = out/oro.svg
width = 1200
height = 700
"#;

mod config_building {
    use super::*;

    #[test]
    fn full_config() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let config = cli::build_report_config(&adapter).unwrap();
        assert_eq!(
            config.data_path,
            Some(PathBuf::from("datos/Datos Informe COT.csv"))
        );
        assert_eq!(config.delimiter, b';');
        assert_eq!(config.date_format, "%d/%m/%Y");
        assert_eq!(config.window, 52);
        assert_eq!(config.title, "Oro");
        assert_eq!(config.start_date, Some(date(2004, 1, 1)));
        assert_eq!(config.end_date, Some(date(2024, 12, 31)));
        assert_eq!(config.format, ChartFormat::Svg);
        assert_eq!(config.output_path(), PathBuf::from("out/oro.svg"));
        assert_eq!(config.width, Some(1200));
        assert_eq!(config.height, Some(700));
    }

    #[test]
    fn empty_config_uses_defaults() {
        let adapter = FileConfigAdapter::from_string("[data]\n").unwrap();
        let config = cli::build_report_config(&adapter).unwrap();
        assert_eq!(config, ReportConfig::default());
    }

    #[test]
    fn invalid_window_is_rejected() {
        let adapter = FileConfigAdapter::from_string("[indicators]\nwindow = 0\n").unwrap();
        let err = cli::build_report_config(&adapter).unwrap_err();
        assert!(matches!(err, CotError::ConfigInvalid { ref key, .. } if key == "window"));
        assert_eq!(ExitCode::from(&err), ExitCode::from(2));
    }

    #[test]
    fn load_config_reports_missing_file() {
        let err = cli::load_config(std::path::Path::new("/nonexistent/cot.ini")).unwrap_err();
        assert!(matches!(err, CotError::ConfigParse { .. }));
    }

    #[test]
    fn flags_override_file() {
        let ini = write_temp(VALID_INI, ".ini");
        let args = DataArgs {
            config: Some(ini.path().to_path_buf()),
            data: Some(PathBuf::from("other.csv")),
            window: Some(10),
        };
        let config = cli::resolve_config(&args).unwrap();
        assert_eq!(config.data_path, Some(PathBuf::from("other.csv")));
        assert_eq!(config.window, 10);
        assert_eq!(config.title, "Oro");
    }

    #[test]
    fn zero_window_flag_is_rejected() {
        let args = DataArgs {
            window: Some(0),
            ..Default::default()
        };
        assert!(cli::resolve_config(&args).is_err());
    }

    #[test]
    fn missing_data_path_is_reported() {
        let err = cli::data_adapter(&ReportConfig::default()).unwrap_err();
        assert!(matches!(err, CotError::ConfigMissing { ref key, .. } if key == "path"));
    }
}

mod date_bounds {
    use super::*;

    #[test]
    fn plain_date() {
        assert_eq!(cli::parse_date_bound("2023-06-30").unwrap(), date(2023, 6, 30));
    }

    #[test]
    fn time_of_day_is_dropped() {
        assert_eq!(
            cli::parse_date_bound("2023-06-30 23:59:59").unwrap(),
            date(2023, 6, 30)
        );
        assert_eq!(
            cli::parse_date_bound("2023-06-30T08:00").unwrap(),
            date(2023, 6, 30)
        );
    }

    #[test]
    fn garbage_is_rejected() {
        let err = cli::parse_date_bound("30/06/2023").unwrap_err();
        assert!(matches!(err, CotError::InvalidDateBound { .. }));
        assert_eq!(ExitCode::from(&err), ExitCode::from(2));
    }
}

mod chart_pipeline {
    use super::*;

    #[test]
    fn applies_range_title_and_size() {
        let port = MockDataPort::new(synthetic_table(200));
        let config = ReportConfig {
            title: "Oro".into(),
            start_date: Some(date(2022, 1, 1)),
            end_date: Some(date(2022, 3, 31)),
            width: Some(800),
            ..Default::default()
        };
        let chart = cli::run_chart_pipeline(&port, &config).unwrap();
        assert_eq!(chart.title, "Oro");
        assert_eq!(chart.width, Some(800));
        assert_eq!(chart.height, None);
        assert_eq!(chart.x.len(), 13);
        assert_eq!(chart.series(COMMERCIAL_SERIES).unwrap().values.len(), 13);
    }

    #[test]
    fn range_outside_data_yields_empty_chart() {
        let port = MockDataPort::new(synthetic_table(20));
        let config = ReportConfig {
            start_date: Some(date(1999, 1, 1)),
            end_date: Some(date(1999, 12, 31)),
            ..Default::default()
        };
        let chart = cli::run_chart_pipeline(&port, &config).unwrap();
        assert!(chart.is_empty());
    }

    #[test]
    fn data_error_is_propagated() {
        let port = MockDataPort::failing("unreadable");
        let err = cli::run_chart_pipeline(&port, &ReportConfig::default()).unwrap_err();
        assert_eq!(ExitCode::from(&err), ExitCode::from(1));
    }

    #[test]
    fn chart_adapter_matches_format() {
        let port = MockDataPort::new(synthetic_table(5));
        let chart = cli::run_chart_pipeline(&port, &ReportConfig::default()).unwrap();
        let svg = cli::chart_adapter(ChartFormat::Svg).render(&chart).unwrap();
        assert!(svg.starts_with("<svg"));
        let json = cli::chart_adapter(ChartFormat::Json).render(&chart).unwrap();
        assert!(json.starts_with('{'));
    }
}

mod files_on_disk {
    use super::*;

    #[test]
    fn csv_and_ini_through_data_adapter() {
        let csv = write_temp(&sample_csv(), ".csv");
        let ini = write_temp(
            &format!("[data]\npath = {}\n[indicators]\nwindow = 2\n", csv.path().display()),
            ".ini",
        );
        let args = DataArgs {
            config: Some(ini.path().to_path_buf()),
            ..Default::default()
        };
        let config = cli::resolve_config(&args).unwrap();
        let adapter = cli::data_adapter(&config).unwrap();
        let enriched = cli::load_enriched(&adapter, config.window).unwrap();
        assert_eq!(enriched.len(), 3);
        assert_eq!(enriched.window, 2);

        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("charts").join("cot.json");
        let chart = cli::run_chart_pipeline(&adapter, &config).unwrap();
        cli::chart_adapter(ChartFormat::Json)
            .write(&chart, &out)
            .unwrap();
        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
        assert_eq!(written["data"][0]["x"][0], "02 Jan 24");
    }

    #[test]
    fn missing_column_is_a_data_error() {
        let csv = write_temp("Fecha,Cierre\n2024-01-02,2064.4\n", ".csv");
        let config = ReportConfig {
            data_path: Some(csv.path().to_path_buf()),
            ..Default::default()
        };
        let adapter = cli::data_adapter(&config).unwrap();
        let err = adapter.load_table().unwrap_err();
        assert!(matches!(err, CotError::MissingColumn { ref column } if column == "OI"));
        assert_eq!(ExitCode::from(&err), ExitCode::from(3));
    }
}

mod summary {
    use super::*;

    #[test]
    fn lists_latest_indicators() {
        let enriched = enrich(synthetic_table(160), 156);
        let text = cli::format_summary(&enriched);
        assert!(text.contains("Rows:    160"));
        assert!(text.contains("Range:   2021-01-05 to"));
        assert!(text.contains("Índice Com(156): "));
        assert!(text.contains("CL/OI: "));
        assert!(text.contains("NC"));
        assert!(text.contains("Retail"));
    }

    #[test]
    fn indicator_lines_in_order() {
        let enriched = enrich(synthetic_table(3), 156);
        let text = cli::format_summary(&enriched);
        let lines: Vec<&str> = text.lines().rev().take(4).collect();
        assert!(lines[3].starts_with("Índice Com(156): "));
        assert!(lines[2].starts_with("Índice OI(156): "));
        assert!(lines[1].starts_with("CL/OI: "));
        assert!(lines[0].starts_with("CS/OI: "));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn warmup_values_show_dash() {
        let enriched = enrich(synthetic_table(3), 156);
        let text = cli::format_summary(&enriched);
        assert!(text.contains("Índice Com(156): -"));
    }

    #[test]
    fn empty_table() {
        let enriched = enrich(Default::default(), 156);
        let text = cli::format_summary(&enriched);
        assert!(text.contains("Rows:    0"));
        assert!(text.contains("No data."));
    }
}
