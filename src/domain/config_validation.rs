//! Configuration validation.
//!
//! Checks every config field before any data is loaded. Absent optional
//! keys are valid; present keys must parse.

use crate::domain::error::CotError;
use crate::domain::report_config::ChartFormat;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;

pub fn validate_config(config: &dyn ConfigPort) -> Result<(), CotError> {
    validate_data_config(config)?;
    validate_indicator_config(config)?;
    validate_chart_config(config)?;
    Ok(())
}

pub fn validate_data_config(config: &dyn ConfigPort) -> Result<(), CotError> {
    validate_path(config)?;
    validate_delimiter(config)?;
    validate_date_format(config)?;
    Ok(())
}

pub fn validate_indicator_config(config: &dyn ConfigPort) -> Result<(), CotError> {
    validate_window(config)
}

pub fn validate_chart_config(config: &dyn ConfigPort) -> Result<(), CotError> {
    validate_dates(config)?;
    validate_format(config)?;
    validate_dimension(config, "width")?;
    validate_dimension(config, "height")?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> CotError {
    CotError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

/// A key counts as set only when it holds non-blank text.
fn non_empty(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn validate_path(config: &dyn ConfigPort) -> Result<(), CotError> {
    match config.get_string("data", "path") {
        Some(s) if s.trim().is_empty() => Err(invalid("data", "path", "path must not be empty")),
        _ => Ok(()),
    }
}

fn validate_delimiter(config: &dyn ConfigPort) -> Result<(), CotError> {
    if let Some(value) = config.get_string("data", "delimiter") {
        parse_delimiter(&value)?;
    }
    Ok(())
}

/// A delimiter is one ASCII character. `tab`/`\t`, `space` and `semicolon`
/// name the delimiters an INI value cannot hold literally.
pub fn parse_delimiter(value: &str) -> Result<u8, CotError> {
    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("tab") || trimmed == "\\t" {
        return Ok(b'\t');
    }
    if trimmed.eq_ignore_ascii_case("space") {
        return Ok(b' ');
    }
    if trimmed.eq_ignore_ascii_case("semicolon") {
        return Ok(b';');
    }
    match trimmed.as_bytes() {
        [b] if b.is_ascii() => Ok(*b),
        _ => Err(invalid(
            "data",
            "delimiter",
            "delimiter must be a single ASCII character",
        )),
    }
}

fn validate_date_format(config: &dyn ConfigPort) -> Result<(), CotError> {
    if let Some(format) = config.get_string("data", "date_format") {
        if !format.contains('%') {
            return Err(invalid(
                "data",
                "date_format",
                "date_format must contain at least one % specifier",
            ));
        }
    }
    Ok(())
}

fn validate_window(config: &dyn ConfigPort) -> Result<(), CotError> {
    if let Some(value) = non_empty(config, "indicators", "window") {
        parse_window(&value)?;
    }
    Ok(())
}

pub fn parse_window(value: &str) -> Result<usize, CotError> {
    match value.trim().parse::<usize>() {
        Ok(w) if w >= 1 => Ok(w),
        _ => Err(invalid(
            "indicators",
            "window",
            "window must be a positive integer",
        )),
    }
}

fn validate_dates(config: &dyn ConfigPort) -> Result<(), CotError> {
    let start = parse_optional_date(config, "start_date")?;
    let end = parse_optional_date(config, "end_date")?;

    if let (Some(start), Some(end)) = (start, end) {
        if start > end {
            return Err(invalid(
                "chart",
                "start_date",
                "start_date must not be after end_date",
            ));
        }
    }
    Ok(())
}

pub fn parse_optional_date(
    config: &dyn ConfigPort,
    key: &str,
) -> Result<Option<NaiveDate>, CotError> {
    match non_empty(config, "chart", key) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| invalid("chart", key, format!("invalid {} format, expected YYYY-MM-DD", key))),
    }
}

fn validate_format(config: &dyn ConfigPort) -> Result<(), CotError> {
    if let Some(value) = non_empty(config, "chart", "format") {
        value
            .parse::<ChartFormat>()
            .map_err(|reason| invalid("chart", "format", reason))?;
    }
    Ok(())
}

fn validate_dimension(config: &dyn ConfigPort, key: &str) -> Result<(), CotError> {
    if let Some(value) = non_empty(config, "chart", key) {
        parse_dimension(&value, key)?;
    }
    Ok(())
}

pub fn parse_dimension(value: &str, key: &str) -> Result<u32, CotError> {
    match value.trim().parse::<u32>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(invalid(
            "chart",
            key,
            format!("{} must be a positive integer", key),
        )),
    }
}
