//! Core domain types and logic.

pub mod chart;
pub mod config_validation;
pub mod cot_record;
pub mod enrich;
pub mod error;
pub mod format;
pub mod indicator;
pub mod report_config;
