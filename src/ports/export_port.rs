//! Enriched table export port trait.

use crate::domain::enrich::EnrichedTable;
use crate::domain::error::CotError;
use std::path::Path;

pub trait ExportPort {
    fn write_enriched(&self, table: &EnrichedTable, output_path: &Path) -> Result<(), CotError>;
}
