//! Chart rendering port trait.

use crate::domain::chart::ChartSpec;
use crate::domain::error::CotError;
use std::path::Path;

/// Port for turning a chart specification into a file for a display surface.
pub trait ChartPort {
    /// Render the chart to a string in the adapter's format.
    fn render(&self, chart: &ChartSpec) -> Result<String, CotError>;

    /// Default implementation: renders, creates parent directories, writes.
    fn write(&self, chart: &ChartSpec, output_path: &Path) -> Result<(), CotError> {
        let content = self.render(chart)?;
        if let Some(parent) = output_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(output_path, content)?;
        Ok(())
    }
}
