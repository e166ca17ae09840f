//! Report persistence.
//!
//! The report is a single table whose first row holds the column headers. The
//! file extension picks the store: `.xlsx` workbooks or `.csv` files.

mod csv;
mod xlsx;

pub use self::csv::CsvReport;
pub use self::xlsx::XlsxReport;

use std::path::Path;

use tracing::debug;

use crate::error::ReportError;
use crate::models::dataset::Dataset;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;

/// Trait for report file formats.
pub trait ReportStore {
    /// Read every row of an existing report.
    fn read(&self, path: &Path) -> Result<Dataset>;

    /// Write every row, replacing any previous content.
    fn write(&self, path: &Path, dataset: &Dataset) -> Result<()>;
}

/// Supported report file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Xlsx,
    Csv,
}

impl ReportFormat {
    /// Determine the format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();

        match extension.as_str() {
            "xlsx" => Ok(ReportFormat::Xlsx),
            "csv" => Ok(ReportFormat::Csv),
            _ => Err(ReportError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn store(self) -> Box<dyn ReportStore> {
        match self {
            ReportFormat::Xlsx => Box::new(XlsxReport::new()),
            ReportFormat::Csv => Box::new(CsvReport::new()),
        }
    }
}

/// Load a report, or `None` if the file does not exist yet.
pub fn load_report(path: &Path) -> Result<Option<Dataset>> {
    let format = ReportFormat::from_path(path)?;
    if !path.exists() {
        return Ok(None);
    }

    let dataset = format.store().read(path)?;
    debug!(
        "Loaded {} rows, {} columns from {}",
        dataset.len(),
        dataset.columns().len(),
        path.display()
    );
    Ok(Some(dataset))
}

/// Write a report, overwriting the file.
pub fn save_report(path: &Path, dataset: &Dataset) -> Result<()> {
    ReportFormat::from_path(path)?.store().write(path, dataset)?;
    debug!("Wrote {} rows to {}", dataset.len(), path.display());
    Ok(())
}
