//! Error types for the cfdi-core library.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the cfdi library.
#[derive(Error, Debug)]
pub enum CfdiError {
    /// Invoice extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Report read/write error.
    #[error("report error: {0}")]
    Report(#[from] ReportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// The input directory does not exist or is not a directory.
    #[error("input directory '{}' does not exist", .0.display())]
    InputDirectoryMissing(PathBuf),

    /// An existing report could not be loaded.
    #[error("cannot read existing report '{}': {source}", path.display())]
    PriorDatasetUnreadable {
        path: PathBuf,
        #[source]
        source: ReportError,
    },
}

/// Errors raised while turning one document into an invoice record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractionError {
    /// The document has no `Comprobante` root node.
    #[error("root node 'Comprobante' not found")]
    MissingRootNode,

    /// A monetary attribute is present but not a number.
    #[error("invalid numeric value for {field}: '{value}'")]
    InvalidNumericField { field: String, value: String },

    /// The document is not well-formed XML.
    #[error("malformed XML: {0}")]
    Xml(String),

    /// The document could not be read from disk.
    #[error("cannot read document: {0}")]
    Read(String),
}

/// Errors related to loading and saving the tabular report.
#[derive(Error, Debug)]
pub enum ReportError {
    /// CSV reader/writer error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Workbook reader/writer error.
    #[error("XLSX error: {0}")]
    Xlsx(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The report path has an extension no store handles.
    #[error("unsupported report format: '{0}'")]
    UnsupportedFormat(String),
}

/// Result type for the cfdi library.
pub type Result<T> = std::result::Result<T, CfdiError>;
