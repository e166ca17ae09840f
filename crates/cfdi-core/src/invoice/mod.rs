//! Invoice record extraction.

mod parser;
pub mod rules;

pub use parser::{CfdiParser, ROOT_SUFFIX};

use std::path::Path;

use tracing::warn;

use crate::error::ExtractionError;
use crate::models::record::InvoiceRecord;

/// Result type for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Trait for invoice document parsers.
pub trait InvoiceParser {
    /// Parse one document into a record.
    fn parse(&self, text: &str, file_name: &str) -> Result<InvoiceRecord>;

    /// Parse one document, turning any failure into an error record.
    fn extract(&self, text: &str, file_name: &str) -> InvoiceRecord {
        self.parse(text, file_name).unwrap_or_else(|e| {
            warn!("Error in {}: {}", file_name, e);
            InvoiceRecord::from_error(file_name, &e)
        })
    }

    /// Read and extract a document from disk. Unreadable files become error records.
    fn extract_file(&self, path: &Path) -> InvoiceRecord {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        match std::fs::read_to_string(path) {
            Ok(text) => self.extract(&text, &file_name),
            Err(e) => {
                let error = ExtractionError::Read(e.to_string());
                warn!("Error in {}: {}", file_name, error);
                InvoiceRecord::from_error(file_name, &error)
            }
        }
    }
}
