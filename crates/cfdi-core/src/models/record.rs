//! Invoice record data model.
//!
//! One [`InvoiceRecord`] is one row of the report. Text fields that the
//! source document may omit are kept as `Option<String>` and only become the
//! [`NOT_AVAILABLE`] sentinel when the record is turned into report cells.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use super::dataset::Cell;
use crate::error::ExtractionError;

/// Sentinel written for any value the source document did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// Identifier written for rows that record an extraction failure.
pub const ERROR_MARKER: &str = "ERROR";

/// Header of the unique identifier column.
pub const IDENTIFIER_COLUMN: &str = "UUID";

/// Report headers in output order.
pub const COLUMNS: [&str; 16] = [
    IDENTIFIER_COLUMN,
    "Fecha",
    "Hora",
    "RFC Emisor",
    "Nombre Emisor",
    "RFC Receptor",
    "Uso CFDI",
    "SubTotal",
    "Total Trasladado",
    "Total Retenido",
    "Total",
    "Forma Pago",
    "Metodo Pago",
    "Folio",
    "Serie",
    "Archivo XML",
];

/// The fiscal stamp identifier of a record.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Identifier {
    /// UUID assigned by the stamping service.
    Stamped(String),
    /// The document carried no stamp (or the stamp had no UUID).
    Unstamped,
    /// The row records an extraction failure.
    Error,
}

impl Identifier {
    /// Interpret a report cell value as an identifier.
    pub fn from_cell(value: &str) -> Self {
        match value.trim() {
            ERROR_MARKER => Identifier::Error,
            "" | NOT_AVAILABLE => Identifier::Unstamped,
            uuid => Identifier::Stamped(uuid.to_string()),
        }
    }

    /// Returns the stamp UUID, if this identifier can take part in deduplication.
    pub fn stamp(&self) -> Option<&str> {
        match self {
            Identifier::Stamped(uuid) => Some(uuid),
            Identifier::Unstamped | Identifier::Error => None,
        }
    }

    /// Report representation.
    pub fn as_str(&self) -> &str {
        match self {
            Identifier::Stamped(uuid) => uuid,
            Identifier::Unstamped => NOT_AVAILABLE,
            Identifier::Error => ERROR_MARKER,
        }
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Identifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A normalized CFDI invoice, or a row describing why one could not be read.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceRecord {
    /// Fiscal stamp UUID.
    pub identifier: Identifier,

    /// Issue date (`YYYY-MM-DD` part of `Fecha`). Holds the failure
    /// description on error rows.
    pub issue_date: Option<String>,

    /// Issue time (part of `Fecha` after the `T`).
    pub issue_time: Option<String>,

    /// Issuer RFC.
    pub issuer_rfc: Option<String>,

    /// Issuer legal name.
    pub issuer_name: Option<String>,

    /// Receiver RFC.
    pub receiver_rfc: Option<String>,

    /// Usage code declared by the receiver (`UsoCFDI`).
    pub cfdi_use: Option<String>,

    pub subtotal: Decimal,

    /// Sum of transferred taxes (`TotalImpuestosTrasladados`).
    pub transferred_taxes: Decimal,

    /// Sum of withheld taxes (`TotalImpuestosRetenidos`).
    pub withheld_taxes: Decimal,

    pub total: Decimal,

    /// SAT payment form code (`FormaPago`).
    pub payment_form: Option<String>,

    /// SAT payment method code (`MetodoPago`).
    pub payment_method: Option<String>,

    pub folio: Option<String>,

    pub series: Option<String>,

    /// Name of the XML file the record came from.
    pub file_name: String,
}

impl InvoiceRecord {
    /// Build the row that stands in for a document that failed extraction.
    pub fn from_error(file_name: impl Into<String>, error: &ExtractionError) -> Self {
        Self {
            identifier: Identifier::Error,
            issue_date: Some(format!("Error: {}", error)),
            issue_time: None,
            issuer_rfc: None,
            issuer_name: None,
            receiver_rfc: None,
            cfdi_use: None,
            subtotal: zero_amount(),
            transferred_taxes: zero_amount(),
            withheld_taxes: zero_amount(),
            total: zero_amount(),
            payment_form: None,
            payment_method: None,
            folio: None,
            series: None,
            file_name: file_name.into(),
        }
    }

    /// Check whether this row records an extraction failure.
    pub fn is_error(&self) -> bool {
        self.identifier == Identifier::Error
    }

    /// Report cells in [`COLUMNS`] order, with absent values replaced by the sentinel.
    pub fn to_cells(&self) -> Vec<Cell> {
        vec![
            Cell::Text(self.identifier.as_str().to_string()),
            text_or_sentinel(&self.issue_date),
            text_or_sentinel(&self.issue_time),
            text_or_sentinel(&self.issuer_rfc),
            text_or_sentinel(&self.issuer_name),
            text_or_sentinel(&self.receiver_rfc),
            text_or_sentinel(&self.cfdi_use),
            Cell::Number(self.subtotal),
            Cell::Number(self.transferred_taxes),
            Cell::Number(self.withheld_taxes),
            Cell::Number(self.total),
            text_or_sentinel(&self.payment_form),
            text_or_sentinel(&self.payment_method),
            text_or_sentinel(&self.folio),
            text_or_sentinel(&self.series),
            Cell::Text(self.file_name.clone()),
        ]
    }
}

/// `0.00`, the amount used when the document gives none.
pub fn zero_amount() -> Decimal {
    Decimal::new(0, 2)
}

fn text_or_sentinel(value: &Option<String>) -> Cell {
    Cell::Text(value.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_from_cell() {
        assert_eq!(Identifier::from_cell("ERROR"), Identifier::Error);
        assert_eq!(Identifier::from_cell("N/A"), Identifier::Unstamped);
        assert_eq!(Identifier::from_cell("  "), Identifier::Unstamped);
        assert_eq!(
            Identifier::from_cell(" 6F1E2D3C-0000-4A4A-9B9B-112233445566 "),
            Identifier::Stamped("6F1E2D3C-0000-4A4A-9B9B-112233445566".to_string())
        );
    }

    #[test]
    fn test_error_record_shape() {
        let record = InvoiceRecord::from_error("broken.xml", &ExtractionError::MissingRootNode);
        let cells = record.to_cells();

        assert_eq!(cells.len(), COLUMNS.len());
        assert_eq!(cells[0], Cell::Text("ERROR".to_string()));
        assert_eq!(
            cells[1],
            Cell::Text("Error: root node 'Comprobante' not found".to_string())
        );
        assert_eq!(cells[2], Cell::Text("N/A".to_string()));
        assert_eq!(cells[7], Cell::Number(Decimal::new(0, 2)));
        assert_eq!(cells[15], Cell::Text("broken.xml".to_string()));
        assert!(record.is_error());
    }

    #[test]
    fn test_sentinel_only_at_cell_boundary() {
        let mut record = InvoiceRecord::from_error("a.xml", &ExtractionError::MissingRootNode);
        record.identifier = Identifier::Unstamped;
        record.folio = Some("123".to_string());

        assert_eq!(record.series, None);
        let cells = record.to_cells();
        assert_eq!(cells[0], Cell::Text("N/A".to_string()));
        assert_eq!(cells[13], Cell::Text("123".to_string()));
        assert_eq!(cells[14], Cell::Text("N/A".to_string()));
    }
}
