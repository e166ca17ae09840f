//! CFDI document parser.

use tracing::debug;

use crate::error::ExtractionError;
use crate::models::record::{Identifier, InvoiceRecord};
use crate::xml::XmlNode;

use super::rules::{find_stamp, parse_amount, split_timestamp};
use super::{InvoiceParser, Result};

/// Local name of the CFDI root node.
pub const ROOT_SUFFIX: &str = "Comprobante";

/// Parser for CFDI 3.3 / 4.0 invoices.
///
/// Node lookups go through the namespace prefix of the root node instead of a
/// fixed namespace, so documents declaring `cfdi` under any URI (or not at
/// all) are read the same way.
#[derive(Debug, Clone, Copy, Default)]
pub struct CfdiParser;

impl CfdiParser {
    pub fn new() -> Self {
        Self
    }
}

impl InvoiceParser for CfdiParser {
    fn parse(&self, text: &str, file_name: &str) -> Result<InvoiceRecord> {
        let document = XmlNode::parse(text.trim_start_matches('\u{feff}'))?;

        if !document.key().ends_with(ROOT_SUFFIX) {
            return Err(ExtractionError::MissingRootNode);
        }
        let comprobante = &document;
        let prefix = &comprobante.key()[..comprobante.key().len() - ROOT_SUFFIX.len()];
        let child = |name: &str| comprobante.child(&format!("{prefix}{name}"));

        let emisor = child("Emisor");
        let receptor = child("Receptor");
        let impuestos = child("Impuestos");

        let identifier = child("Complemento")
            .and_then(find_stamp)
            .and_then(|stamp| stamp.attribute("UUID"))
            .map(Identifier::from_cell)
            .unwrap_or(Identifier::Unstamped);

        let (issue_date, issue_time) = split_timestamp(comprobante.attribute("Fecha"));

        let subtotal = parse_amount("SubTotal", comprobante.attribute("SubTotal"))?;
        let total = parse_amount("Total", comprobante.attribute("Total"))?;
        let withheld_taxes = parse_amount(
            "TotalImpuestosRetenidos",
            impuestos.and_then(|n| n.attribute("TotalImpuestosRetenidos")),
        )?;
        let transferred_taxes = parse_amount(
            "TotalImpuestosTrasladados",
            impuestos.and_then(|n| n.attribute("TotalImpuestosTrasladados")),
        )?;

        debug!("Extracted {} from {}", identifier, file_name);

        Ok(InvoiceRecord {
            identifier,
            issue_date,
            issue_time,
            issuer_rfc: attribute(emisor, "Rfc"),
            issuer_name: attribute(emisor, "Nombre"),
            receiver_rfc: attribute(receptor, "Rfc"),
            cfdi_use: attribute(receptor, "UsoCFDI"),
            subtotal,
            transferred_taxes,
            withheld_taxes,
            total,
            payment_form: attribute(Some(comprobante), "FormaPago"),
            payment_method: attribute(Some(comprobante), "MetodoPago"),
            folio: attribute(Some(comprobante), "Folio"),
            series: attribute(Some(comprobante), "Serie"),
            file_name: file_name.to_string(),
        })
    }
}

fn attribute(node: Option<&XmlNode>, name: &str) -> Option<String> {
    node.and_then(|n| n.attribute(name)).map(str::to_string)
}
