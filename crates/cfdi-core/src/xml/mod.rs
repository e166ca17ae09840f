//! Minimal XML element tree.
//!
//! Elements are keyed `"<namespace>|<local>"`: the namespace is the URI bound
//! to the element's prefix, or the raw prefix when the document never declares
//! it. Elements in no namespace are keyed by their local name. Attributes follow
//! the same rule, so unprefixed attributes are looked up by their plain name.

use quick_xml::NsReader;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;

use crate::error::ExtractionError;

/// Separator between namespace and local name in element keys.
pub const NAMESPACE_SEPARATOR: char = '|';

/// Result type for XML parsing.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// One element of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlNode {
    key: String,
    attributes: Vec<(String, String)>,
    children: Vec<XmlNode>,
}

impl XmlNode {
    /// Parse a whole document and return its root element.
    pub fn parse(text: &str) -> Result<Self> {
        let mut reader = NsReader::from_str(text);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlNode> = Vec::new();
        let mut root: Option<XmlNode> = None;

        loop {
            match reader.read_resolved_event() {
                Ok((ns, Event::Start(e))) => {
                    if root.is_some() {
                        return Err(trailing_content());
                    }
                    let key = qualified_key(ns, e.local_name().as_ref());
                    stack.push(Self::from_start(&reader, key, &e)?);
                }
                Ok((ns, Event::Empty(e))) => {
                    if root.is_some() {
                        return Err(trailing_content());
                    }
                    let key = qualified_key(ns, e.local_name().as_ref());
                    let node = Self::from_start(&reader, key, &e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => root = Some(node),
                    }
                }
                Ok((_, Event::End(_))) => {
                    let node = stack
                        .pop()
                        .ok_or_else(|| ExtractionError::Xml("unexpected closing tag".to_string()))?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => root = Some(node),
                    }
                }
                Ok((_, Event::Eof)) => break,
                // Text, CDATA, comments, declarations and processing instructions carry no fields.
                Ok(_) => {}
                Err(e) => return Err(ExtractionError::Xml(e.to_string())),
            }
        }

        if let Some(open) = stack.last() {
            return Err(ExtractionError::Xml(format!(
                "unexpected end of document inside <{}>",
                open.key
            )));
        }

        root.ok_or_else(|| ExtractionError::Xml("no element found".to_string()))
    }

    fn from_start(reader: &NsReader<&[u8]>, key: String, e: &BytesStart) -> Result<Self> {
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr.map_err(|err| ExtractionError::Xml(err.to_string()))?;
            let raw_key = attr.key.as_ref();
            if raw_key == b"xmlns" || raw_key.starts_with(b"xmlns:") {
                continue;
            }

            let (attr_ns, local) = reader.resolve_attribute(attr.key);
            let name = qualified_key(attr_ns, local.as_ref());
            let value = attr
                .unescape_value()
                .map_err(|err| ExtractionError::Xml(err.to_string()))?
                .into_owned();
            attributes.push((name, value));
        }

        Ok(Self {
            key,
            attributes,
            children: Vec::new(),
        })
    }

    /// Namespace-qualified element key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Value of an attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// First child element with exactly this key.
    pub fn child(&self, key: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.key == key)
    }

    /// First child element whose key ends with `suffix`.
    pub fn child_with_suffix(&self, suffix: &str) -> Option<&XmlNode> {
        self.children.iter().find(|c| c.key.ends_with(suffix))
    }

    /// Child elements in document order.
    pub fn children(&self) -> impl Iterator<Item = &XmlNode> {
        self.children.iter()
    }
}

fn qualified_key(ns: ResolveResult, local: &[u8]) -> String {
    let local = String::from_utf8_lossy(local);
    match ns {
        ResolveResult::Bound(namespace) => format!(
            "{}{}{}",
            String::from_utf8_lossy(namespace.as_ref()),
            NAMESPACE_SEPARATOR,
            local
        ),
        ResolveResult::Unknown(prefix) => format!(
            "{}{}{}",
            String::from_utf8_lossy(&prefix),
            NAMESPACE_SEPARATOR,
            local
        ),
        ResolveResult::Unbound => local.into_owned(),
    }
}

fn trailing_content() -> ExtractionError {
    ExtractionError::Xml("junk after document element".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bound_namespace_uses_uri() {
        let root = XmlNode::parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
            <cfdi:Comprobante xmlns:cfdi="http://www.sat.gob.mx/cfd/4" Total="10.00">
                <cfdi:Emisor Rfc="AAA010101AAA"/>
            </cfdi:Comprobante>"#,
        )
        .unwrap();

        assert_eq!(root.key(), "http://www.sat.gob.mx/cfd/4|Comprobante");
        assert_eq!(root.attribute("Total"), Some("10.00"));
        assert_eq!(root.attribute("xmlns:cfdi"), None);

        let emisor = root.child("http://www.sat.gob.mx/cfd/4|Emisor").unwrap();
        assert_eq!(emisor.attribute("Rfc"), Some("AAA010101AAA"));
    }

    #[test]
    fn test_undeclared_prefix_is_kept() {
        let root = XmlNode::parse(r#"<cfdi:Comprobante><tfd:TimbreFiscalDigital UUID="X"/></cfdi:Comprobante>"#)
            .unwrap();

        assert_eq!(root.key(), "cfdi|Comprobante");
        assert!(root.child("tfd|TimbreFiscalDigital").is_some());
    }

    #[test]
    fn test_default_namespace_and_plain_elements() {
        let root = XmlNode::parse(r#"<Comprobante xmlns="urn:x"><Emisor/></Comprobante>"#).unwrap();
        assert_eq!(root.key(), "urn:x|Comprobante");

        let root = XmlNode::parse("<Factura><Emisor/></Factura>").unwrap();
        assert_eq!(root.key(), "Factura");
        assert_eq!(root.children().count(), 1);
    }

    #[test]
    fn test_prefixed_attribute_is_qualified() {
        let root = XmlNode::parse(
            r#"<a xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="loc"/>"#,
        )
        .unwrap();

        assert_eq!(
            root.attribute("http://www.w3.org/2001/XMLSchema-instance|schemaLocation"),
            Some("loc")
        );
        assert_eq!(root.attribute("schemaLocation"), None);
    }

    #[test]
    fn test_escaped_attribute_values() {
        let root = XmlNode::parse(r#"<a Nombre="A &amp; B"/>"#).unwrap();
        assert_eq!(root.attribute("Nombre"), Some("A & B"));
    }

    #[test]
    fn test_suffix_lookup_takes_first_match() {
        let root = XmlNode::parse(
            r#"<c><x:Otro/><a:TimbreFiscalDigital UUID="1"/><b:TimbreFiscalDigital UUID="2"/></c>"#,
        )
        .unwrap();

        let stamp = root.child_with_suffix("TimbreFiscalDigital").unwrap();
        assert_eq!(stamp.attribute("UUID"), Some("1"));
    }

    #[test]
    fn test_malformed_documents() {
        assert!(matches!(XmlNode::parse(""), Err(ExtractionError::Xml(_))));
        assert!(matches!(XmlNode::parse("not xml at all"), Err(ExtractionError::Xml(_))));
        assert!(matches!(XmlNode::parse("<a><b></a>"), Err(ExtractionError::Xml(_))));
        assert!(matches!(XmlNode::parse("<a><b/>"), Err(ExtractionError::Xml(_))));
        assert!(matches!(XmlNode::parse("<a/><b/>"), Err(ExtractionError::Xml(_))));
    }
}
