//! Fiscal stamp (`TimbreFiscalDigital`) lookup.

use crate::xml::XmlNode;

/// Key of the stamp node when the `tfd` prefix is used without a declaration.
pub const STAMP_KEY: &str = "tfd|TimbreFiscalDigital";

/// Local name of the stamp node.
pub const STAMP_SUFFIX: &str = "TimbreFiscalDigital";

/// Find the stamp inside a `Complemento` node.
///
/// The conventional key wins; otherwise the first child whose key ends with
/// `TimbreFiscalDigital` is used, whatever namespace it was declared under.
pub fn find_stamp(complemento: &XmlNode) -> Option<&XmlNode> {
    complemento
        .child(STAMP_KEY)
        .or_else(|| complemento.child_with_suffix(STAMP_SUFFIX))
}
