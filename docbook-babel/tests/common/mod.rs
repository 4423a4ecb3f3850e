//! Shared helpers for the integration tests

use docbook_babel::{convert_str, Diagnostic, Document, FormatRegistry, OutputNode};

pub fn convert(source: &str) -> (Document, Vec<Diagnostic>) {
    convert_str("test", source).expect("conversion failed")
}

pub fn pseudoxml(doc: &Document) -> String {
    FormatRegistry::default()
        .serialize(doc, "pseudoxml")
        .expect("pseudoxml to serialize")
}

/// Tag names of the direct children of `node`.
pub fn kinds(node: &OutputNode) -> Vec<&'static str> {
    node.children.iter().map(|c| c.kind.tag_name()).collect()
}
