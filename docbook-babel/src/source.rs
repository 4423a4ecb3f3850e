//! Source tree adapter
//!
//! XML parsing itself is left to `roxmltree`; this module copies its borrowed
//! tree into an owned, lxml-shaped element tree: every element has a leading
//! `text` and every child node carries the `tail` text that follows it. That
//! shape is what the dispatch engine walks when it concatenates text and
//! children in source order.

use crate::error::ConvertError;
use roxmltree::{NodeType, ParsingOptions};
use std::fmt;

/// Namespace of DocBook 5 elements.
pub const DOCBOOK_NS: &str = "http://docbook.org/ns/docbook";
/// Namespace of `xml:id`, `xml:base`.
pub const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";
/// Namespace of `xlink:href`.
pub const XLINK_NS: &str = "http://www.w3.org/1999/xlink";

/// Qualified name: optional namespace URI plus local name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    pub namespace: Option<String>,
    pub local: String,
}

impl QName {
    pub fn new(local: impl Into<String>) -> Self {
        QName {
            namespace: None,
            local: local.into(),
        }
    }

    pub fn namespaced(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        QName {
            namespace: Some(namespace.into()),
            local: local.into(),
        }
    }

    /// Does this name have the given namespace (`None` = no namespace) and local name?
    pub fn is(&self, namespace: Option<&str>, local: &str) -> bool {
        self.namespace.as_deref() == namespace && self.local == local
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{ns}}}{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

/// An element of the source tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceElement {
    pub name: QName,
    pub attributes: Vec<Attribute>,
    /// Text before the first child node.
    pub text: Option<String>,
    pub children: Vec<SourceNode>,
    /// Text after the closing tag, up to the next sibling.
    pub tail: Option<String>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceComment {
    pub text: String,
    pub tail: Option<String>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceInstruction {
    pub target: String,
    pub value: Option<String>,
    pub tail: Option<String>,
    pub line: u32,
}

/// A child of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceNode {
    Element(SourceElement),
    Comment(SourceComment),
    Instruction(SourceInstruction),
}

impl SourceNode {
    pub fn tail(&self) -> Option<&str> {
        match self {
            SourceNode::Element(el) => el.tail.as_deref(),
            SourceNode::Comment(c) => c.tail.as_deref(),
            SourceNode::Instruction(pi) => pi.tail.as_deref(),
        }
    }

    pub fn line(&self) -> u32 {
        match self {
            SourceNode::Element(el) => el.line,
            SourceNode::Comment(c) => c.line,
            SourceNode::Instruction(pi) => pi.line,
        }
    }

    pub fn as_element(&self) -> Option<&SourceElement> {
        match self {
            SourceNode::Element(el) => Some(el),
            _ => None,
        }
    }

    fn tail_mut(&mut self) -> &mut Option<String> {
        match self {
            SourceNode::Element(el) => &mut el.tail,
            SourceNode::Comment(c) => &mut c.tail,
            SourceNode::Instruction(pi) => &mut pi.tail,
        }
    }
}

impl SourceElement {
    pub fn new(name: QName) -> Self {
        SourceElement {
            name,
            attributes: Vec::new(),
            text: None,
            children: Vec::new(),
            tail: None,
            line: 0,
        }
    }

    pub fn local_name(&self) -> &str {
        &self.name.local
    }

    /// Value of an unqualified attribute.
    pub fn attr(&self, local: &str) -> Option<&str> {
        self.attr_ns(None, local)
    }

    /// Value of an attribute with the given namespace.
    pub fn attr_ns(&self, namespace: Option<&str>, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.is(namespace, local))
            .map(|a| a.value.as_str())
    }

    /// Child elements, skipping comments and processing instructions.
    pub fn elements(&self) -> impl Iterator<Item = &SourceElement> {
        self.children.iter().filter_map(SourceNode::as_element)
    }

    /// First child element with the given name.
    pub fn find(&self, namespace: Option<&str>, local: &str) -> Option<&SourceElement> {
        self.elements().find(|el| el.name.is(namespace, local))
    }

    /// All child elements with the given name.
    pub fn find_all(&self, namespace: Option<&str>, local: &str) -> Vec<&SourceElement> {
        self.elements()
            .filter(|el| el.name.is(namespace, local))
            .collect()
    }

    /// All text below this element (tails of descendants included, the
    /// element's own tail excluded).
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if let Some(text) = &self.text {
            out.push_str(text);
        }
        for child in &self.children {
            if let SourceNode::Element(el) = child {
                el.collect_text(out);
            }
            if let Some(tail) = child.tail() {
                out.push_str(tail);
            }
        }
    }
}

/// Parse `source` and return its root element.
///
/// DTDs are accepted because DocBook 4 files usually start with a DOCTYPE.
/// Anything `roxmltree` rejects is [`ConvertError::MalformedInput`].
pub fn parse(source: &str) -> Result<SourceElement, ConvertError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = roxmltree::Document::parse_with_options(source, options).map_err(|e| {
        ConvertError::MalformedInput {
            message: e.to_string(),
        }
    })?;
    Ok(build_element(&doc, doc.root_element()))
}

/// `xmlns=""` resets to no namespace; `roxmltree` reports it as empty.
fn non_empty(namespace: Option<&str>) -> Option<String> {
    namespace.filter(|ns| !ns.is_empty()).map(str::to_string)
}

fn line_of(doc: &roxmltree::Document, node: roxmltree::Node) -> u32 {
    doc.text_pos_at(node.range().start).row
}

fn build_element(doc: &roxmltree::Document, node: roxmltree::Node) -> SourceElement {
    let tag = node.tag_name();
    let mut element = SourceElement::new(QName {
        namespace: non_empty(tag.namespace()),
        local: tag.name().to_string(),
    });
    element.line = line_of(doc, node);
    element.attributes = node
        .attributes()
        .map(|a| Attribute {
            name: QName {
                namespace: non_empty(a.namespace()),
                local: a.name().to_string(),
            },
            value: a.value().to_string(),
        })
        .collect();

    for child in node.children() {
        match child.node_type() {
            NodeType::Text => {
                let text = child.text().unwrap_or("");
                // Text goes to the element until the first child node, then
                // to the tail of the preceding child.
                let slot = match element.children.last_mut() {
                    Some(last) => last.tail_mut(),
                    None => &mut element.text,
                };
                slot.get_or_insert_with(String::new).push_str(text);
            }
            NodeType::Element => {
                element
                    .children
                    .push(SourceNode::Element(build_element(doc, child)));
            }
            NodeType::Comment => {
                element.children.push(SourceNode::Comment(SourceComment {
                    text: child.text().unwrap_or("").to_string(),
                    tail: None,
                    line: line_of(doc, child),
                }));
            }
            NodeType::PI => {
                if let Some(pi) = child.pi() {
                    element
                        .children
                        .push(SourceNode::Instruction(SourceInstruction {
                            target: pi.target.to_string(),
                            value: pi.value.map(str::to_string),
                            tail: None,
                            line: line_of(doc, child),
                        }));
                }
            }
            NodeType::Root => {}
        }
    }
    element
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_text_into_leading_text_and_tails() {
        let root = parse("<para>Hello <emphasis>big</emphasis> world<!-- c --> end</para>").unwrap();
        assert_eq!(root.text.as_deref(), Some("Hello "));
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].tail(), Some(" world"));
        assert!(matches!(&root.children[1], SourceNode::Comment(c) if c.text == " c "));
        assert_eq!(root.children[1].tail(), Some(" end"));
    }

    #[test]
    fn keeps_namespaces_and_qualified_attributes() {
        let root = parse(
            r#"<article xmlns="http://docbook.org/ns/docbook" xml:id="top" version="5.0"><para/></article>"#,
        )
        .unwrap();
        assert!(root.name.is(Some(DOCBOOK_NS), "article"));
        assert_eq!(root.attr_ns(Some(XML_NS), "id"), Some("top"));
        assert_eq!(root.attr("version"), Some("5.0"));
        assert!(root.find(Some(DOCBOOK_NS), "para").is_some());
        assert!(root.find(None, "para").is_none());
    }

    #[test]
    fn reset_default_namespace_means_no_namespace() {
        let root = parse(r#"<article><para xmlns="" role="x">a</para></article>"#).unwrap();
        let para = root.find(None, "para").expect("para without namespace");
        assert_eq!(para.name.namespace, None);
        assert_eq!(para.attr("role"), Some("x"));

        let root = parse(r#"<article xmlns="http://docbook.org/ns/docbook"><b xmlns=""/></article>"#).unwrap();
        assert!(root.find(None, "b").is_some());
    }

    #[test]
    fn records_source_lines() {
        let root = parse("<book>\n<chapter/>\n\n<?pi data?></book>").unwrap();
        assert_eq!(root.line, 1);
        assert_eq!(root.children[0].line(), 2);
        assert!(matches!(&root.children[1], SourceNode::Instruction(pi) if pi.target == "pi" && pi.line == 4));
    }

    #[test]
    fn accepts_doctype() {
        let source = r#"<?xml version="1.0"?>
<!DOCTYPE book PUBLIC "-//OASIS//DTD DocBook XML V4.5//EN" "http://www.oasis-open.org/docbook/xml/4.5/docbookx.dtd">
<book><title>T</title></book>"#;
        let root = parse(source).unwrap();
        assert_eq!(root.local_name(), "book");
    }

    #[test]
    fn malformed_input_is_an_error() {
        let err = parse("<para>unclosed").unwrap_err();
        assert!(matches!(err, ConvertError::MalformedInput { .. }));
    }

    #[test]
    fn text_content_includes_descendant_tails() {
        let root = parse("<p>a<b>b<c>c</c>d</b>e</p>").unwrap();
        assert_eq!(root.text_content(), "abcde");
    }

    #[test]
    fn qname_display_uses_clark_notation() {
        assert_eq!(QName::namespaced("urn:x", "role").to_string(), "{urn:x}role");
        assert_eq!(QName::new("para").to_string(), "para");
    }
}
