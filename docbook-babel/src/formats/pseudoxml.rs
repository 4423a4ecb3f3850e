//! Pseudo-XML dump of the output tree
//!
//! One line per node, four spaces of indentation per level. Elements are
//! written as opening tags only; text leaves are written as their text, one
//! line per source line.
//!
//! ```text
//! <document ids="guide">
//!     <section level="1">
//!         <title>
//!             Intro
//!         <paragraph>
//!             Hello
//!             <emphasis>
//!                 world
//! ```
//!
//! Attributes come in a fixed order: the kind's own fields, then `ids`, then
//! `classes`.

use crate::error::ConvertError;
use crate::format::Format;
use crate::ir::nodes::{Document, NodeKind, OutputNode};
use std::fmt::Write;

const INDENT: &str = "    ";

pub struct PseudoXmlFormat;

impl Format for PseudoXmlFormat {
    fn name(&self) -> &str {
        "pseudoxml"
    }

    fn description(&self) -> &str {
        "Indented tag dump of the output tree"
    }

    fn file_extensions(&self) -> &[&str] {
        &["pxml"]
    }

    fn serialize(&self, doc: &Document) -> Result<String, ConvertError> {
        Ok(to_pseudoxml(&doc.root))
    }
}

/// Dump `node` and its subtree.
pub fn to_pseudoxml(node: &OutputNode) -> String {
    let mut out = String::new();
    write_node(&mut out, node, 0);
    out
}

fn write_node(out: &mut String, node: &OutputNode, depth: usize) {
    let indent = INDENT.repeat(depth);
    if let NodeKind::Text { text } = &node.kind {
        for line in text.lines() {
            let _ = writeln!(out, "{indent}{line}");
        }
        return;
    }

    let _ = write!(out, "{indent}<{}", node.kind.tag_name());
    for (name, value) in attributes(&node.kind) {
        let _ = write!(out, " {name}=\"{}\"", escape(&value));
    }
    if !node.ids.is_empty() {
        let _ = write!(out, " ids=\"{}\"", escape(&node.ids.join(" ")));
    }
    if !node.classes.is_empty() {
        let _ = write!(out, " classes=\"{}\"", escape(&node.classes.join(" ")));
    }
    out.push_str(">\n");

    let inner = INDENT.repeat(depth + 1);
    match &node.kind {
        NodeKind::Comment { text } => {
            for line in text.lines() {
                let _ = writeln!(out, "{inner}{line}");
            }
        }
        NodeKind::Navigation { entries, .. } => {
            for entry in entries {
                let _ = writeln!(out, "{inner}{} <{}>", entry.title, entry.document);
            }
        }
        _ => {}
    }
    for child in &node.children {
        write_node(out, child, depth + 1);
    }
}

fn attributes(kind: &NodeKind) -> Vec<(&'static str, String)> {
    match kind {
        NodeKind::Section { level } => vec![("level", level.to_string())],
        NodeKind::BulletList { bullet } => vec![("bullet", bullet.clone())],
        NodeKind::EnumeratedList {
            enumtype,
            prefix,
            suffix,
        } => vec![
            ("enumtype", enumtype.as_str().to_string()),
            ("prefix", prefix.clone()),
            ("suffix", suffix.clone()),
        ],
        NodeKind::Reference { refid, refuri } => refid
            .iter()
            .map(|id| ("refid", id.clone()))
            .chain(refuri.iter().map(|uri| ("refuri", uri.clone())))
            .collect(),
        NodeKind::FootnoteReference { refid } => vec![("refid", refid.clone())],
        NodeKind::Placeholder { target, resource } => vec![
            ("target", target.to_string()),
            ("resource", resource.clone()),
        ],
        NodeKind::Navigation { hidden: true, .. } => vec![("hidden", "True".to_string())],
        NodeKind::ApiDescription { domain, objtype } => std::iter::once(("domain", domain.clone()))
            .chain(objtype.map(|o| ("objtype", o.as_str().to_string())))
            .collect(),
        _ => Vec::new(),
    }
}

fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
