//! Cross references, links and anchors
//!
//! Internal references show the target id as their text; turning it into a
//! real label is the renderer's job.

use crate::convert::registry::HandlerRegistry;
use crate::convert::{Converter, HandlerResult};
use crate::ir::nodes::{NodeKind, OutputNode};
use crate::source::{SourceElement, XLINK_NS};

pub fn register(registry: &mut HandlerRegistry) {
    registry.register_primary("xref", xref);
    registry.register_primary("link", link);
    registry.register_primary("ulink", ulink);
    registry.register_primary("anchor", anchor);
}

fn target(el: &SourceElement) -> Option<NodeKind> {
    if let Some(linkend) = el.attr("linkend") {
        return Some(NodeKind::Reference {
            refid: Some(linkend.to_string()),
            refuri: None,
        });
    }
    el.attr_ns(Some(XLINK_NS), "href").map(|href| NodeKind::Reference {
        refid: None,
        refuri: Some(href.to_string()),
    })
}

fn xref(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    let Some(kind) = target(el) else {
        cx.warning(el.line, "<xref> without linkend or xlink:href skipped");
        return Ok(());
    };
    let label = match &kind {
        NodeKind::Reference {
            refid: Some(id), ..
        } => id.clone(),
        NodeKind::Reference {
            refuri: Some(uri), ..
        } => uri.clone(),
        _ => String::new(),
    };
    let mut node = cx.create(el, kind);
    node.push(OutputNode::text(label));
    parent.push(node);
    Ok(())
}

fn link(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    match target(el) {
        Some(kind) => cx.concat(el, parent, Some(kind)),
        None => {
            cx.warning(el.line, "<link> without linkend or xlink:href");
            cx.concat(el, parent, None)
        }
    }
}

fn ulink(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    let kind = NodeKind::Reference {
        refid: None,
        refuri: el.attr("url").map(str::to_string),
    };
    cx.concat(el, parent, Some(kind))
}

fn anchor(cx: &mut Converter<'_>, el: &SourceElement, _parent: &mut OutputNode) -> HandlerResult {
    match cx.element_id(el) {
        Some(id) => cx.context_mut().queue_anchor(id),
        None => cx.warning(el.line, "<anchor> without id skipped"),
    }
    Ok(())
}
