//! Paragraph-level elements and footnotes

use super::transparent;
use crate::convert::registry::HandlerRegistry;
use crate::convert::{Children, Converter, HandlerResult};
use crate::ir::nodes::{Admonition, NodeKind, OutputNode};
use crate::source::SourceElement;

pub fn register(registry: &mut HandlerRegistry) {
    registry.register_primary("para", para);
    registry.register_primary("simpara", para);
    registry.register_primary("blockquote", blockquote);
    registry.register_primary("epigraph", epigraph);
    registry.register_primary("note", note);
    registry.register_primary("caution", caution);
    registry.register_primary("important", important);
    registry.register_primary("tip", tip);
    registry.register_primary("warning", warning);
    for tag in ["literallayout", "screen", "programlisting"] {
        registry.register_primary(tag, literal_block);
    }
    for tag in ["informalexample", "set", "volume", "simplesect"] {
        registry.register_primary(tag, transparent);
    }
    registry.register_primary("footnote", footnote);
}

fn para(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    cx.block(el, parent, Some(NodeKind::Paragraph))
}

fn blockquote(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    cx.block(el, parent, Some(NodeKind::BlockQuote))
}

fn epigraph(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    cx.block(el, parent, Some(NodeKind::Epigraph))
}

fn admonition(
    cx: &mut Converter<'_>,
    el: &SourceElement,
    parent: &mut OutputNode,
    admonition: Admonition,
) -> HandlerResult {
    cx.block(el, parent, Some(NodeKind::Admonition { admonition }))
}

fn note(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    admonition(cx, el, parent, Admonition::Note)
}

fn caution(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    admonition(cx, el, parent, Admonition::Caution)
}

fn important(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    admonition(cx, el, parent, Admonition::Important)
}

fn tip(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    admonition(cx, el, parent, Admonition::Tip)
}

fn warning(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    admonition(cx, el, parent, Admonition::Warning)
}

// Literal blocks keep their whitespace: no trimming, no block flush.
fn literal_block(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    cx.concat(el, parent, Some(NodeKind::LiteralBlock))
}

/// A footnote reference in place, the body deferred until the enclosing
/// block is done.
fn footnote(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    let id = match cx.element_id(el) {
        Some(id) if cx.register_id(&id, el.line) => id,
        _ => cx.next_footnote_id(),
    };
    parent.push(OutputNode::new(NodeKind::FootnoteReference { refid: id.clone() }));

    let mut body = OutputNode::new(NodeKind::Footnote);
    body.ids.push(id);
    // Inner paragraphs are blocks of their own: footnotes nested in the
    // body land inside the body, not next to this one.
    let mut holder = OutputNode::new(NodeKind::Compound);
    cx.block_into(el, &mut holder, body, Children::Only(&["para", "simpara"]))?;
    for node in holder.children {
        cx.defer(node);
    }
    Ok(())
}
