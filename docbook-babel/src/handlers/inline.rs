//! Inline markup

use crate::convert::registry::HandlerRegistry;
use crate::convert::{Children, Converter, HandlerResult};
use crate::ir::nodes::{NodeKind, OutputNode};
use crate::source::SourceElement;

pub fn register(registry: &mut HandlerRegistry) {
    for tag in ["emphasis", "citetitle", "replaceable"] {
        registry.register_primary(tag, emphasis);
    }
    registry.register_primary("phrase", phrase);
    for tag in [
        "literal",
        "code",
        "systemitem",
        "prompt",
        "function",
        "constant",
        "varname",
        "structname",
        "structfield",
        "type",
    ] {
        registry.register_primary(tag, literal);
    }
    registry.register_primary("userinput", userinput);
    registry.register_primary("keycap", keycap);
    registry.register_primary("application", application);
    registry.register_primary("filename", filename);
    registry.register_primary("command", command);
    registry.register_primary("option", option);
    registry.register_primary("envar", envar);
    registry.register_primary("firstterm", firstterm);
    registry.register_primary("subscript", subscript);
    registry.register_primary("superscript", superscript);
    registry.register_primary("acronym", abbreviation);
    registry.register_primary("abbrev", abbreviation);
    registry.register_primary("quote", quote);
    registry.register_primary("cmdsynopsis", cmdsynopsis);
}

fn emphasis(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    let kind = match el.attr("role") {
        Some("strong") | Some("bold") => NodeKind::Strong,
        _ => NodeKind::Emphasis,
    };
    cx.concat(el, parent, Some(kind))
}

fn phrase(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    cx.concat(el, parent, Some(NodeKind::Emphasis))
}

fn literal(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    cx.concat(el, parent, Some(NodeKind::Literal))
}

fn userinput(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    cx.inline(el, parent, "kbd", Children::All)
}

// keycap, application and firstterm hold plain text; child elements are
// reported and dropped.
fn text_only_inline(
    cx: &mut Converter<'_>,
    el: &SourceElement,
    parent: &mut OutputNode,
    class: &str,
) -> HandlerResult {
    let children = if cx.has_only_text(el) {
        Children::All
    } else {
        Children::TextOnly
    };
    cx.inline(el, parent, class, children)
}

fn keycap(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    text_only_inline(cx, el, parent, "kbd")
}

fn application(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    text_only_inline(cx, el, parent, "program")
}

fn firstterm(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    text_only_inline(cx, el, parent, "dfn")
}

fn filename(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    cx.inline(el, parent, "file", Children::All)
}

fn command(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    cx.inline(el, parent, "command", Children::All)
}

fn option(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    cx.inline(el, parent, "option", Children::All)
}

fn envar(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    cx.inline(el, parent, "env", Children::All)
}

fn subscript(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    cx.concat(el, parent, Some(NodeKind::Subscript))
}

fn superscript(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    cx.concat(el, parent, Some(NodeKind::Superscript))
}

fn abbreviation(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    cx.concat(el, parent, Some(NodeKind::Abbreviation))
}

fn quote(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    parent.push(OutputNode::text("\u{2018}"));
    cx.concat(el, parent, None)?;
    parent.push(OutputNode::text("\u{2019}"));
    Ok(())
}

/// Markup is dropped; a comment marks the spot for manual cleanup.
fn cmdsynopsis(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    parent.push(OutputNode::comment("cmdsynopsis"));
    cx.no_markup(el, parent, NodeKind::Inline)
}
