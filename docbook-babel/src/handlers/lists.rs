//! Itemized, ordered, variable and glossary lists

use super::sections::with_rubric_titles;
use crate::convert::context::TextTransform;
use crate::convert::registry::HandlerRegistry;
use crate::convert::{Converter, HandlerResult};
use crate::ir::nodes::{EnumType, NodeKind, OutputNode};
use crate::source::SourceElement;

pub fn register(registry: &mut HandlerRegistry) {
    registry.register_primary("itemizedlist", itemizedlist);
    registry.register_primary("orderedlist", orderedlist);
    registry.register_primary("listitem", listitem);
    registry.register_primary("variablelist", variablelist);
    registry.register_primary("varlistentry", varlistentry);
    registry.register_primary("glosslist", glosslist);
    registry.register_primary("glossentry", glossentry);
    registry.register_primary("term", term);
    registry.register_primary("glossterm", term);
    registry.register_primary("glossdef", glossdef);
    registry.register_primary("simplelist", simplelist);
    registry.register_primary("member", super::transparent);
}

/// Bullet glyph typed at the start of the first item, as texinfo output
/// does instead of using a mark attribute.
///
/// The first paragraph of the first item must start (after whitespace) with
/// an ASCII punctuation-like character followed by a space.
pub fn recover_bullet(cx: &Converter<'_>, list: &SourceElement) -> Option<char> {
    let item = cx.child(list, "listitem")?;
    let para = cx.child(item, "para")?;
    let text = para.text.as_deref()?.trim_start();
    let mut chars = text.chars();
    let glyph = chars.next()?;
    let next = chars.next()?;
    let is_glyph = glyph.is_ascii() && !glyph.is_ascii_alphanumeric() && !glyph.is_whitespace();
    (is_glyph && next == ' ').then_some(glyph)
}

fn itemizedlist(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    let glyph = recover_bullet(cx, el);
    let bullet = match glyph {
        Some(glyph) => glyph.to_string(),
        None => cx.settings().generic_bullet.clone(),
    };
    cx.with_frame(
        |frame| frame.item_transform = glyph.map(TextTransform::StripBullet),
        |cx| cx.block_only(el, parent, Some(NodeKind::BulletList { bullet }), &["listitem"]),
    )
}

fn orderedlist(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    let depth = cx.frame().ordered_depth + 1;
    let kind = NodeKind::EnumeratedList {
        enumtype: if depth == 1 {
            EnumType::Arabic
        } else {
            EnumType::LowerAlpha
        },
        prefix: String::new(),
        suffix: ".".to_string(),
    };
    cx.with_frame(
        |frame| {
            frame.ordered_depth = depth;
            frame.item_transform = None;
        },
        |cx| cx.block_only(el, parent, Some(kind), &["listitem"]),
    )
}

fn listitem(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    let transform = cx.frame().item_transform;
    cx.set_text_transform(transform);
    let result = cx.with_frame(
        |frame| frame.item_transform = None,
        |cx| cx.block(el, parent, Some(NodeKind::ListItem)),
    );
    if transform.is_some() {
        cx.set_text_transform(None);
    }
    result
}

fn variablelist(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    with_rubric_titles(cx, |cx| {
        cx.block_only(el, parent, Some(NodeKind::DefinitionList), &["title", "varlistentry"])
    })
}

fn glosslist(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    with_rubric_titles(cx, |cx| {
        cx.block_only(el, parent, Some(NodeKind::DefinitionList), &["title", "glossentry"])
    })
}

fn varlistentry(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    definition_entry(cx, el, parent, "term", "listitem")
}

fn glossentry(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    definition_entry(cx, el, parent, "glossterm", "glossdef")
}

/// One or more terms and exactly one definition; otherwise the definition
/// is left out.
fn definition_entry(
    cx: &mut Converter<'_>,
    el: &SourceElement,
    parent: &mut OutputNode,
    term_tag: &str,
    definition_tag: &str,
) -> HandlerResult {
    let children = cx.restrict(el, &[term_tag, definition_tag]);
    let mut node = cx.create(el, NodeKind::DefinitionListItem);

    let terms: Vec<_> = children.iter().filter(|c| c.local_name() == term_tag).collect();
    let definitions: Vec<_> = children
        .iter()
        .filter(|c| c.local_name() == definition_tag)
        .collect();
    if terms.is_empty() {
        cx.warning(el.line, format!("<{}> without <{term_tag}>", el.local_name()));
    }
    for term in terms {
        cx.convert(term, &mut node)?;
    }
    match definitions.as_slice() {
        [definition] => {
            cx.enter(definition, |cx| {
                cx.block(definition, &mut node, Some(NodeKind::Definition))
            })?;
        }
        _ => cx.warning(
            el.line,
            format!(
                "<{}> needs exactly one <{definition_tag}>, found {}; definition omitted",
                el.local_name(),
                definitions.len()
            ),
        ),
    }
    parent.push(node);
    Ok(())
}

fn term(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    cx.block(el, parent, Some(NodeKind::Term))
}

fn glossdef(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    cx.block(el, parent, Some(NodeKind::Definition))
}

fn simplelist(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    cx.join_children(el, parent, ", ", None)
}
