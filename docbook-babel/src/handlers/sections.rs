//! Sectioning elements and titles
//!
//! A section pushes a frame holding its level and a section title handler.
//! The first `title` in that frame becomes the section title; the handler is
//! then spent, so later titles of the same section are skipped. Sidebars,
//! formal paragraphs and the reference sub-sections render titles as rubrics.

use super::plain_block;
use crate::convert::context::TitleHandler;
use crate::convert::registry::HandlerRegistry;
use crate::convert::{Children, Converter, HandlerResult};
use crate::ir::nodes::{NodeKind, OutputNode};
use crate::source::SourceElement;

pub fn register(registry: &mut HandlerRegistry) {
    for tag in ["book", "article", "chapter", "preface", "appendix"] {
        registry.register_primary(tag, top_level);
    }
    registry.register_primary("sect1", sect1);
    registry.register_primary("sect2", sect2);
    registry.register_primary("sect3", sect3);
    registry.register_primary("section", section);
    registry.register_primary("topic", topic);
    registry.register_primary("title", title);
    registry.register_primary("sidebar", sidebar);
    registry.register_primary("formalpara", formalpara);
    for tag in ["refsect1", "refnamediv", "refsynopsisdiv"] {
        registry.register_primary(tag, rubric_scope);
    }
}

/// Convert `el` into a section at `level`.
pub fn section_at(
    cx: &mut Converter<'_>,
    el: &SourceElement,
    parent: &mut OutputNode,
    level: usize,
) -> HandlerResult {
    let mut node = cx.create(el, NodeKind::Section { level });
    cx.set_id(&mut node);
    cx.with_frame(
        |frame| {
            frame.level = level;
            frame.title = Some(TitleHandler::Section);
        },
        |cx| cx.block_into(el, parent, node, Children::All),
    )
}

fn top_level(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    section_at(cx, el, parent, 0)
}

fn sect1(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    section_at(cx, el, parent, 1)
}

fn sect2(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    section_at(cx, el, parent, 2)
}

fn sect3(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    section_at(cx, el, parent, 3)
}

fn section(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    let level = cx.level() + 1;
    section_at(cx, el, parent, level)
}

fn topic(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    let level = cx.level();
    section_at(cx, el, parent, level)
}

fn title(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    let handler = cx.frame().title;
    match handler {
        Some(TitleHandler::Section) => {
            cx.frame_mut().title = None;
            cx.block(el, parent, Some(NodeKind::Title))
        }
        Some(TitleHandler::Rubric) => cx.block(el, parent, Some(NodeKind::Rubric)),
        None => {
            let path = cx.context().path();
            cx.info(el.line, format!("{path} skipped: no title expected here"));
            Ok(())
        }
    }
}

/// Run `f` with titles rendered as rubrics.
pub fn with_rubric_titles<'a, R>(
    cx: &mut Converter<'a>,
    f: impl FnOnce(&mut Converter<'a>) -> R,
) -> R {
    cx.with_frame(|frame| frame.title = Some(TitleHandler::Rubric), f)
}

fn sidebar(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    with_rubric_titles(cx, |cx| cx.block(el, parent, Some(NodeKind::Sidebar)))
}

fn formalpara(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    with_rubric_titles(cx, |cx| cx.block(el, parent, Some(NodeKind::Paragraph)))
}

fn rubric_scope(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    with_rubric_titles(cx, |cx| plain_block(cx, el, parent))
}
