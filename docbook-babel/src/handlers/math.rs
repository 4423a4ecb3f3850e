//! Equations
//!
//! `mathphrase` is inline inside `inlineequation` and a block anywhere else.
//! When the macro host knows a `math` role or directive, the phrase is handed
//! to it so math renders the same way as bridged math.

use super::sections::with_rubric_titles;
use crate::bridge::{self, MacroCall, MacroKind};
use crate::convert::registry::HandlerRegistry;
use crate::convert::{Children, Converter, HandlerResult};
use crate::ir::nodes::{NodeKind, OutputNode};
use crate::source::SourceElement;

pub fn register(registry: &mut HandlerRegistry) {
    registry.register_primary("inlineequation", inlineequation);
    registry.register_primary("equation", equation);
    registry.register_primary("informalequation", equation);
    registry.register_primary("mathphrase", mathphrase);
}

fn inlineequation(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    cx.concat_as(el, parent, None, None, Children::Only(&["mathphrase"]))
}

fn equation(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    with_rubric_titles(cx, |cx| {
        cx.concat_as(el, parent, None, None, Children::Only(&["title", "mathphrase"]))
    })
}

fn mathphrase(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    let inline = cx.parent_tag() == Some("inlineequation");
    let kind = if inline {
        MacroKind::Role
    } else {
        MacroKind::Directive
    };
    let hosted = cx.host().is_some_and(|host| match kind {
        MacroKind::Role => host.has_role("math"),
        MacroKind::Directive => host.has_directive("math"),
    });
    if hosted {
        let call = MacroCall {
            line: el.line,
            level: cx.level(),
            ..MacroCall::new("math", el.text_content())
        };
        bridge::invoke(cx, &call, kind, parent);
        return Ok(());
    }
    if inline {
        cx.inline(el, parent, "math", Children::All)
    } else {
        cx.block(el, parent, Some(NodeKind::MathBlock))
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{convert, convert_with, first, is};
    use crate::bridge::{MacroCall, MacroRegistry, MacroResult};
    use crate::ir::nodes::{NodeKind, OutputNode};

    #[test]
    fn inline_equation_is_a_math_span() {
        let (doc, _) = convert("<para>so <inlineequation><mathphrase>x^2</mathphrase></inlineequation></para>");
        let span = first(&doc, &is(NodeKind::Inline));
        assert_eq!(span.classes, vec!["math".to_string()]);
        assert_eq!(span.astext(), "x^2");
    }

    #[test]
    fn equation_is_a_math_block_with_rubric() {
        let (doc, _) = convert("<chapter><equation><title>Energy</title><mathphrase>E = mc^2</mathphrase></equation></chapter>");
        let section = &doc.root.children[0];
        assert_eq!(section.children[0].kind, NodeKind::Rubric);
        assert_eq!(section.children[1].kind, NodeKind::MathBlock);
    }

    #[test]
    fn host_math_takes_over() {
        let mut host = MacroRegistry::new();
        host.register_role("math", |call: &MacroCall| -> MacroResult {
            Ok(vec![OutputNode::new(NodeKind::Literal).with_child(OutputNode::text(call.content.clone()))])
        });
        let (doc, _) = convert_with(
            "<para><inlineequation><mathphrase>a</mathphrase></inlineequation></para>",
            Some(&host),
        );
        assert_eq!(first(&doc, &is(NodeKind::Literal)).astext(), "a");
    }
}
