//! DocBook element handlers
//!
//! One module per family of elements. Each module exposes a `register`
//! function adding its handlers to a [`HandlerRegistry`]; handlers themselves
//! are plain functions over the [`Converter`](crate::convert::Converter)
//! primitives.

pub mod api;
pub mod blocks;
pub mod index;
pub mod inline;
pub mod links;
pub mod lists;
pub mod math;
pub mod sections;

use crate::convert::registry::HandlerRegistry;
use crate::convert::{Converter, HandlerResult};
use crate::ir::nodes::OutputNode;
use crate::source::SourceElement;

/// Register the handlers for the DocBook vocabulary.
pub fn register_defaults(registry: &mut HandlerRegistry) {
    sections::register(registry);
    blocks::register(registry);
    lists::register(registry);
    inline::register(registry);
    links::register(registry);
    index::register(registry);
    math::register(registry);
    api::register(registry);
}

/// Handler for elements whose content is dropped.
pub fn ignore(_cx: &mut Converter<'_>, _el: &SourceElement, _parent: &mut OutputNode) -> HandlerResult {
    Ok(())
}

/// Handler for wrappers whose content goes straight into the parent.
pub fn transparent(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    cx.concat(el, parent, None)
}

/// Handler for wrappers converted as a block without a node of their own.
pub fn plain_block(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    cx.block(el, parent, None)
}

#[cfg(test)]
pub(crate) mod testing {
    use crate::bridge::MacroHost;
    use crate::convert::registry::HandlerRegistry;
    use crate::convert::{convert_document, ConvertEnv};
    use crate::diagnostics::Reporter;
    use crate::ir::nodes::{DocId, Document, NodeKind, OutputNode};
    use crate::settings::ConverterSettings;

    pub fn convert_with(source: &str, host: Option<&dyn MacroHost>) -> (Document, Reporter) {
        convert_using(source, &ConverterSettings::default(), host)
    }

    pub fn convert_using(
        source: &str,
        settings: &ConverterSettings,
        host: Option<&dyn MacroHost>,
    ) -> (Document, Reporter) {
        let registry = HandlerRegistry::with_defaults();
        let mut env = ConvertEnv::new(settings, &registry);
        env.host = host;
        let mut reporter = Reporter::new();
        let conversion = convert_document(DocId::from("test"), source, &env, &mut reporter)
            .expect("conversion failed");
        (conversion.document, reporter)
    }

    pub fn convert(source: &str) -> (Document, Reporter) {
        convert_with(source, None)
    }

    pub fn first<'d>(doc: &'d Document, pred: &dyn Fn(&OutputNode) -> bool) -> &'d OutputNode {
        doc.root.find(pred).expect("no matching node")
    }

    pub fn kinds(node: &OutputNode) -> Vec<&'static str> {
        node.children.iter().map(|c| c.kind.tag_name()).collect()
    }

    pub fn is(kind: NodeKind) -> impl Fn(&OutputNode) -> bool {
        move |node| node.kind == kind
    }
}
