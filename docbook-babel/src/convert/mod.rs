//! Tag-dispatch engine
//!
//! [`Converter`] walks a [`SourceElement`] tree depth first and appends output
//! nodes to a parent [`OutputNode`]. Every element is resolved to a
//! [`HandlerKey`] (namespace alias + local name) and handed to the handler
//! registered for that key; elements without a handler are converted by
//! structural passthrough: their text, children and tails go straight into the
//! parent while the wrapper itself disappears.
//!
//! Handlers are written against the primitives below (`create`, `concat`,
//! `block`, `join_children`, `no_markup`, ...), which take care of ids, pending
//! anchors, one-shot text transforms and the deferred footnote buffer.
//!
//! Only assembly problems are returned as errors (see [`ConvertError`]);
//! everything else is reported to the [`Reporter`] and conversion goes on.

pub mod context;
pub mod registry;

use crate::assembly::{AssemblySession, DocumentResolver, SharedAssemblyGraph};
use crate::bridge::MacroHost;
use crate::diagnostics::Reporter;
use crate::error::ConvertError;
use crate::ir::nodes::{DocId, Document, NodeKind, OutputNode};
use crate::settings::{ConverterSettings, ResolvedDialect};
use crate::source::{self, SourceElement, SourceNode};
use context::{ConversionContext, Frame, TextTransform};
use registry::{Handler, HandlerKey, HandlerRegistry};
use std::collections::HashSet;

pub type HandlerResult = Result<(), ConvertError>;

/// Which children of an element are converted.
#[derive(Debug, Clone, Copy)]
pub enum Children<'s> {
    All,
    /// Only DocBook elements with these local names; others are skipped with
    /// a warning. Text, comments and tails are always kept.
    Only(&'s [&'s str]),
    /// No child elements at all (the caller already reported them).
    TextOnly,
}

enum Dispatch<'a> {
    Handler(&'a dyn Handler),
    Passthrough,
}

pub struct Converter<'a> {
    registry: &'a HandlerRegistry,
    settings: &'a ConverterSettings,
    host: Option<&'a dyn MacroHost>,
    reporter: &'a mut Reporter,
    assembly: Option<AssemblySession<'a>>,
    dialect: ResolvedDialect,
    context: ConversionContext,
    ids: HashSet<String>,
    next_id: usize,
    next_footnote: usize,
}

impl<'a> Converter<'a> {
    pub fn new(
        env: &ConvertEnv<'a>,
        dialect: ResolvedDialect,
        assembly: Option<AssemblySession<'a>>,
        reporter: &'a mut Reporter,
    ) -> Self {
        Converter {
            registry: env.registry,
            settings: env.settings,
            host: env.host,
            reporter,
            assembly,
            dialect,
            context: ConversionContext::new(),
            ids: HashSet::new(),
            next_id: 0,
            next_footnote: 0,
        }
    }

    // Dispatch

    /// Convert `el` and its subtree, appending the result to `parent`.
    pub fn convert(&mut self, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
        let dispatch = self.resolve(el);
        self.enter(el, |cx| match dispatch {
            Dispatch::Handler(handler) => handler.convert(cx, el, parent),
            Dispatch::Passthrough => cx.concat_into(el, parent),
        })
    }

    /// Convert any child node: elements are dispatched, non-blank comments
    /// become comment nodes, processing instructions are dropped.
    pub fn convert_node(&mut self, node: &SourceNode, parent: &mut OutputNode) -> HandlerResult {
        match node {
            SourceNode::Element(el) => self.convert(el, parent),
            SourceNode::Comment(comment) => {
                if !comment.text.trim().is_empty() {
                    parent.push(OutputNode::comment(comment.text.clone()));
                }
                Ok(())
            }
            SourceNode::Instruction(pi) => {
                self.reporter.info(
                    pi.line,
                    format!("ignoring processing instruction <?{}?>", pi.target),
                );
                Ok(())
            }
        }
    }

    fn resolve(&mut self, el: &SourceElement) -> Dispatch<'a> {
        let key = match (&el.name.namespace, &self.dialect.primary_namespace) {
            (ns, primary) if ns == primary => Some(HandlerKey::primary(&el.name.local)),
            (Some(ns), _) => match self.settings.extension_alias(ns) {
                Some(alias) => Some(HandlerKey::extension(alias, &el.name.local)),
                None => {
                    self.reporter.unknown_namespace(ns, el.line);
                    return Dispatch::Passthrough;
                }
            },
            (None, _) => None,
        };
        let registry = self.registry;
        match key.as_ref().and_then(|key| registry.get(key)) {
            Some(handler) => Dispatch::Handler(handler),
            None => {
                self.reporter.unknown_tag(&el.name, el.line);
                Dispatch::Passthrough
            }
        }
    }

    /// Run `f` with `el` on the ancestor stack.
    ///
    /// Handlers that convert a child element themselves instead of going
    /// through [`convert`](Self::convert) wrap the call in `enter`.
    pub fn enter<R>(&mut self, el: &SourceElement, f: impl FnOnce(&mut Self) -> R) -> R {
        self.context.push_tag(el.local_name());
        let result = f(self);
        self.context.pop_tag();
        result
    }

    /// Run `f` in a new scoped frame derived from the current one.
    pub fn with_frame<R>(
        &mut self,
        modify: impl FnOnce(&mut Frame),
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let mut frame = self.context.frame().clone();
        modify(&mut frame);
        self.context.push_frame(frame);
        let result = f(self);
        self.context.pop_frame();
        result
    }

    // Accessors

    pub fn settings(&self) -> &'a ConverterSettings {
        self.settings
    }

    pub fn host(&self) -> Option<&'a dyn MacroHost> {
        self.host
    }

    pub fn context(&self) -> &ConversionContext {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut ConversionContext {
        &mut self.context
    }

    pub fn frame(&self) -> &Frame {
        self.context.frame()
    }

    pub fn frame_mut(&mut self) -> &mut Frame {
        self.context.frame_mut()
    }

    /// Current section level.
    pub fn level(&self) -> usize {
        self.context.frame().level
    }

    /// Local name of the parent of the element being converted.
    pub fn parent_tag(&self) -> Option<&str> {
        self.context.parent_tag()
    }

    pub fn assembly(&mut self) -> Option<&mut AssemblySession<'a>> {
        self.assembly.as_mut()
    }

    pub fn reporter(&mut self) -> &mut Reporter {
        &mut *self.reporter
    }

    pub fn info(&mut self, line: u32, message: impl Into<String>) {
        self.reporter.info(line, message);
    }

    pub fn warning(&mut self, line: u32, message: impl Into<String>) {
        self.reporter.warning(line, message);
    }

    // Element helpers

    /// Is `el` in the DocBook namespace of this document?
    pub fn is_primary(&self, el: &SourceElement) -> bool {
        el.name.namespace == self.dialect.primary_namespace
    }

    /// First DocBook child element named `local`.
    pub fn child<'e>(&self, el: &'e SourceElement, local: &str) -> Option<&'e SourceElement> {
        el.find(self.dialect.primary_namespace.as_deref(), local)
    }

    /// All DocBook child elements named `local`.
    pub fn children_named<'e>(&self, el: &'e SourceElement, local: &str) -> Vec<&'e SourceElement> {
        el.find_all(self.dialect.primary_namespace.as_deref(), local)
    }

    /// Value of the id attribute of this dialect (`id` or `xml:id`).
    pub fn element_id(&self, el: &SourceElement) -> Option<String> {
        let name = &self.dialect.id_attribute;
        el.attr_ns(name.namespace.as_deref(), &name.local)
            .map(str::to_string)
    }

    /// Claim `id` for this document; duplicates are dropped with a warning.
    pub fn register_id(&mut self, id: &str, line: u32) -> bool {
        if self.ids.insert(id.to_string()) {
            true
        } else {
            self.warning(line, format!("duplicate id '{id}' dropped"));
            false
        }
    }

    /// Warn about child elements outside `allowed` and return the others.
    pub fn restrict<'e>(&mut self, el: &'e SourceElement, allowed: &[&str]) -> Vec<&'e SourceElement> {
        let mut kept = Vec::new();
        for child in el.elements() {
            if self.is_primary(child) && allowed.contains(&child.local_name()) {
                kept.push(child);
            } else {
                self.skipped(el, child);
            }
        }
        kept
    }

    fn skipped(&mut self, el: &SourceElement, child: &SourceElement) {
        self.warning(
            child.line,
            format!("{}/{} skipped", el.local_name(), child.local_name()),
        );
    }

    /// Warn if `el` has child elements; returns whether it has none.
    pub fn has_only_text(&mut self, el: &SourceElement) -> bool {
        let names: Vec<&str> = el.elements().map(SourceElement::local_name).collect();
        if names.is_empty() {
            return true;
        }
        let path = self.context.path();
        self.warning(
            el.line,
            format!("children of {path} are skipped: {}", names.join(", ")),
        );
        false
    }

    /// Warn if `el` has non-blank text outside its child elements.
    pub fn has_no_text(&mut self, el: &SourceElement) -> bool {
        let stray = el
            .text
            .iter()
            .map(String::as_str)
            .chain(el.children.iter().filter_map(SourceNode::tail))
            .find(|text| !text.trim().is_empty());
        match stray {
            Some(text) => {
                let message = format!("skipping text in <{}>: {}", self.context.path(), text.trim());
                self.warning(el.line, message);
                false
            }
            None => true,
        }
    }

    // Node creation

    /// A node of `kind` carrying `el`'s id and any pending anchors.
    pub fn create(&mut self, el: &SourceElement, kind: NodeKind) -> OutputNode {
        let ids = self.element_id(el).into_iter().collect();
        self.create_with_ids(kind, ids, el.line)
    }

    pub fn create_with_ids(&mut self, kind: NodeKind, ids: Vec<String>, line: u32) -> OutputNode {
        let mut node = OutputNode::new(kind);
        for id in ids.into_iter().chain(self.context.take_anchors()) {
            if self.register_id(&id, line) {
                node.ids.push(id);
            }
        }
        node
    }

    /// Give `node` a synthesized id if it has none.
    pub fn set_id(&mut self, node: &mut OutputNode) {
        if !node.ids.is_empty() {
            return;
        }
        loop {
            self.next_id += 1;
            let id = format!("id{}", self.next_id);
            if self.ids.insert(id.clone()) {
                node.ids.push(id);
                return;
            }
        }
    }

    /// A fresh `footnote-N` id.
    pub fn next_footnote_id(&mut self) -> String {
        loop {
            self.next_footnote += 1;
            let id = format!("footnote-{}", self.next_footnote);
            if self.ids.insert(id.clone()) {
                return id;
            }
        }
    }

    /// A text leaf, passed through the pending one-shot transform.
    pub fn text(&mut self, text: &str) -> OutputNode {
        match self.context.take_text_transform() {
            Some(transform) => OutputNode::text(transform.apply(text)),
            None => OutputNode::text(text),
        }
    }

    pub fn set_text_transform(&mut self, transform: Option<TextTransform>) {
        self.context.set_text_transform(transform);
    }

    // Concatenation

    /// Convert `el`'s leading text, children and their tails into `node`.
    pub fn concat_into(&mut self, el: &SourceElement, node: &mut OutputNode) -> HandlerResult {
        self.concat_children(el, node, false, Children::All)
    }

    /// Source-order conversion of `el`'s content into `node`.
    ///
    /// With `trim`, leading whitespace of the first text and trailing
    /// whitespace of the last one are removed. Whitespace-only text is never
    /// emitted into structural containers.
    pub fn concat_children(
        &mut self,
        el: &SourceElement,
        node: &mut OutputNode,
        trim: bool,
        children: Children<'_>,
    ) -> HandlerResult {
        let keep_blank = !node.kind.is_container();
        let mut pending = el.text.as_deref();
        if trim {
            pending = pending.map(str::trim_start);
        }
        for child in &el.children {
            if let Some(text) = pending.take() {
                self.push_text(node, text, keep_blank);
            }
            match (child, children) {
                (SourceNode::Element(_), Children::TextOnly) => {}
                (SourceNode::Element(c), Children::Only(allowed))
                    if !(self.is_primary(c) && allowed.contains(&c.local_name())) =>
                {
                    self.skipped(el, c);
                }
                _ => self.convert_node(child, node)?,
            }
            pending = child.tail();
        }
        if let Some(text) = pending {
            let text = if trim { text.trim_end() } else { text };
            self.push_text(node, text, keep_blank);
        }
        Ok(())
    }

    fn push_text(&mut self, node: &mut OutputNode, text: &str, keep_blank: bool) {
        if text.is_empty() || (!keep_blank && text.trim().is_empty()) {
            return;
        }
        let leaf = self.text(text);
        node.push(leaf);
    }

    /// Concatenate `el` into a new node of `kind`, or straight into `parent`
    /// when there is neither a kind nor an id to carry.
    pub fn concat(
        &mut self,
        el: &SourceElement,
        parent: &mut OutputNode,
        kind: Option<NodeKind>,
    ) -> HandlerResult {
        self.concat_as(el, parent, kind, None, Children::All)
    }

    /// [`concat`](Self::concat) with a style class and a child filter.
    pub fn concat_as(
        &mut self,
        el: &SourceElement,
        parent: &mut OutputNode,
        kind: Option<NodeKind>,
        class: Option<&str>,
        children: Children<'_>,
    ) -> HandlerResult {
        if kind.is_none() && class.is_none() && self.element_id(el).is_none() {
            return self.concat_children(el, parent, false, children);
        }
        let mut node = self.create(el, kind.unwrap_or(NodeKind::Inline));
        if let Some(class) = class {
            node.classes.push(class.to_string());
        }
        self.concat_children(el, &mut node, false, children)?;
        parent.push(node);
        Ok(())
    }

    /// Block conversion: trimmed concatenation into a node of `kind`
    /// (compound if only an id needs a carrier), followed by the footnotes
    /// deferred while converting it.
    pub fn block(
        &mut self,
        el: &SourceElement,
        parent: &mut OutputNode,
        kind: Option<NodeKind>,
    ) -> HandlerResult {
        self.block_as(el, parent, kind, Children::All)
    }

    /// [`block`](Self::block) restricted to the DocBook children in `allowed`.
    pub fn block_only(
        &mut self,
        el: &SourceElement,
        parent: &mut OutputNode,
        kind: Option<NodeKind>,
        allowed: &[&str],
    ) -> HandlerResult {
        self.block_as(el, parent, kind, Children::Only(allowed))
    }

    fn block_as(
        &mut self,
        el: &SourceElement,
        parent: &mut OutputNode,
        kind: Option<NodeKind>,
        children: Children<'_>,
    ) -> HandlerResult {
        if kind.is_none() && self.element_id(el).is_none() {
            let scope = self.context.begin_block();
            let result = self.concat_children(el, parent, true, children);
            let deferred = self.context.end_block(scope);
            parent.children.extend(deferred);
            return result;
        }
        let node = self.create(el, kind.unwrap_or(NodeKind::Compound));
        self.block_into(el, parent, node, children)
    }

    /// Fill an already created `node` like [`block`](Self::block) does and
    /// append it to `parent`.
    pub fn block_into(
        &mut self,
        el: &SourceElement,
        parent: &mut OutputNode,
        mut node: OutputNode,
        children: Children<'_>,
    ) -> HandlerResult {
        let scope = self.context.begin_block();
        let result = self.concat_children(el, &mut node, true, children);
        let deferred = self.context.end_block(scope);
        parent.push(node);
        parent.children.extend(deferred);
        result
    }

    /// Defer `node` until the enclosing block is finished.
    pub fn defer(&mut self, node: OutputNode) {
        self.context.defer(node);
    }

    /// Convert the child elements of `el` into `node`, separated by `sep`.
    pub fn join_children(
        &mut self,
        el: &SourceElement,
        parent: &mut OutputNode,
        sep: &str,
        kind: Option<NodeKind>,
    ) -> HandlerResult {
        self.has_no_text(el);
        let has_kind = kind.is_some();
        let mut node = match kind {
            Some(kind) => self.create(el, kind),
            None => OutputNode::new(NodeKind::Inline),
        };
        for (i, child) in el.elements().enumerate() {
            if i > 0 {
                let separator = self.text(sep);
                node.push(separator);
            }
            self.convert(child, &mut node)?;
        }
        if node.kind == NodeKind::Inline && node.ids.is_empty() && !has_kind {
            parent.children.extend(node.children);
        } else {
            parent.push(node);
        }
        Ok(())
    }

    /// Plain text of `el` with all markup removed; ids found on the way are
    /// appended to `ids`. Returns the text and whether a separating space is
    /// still needed before the next text.
    pub fn no_markup_text(
        &self,
        el: &SourceElement,
        ids: &mut Vec<String>,
        mut need_space: bool,
    ) -> (String, bool) {
        let mut text = String::new();
        if let Some(id) = self.element_id(el) {
            ids.push(id);
        }
        if let Some(leading) = el.text.as_deref().filter(|t| !t.is_empty()) {
            text.push_str(leading);
            need_space = !ends_with_space(leading);
        }
        for child in &el.children {
            if let SourceNode::Element(child) = child {
                let (inner, space) = self.no_markup_text(child, ids, need_space);
                text.push_str(&inner);
                need_space = space;
            }
            if let Some(tail) = child.tail() {
                let tail = if need_space { tail } else { tail.trim_start() };
                if !tail.is_empty() {
                    text.push_str(tail);
                    need_space = !ends_with_space(tail);
                }
            }
        }
        (text, need_space)
    }

    /// Replace `el` by a node of `kind` holding its plain text.
    pub fn no_markup(
        &mut self,
        el: &SourceElement,
        parent: &mut OutputNode,
        kind: NodeKind,
    ) -> HandlerResult {
        let mut ids = Vec::new();
        let (text, _) = self.no_markup_text(el, &mut ids, false);
        let mut node = self.create_with_ids(kind, ids, el.line);
        let leaf = self.text(&text);
        node.push(leaf);
        parent.push(node);
        Ok(())
    }

    /// Styled inline span. `dfn` and `kbd` map to emphasis and literal.
    pub fn inline(
        &mut self,
        el: &SourceElement,
        parent: &mut OutputNode,
        class: &str,
        children: Children<'_>,
    ) -> HandlerResult {
        match class {
            "dfn" => self.concat_as(el, parent, Some(NodeKind::Emphasis), None, children),
            "kbd" => self.concat_as(el, parent, Some(NodeKind::Literal), None, children),
            _ => self.concat_as(el, parent, Some(NodeKind::Inline), Some(class), children),
        }
    }

    /// Inline span of `class` holding `text`.
    pub fn inline_text(
        &mut self,
        text: &str,
        parent: &mut OutputNode,
        class: &str,
        ids: Vec<String>,
        line: u32,
    ) {
        let mut node = self.create_with_ids(NodeKind::Inline, ids, line);
        node.classes.push(class.to_string());
        let leaf = self.text(text);
        node.push(leaf);
        parent.push(node);
    }

    /// Move whatever is still deferred (footnotes outside any block) to `root`.
    pub fn flush_deferred(&mut self, root: &mut OutputNode) {
        root.children.extend(self.context.take_deferred());
    }

    /// Documents scheduled by assembly markup.
    pub fn into_included(self) -> Vec<DocId> {
        self.assembly
            .map(AssemblySession::into_included)
            .unwrap_or_default()
    }
}

fn ends_with_space(text: &str) -> bool {
    text.chars().last().is_some_and(char::is_whitespace)
}

/// Assembly collaborators of a conversion.
#[derive(Clone, Copy)]
pub struct AssemblyEnv<'a> {
    pub graph: &'a SharedAssemblyGraph,
    pub resolver: &'a dyn DocumentResolver,
}

/// Everything a conversion borrows from its host. Shareable between threads.
#[derive(Clone, Copy)]
pub struct ConvertEnv<'a> {
    pub settings: &'a ConverterSettings,
    pub registry: &'a HandlerRegistry,
    pub host: Option<&'a dyn MacroHost>,
    pub assembly: Option<AssemblyEnv<'a>>,
}

impl<'a> ConvertEnv<'a> {
    pub fn new(settings: &'a ConverterSettings, registry: &'a HandlerRegistry) -> Self {
        ConvertEnv {
            settings,
            registry,
            host: None,
            assembly: None,
        }
    }

    pub fn with_host(mut self, host: &'a dyn MacroHost) -> Self {
        self.host = Some(host);
        self
    }

    pub fn with_assembly(
        mut self,
        graph: &'a SharedAssemblyGraph,
        resolver: &'a dyn DocumentResolver,
    ) -> Self {
        self.assembly = Some(AssemblyEnv { graph, resolver });
        self
    }
}

/// Result of phase 1 for one document.
#[derive(Debug, Clone)]
pub struct Conversion {
    pub document: Document,
    /// Documents this one composes, in first-use order.
    pub included: Vec<DocId>,
}

/// Parse and convert one document.
///
/// Assembly registrations go to `env.assembly` when present; without it,
/// assembly markup is reported and skipped.
pub fn convert_document(
    id: DocId,
    source: &str,
    env: &ConvertEnv<'_>,
    reporter: &mut Reporter,
) -> Result<Conversion, ConvertError> {
    reporter.set_document(Some(id.clone()));
    let root = source::parse(source)?;
    convert_tree(id, &root, env, reporter)
}

/// Convert an already parsed source tree.
///
/// A conversion that fails takes back whatever it registered in the assembly
/// graph, so a broken document never contributes navigation or composition.
pub fn convert_tree(
    id: DocId,
    root: &SourceElement,
    env: &ConvertEnv<'_>,
    reporter: &mut Reporter,
) -> Result<Conversion, ConvertError> {
    log::debug!("converting {id}");
    let dialect = ResolvedDialect::for_root(env.settings.dialect, &root.name);
    let session = env
        .assembly
        .map(|assembly| AssemblySession::new(id.clone(), assembly.graph, assembly.resolver));
    let mut document = Document::new(id);
    let mut converter = Converter::new(env, dialect, session, reporter);
    if let Err(err) = converter.convert(root, &mut document.root) {
        drop(converter);
        if let Some(assembly) = env.assembly {
            assembly.graph.write().purge(&document.id);
        }
        return Err(err);
    }
    converter.flush_deferred(&mut document.root);
    let included = converter.into_included();
    document.note_title();
    Ok(Conversion { document, included })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;

    fn run(source: &str) -> (Document, Reporter) {
        let settings = ConverterSettings::default();
        let registry = HandlerRegistry::with_defaults();
        let env = ConvertEnv::new(&settings, &registry);
        let mut reporter = Reporter::new();
        let conversion = convert_document(DocId::from("test"), source, &env, &mut reporter).unwrap();
        (conversion.document, reporter)
    }

    fn paragraph_texts(doc: &Document) -> Vec<String> {
        doc.root
            .find_all(&|n| n.kind == NodeKind::Paragraph)
            .into_iter()
            .map(OutputNode::astext)
            .collect()
    }

    #[test]
    fn paragraph_is_trimmed_but_keeps_inner_spaces() {
        let (doc, _) = run("<para>\n  Hello <emphasis>big</emphasis> world\n</para>");
        assert_eq!(paragraph_texts(&doc), vec!["Hello big world"]);
    }

    #[test]
    fn unknown_tag_is_passed_through_and_reported_once() {
        let (doc, reporter) = run("<para><blink>a</blink> and <blink>b</blink></para>");
        assert_eq!(paragraph_texts(&doc), vec!["a and b"]);
        assert_eq!(reporter.count(Severity::Warning), 1);
    }

    #[test]
    fn blank_comments_are_dropped() {
        let (doc, _) = run("<para>a<!--   -->b<!-- keep --></para>");
        let comments = doc.root.find_all(&|n| matches!(n.kind, NodeKind::Comment { .. }));
        assert_eq!(comments.len(), 1);
    }

    #[test]
    fn processing_instructions_are_reported_as_info() {
        let (_, reporter) = run("<para><?dbfo keep?>text</para>");
        assert_eq!(reporter.count(Severity::Info), 1);
    }

    #[test]
    fn duplicate_ids_are_dropped_with_a_warning() {
        let (doc, reporter) = run(r#"<article><para id="x">a</para><para id="x">b</para></article>"#);
        let with_id = doc.root.find_all(&|n| n.ids.iter().any(|id| id == "x"));
        assert_eq!(with_id.len(), 1);
        assert_eq!(reporter.count(Severity::Warning), 1);
    }

    #[test]
    fn anchors_attach_to_the_next_created_node() {
        let (doc, _) = run(r#"<article><anchor id="here"/><para>a</para></article>"#);
        let para = doc.root.find(&|n| n.kind == NodeKind::Paragraph).unwrap();
        assert_eq!(para.ids, vec!["here".to_string()]);
    }

    #[test]
    fn unnamespaced_element_in_namespaced_document_is_unknown() {
        let (doc, reporter) = run(
            r#"<article xmlns="http://docbook.org/ns/docbook"><para>a <b xmlns="">b</b></para></article>"#,
        );
        assert_eq!(paragraph_texts(&doc), vec!["a b"]);
        assert_eq!(reporter.count(Severity::Warning), 1);
        assert_eq!(reporter.diagnostics()[0].message, "don't know how to handle <b>");
    }

    #[test]
    fn reset_default_namespace_in_legacy_document_is_docbook() {
        let (doc, reporter) = run(r#"<article><para xmlns="">x</para></article>"#);
        assert_eq!(paragraph_texts(&doc), vec!["x"]);
        assert_eq!(reporter.count(Severity::Warning), 0);
    }

    #[test]
    fn joined_children_keep_a_requested_node() {
        let settings = ConverterSettings::default();
        let registry = HandlerRegistry::with_defaults();
        let env = ConvertEnv::new(&settings, &registry);
        let mut reporter = Reporter::new();
        let list = source::parse("<simplelist><member>a</member><member>b</member></simplelist>").unwrap();
        let mut converter = Converter::new(&env, ResolvedDialect::legacy(), None, &mut reporter);
        let mut parent = OutputNode::new(NodeKind::Paragraph);
        converter
            .join_children(&list, &mut parent, " | ", Some(NodeKind::Inline))
            .unwrap();
        converter.join_children(&list, &mut parent, ", ", None).unwrap();

        assert_eq!(parent.children[0].kind, NodeKind::Inline);
        assert_eq!(parent.children[0].astext(), "a | b");
        assert_eq!(parent.children.len(), 4);
        assert_eq!(parent.astext(), "a | ba, b");
    }

    #[test]
    fn root_level_footnotes_are_flushed_into_the_root() {
        let (doc, _) = run("<phrase>x<footnote><para>note</para></footnote></phrase>");
        let last = doc.root.children.last().unwrap();
        assert_eq!(last.kind, NodeKind::Footnote);
    }
}
