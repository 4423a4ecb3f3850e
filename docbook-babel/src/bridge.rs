//! Extension invocation bridge
//!
//! Elements in the bridge namespace call macros of a host engine by name:
//!
//! ```xml
//! <b:role xmlns:b="urn:docbook-babel:bridge" name="math">a+b</b:role>
//! <b:directive xmlns:b="urn:docbook-babel:bridge" name="code" arg="rust">fn main() {}</b:directive>
//! ```
//!
//! `name` and `arg` may be given plain or in the bridge namespace; every other
//! attribute is passed as an option keyed by its local name, and the text
//! content is the macro body. The macro runs with the current section level
//! and its nodes are spliced in at the element's position. Failures are
//! warnings: the conversion goes on and nothing is inserted.

use crate::convert::registry::HandlerRegistry;
use crate::convert::{Converter, HandlerResult};
use crate::ir::nodes::{NodeKind, OutputNode};
use crate::settings::BRIDGE_ALIAS;
use crate::source::SourceElement;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Errors a macro invocation can end with
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MacroError {
    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("unknown directive '{0}'")]
    UnknownDirective(String),

    #[error("{name}: {message}")]
    Failed { name: String, message: String },
}

/// One macro invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MacroCall {
    pub name: String,
    /// Positional arguments (directives only).
    pub arguments: Vec<String>,
    pub options: BTreeMap<String, String>,
    pub content: String,
    pub line: u32,
    /// Section level at the point of invocation.
    pub level: usize,
}

impl MacroCall {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        MacroCall {
            name: name.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn option(&self, name: &str) -> Option<&str> {
        self.options.get(name).map(String::as_str)
    }
}

pub type MacroResult = Result<Vec<OutputNode>, MacroError>;

/// The host macro engine.
pub trait MacroHost: Send + Sync {
    fn run_role(&self, call: &MacroCall) -> MacroResult;
    fn run_directive(&self, call: &MacroCall) -> MacroResult;
    fn has_role(&self, name: &str) -> bool;
    fn has_directive(&self, name: &str) -> bool;
}

/// A single role or directive.
pub trait Macro: Send + Sync {
    fn run(&self, call: &MacroCall) -> MacroResult;
}

impl<F> Macro for F
where
    F: Fn(&MacroCall) -> MacroResult + Send + Sync,
{
    fn run(&self, call: &MacroCall) -> MacroResult {
        self(call)
    }
}

/// A [`MacroHost`] backed by named macros.
pub struct MacroRegistry {
    roles: HashMap<String, Box<dyn Macro>>,
    directives: HashMap<String, Box<dyn Macro>>,
}

impl MacroRegistry {
    pub fn new() -> Self {
        MacroRegistry {
            roles: HashMap::new(),
            directives: HashMap::new(),
        }
    }

    /// Registry with the `math` role and the `math` and `code` directives.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_role("math", math_role);
        registry.register_directive("math", math_directive);
        registry.register_directive("code", code_directive);
        registry
    }

    pub fn register_role<M: Macro + 'static>(&mut self, name: &str, role: M) {
        self.roles.insert(name.to_string(), Box::new(role));
    }

    pub fn register_directive<M: Macro + 'static>(&mut self, name: &str, directive: M) {
        self.directives.insert(name.to_string(), Box::new(directive));
    }

    pub fn roles(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.roles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn directives(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.directives.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for MacroRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl MacroHost for MacroRegistry {
    fn run_role(&self, call: &MacroCall) -> MacroResult {
        match self.roles.get(&call.name) {
            Some(role) => role.run(call),
            None => Err(MacroError::UnknownRole(call.name.clone())),
        }
    }

    fn run_directive(&self, call: &MacroCall) -> MacroResult {
        match self.directives.get(&call.name) {
            Some(directive) => directive.run(call),
            None => Err(MacroError::UnknownDirective(call.name.clone())),
        }
    }

    fn has_role(&self, name: &str) -> bool {
        self.roles.contains_key(name)
    }

    fn has_directive(&self, name: &str) -> bool {
        self.directives.contains_key(name)
    }
}

fn math_role(call: &MacroCall) -> MacroResult {
    let node = OutputNode::new(NodeKind::Inline)
        .with_class("math")
        .with_child(OutputNode::text(call.content.trim()));
    Ok(vec![node])
}

fn math_directive(call: &MacroCall) -> MacroResult {
    let node = OutputNode::new(NodeKind::MathBlock).with_child(OutputNode::text(call.content.trim()));
    Ok(vec![node])
}

fn code_directive(call: &MacroCall) -> MacroResult {
    let mut node = OutputNode::new(NodeKind::LiteralBlock).with_class("code");
    if let Some(language) = call.arguments.first().or_else(|| call.options.get("language")) {
        node.classes.push(language.clone());
    }
    node.push(OutputNode::text(call.content.trim_matches('\n')));
    Ok(vec![node])
}

/// Macro flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacroKind {
    Role,
    Directive,
}

impl MacroKind {
    fn as_str(self) -> &'static str {
        match self {
            MacroKind::Role => "role",
            MacroKind::Directive => "directive",
        }
    }
}

/// Register the bridge `role` and `directive` handlers.
pub fn register(registry: &mut HandlerRegistry) {
    registry.register_extension(BRIDGE_ALIAS, "role", role);
    registry.register_extension(BRIDGE_ALIAS, "directive", directive);
}

fn role(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    invoke_element(cx, el, parent, MacroKind::Role);
    Ok(())
}

fn directive(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
    invoke_element(cx, el, parent, MacroKind::Directive);
    Ok(())
}

fn invoke_element(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode, kind: MacroKind) {
    let bridge_ns = cx.settings().bridge_namespace.as_str();
    let lookup = |local: &str| {
        el.attr_ns(Some(bridge_ns), local)
            .or_else(|| el.attr(local))
            .map(str::to_string)
    };
    let Some(name) = lookup("name") else {
        cx.warning(el.line, format!("bridge {} without a name skipped", kind.as_str()));
        return;
    };
    let arguments: Vec<String> = match kind {
        MacroKind::Directive => lookup("arg").into_iter().collect(),
        MacroKind::Role => Vec::new(),
    };
    let options = el
        .attributes
        .iter()
        .filter(|a| !(a.name.local == "name" || a.name.local == "arg" && kind == MacroKind::Directive))
        .map(|a| (a.name.local.clone(), a.value.clone()))
        .collect();
    let call = MacroCall {
        name,
        arguments,
        options,
        content: el.text_content(),
        line: el.line,
        level: cx.level(),
    };
    invoke(cx, &call, kind, parent);
}

/// Run `call` on the host and splice the produced nodes into `parent`.
/// Returns whether anything ran successfully.
pub fn invoke(cx: &mut Converter<'_>, call: &MacroCall, kind: MacroKind, parent: &mut OutputNode) -> bool {
    let Some(host) = cx.host() else {
        cx.warning(
            call.line,
            format!("no macro host to run {} '{}'", kind.as_str(), call.name),
        );
        return false;
    };
    log::debug!("running {} '{}'", kind.as_str(), call.name);
    let result = match kind {
        MacroKind::Role => host.run_role(call),
        MacroKind::Directive => host.run_directive(call),
    };
    match result {
        Ok(nodes) => {
            parent.children.extend(nodes);
            true
        }
        Err(err) => {
            cx.warning(call.line, format!("{} failed: {err}", kind.as_str()));
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Severity;
    use crate::handlers::testing::{convert, convert_with, first, is};

    const NS: &str = r#"xmlns:b="urn:docbook-babel:bridge""#;

    #[test]
    fn role_output_is_spliced_in_place() {
        let host = MacroRegistry::with_builtins();
        let source = format!(r#"<para {NS}>x = <b:role name="math">a+b</b:role>.</para>"#);
        let (doc, reporter) = convert_with(&source, Some(&host));
        let para = &doc.root.children[0];
        assert_eq!(para.children.len(), 3);
        assert_eq!(para.children[1].classes, vec!["math".to_string()]);
        assert_eq!(para.astext(), "x = a+b.");
        assert!(reporter.diagnostics().is_empty());
    }

    #[test]
    fn directive_gets_argument_options_and_level() {
        let mut host = MacroRegistry::new();
        host.register_directive("doxygenfile", |call: &MacroCall| -> MacroResult {
            let text = format!(
                "{}|{}|{}|{}",
                call.arguments.join(","),
                call.option("export").unwrap_or("-"),
                call.level,
                call.content
            );
            Ok(vec![OutputNode::new(NodeKind::Paragraph).with_child(OutputNode::text(text))])
        });
        let source = format!(
            r#"<chapter {NS}><section><b:directive b:name="doxygenfile" b:arg="../memory.h" export="address_*">body</b:directive></section></chapter>"#
        );
        let (doc, _) = convert_with(&source, Some(&host));
        let para = first(&doc, &is(NodeKind::Paragraph));
        assert_eq!(para.astext(), "../memory.h|address_*|1|body");
    }

    #[test]
    fn failures_are_warnings_and_insert_nothing() {
        let host = MacroRegistry::with_builtins();
        let source = format!(r#"<para {NS}>a<b:role name="nope">x</b:role>b</para>"#);
        let (doc, reporter) = convert_with(&source, Some(&host));
        assert_eq!(doc.root.astext(), "ab");
        assert_eq!(reporter.count(Severity::Warning), 1);
        assert!(reporter.diagnostics()[0].message.contains("unknown role 'nope'"));
    }

    #[test]
    fn missing_host_is_a_warning() {
        let source = format!(r#"<para {NS}><b:directive name="code">x</b:directive></para>"#);
        let (doc, reporter) = convert(&source);
        assert!(doc.root.children[0].children.is_empty());
        assert_eq!(reporter.count(Severity::Warning), 1);
    }

    #[test]
    fn code_directive_records_language() {
        let host = MacroRegistry::with_builtins();
        let call = MacroCall {
            arguments: vec!["rust".to_string()],
            ..MacroCall::new("code", "\nfn main() {}\n")
        };
        let nodes = host.run_directive(&call).unwrap();
        assert_eq!(nodes[0].classes, vec!["code".to_string(), "rust".to_string()]);
        assert_eq!(nodes[0].astext(), "fn main() {}");
    }

    #[test]
    fn builtins_are_listed() {
        let host = MacroRegistry::default();
        assert_eq!(host.roles(), vec!["math"]);
        assert_eq!(host.directives(), vec!["code", "math"]);
    }
}
