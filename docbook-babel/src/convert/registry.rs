//! Handler registry for tag dispatch
//!
//! Handlers are looked up by [`HandlerKey`]: the local name of an element plus
//! the alias of its namespace (`None` for the primary DocBook namespace).
//! Extension namespaces add keys under their own alias instead of overriding
//! DocBook handlers. Registering a key twice replaces the earlier handler,
//! which is how a host customizes individual tags.

use super::{Converter, HandlerResult};
use crate::ir::nodes::OutputNode;
use crate::source::SourceElement;
use std::collections::HashMap;
use std::fmt;

/// Converts one source element (and its subtree) into nodes appended to `parent`.
///
/// Any function or closure with the matching signature is a handler:
///
/// ```ignore
/// fn para(cx: &mut Converter<'_>, el: &SourceElement, parent: &mut OutputNode) -> HandlerResult {
///     cx.block(el, parent, Some(NodeKind::Paragraph))
/// }
/// registry.register_primary("para", para);
/// ```
pub trait Handler: Send + Sync {
    fn convert(
        &self,
        cx: &mut Converter<'_>,
        el: &SourceElement,
        parent: &mut OutputNode,
    ) -> HandlerResult;
}

impl<F> Handler for F
where
    F: Fn(&mut Converter<'_>, &SourceElement, &mut OutputNode) -> HandlerResult + Send + Sync,
{
    fn convert(
        &self,
        cx: &mut Converter<'_>,
        el: &SourceElement,
        parent: &mut OutputNode,
    ) -> HandlerResult {
        self(cx, el, parent)
    }
}

/// Dispatch key: namespace alias (`None` = DocBook) and local name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerKey {
    pub alias: Option<String>,
    pub local: String,
}

impl HandlerKey {
    pub fn primary(local: &str) -> Self {
        HandlerKey {
            alias: None,
            local: local.to_string(),
        }
    }

    pub fn extension(alias: &str, local: &str) -> Self {
        HandlerKey {
            alias: Some(alias.to_string()),
            local: local.to_string(),
        }
    }
}

impl fmt::Display for HandlerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{alias}:{}", self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// Registry of element handlers
pub struct HandlerRegistry {
    handlers: HashMap<HandlerKey, Box<dyn Handler>>,
}

impl HandlerRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        HandlerRegistry {
            handlers: HashMap::new(),
        }
    }

    /// Register a handler, replacing any handler with the same key.
    pub fn register<H: Handler + 'static>(&mut self, key: HandlerKey, handler: H) {
        self.handlers.insert(key, Box::new(handler));
    }

    pub fn register_primary<H: Handler + 'static>(&mut self, local: &str, handler: H) {
        self.register(HandlerKey::primary(local), handler);
    }

    pub fn register_extension<H: Handler + 'static>(
        &mut self,
        alias: &str,
        local: &str,
        handler: H,
    ) {
        self.register(HandlerKey::extension(alias, local), handler);
    }

    pub fn get(&self, key: &HandlerKey) -> Option<&dyn Handler> {
        self.handlers.get(key).map(|h| h.as_ref())
    }

    pub fn has(&self, key: &HandlerKey) -> bool {
        self.handlers.contains_key(key)
    }

    /// All registered keys (sorted)
    pub fn keys(&self) -> Vec<HandlerKey> {
        let mut keys: Vec<_> = self.handlers.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Create a registry with the DocBook, bridge and assembly handlers
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        crate::handlers::register_defaults(&mut registry);
        crate::bridge::register(&mut registry);
        crate::assembly::register(&mut registry);
        registry
    }
}

impl Default for HandlerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
