//! Converter settings
//!
//! Plain data consumed by the dispatch engine. `docbook-config` builds these
//! from layered TOML files; library users can also construct them directly.

use crate::source::{QName, DOCBOOK_NS, XML_NS};
use std::collections::BTreeMap;

/// Alias under which bridge elements are dispatched.
pub const BRIDGE_ALIAS: &str = "bridge";

/// Default namespace URI of bridge elements.
pub const DEFAULT_BRIDGE_NS: &str = "urn:docbook-babel:bridge";

/// Which DocBook flavour the input uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    /// Namespaced if the root element has a namespace, legacy otherwise.
    #[default]
    Auto,
    /// DocBook 4: no namespace, ids in `id`.
    Legacy,
    /// DocBook 5: DocBook namespace, ids in `xml:id`.
    Namespaced,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConverterSettings {
    pub dialect: Dialect,
    /// Namespace URI of bridge (`role` / `directive`) elements.
    pub bridge_namespace: String,
    /// Further extension namespaces: URI -> alias used in handler keys.
    pub extension_namespaces: BTreeMap<String, String>,
    /// Bullet recorded for itemized lists without a recognizable glyph.
    pub generic_bullet: String,
    /// Render `refentry` pages as structured API descriptions instead of
    /// plain sections.
    pub api_descriptions: bool,
}

impl ConverterSettings {
    /// Alias registered for `namespace`, if any.
    pub fn extension_alias(&self, namespace: &str) -> Option<&str> {
        if namespace == self.bridge_namespace {
            return Some(BRIDGE_ALIAS);
        }
        self.extension_namespaces.get(namespace).map(String::as_str)
    }
}

impl Default for ConverterSettings {
    fn default() -> Self {
        ConverterSettings {
            dialect: Dialect::Auto,
            bridge_namespace: DEFAULT_BRIDGE_NS.to_string(),
            extension_namespaces: BTreeMap::new(),
            generic_bullet: "bullet".to_string(),
            api_descriptions: false,
        }
    }
}

/// Dialect decided for one concrete document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDialect {
    /// Namespace of DocBook elements (`None` for the legacy dialect).
    pub primary_namespace: Option<String>,
    /// Attribute carrying element ids.
    pub id_attribute: QName,
}

impl ResolvedDialect {
    pub fn legacy() -> Self {
        ResolvedDialect {
            primary_namespace: None,
            id_attribute: QName::new("id"),
        }
    }

    pub fn namespaced() -> Self {
        ResolvedDialect {
            primary_namespace: Some(DOCBOOK_NS.to_string()),
            id_attribute: QName::namespaced(XML_NS, "id"),
        }
    }

    /// Pick the dialect for a document whose root element is `root`.
    pub fn for_root(dialect: Dialect, root: &QName) -> Self {
        match dialect {
            Dialect::Legacy => Self::legacy(),
            Dialect::Namespaced => Self::namespaced(),
            Dialect::Auto if root.namespace.is_some() => Self::namespaced(),
            Dialect::Auto => Self::legacy(),
        }
    }
}
