//! Cross-document composition graph
//!
//! One graph lives for a whole build and is shared by every conversion. It is
//! only changed through [`AssemblyGraph::register`] and
//! [`AssemblyGraph::purge`]; every registration records the document whose
//! conversion made it (its origin), which is what purge removes.

use crate::ir::nodes::DocId;
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// A graph shared between conversions running on different threads.
pub type SharedAssemblyGraph = Arc<RwLock<AssemblyGraph>>;

pub fn shared() -> SharedAssemblyGraph {
    Arc::new(RwLock::new(AssemblyGraph::new()))
}

/// A described child of a document, listed in its navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composition {
    pub description: String,
    pub child: DocId,
    pub origin: DocId,
}

/// A change to the graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// `child` is composed into `parent` under `description`.
    Edge {
        parent: DocId,
        child: DocId,
        description: String,
    },
    /// `top` is the first document composed by `root`.
    TopResource { root: DocId, top: DocId },
}

#[derive(Debug, Default)]
pub struct AssemblyGraph {
    children: BTreeMap<DocId, Vec<Composition>>,
    roots: BTreeSet<DocId>,
    top_resources: BTreeMap<DocId, (DocId, DocId)>,
}

impl AssemblyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, origin: &DocId, registration: Registration) {
        match registration {
            Registration::Edge {
                parent,
                child,
                description,
            } => {
                log::trace!("{origin}: {parent} composes {child}");
                self.children.entry(parent).or_default().push(Composition {
                    description,
                    child,
                    origin: origin.clone(),
                });
            }
            Registration::TopResource { root, top } => {
                self.roots.insert(root.clone());
                self.top_resources
                    .entry(root)
                    .or_insert_with(|| (top, origin.clone()));
            }
        }
    }

    /// Remove everything `document`'s own conversion registered.
    pub fn purge(&mut self, document: &DocId) {
        for compositions in self.children.values_mut() {
            compositions.retain(|c| &c.origin != document);
        }
        self.children.retain(|_, compositions| !compositions.is_empty());
        self.top_resources.retain(|_, (_, origin)| origin != document);
        self.roots.retain(|root| self.top_resources.contains_key(root));
    }

    /// Described children of `parent`, in registration order.
    pub fn children_of(&self, parent: &DocId) -> &[Composition] {
        self.children.get(parent).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_root(&self, document: &DocId) -> bool {
        self.roots.contains(document)
    }

    pub fn roots(&self) -> impl Iterator<Item = &DocId> {
        self.roots.iter()
    }

    pub fn top_resource(&self, root: &DocId) -> Option<&DocId> {
        self.top_resources.get(root).map(|(top, _)| top)
    }

    /// Is `document` the top resource of some root?
    pub fn is_top_resource(&self, document: &DocId) -> bool {
        self.top_resources.values().any(|(top, _)| top == document)
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty() && self.roots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> DocId {
        DocId::from(s)
    }

    fn edge(parent: &str, child: &str) -> Registration {
        Registration::Edge {
            parent: id(parent),
            child: id(child),
            description: format!("{child} chapter"),
        }
    }

    #[test]
    fn first_top_resource_wins() {
        let mut graph = AssemblyGraph::new();
        graph.register(&id("book"), Registration::TopResource { root: id("book"), top: id("a") });
        graph.register(&id("book"), Registration::TopResource { root: id("book"), top: id("b") });
        assert_eq!(graph.top_resource(&id("book")), Some(&id("a")));
        assert!(graph.is_root(&id("book")));
        assert!(graph.is_top_resource(&id("a")));
        assert!(!graph.is_top_resource(&id("b")));
    }

    #[test]
    fn purge_removes_only_own_registrations() {
        let mut graph = AssemblyGraph::new();
        graph.register(&id("book"), edge("guide", "intro"));
        graph.register(&id("book"), Registration::TopResource { root: id("book"), top: id("guide") });
        graph.register(&id("other"), edge("guide", "setup"));

        graph.purge(&id("book"));

        let children: Vec<&DocId> = graph.children_of(&id("guide")).iter().map(|c| &c.child).collect();
        assert_eq!(children, vec![&id("setup")]);
        assert!(!graph.is_root(&id("book")));
        assert_eq!(graph.top_resource(&id("book")), None);
        assert!(!graph.is_empty());
        graph.purge(&id("other"));
        assert!(graph.is_empty());
    }

    #[test]
    fn purge_keeps_edges_pointing_at_the_purged_document() {
        let mut graph = AssemblyGraph::new();
        graph.register(&id("book"), edge("book", "intro"));
        graph.purge(&id("intro"));
        assert_eq!(graph.children_of(&id("book")).len(), 1);
    }
}
