//! Per-document assembly state

use super::graph::{Registration, SharedAssemblyGraph};
use super::DocumentResolver;
use crate::error::ConvertError;
use crate::ir::nodes::DocId;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Resource {
    path: String,
    description: Option<String>,
}

/// One `structure` or `module` being converted.
#[derive(Debug, Clone)]
pub struct Level {
    /// Document that composes `document`.
    pub parent: DocId,
    pub document: DocId,
    pub resource: String,
    /// Modules visited directly inside this one: resource id and target.
    pub modules: Vec<(String, DocId)>,
}

/// Assembly state of one conversion: declared resources, the stack of
/// composition levels and the documents scheduled for conversion.
pub struct AssemblySession<'a> {
    document: DocId,
    graph: &'a SharedAssemblyGraph,
    resolver: &'a dyn DocumentResolver,
    base: String,
    resources: HashMap<String, Resource>,
    levels: Vec<Level>,
    included: Vec<DocId>,
}

impl<'a> AssemblySession<'a> {
    pub fn new(document: DocId, graph: &'a SharedAssemblyGraph, resolver: &'a dyn DocumentResolver) -> Self {
        AssemblySession {
            document,
            graph,
            resolver,
            base: String::new(),
            resources: HashMap::new(),
            levels: Vec::new(),
            included: Vec::new(),
        }
    }

    pub fn document(&self) -> &DocId {
        &self.document
    }

    /// Base path (`xml:base`) for the following resource declarations.
    pub fn set_base(&mut self, base: &str) {
        self.base = base.to_string();
    }

    pub fn declare_resource(&mut self, id: &str, fileref: &str, description: Option<String>) {
        let path = match self.base.as_str() {
            "" => fileref.to_string(),
            base if base.ends_with('/') => format!("{base}{fileref}"),
            base => format!("{base}/{fileref}"),
        };
        self.resources
            .insert(id.to_string(), Resource { path, description });
    }

    pub fn description(&self, resource: &str) -> Option<&str> {
        self.resources
            .get(resource)
            .and_then(|r| r.description.as_deref())
    }

    /// Current composition depth (1 inside the outermost structure).
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    pub fn current(&self) -> Option<&Level> {
        self.levels.last()
    }

    /// Document currently being composed into.
    fn current_document(&self) -> &DocId {
        self.levels
            .last()
            .map(|level| &level.document)
            .unwrap_or(&self.document)
    }

    /// Enter the composition of `resource`.
    pub fn push_module(&mut self, resource: &str, line: u32) -> Result<&Level, ConvertError> {
        let path = match self.resources.get(resource) {
            Some(declared) => declared.path.clone(),
            None => {
                return Err(ConvertError::DanglingReference {
                    resource: resource.to_string(),
                    line,
                })
            }
        };
        let target = self
            .resolver
            .resolve(&self.document, &path)
            .ok_or(ConvertError::UnknownDocument { path, line })?;
        if !self.included.contains(&target) {
            self.included.push(target.clone());
        }
        if let Some(enclosing) = self.levels.last_mut() {
            enclosing.modules.push((resource.to_string(), target.clone()));
        }
        let parent = self.current_document().clone();
        self.levels.push(Level {
            parent,
            document: target,
            resource: resource.to_string(),
            modules: Vec::new(),
        });
        Ok(&self.levels[self.levels.len() - 1])
    }

    pub fn pop_module(&mut self) -> Option<Level> {
        self.levels.pop()
    }

    /// Record a described edge from the enclosing document to the current one.
    pub fn register_edge(&mut self, description: &str) {
        let Some(level) = self.levels.last() else {
            return;
        };
        let registration = Registration::Edge {
            parent: level.parent.clone(),
            child: level.document.clone(),
            description: description.to_string(),
        };
        self.register(registration);
    }

    /// Target document and resource id of a placeholder for the current level.
    /// At depth 1 the target becomes the top resource of its parent.
    pub fn include_placeholder(&mut self) -> Option<(DocId, String)> {
        let level = self.levels.last()?.clone();
        if self.levels.len() == 1 {
            self.register(Registration::TopResource {
                root: level.parent,
                top: level.document.clone(),
            });
        }
        Some((level.document, level.resource))
    }

    fn register(&self, registration: Registration) {
        self.graph.write().register(&self.document, registration);
    }

    /// Documents composed by this one, in first-use order.
    pub fn into_included(self) -> Vec<DocId> {
        self.included
    }
}
