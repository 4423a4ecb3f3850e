//! Phase 2: stitching converted documents together
//!
//! Runs once every document of the build has been converted. Three passes:
//!
//! 1. navigation: a document that composes described children and is not the
//!    top resource of an assembly gets a trailing `toctree-wrapper` compound
//!    listing them;
//! 2. titles: an assembly root takes the title of its top resource, following
//!    chains of roots;
//! 3. substitution: every placeholder is replaced by deep copies of the fully
//!    resolved children of its target document.
//!
//! A document that reaches itself during substitution fails with
//! [`ConvertError::CyclicAssembly`]; one whose placeholder targets a document
//! that was never converted fails with [`ConvertError::Unresolved`]. Other
//! documents are not affected.

use super::graph::AssemblyGraph;
use crate::error::ConvertError;
use crate::ir::nodes::{DocId, Document, NavEntry, NodeKind, OutputNode};
use std::collections::{BTreeMap, HashSet};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of phase 2.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub documents: BTreeMap<DocId, Document>,
    pub failures: Vec<(DocId, ConvertError)>,
}

/// Resolve every document in `documents` against `graph`.
pub fn resolve(mut documents: BTreeMap<DocId, Document>, graph: &AssemblyGraph) -> Resolution {
    log::debug!("resolving {} documents", documents.len());
    add_navigation(&mut documents, graph);
    inherit_titles(&mut documents, graph);

    let substitution = Substitution {
        documents: &documents,
    };
    let ids: Vec<&DocId> = documents.keys().collect();

    #[cfg(feature = "parallel")]
    let results: Vec<(DocId, Result<Document, ConvertError>)> = ids
        .par_iter()
        .map(|id| ((*id).clone(), substitution.document(id)))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let results: Vec<(DocId, Result<Document, ConvertError>)> = ids
        .iter()
        .map(|id| ((*id).clone(), substitution.document(id)))
        .collect();

    let mut resolution = Resolution::default();
    for (id, result) in results {
        match result {
            Ok(document) => {
                resolution.documents.insert(id, document);
            }
            Err(err) => {
                log::error!("{id}: {err}");
                resolution.failures.push((id, err));
            }
        }
    }
    resolution
}

fn add_navigation(documents: &mut BTreeMap<DocId, Document>, graph: &AssemblyGraph) {
    for (id, document) in documents.iter_mut() {
        let children = graph.children_of(id);
        if children.is_empty() || graph.is_top_resource(id) {
            continue;
        }
        let entries = children
            .iter()
            .map(|c| NavEntry {
                title: c.description.clone(),
                document: c.child.clone(),
            })
            .collect();
        let wrapper = OutputNode::new(NodeKind::Compound)
            .with_class("toctree-wrapper")
            .with_child(OutputNode::new(NodeKind::Navigation {
                entries,
                hidden: false,
            }));
        document.root.push(wrapper);
    }
}

fn inherit_titles(documents: &mut BTreeMap<DocId, Document>, graph: &AssemblyGraph) {
    let roots: Vec<DocId> = graph.roots().cloned().collect();
    for root in roots {
        let mut seen = HashSet::from([root.clone()]);
        let mut source = root.clone();
        while let Some(top) = graph.top_resource(&source) {
            if !seen.insert(top.clone()) {
                break;
            }
            source = top.clone();
        }
        if source == root {
            continue;
        }
        let Some((title, long_title)) = documents
            .get(&source)
            .map(|doc| (doc.title.clone(), doc.long_title.clone()))
        else {
            continue;
        };
        if let Some(document) = documents.get_mut(&root) {
            document.title = title;
            document.long_title = long_title;
        }
    }
}

struct Substitution<'d> {
    documents: &'d BTreeMap<DocId, Document>,
}

impl Substitution<'_> {
    fn document(&self, id: &DocId) -> Result<Document, ConvertError> {
        let original = self
            .documents
            .get(id)
            .ok_or_else(|| ConvertError::Unresolved { document: id.clone() })?;
        let mut stack = vec![id.clone()];
        let children = self.expand(&original.root.children, &mut stack)?;
        Ok(Document {
            id: original.id.clone(),
            title: original.title.clone(),
            long_title: original.long_title.clone(),
            root: OutputNode {
                kind: original.root.kind.clone(),
                ids: original.root.ids.clone(),
                classes: original.root.classes.clone(),
                children,
            },
        })
    }

    fn expand(&self, nodes: &[OutputNode], stack: &mut Vec<DocId>) -> Result<Vec<OutputNode>, ConvertError> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            let NodeKind::Placeholder { target, .. } = &node.kind else {
                out.push(OutputNode {
                    kind: node.kind.clone(),
                    ids: node.ids.clone(),
                    classes: node.classes.clone(),
                    children: self.expand(&node.children, stack)?,
                });
                continue;
            };
            if stack.contains(target) {
                let mut chain = stack.clone();
                chain.push(target.clone());
                return Err(ConvertError::CyclicAssembly { chain });
            }
            let included = self
                .documents
                .get(target)
                .ok_or_else(|| ConvertError::Unresolved { document: target.clone() })?;
            stack.push(target.clone());
            let mut copies = self.expand(&included.root.children, stack)?;
            stack.pop();
            if let Some(first) = copies.first_mut() {
                let mut ids = node.ids.clone();
                ids.retain(|id| !first.ids.contains(id));
                ids.append(&mut first.ids);
                first.ids = ids;
            }
            out.extend(copies);
        }
        Ok(out)
    }
}
