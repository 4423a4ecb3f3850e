//! In-process build of a DocBook project
//!
//! [`Build`] drives both phases for a [`Project`]: [`Build::read`] converts
//! documents (and, transitively, everything their assemblies compose),
//! [`Build::update`] swaps in an edited source, [`Build::purge`] forgets a
//! document before it is read again, and
//! [`Build::finish`] runs the assembly resolver over everything converted so
//! far. Hosts with their own scheduling can call
//! [`convert_document`](crate::convert::convert_document) directly with a
//! shared graph instead.

use crate::assembly::{self, DocumentResolver, SharedAssemblyGraph};
use crate::bridge::MacroHost;
use crate::convert::registry::HandlerRegistry;
use crate::convert::{convert_document, ConvertEnv};
use crate::diagnostics::{Diagnostic, Reporter, Severity};
use crate::error::ConvertError;
use crate::ir::nodes::{DocId, Document};
use crate::settings::ConverterSettings;
use std::collections::{BTreeMap, HashSet, VecDeque};
use std::fs;
use std::path::Path;

const SOURCE_EXTENSION: &str = "xml";

/// Named DocBook sources.
#[derive(Debug, Clone, Default)]
pub struct Project {
    sources: BTreeMap<DocId, String>,
}

impl Project {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<DocId>, source: impl Into<String>) {
        self.sources.insert(id.into(), source.into());
    }

    pub fn with_document(mut self, id: impl Into<DocId>, source: impl Into<String>) -> Self {
        self.insert(id, source);
        self
    }

    /// Every `.xml` file below `dir`; ids are the relative paths without
    /// extension.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, ConvertError> {
        let dir = dir.as_ref();
        let mut project = Project::new();
        let mut pending = vec![dir.to_path_buf()];
        while let Some(current) = pending.pop() {
            let entries = fs::read_dir(&current).map_err(|e| ConvertError::io(&current, e))?;
            for entry in entries {
                let path = entry.map_err(|e| ConvertError::io(&current, e))?.path();
                if path.is_dir() {
                    pending.push(path);
                    continue;
                }
                if path.extension().and_then(|ext| ext.to_str()) != Some(SOURCE_EXTENSION) {
                    continue;
                }
                let Some(relative) = pathdiff::diff_paths(path.with_extension(""), dir) else {
                    continue;
                };
                let id = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy())
                    .collect::<Vec<_>>()
                    .join("/");
                let source = fs::read_to_string(&path).map_err(|e| ConvertError::io(&path, e))?;
                log::trace!("found {id} at {}", path.display());
                project.insert(id, source);
            }
        }
        Ok(project)
    }

    pub fn source(&self, id: &DocId) -> Option<&str> {
        self.sources.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &DocId) -> bool {
        self.sources.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &DocId> {
        self.sources.keys()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl DocumentResolver for Project {
    fn resolve(&self, from: &DocId, path: &str) -> Option<DocId> {
        let joined = assembly::join_path(from.parent_dir(), path);
        let id = joined
            .strip_suffix(".xml")
            .map(str::to_string)
            .unwrap_or(joined);
        let id = DocId::from(id);
        self.contains(&id).then_some(id)
    }
}

/// Everything a finished build produced.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub documents: BTreeMap<DocId, Document>,
    /// Documents that failed in either phase, with the reason.
    pub failures: Vec<(DocId, ConvertError)>,
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildOutput {
    pub fn document(&self, id: &str) -> Option<&Document> {
        self.documents.get(&DocId::from(id))
    }

    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct Build {
    project: Project,
    settings: ConverterSettings,
    registry: HandlerRegistry,
    host: Option<Box<dyn MacroHost>>,
    graph: SharedAssemblyGraph,
    reporter: Reporter,
    converted: BTreeMap<DocId, Document>,
    failures: BTreeMap<DocId, ConvertError>,
}

impl Build {
    pub fn new(project: Project, settings: ConverterSettings) -> Self {
        Build {
            project,
            settings,
            registry: HandlerRegistry::with_defaults(),
            host: None,
            graph: assembly::shared(),
            reporter: Reporter::new(),
            converted: BTreeMap::new(),
            failures: BTreeMap::new(),
        }
    }

    pub fn with_registry(mut self, registry: HandlerRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_host(mut self, host: impl MacroHost + 'static) -> Self {
        self.host = Some(Box::new(host));
        self
    }

    /// Report only diagnostics at or above `threshold`.
    pub fn with_threshold(mut self, threshold: Severity) -> Self {
        self.reporter = Reporter::new().with_threshold(threshold);
        self
    }

    pub fn project(&self) -> &Project {
        &self.project
    }

    pub fn graph(&self) -> &SharedAssemblyGraph {
        &self.graph
    }

    /// Phase-1 tree of a converted document.
    pub fn converted(&self, id: &DocId) -> Option<&Document> {
        self.converted.get(id)
    }

    /// Convert `ids`, then every document they compose that has not been
    /// converted yet. Returns the number of documents converted.
    pub fn read<I>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = DocId>,
    {
        let mut queue: VecDeque<DocId> = ids.into_iter().collect();
        let mut requested: HashSet<DocId> = queue.iter().cloned().collect();
        let mut done = HashSet::new();
        let env = ConvertEnv {
            settings: &self.settings,
            registry: &self.registry,
            host: self.host.as_deref(),
            assembly: None,
        }
        .with_assembly(&self.graph, &self.project);

        while let Some(id) = queue.pop_front() {
            if !done.insert(id.clone()) {
                continue;
            }
            if !requested.remove(&id) && (self.converted.contains_key(&id) || self.failures.contains_key(&id)) {
                continue;
            }
            self.graph.write().purge(&id);
            self.converted.remove(&id);
            self.failures.remove(&id);

            let Some(source) = self.project.source(&id) else {
                let err = ConvertError::Unresolved { document: id.clone() };
                self.reporter.set_document(Some(id.clone()));
                self.reporter.report(Severity::Error, None, err.to_string());
                self.failures.insert(id, err);
                continue;
            };
            match convert_document(id.clone(), source, &env, &mut self.reporter) {
                Ok(conversion) => {
                    queue.extend(conversion.included);
                    self.converted.insert(id, conversion.document);
                }
                Err(err) => {
                    self.reporter.report(Severity::Error, None, err.to_string());
                    self.failures.insert(id, err);
                }
            }
        }
        self.reporter.set_document(None);
        log::info!("read {} documents", done.len());
        done.len()
    }

    /// Convert every document of the project.
    pub fn read_all(&mut self) -> usize {
        let ids: Vec<DocId> = self.project.ids().cloned().collect();
        self.read(ids)
    }

    /// Replace the source of `id` (adding it if new) and forget what its
    /// previous conversion produced. The next [`read`](Self::read) of `id`
    /// converts the new source.
    pub fn update(&mut self, id: impl Into<DocId>, source: impl Into<String>) {
        let id = id.into();
        self.project.insert(id.clone(), source);
        self.purge(&id);
    }

    /// Forget `id`: its converted tree and everything its conversion
    /// registered in the assembly graph.
    pub fn purge(&mut self, id: &DocId) {
        log::debug!("purging {id}");
        self.graph.write().purge(id);
        self.converted.remove(id);
        self.failures.remove(id);
    }

    /// Run phase 2 over everything converted so far.
    pub fn finish(&mut self) -> BuildOutput {
        let resolution = assembly::resolve(self.converted.clone(), &self.graph.read());
        let mut failures: Vec<(DocId, ConvertError)> = self
            .failures
            .iter()
            .map(|(id, err)| (id.clone(), err.clone()))
            .collect();
        for (id, err) in resolution.failures {
            self.reporter.set_document(Some(id.clone()));
            self.reporter.report(Severity::Error, None, err.to_string());
            failures.push((id, err));
        }
        self.reporter.set_document(None);
        BuildOutput {
            documents: resolution.documents,
            failures,
            diagnostics: self.reporter.take(),
        }
    }
}
