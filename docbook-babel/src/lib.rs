//! DocBook to document-tree conversion
//!
//!     This crate converts DocBook sources, legacy (DocBook 4, no namespace) or namespaced
//!     (DocBook 5), into a renderer agnostic output tree, and stitches several converted documents
//!     together through DocBook assemblies.
//!
//!     This is a pure lib: no code here supposes a shell environment, be it printing, env vars or
//!     process exit codes. Rendering the output tree (HTML, ODT...) is the host's job; the formats
//!     shipped here only dump trees for inspection.
//!
//! Architecture
//!
//!     Conversion is a tag-dispatch tree transducer: the dispatch engine (./convert) walks the
//!     source tree and hands every element to the handler registered for its (namespace alias,
//!     local name). Elements without a handler are passed through: their content lands in the
//!     parent, the wrapper disappears, and a diagnostic is emitted once per tag.
//!
//!     The file structure :
//!     .
//!     ├── error.rs                # ConvertError
//!     ├── diagnostics.rs          # Reporter: non-fatal findings, mirrored to `log`
//!     ├── settings.rs             # ConverterSettings, dialects
//!     ├── source.rs               # Owned source tree over roxmltree
//!     ├── convert
//!     │   ├── mod.rs              # Converter and its primitives
//!     │   ├── context.rs          # Tag stack, scoped frames, one-shot state, deferred buffer
//!     │   └── registry.rs         # Handler trait and registry
//!     ├── handlers                # DocBook vocabulary, one module per family
//!     ├── bridge.rs               # role / directive elements calling host macros
//!     ├── assembly                # Assembly graph, phase-1 handlers, phase-2 resolver
//!     ├── build.rs                # Project + Build: both phases in process
//!     ├── format.rs               # Format trait definition
//!     ├── registry.rs             # FormatRegistry
//!     ├── formats                 # pseudoxml, json
//!     └── ir                      # Output tree
//!
//! Core Algorithms
//!
//!     Most handlers are a line or two over the engine primitives: concatenate children into a
//!     node, convert as a block (flushing deferred footnotes after it), join children with a
//!     separator, or flatten an element to plain text. Contextual state such as the section level,
//!     who owns the next title, the bullet to strip from a list item or the numbering depth lives
//!     in frames that are pushed for the duration of a handler call and restored afterwards.
//!
//!     Assemblies need every document converted before they can be put together, so they are
//!     resolved in two phases. Phase 1 leaves placeholders and records the relations between
//!     documents in a shared graph; phase 2 (./assembly/resolve.rs) substitutes placeholders with
//!     deep copies, adds navigation and propagates titles.
//!
//! Testing
//!     tests
//!     └── <area>
//!         └── <testname>.rs
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include these
//!     in the mod.

pub mod assembly;
pub mod bridge;
pub mod build;
pub mod convert;
pub mod diagnostics;
pub mod error;
pub mod format;
pub mod formats;
pub mod handlers;
pub mod ir;
pub mod registry;
pub mod settings;
pub mod source;

pub use assembly::{AssemblyGraph, DocumentResolver, SharedAssemblyGraph};
pub use bridge::{MacroCall, MacroError, MacroHost, MacroRegistry};
pub use build::{Build, BuildOutput, Project};
pub use convert::registry::{Handler, HandlerRegistry};
pub use convert::{convert_document, Conversion, ConvertEnv, Converter};
pub use diagnostics::{Diagnostic, Reporter, Severity};
pub use error::ConvertError;
pub use format::Format;
pub use ir::nodes::{DocId, Document, NodeKind, OutputNode};
pub use registry::FormatRegistry;
pub use settings::{ConverterSettings, Dialect};

/// Convert a standalone document with default settings and handlers.
///
/// Assembly markup is reported and skipped; use [`Build`] for projects.
pub fn convert_str(id: &str, source: &str) -> Result<(Document, Vec<Diagnostic>), ConvertError> {
    let settings = ConverterSettings::default();
    let registry = HandlerRegistry::with_defaults();
    let env = ConvertEnv::new(&settings, &registry);
    let mut reporter = Reporter::new();
    let conversion = convert_document(DocId::from(id), source, &env, &mut reporter)?;
    Ok((conversion.document, reporter.take()))
}
