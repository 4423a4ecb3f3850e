//! Error types for conversion and assembly operations
//!
//! Only problems that stop a whole document are errors. Unknown markup,
//! cardinality problems and failing macros are reported through
//! [`crate::diagnostics::Reporter`] instead and never show up here.

use crate::ir::nodes::DocId;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;

/// Errors that abort the conversion or resolution of a document
#[derive(Debug, Clone, Error)]
pub enum ConvertError {
    /// The source text is not well-formed XML
    #[error("malformed input: {message}")]
    MalformedInput { message: String },

    /// A `resourceref` names a resource that was never declared
    #[error("line {line}: unresolved assembly resource '{resource}'")]
    DanglingReference { resource: String, line: u32 },

    /// A declared resource points at a file that is not part of the project
    #[error("line {line}: resource file '{path}' is not a known document")]
    UnknownDocument { path: String, line: u32 },

    /// A document includes itself, directly or through other documents
    #[error("cyclic assembly: {}", format_chain(.chain))]
    CyclicAssembly { chain: Vec<DocId> },

    /// Phase 2 needs a document that was never converted successfully
    #[error("document '{document}' is referenced but was not converted")]
    Unresolved { document: DocId },

    /// Reading project sources failed
    #[error("cannot read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: Arc<std::io::Error>,
    },

    /// Format not found in registry
    #[error("format '{0}' not found")]
    FormatNotFound(String),

    /// Error during serialization of an output tree
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl ConvertError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConvertError::Io {
            path: path.into(),
            source: Arc::new(source),
        }
    }
}

fn format_chain(chain: &[DocId]) -> String {
    chain
        .iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}
