//! DocBook assemblies
//!
//! An assembly document composes other documents of the project:
//!
//! ```xml
//! <assembly xml:id="guide">
//!   <resources xml:base="chapters/">
//!     <resource xml:id="intro" fileref="intro.xml">
//!       <description>Introduction</description>
//!     </resource>
//!   </resources>
//!   <structure resourceref="intro">
//!     <module resourceref="setup"/>
//!   </structure>
//! </assembly>
//! ```
//!
//! Resolution happens in two phases. While a document is converted
//! ([`handlers`]), every composition becomes a placeholder node and the
//! relations between documents are recorded in the shared [`AssemblyGraph`].
//! Once every document has been converted, [`resolve`] replaces placeholders
//! with copies of the composed documents, adds navigation and lets assembly
//! roots inherit the title of their top resource.

pub mod graph;
pub mod handlers;
pub mod resolve;
pub mod session;

pub use graph::{shared, AssemblyGraph, Composition, Registration, SharedAssemblyGraph};
pub use handlers::register;
pub use resolve::{resolve, Resolution};
pub use session::AssemblySession;

use crate::ir::nodes::DocId;

/// Maps resource files to document ids.
pub trait DocumentResolver: Send + Sync {
    /// Id of the document stored at `path`, relative to the directory of
    /// `from`; `None` if no such document is part of the project.
    fn resolve(&self, from: &DocId, path: &str) -> Option<DocId>;
}

/// Join `path` onto `base_dir` and fold `.` and `..` segments.
///
/// A leading `/` makes `path` relative to the project root. `..` never climbs
/// above the root.
pub fn join_path(base_dir: &str, path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    let combined = match path.strip_prefix('/') {
        Some(rooted) => rooted.to_string(),
        None if base_dir.is_empty() => path.to_string(),
        None => format!("{base_dir}/{path}"),
    };
    for segment in combined.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}
