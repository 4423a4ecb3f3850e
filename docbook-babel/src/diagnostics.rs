//! Diagnostics channel
//!
//! Conversion never aborts on unknown or badly structured markup; it reports
//! through a [`Reporter`] instead. A reporter lives for one run (a single
//! conversion or a whole build): unknown tags and namespaces are reported once
//! per distinct value for as long as the reporter lives.
//!
//! Every accepted diagnostic is also forwarded to the `log` facade, so hosts
//! that install a logger see conversion problems without draining the
//! reporter.

use crate::ir::nodes::DocId;
use crate::source::QName;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    /// Only used for documents whose conversion failed as a whole.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    pub line: Option<u32>,
    pub document: Option<DocId>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(doc) = &self.document {
            write!(f, "{doc}:")?;
        }
        if let Some(line) = self.line {
            write!(f, "{line}:")?;
        }
        if self.document.is_some() || self.line.is_some() {
            f.write_str(" ")?;
        }
        write!(f, "{}: {}", self.severity, self.message)
    }
}

/// Collects diagnostics for one run.
#[derive(Debug)]
pub struct Reporter {
    diagnostics: Vec<Diagnostic>,
    threshold: Severity,
    document: Option<DocId>,
    unknown_tags: HashSet<QName>,
    unknown_namespaces: HashSet<String>,
}

impl Reporter {
    pub fn new() -> Self {
        Reporter {
            diagnostics: Vec::new(),
            threshold: Severity::Info,
            document: None,
            unknown_tags: HashSet::new(),
            unknown_namespaces: HashSet::new(),
        }
    }

    /// Drop diagnostics below `threshold` (they are neither kept nor logged).
    pub fn with_threshold(mut self, threshold: Severity) -> Self {
        self.threshold = threshold;
        self
    }

    /// Document that subsequent diagnostics are attributed to.
    pub fn set_document(&mut self, document: Option<DocId>) {
        self.document = document;
    }

    pub fn report(&mut self, severity: Severity, line: Option<u32>, message: impl Into<String>) {
        if severity < self.threshold {
            return;
        }
        let diagnostic = Diagnostic {
            severity,
            message: message.into(),
            line,
            document: self.document.clone(),
        };
        match severity {
            Severity::Info => log::info!("{diagnostic}"),
            Severity::Warning => log::warn!("{diagnostic}"),
            Severity::Error => log::error!("{diagnostic}"),
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn info(&mut self, line: u32, message: impl Into<String>) {
        self.report(Severity::Info, Some(line), message);
    }

    pub fn warning(&mut self, line: u32, message: impl Into<String>) {
        self.report(Severity::Warning, Some(line), message);
    }

    /// Report an element without handler, once per qualified tag.
    pub fn unknown_tag(&mut self, tag: &QName, line: u32) {
        if self.unknown_tags.insert(tag.clone()) {
            self.warning(line, format!("don't know how to handle <{tag}>"));
        }
    }

    /// Report an unmapped namespace, once per namespace URI.
    pub fn unknown_namespace(&mut self, namespace: &str, line: u32) {
        if self.unknown_namespaces.insert(namespace.to_string()) {
            self.warning(line, format!("don't know how to handle namespace {namespace}"));
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Move the collected diagnostics out; deduplication state is kept.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new()
    }
}
