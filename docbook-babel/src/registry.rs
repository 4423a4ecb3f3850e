//! Lookup of inspection formats by name or file extension

use crate::error::ConvertError;
use crate::format::Format;
use crate::ir::nodes::Document;
use std::collections::HashMap;
use std::path::Path;

/// Named [`Format`]s.
///
/// ```ignore
/// let formats = FormatRegistry::default();
/// let dump = formats.serialize(&doc, "pseudoxml")?;
/// ```
pub struct FormatRegistry {
    by_name: HashMap<String, Box<dyn Format>>,
}

impl FormatRegistry {
    /// A registry without any format.
    pub fn new() -> Self {
        FormatRegistry {
            by_name: HashMap::new(),
        }
    }

    /// Add `format`; a format already registered under its name is replaced.
    pub fn register<F: Format + 'static>(&mut self, format: F) {
        let name = format.name().to_string();
        if self.by_name.insert(name.clone(), Box::new(format)).is_some() {
            log::debug!("format {name} replaced");
        }
    }

    pub fn get(&self, name: &str) -> Result<&dyn Format, ConvertError> {
        match self.by_name.get(name) {
            Some(format) => Ok(format.as_ref()),
            None => Err(ConvertError::FormatNotFound(name.to_string())),
        }
    }

    pub fn has(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn list_formats(&self) -> Vec<String> {
        let mut names: Vec<String> = self.by_name.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    /// Name of the format claiming `filename`'s extension.
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let extension = Path::new(filename).extension()?.to_str()?;
        self.by_name
            .values()
            .find(|format| format.file_extensions().contains(&extension))
            .map(|format| format.name().to_string())
    }

    /// Dump `doc` with the format called `format`.
    pub fn serialize(&self, doc: &Document, format: &str) -> Result<String, ConvertError> {
        let format = self.get(format)?;
        format.serialize(doc)
    }

    /// `pseudoxml` and `json`.
    pub fn with_defaults() -> Self {
        let mut formats = Self::new();
        formats.register(crate::formats::pseudoxml::PseudoXmlFormat);
        formats.register(crate::formats::json::JsonFormat);
        formats
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
